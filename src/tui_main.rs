use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use tokio::sync::Mutex;

use base_identity::{
    config::Settings,
    models::IdentityError,
    service::IdentityService,
    tui::{
        app::{InputMode, Screen},
        ui, App, Event as TuiEvent, EventHandler,
    },
    utils::ShareLinks,
};

pub async fn run_tui(settings: Settings, ephemeral: bool) -> Result<()> {
    // Logging would corrupt the alternate screen
    disable_logging_output();

    let service = IdentityService::from_settings(&settings, ephemeral)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize identity service: {}", e))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let app = Arc::new(Mutex::new(App::new()));
    let events = EventHandler::new(250);

    let res = run_app(&mut terminal, app, events, Arc::new(service), Arc::new(settings)).await;

    // Always restore terminal state, even if there was an error
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn disable_logging_output() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let null_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::sink)
        .with_filter(tracing_subscriber::filter::LevelFilter::OFF);

    let _ = tracing_subscriber::registry().with(null_layer).try_init();
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: Arc<Mutex<App>>,
    events: EventHandler,
    service: Arc<IdentityService>,
    settings: Arc<Settings>,
) -> Result<()> {
    loop {
        {
            let app = app.lock().await;
            if app.should_quit {
                return Ok(());
            }
            terminal.draw(|f| ui::draw(f, &app))?;
        }

        let event = match events.next() {
            Ok(event) => event,
            // The input thread has stopped
            Err(_) => return Ok(()),
        };

        let TuiEvent::Key(key) = event else {
            continue;
        };

        let mut app_guard = app.lock().await;
        let screen = app_guard.current_screen.clone();
        match screen {
            Screen::Main => match key.code {
                KeyCode::Esc => app_guard.should_quit = true,
                KeyCode::Tab => app_guard.toggle_refresh(),
                KeyCode::Backspace => {
                    app_guard.current_input.pop();
                }
                KeyCode::Char(c) => {
                    app_guard.input_mode = InputMode::Editing;
                    app_guard.current_input.push(c);
                }
                KeyCode::Enter => {
                    let Some(address) = app_guard.submitted_address() else {
                        continue;
                    };
                    let force_refresh = app_guard.force_refresh;
                    app_guard.input_mode = InputMode::Normal;
                    app_guard.set_loading("Reading the chain and consulting the oracle...");
                    drop(app_guard);

                    let app = Arc::clone(&app);
                    let service = Arc::clone(&service);
                    let settings = Arc::clone(&settings);

                    tokio::spawn(async move {
                        let result = service.resolve(&address, force_refresh).await;
                        let mut app = app.lock().await;
                        match result {
                            Ok(outcome) => {
                                let share =
                                    ShareLinks::for_record(&settings.share, &settings.mint, &outcome.record).ok();
                                app.set_outcome(outcome, share);
                            }
                            Err(e) => app.set_error(&format_user_friendly_error(&e)),
                        }
                    });
                }
                _ => {}
            },
            Screen::Results => match key.code {
                KeyCode::Char('b') | KeyCode::Esc => app_guard.back_to_main(),
                KeyCode::Char('q') => app_guard.should_quit = true,
                _ => {}
            },
            // Keys are ignored while a lookup is running
            Screen::Loading => {}
        }
    }
}

fn format_user_friendly_error(error: &IdentityError) -> String {
    match error {
        IdentityError::InvalidAddress(_) => {
            "❌ Invalid address. Expected 0x followed by 40 hex characters.".to_string()
        }
        IdentityError::RpcError { .. } | IdentityError::HttpError(_) => {
            "🌐 Could not reach Base. Check your connection and try again.".to_string()
        }
        IdentityError::DataFetchTimeout { .. } => "⏱️  Request timed out. Please try again.".to_string(),
        other => {
            let message = other.to_string();
            if message.chars().count() > 100 {
                format!("❌ {}…", message.chars().take(97).collect::<String>().trim_end())
            } else {
                format!("❌ {}", message)
            }
        }
    }
}
