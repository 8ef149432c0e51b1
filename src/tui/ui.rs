use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::models::{IdentityRecord, SupportedToken, Tier};
use crate::tui::app::{App, InputMode, Screen};

pub fn draw(frame: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::Main => draw_main_screen(frame, app),
        Screen::Loading => draw_loading_screen(frame, app),
        Screen::Results => draw_results_screen(frame, app),
    }
}

/// Columns the cursor sits past the start of the input text.
pub fn cursor_offset(input: &str) -> u16 {
    u16::try_from(input.chars().count()).unwrap_or(u16::MAX)
}

pub fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Godly => Color::Yellow,
        Tier::Legendary => Color::Magenta,
        Tier::Rare => Color::Cyan,
        Tier::Common => Color::Gray,
    }
}

fn key(label: &str, color: Color) -> Span<'_> {
    Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn draw_main_screen(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(frame.size());

    let title = Paragraph::new("🔷 Base Identity Protocol")
        .style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let intro = Paragraph::new(vec![
        Line::from("Reveal the on-chain identity of any Base wallet."),
        Line::from("Wealth, vitality and community decide the tier."),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(intro, chunks[1]);

    let input = Paragraph::new(app.current_input.as_str())
        .style(match app.input_mode {
            InputMode::Editing => Style::default().fg(Color::Yellow),
            InputMode::Normal => Style::default(),
        })
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Wallet address {}",
            if app.force_refresh { "[force refresh]" } else { "" }
        )));
    frame.render_widget(input, chunks[2]);

    let mut lines = vec![Line::from(vec![
        key("Enter", Color::Green),
        Span::raw(" reveal | "),
        key("Tab", Color::Green),
        Span::raw(" toggle refresh | "),
        key("Esc", Color::Red),
        Span::raw(" quit"),
    ])];

    if let Some(error) = &app.error_message {
        lines.push(Line::from(vec![
            key("Error: ", Color::Red),
            Span::styled(error, Style::default().fg(Color::Red)),
        ]));
    }

    let help = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);

    if app.input_mode == InputMode::Editing {
        frame.set_cursor(
            chunks[2].x.saturating_add(cursor_offset(&app.current_input)).saturating_add(1),
            chunks[2].y + 1,
        );
    }
}

fn draw_results_screen(frame: &mut Frame, app: &App) {
    let Some(outcome) = &app.outcome else {
        return draw_main_screen(frame, app);
    };
    let record = &outcome.record;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let color = tier_color(record.tier);
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            record.name.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(record.tier.as_str(), Style::default().fg(color)),
            Span::raw(format!(" · {:.1}/100", record.scores.final_score)),
        ]),
        Line::from(Span::styled(
            format!("\"{}\"", record.verdict),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title(record.checksum_address.as_str()));
    frame.render_widget(header, chunks[0]);

    let bars = [
        ("Wealth", record.scores.wealth_score, Color::Green),
        ("Vitality", record.scores.vitality_score, Color::Blue),
        ("Community", record.scores.community_score, Color::Magenta),
    ];
    for (i, (label, value, bar_color)) in bars.into_iter().enumerate() {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(label))
            .gauge_style(Style::default().fg(bar_color))
            .percent(value.clamp(0.0, 100.0) as u16)
            .label(format!("{:.0}", value));
        frame.render_widget(gauge, chunks[1 + i]);
    }

    frame.render_widget(details(app, record), chunks[4]);

    let help = Paragraph::new(Line::from(vec![
        key("b", Color::Green),
        Span::raw(" back | "),
        key("q", Color::Red),
        Span::raw(" quit"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[5]);
}

fn details<'a>(app: &'a App, record: &'a IdentityRecord) -> Paragraph<'a> {
    let mut lines = vec![
        Line::from(format!(
            "Balance: {:.4} ETH | Transactions: {}",
            record.stats.balance_eth, record.stats.tx_count
        )),
    ];

    let badges: Vec<String> = SupportedToken::ALL
        .iter()
        .filter(|token| record.stats.holds(**token))
        .map(|token| format!("{} {}", token.badge(), token.symbol()))
        .collect();
    lines.push(Line::from(if badges.is_empty() {
        "Holdings: none".to_string()
    } else {
        format!("Holdings: {}", badges.join("  "))
    }));

    let source = if app.is_cached() {
        Span::styled("⚡ Loaded from cache", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("✨ Freshly generated", Style::default().fg(Color::Green))
    };
    lines.push(Line::from(source));

    if record.minted {
        lines.push(Line::from(Span::styled(
            format!("✅ Minted in {}", record.mint_tx_hash.as_deref().unwrap_or("-")),
            Style::default().fg(Color::Green),
        )));
    }

    if let Some(share) = &app.share {
        lines.push(Line::from(format!("Profile: {}", share.profile_url)));
        lines.push(Line::from(format!("Officialize: {}", share.mint_uri)));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Details"))
}

fn draw_loading_screen(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.size());

    let loading_text = app.loading_message.as_deref().unwrap_or("Loading...");

    let loading = Paragraph::new(loading_text)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("⏳ Processing"));

    frame.render_widget(Clear, area);
    frame.render_widget(loading, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
