use crate::models::{IdentityOutcome, IdentitySource};
use crate::utils::ShareLinks;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Main,
    Loading,
    Results,
}

pub struct App {
    pub input_mode: InputMode,
    pub current_screen: Screen,
    pub current_input: String,
    pub force_refresh: bool,
    pub outcome: Option<IdentityOutcome>,
    pub share: Option<ShareLinks>,
    pub error_message: Option<String>,
    pub loading_message: Option<String>,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Editing,
            current_screen: Screen::Main,
            current_input: String::new(),
            force_refresh: false,
            outcome: None,
            share: None,
            error_message: None,
            loading_message: None,
            should_quit: false,
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address ready to submit, if any was typed.
    pub fn submitted_address(&self) -> Option<String> {
        let address = self.current_input.trim();
        if address.is_empty() {
            None
        } else {
            Some(address.to_string())
        }
    }

    pub fn toggle_refresh(&mut self) {
        self.force_refresh = !self.force_refresh;
    }

    pub fn is_cached(&self) -> bool {
        matches!(
            self.outcome.as_ref().map(|o| o.source),
            Some(IdentitySource::Cached)
        )
    }

    pub fn set_loading(&mut self, message: &str) {
        self.current_screen = Screen::Loading;
        self.loading_message = Some(message.to_string());
        self.error_message = None;
    }

    pub fn set_error(&mut self, error: &str) {
        self.error_message = Some(error.to_string());
        self.loading_message = None;
        self.current_screen = Screen::Main;
        self.input_mode = InputMode::Editing;
    }

    pub fn set_outcome(&mut self, outcome: IdentityOutcome, share: Option<ShareLinks>) {
        self.outcome = Some(outcome);
        self.share = share;
        self.current_screen = Screen::Results;
        self.loading_message = None;
        self.error_message = None;
    }

    pub fn back_to_main(&mut self) {
        self.current_screen = Screen::Main;
        self.input_mode = InputMode::Editing;
        self.current_input.clear();
        self.error_message = None;
    }
}
