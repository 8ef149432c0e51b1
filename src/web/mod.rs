pub mod error;
pub mod handlers;
pub mod router;

use std::sync::Arc;

use crate::{config::Settings, service::IdentityService};

pub use error::ApiError;
pub use router::create_router;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IdentityService>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(service: IdentityService, settings: Settings) -> Self {
        Self {
            service: Arc::new(service),
            settings: Arc::new(settings),
        }
    }
}
