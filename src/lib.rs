pub mod chains;
pub mod config;
pub mod identity;
pub mod models;
pub mod scoring;
pub mod service;
pub mod storage;
pub mod tui;
pub mod utils;
pub mod web;

pub use config::{RpcConfig, Settings};
pub use models::{IdentityError, IdentityOutcome, IdentityRecord, Result, ScoreResult, Tier};
pub use scoring::ScoringAlgorithm;
pub use service::IdentityService;

// Re-export commonly used types
pub use rust_decimal::Decimal;
