pub mod base;
pub mod client;
pub mod resilience;

pub use base::BaseClient;
pub use client::{ChainClient, ChainClientConfig};
pub use resilience::{retry_with_backoff, RetryConfig};
