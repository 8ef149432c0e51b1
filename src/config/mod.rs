pub mod rpc;
pub mod settings;

pub use rpc::{RpcConfig, RpcEndpoint, BASE_MAINNET_CHAIN_ID};
pub use settings::*;
