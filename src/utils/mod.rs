pub mod address;
pub mod share;

pub use address::{normalize, normalize_tx_hash, NormalizedAddress};
pub use share::ShareLinks;
