pub mod error;
pub mod identity;
pub mod score;
pub mod wallet;

pub use error::*;
pub use identity::*;
pub use score::*;
pub use wallet::*;
