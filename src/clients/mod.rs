//! Client handles for the registry and ledger actors.

#[macro_use]
mod macros;

pub mod order_client;
pub mod score_ledger;
pub mod user_client;

pub use order_client::*;
pub use score_ledger::*;
pub use user_client::*;
