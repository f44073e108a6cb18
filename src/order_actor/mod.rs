//! Order ledger: order bookkeeping and payment settlement against the user registry.

pub mod error;
pub mod messages;
pub mod service;

pub use error::*;
pub use messages::*;
pub use service::*;
