//! User registry domain logic: score charging and debiting actions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
