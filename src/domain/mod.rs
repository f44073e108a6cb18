pub mod account;
pub mod order;
pub mod user;

pub use account::*;
pub use order::*;
pub use user::*;
