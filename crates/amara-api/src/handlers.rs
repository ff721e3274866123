//! Request handlers.

pub mod health;
pub mod storage;

pub use health::*;
pub use storage::*;
