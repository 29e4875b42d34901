//! Chat-bot front end for the `forest` hierarchical state machine engine:
//! a driver contract, key/value store contract, event projection, the
//! button payload wire codec, and a runner that keeps one machine instance
//! per chat.

pub mod codec;
pub mod context;
pub mod driver;
pub mod error;
pub mod kv;
pub mod projection;
pub mod runner;

pub use forest_macros::{Button, Command};
