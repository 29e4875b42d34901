//! Error taxonomy for the bot front end: decode failures are swallowed by
//! the projector per the wire contract, driver failures propagate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 payload")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid binary encoding")]
    Bincode(#[from] bincode::Error),
    #[error("button index {0} is unregistered or out of range")]
    UnknownButton(i64),
    #[error("button type was never registered with this registry")]
    UnregisteredButton,
}

/// Surfaced by a [`crate::driver::Driver`] implementation; the engine does
/// not interpret or recover from it.
#[derive(Debug, Error)]
#[error("driver call failed: {0}")]
pub struct DriverError(pub String);
