use std::io;

use alloy::transports::TransportError;
use thiserror::Error;

/// Represents the user-facing errors of the order-approvals package.
///
/// Lower-level failures from the provider and the ABI layer are forwarded as they are, so callers
/// can inspect the original error.
/// Variants:
/// - `InvalidInput`: An address or item type in the input could not be interpreted.
/// - `UnsupportedMethod`: A token interface was asked to encode a method it does not expose.
/// - `Transport`: The provider call failed. Retrying at a later time may succeed.
/// - `Abi`: The data returned by a contract could not be decoded.
/// - `FatalError`: There is a problem with the application setup.
#[derive(Error, Debug)]
pub enum ApprovalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Method {method} is not part of the {interface} interface")]
    UnsupportedMethod { interface: &'static str, method: &'static str },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Abi(#[from] alloy_sol_types::Error),
    #[error("Fatal error: {0}")]
    FatalError(String),
}

impl From<io::Error> for ApprovalError {
    fn from(err: io::Error) -> Self {
        ApprovalError::FatalError(err.to_string())
    }
}

impl From<serde_json::Error> for ApprovalError {
    fn from(err: serde_json::Error) -> Self {
        ApprovalError::FatalError(err.to_string())
    }
}
