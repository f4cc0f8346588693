//! Format errors for malformed external input.

use crate::base58::Base58Error;
use thiserror::Error;

/// Malformed hex, address, amount or byte-layout input.
///
/// Always recoverable: raised before anything is signed or submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unsupported integer width {0} (use 1, 2, 4 or 8)")]
    UnsupportedWidth(usize),

    #[error("value {value} does not fit in {width} bytes")]
    ValueTooWide { value: u64, width: usize },

    #[error("unexpected end of data: need {need} bytes, {remaining} remaining")]
    UnexpectedEof { need: usize, remaining: usize },

    #[error("base58 error: {0}")]
    Base58(#[from] Base58Error),

    #[error("invalid address version byte 0x{0:02x}")]
    AddressVersion(u8),

    #[error("invalid amount '{text}': {reason}")]
    InvalidAmount { text: String, reason: String },

    #[error("unknown asset: {0}")]
    UnknownAsset(String),
}
