//! Core types and constants for the O3 NEO wallet.
//!
//! This crate provides the foundational types used across all o3 crates:
//! the byte codec for the NEO wire format, fixed-point amounts, asset kinds,
//! script hashes and addresses, and the spendable-output and claim records
//! that feed transaction construction.

pub mod address;
pub mod amount;
pub mod asset;
pub mod base58;
pub mod codec;
pub mod constants;
pub mod error;
pub mod hash;
pub mod utxo;

pub use address::{create_address, parse_address};
pub use amount::Amount;
pub use asset::AssetKind;
pub use constants::Network;
pub use error::FormatError;
pub use hash::{ScriptHash, UInt256};
pub use utxo::{ClaimRecord, SpendableOutput};
