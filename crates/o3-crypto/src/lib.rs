//! Hashing, key material and signing for the O3 NEO wallet.
//!
//! Keys are secp256r1. A [`KeyMaterial`] derives the compressed public key,
//! the single-signature verification script, its script hash and the
//! address. Transaction code depends only on the [`TransactionSigner`]
//! capability, so tests can substitute fixed signatures, and on
//! [`KeyStore`] for retrieving keys by identifier.

pub mod hash;
pub mod keys;
pub mod keystore;
pub mod signer;

pub use hash::{hash160, hash256, ripemd160, sha256};
pub use keys::KeyMaterial;
pub use keystore::{KeyStore, MemoryKeyStore};
pub use signer::{verify, TransactionSigner};

use o3_types::FormatError;
use thiserror::Error;

/// Failure reported by a signing capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("signing backend failed: {0}")]
    Backend(String),

    #[error("signing key unavailable: {0}")]
    KeyUnavailable(String),
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid WIF: {0}")]
    InvalidWif(String),

    #[error("no key stored for '{0}'")]
    KeyNotFound(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Signing(#[from] SigningError),
}
