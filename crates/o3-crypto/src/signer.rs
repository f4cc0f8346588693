//! The signing capability consumed by transaction finalization.

use crate::keys::KeyMaterial;
use crate::{CryptoError, SigningError};
use o3_types::constants::{PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, VerifyingKey};

/// Produces raw `r || s` signatures over a message.
///
/// The message is hashed with SHA-256 by the implementation. Test doubles
/// may return a fixed signature.
pub trait TransactionSigner {
    fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE];

    fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_SIZE], SigningError>;
}

impl TransactionSigner for KeyMaterial {
    fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        *KeyMaterial::public_key(self)
    }

    /// Deterministic ECDSA (RFC 6979) over SHA-256(message).
    fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_SIZE], SigningError> {
        let signature: Signature = self
            .signing_key()
            .try_sign(message)
            .map_err(|e| SigningError::Backend(e.to_string()))?;
        let mut out = [0u8; SIGNATURE_SIZE];
        out.copy_from_slice(&signature.to_bytes());
        log::debug!("signed {} byte message", message.len());
        Ok(out)
    }
}

impl<T: TransactionSigner + ?Sized> TransactionSigner for &T {
    fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        (**self).public_key()
    }

    fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_SIZE], SigningError> {
        (**self).sign(message)
    }
}

/// Check a raw `r || s` signature against a compressed or uncompressed key.
pub fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
    let key = VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|_| CryptoError::InvalidPublicKey(hex::encode(public_key)))?;
    let Ok(signature) = Signature::from_slice(signature) else {
        return Ok(false);
    };
    Ok(key.verify(message, &signature).is_ok())
}
