//! Base58Check encoding/decoding.
//!
//! Addresses and WIF keys are Base58 with a 4-byte checksum: the first
//! four bytes of double SHA-256 over the payload.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Checksum length appended before encoding.
pub const CHECKSUM_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58Error {
    #[error("invalid base58 string: {0}")]
    InvalidEncoding(String),

    #[error("decoded data too short ({0} bytes, need more than 4)")]
    TooShort(usize),

    #[error("checksum mismatch")]
    ChecksumMismatch,
}

fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; CHECKSUM_SIZE];
    out.copy_from_slice(&second[..CHECKSUM_SIZE]);
    out
}

pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| Base58Error::InvalidEncoding(e.to_string()))
}

/// Encode `data || checksum(data)`.
pub fn check_encode(data: &[u8]) -> String {
    let mut payload = Vec::with_capacity(data.len() + CHECKSUM_SIZE);
    payload.extend_from_slice(data);
    payload.extend_from_slice(&checksum(data));
    encode(&payload)
}

/// Decode and verify the trailing checksum, returning the payload.
pub fn check_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    let decoded = decode(s.trim())?;
    if decoded.len() <= CHECKSUM_SIZE {
        return Err(Base58Error::TooShort(decoded.len()));
    }
    let (payload, check) = decoded.split_at(decoded.len() - CHECKSUM_SIZE);
    if checksum(payload) != check {
        return Err(Base58Error::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}
