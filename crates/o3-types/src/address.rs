//! NEO address parsing and creation.
//!
//! An address is Base58Check over `ADDRESS_VERSION || script_hash`.

use crate::base58;
use crate::constants::{ADDRESS_VERSION, SCRIPT_HASH_SIZE};
use crate::error::FormatError;
use crate::hash::ScriptHash;

/// Parse and validate an address, returning its script hash.
pub fn parse_address(address: &str) -> Result<ScriptHash, FormatError> {
    let payload = base58::check_decode(address.trim())?;
    if payload.len() != SCRIPT_HASH_SIZE + 1 {
        return Err(FormatError::InvalidLength {
            expected: SCRIPT_HASH_SIZE + 1,
            actual: payload.len(),
        });
    }
    if payload[0] != ADDRESS_VERSION {
        return Err(FormatError::AddressVersion(payload[0]));
    }
    ScriptHash::from_slice(&payload[1..])
}

pub fn create_address(script_hash: &ScriptHash) -> String {
    let mut payload = Vec::with_capacity(SCRIPT_HASH_SIZE + 1);
    payload.push(ADDRESS_VERSION);
    payload.extend_from_slice(script_hash.as_bytes());
    base58::check_encode(&payload)
}

pub fn is_valid_address(address: &str) -> bool {
    parse_address(address).is_ok()
}

impl ScriptHash {
    pub fn to_address(&self) -> String {
        create_address(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base58::Base58Error;

    const ADDRESS: &str = "ALq7AWrhAueN6mJNqk6FHJjnsEoPRytLdW";
    const SCRIPT_HASH: &str = "3775292229eccdf904f16fff8e83e7cffdc0f0ce";

    #[test]
    fn test_parse_known_address() {
        let h = parse_address(ADDRESS).unwrap();
        assert_eq!(h.to_wire_hex(), SCRIPT_HASH);
    }

    #[test]
    fn test_create_roundtrip() {
        let h = ScriptHash::from_wire_hex(SCRIPT_HASH).unwrap();
        assert_eq!(h.to_address(), ADDRESS);
        assert_eq!(parse_address(&create_address(&h)).unwrap(), h);
    }

    #[test]
    fn test_bad_checksum() {
        let mut tampered = ADDRESS.to_string();
        tampered.pop();
        tampered.push('X');
        assert!(matches!(
            parse_address(&tampered),
            Err(FormatError::Base58(Base58Error::ChecksumMismatch))
        ));
        assert!(!is_valid_address(&tampered));
    }

    #[test]
    fn test_wrong_version() {
        let mut payload = vec![0x35u8];
        payload.extend_from_slice(&[1u8; 20]);
        let encoded = base58::check_encode(&payload);
        assert_eq!(parse_address(&encoded), Err(FormatError::AddressVersion(0x35)));
    }

    #[test]
    fn test_wrong_length() {
        let encoded = base58::check_encode(&[ADDRESS_VERSION, 1, 2, 3]);
        assert!(matches!(
            parse_address(&encoded),
            Err(FormatError::InvalidLength { expected: 21, actual: 4 })
        ));
    }
}
