//! secp256r1 key material and WIF encoding.

use crate::hash::hash160;
use crate::CryptoError;
use o3_types::base58;
use o3_types::codec::from_hex;
use o3_types::constants::{
    PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, WIF_COMPRESSED_FLAG, WIF_VERSION,
};
use o3_types::ScriptHash;
use p256::ecdsa::SigningKey;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use std::fmt;

/// PUSHBYTES33, the only push a single-signature verification script uses.
pub const PUSH_PUBKEY: u8 = 0x21;
pub const CHECKSIG: u8 = 0xac;

/// `PUSHBYTES33 <pubkey> CHECKSIG`.
pub fn verification_script(public_key: &[u8; PUBLIC_KEY_SIZE]) -> Vec<u8> {
    let mut script = Vec::with_capacity(PUBLIC_KEY_SIZE + 2);
    script.push(PUSH_PUBKEY);
    script.extend_from_slice(public_key);
    script.push(CHECKSIG);
    script
}

/// Script hash of the single-signature account for `public_key`.
pub fn public_key_to_script_hash(public_key: &[u8; PUBLIC_KEY_SIZE]) -> ScriptHash {
    ScriptHash::from_bytes(hash160(&verification_script(public_key)))
}

/// A private key with its derived public key.
///
/// Owned by the caller; transaction code only borrows it for the duration
/// of a signing call.
#[derive(Clone)]
pub struct KeyMaterial {
    signing_key: SigningKey,
    public_key: [u8; PUBLIC_KEY_SIZE],
}

impl KeyMaterial {
    pub fn from_private_key(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_SIZE,
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|_| CryptoError::InvalidPrivateKey("scalar out of range".into()))?;
        Ok(Self::from_signing_key(signing_key))
    }

    pub fn from_private_key_hex(hex: &str) -> Result<Self, CryptoError> {
        Self::from_private_key(&from_hex(hex)?)
    }

    /// Decode a compressed-key WIF (`0x80 || key || 0x01`, Base58Check).
    pub fn from_wif(wif: &str) -> Result<Self, CryptoError> {
        let payload = base58::check_decode(wif.trim())
            .map_err(|e| CryptoError::InvalidWif(e.to_string()))?;
        if payload.len() != PRIVATE_KEY_SIZE + 2 {
            return Err(CryptoError::InvalidWif(format!(
                "payload is {} bytes",
                payload.len()
            )));
        }
        if payload[0] != WIF_VERSION {
            return Err(CryptoError::InvalidWif(format!(
                "version byte 0x{:02x}",
                payload[0]
            )));
        }
        if payload[PRIVATE_KEY_SIZE + 1] != WIF_COMPRESSED_FLAG {
            return Err(CryptoError::InvalidWif("missing compression flag".into()));
        }
        Self::from_private_key(&payload[1..=PRIVATE_KEY_SIZE])
    }

    /// Fresh key from the OS random source.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::random(&mut rand::rngs::OsRng))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let point = signing_key.verifying_key().as_affine().to_encoded_point(true);
        let mut public_key = [0u8; PUBLIC_KEY_SIZE];
        public_key.copy_from_slice(point.as_bytes());
        Self {
            signing_key,
            public_key,
        }
    }

    pub fn private_key_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        let mut out = [0u8; PRIVATE_KEY_SIZE];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(PRIVATE_KEY_SIZE + 2);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.private_key_bytes());
        payload.push(WIF_COMPRESSED_FLAG);
        base58::check_encode(&payload)
    }

    /// Compressed SEC1 public key.
    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.public_key
    }

    pub fn verification_script(&self) -> Vec<u8> {
        verification_script(&self.public_key)
    }

    pub fn script_hash(&self) -> ScriptHash {
        public_key_to_script_hash(&self.public_key)
    }

    pub fn address(&self) -> String {
        self.script_hash().to_address()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("public_key", &hex::encode(self.public_key))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY: &str = "7d128a6d096f0c14c3a25a2b0c41cf79661bfcb4a8cc95aaaea28bde4d732344";
    const PUBLIC_KEY: &str = "02028a99826edc0c97d18e22b6932373d908d323aa7f92656a77ec26e8861699ef";
    const WIF: &str = "L1QqQJnpBwbsPGAuutuzPTac8piqvbR1HRjrY5qHup48TBCBFe4g";
    const ADDRESS: &str = "ALq7AWrhAueN6mJNqk6FHJjnsEoPRytLdW";

    fn make_key() -> KeyMaterial {
        KeyMaterial::from_private_key_hex(PRIVATE_KEY).unwrap()
    }

    #[test]
    fn test_derivation_chain() {
        let key = make_key();
        assert_eq!(hex::encode(key.public_key()), PUBLIC_KEY);
        assert_eq!(
            key.script_hash().to_wire_hex(),
            "3775292229eccdf904f16fff8e83e7cffdc0f0ce"
        );
        assert_eq!(key.address(), ADDRESS);
    }

    #[test]
    fn test_verification_script_layout() {
        let script = make_key().verification_script();
        assert_eq!(script.len(), 35);
        assert_eq!(script[0], 0x21);
        assert_eq!(script[34], 0xac);
        assert_eq!(hex::encode(&script[1..34]), PUBLIC_KEY);
    }

    #[test]
    fn test_wif_roundtrip() {
        let key = make_key();
        assert_eq!(key.to_wif(), WIF);
        let decoded = KeyMaterial::from_wif(WIF).unwrap();
        assert_eq!(hex::encode(decoded.private_key_bytes()), PRIVATE_KEY);
    }

    #[test]
    fn test_wif_rejects_uncompressed() {
        let mut payload = vec![WIF_VERSION];
        payload.extend_from_slice(&make_key().private_key_bytes());
        let wif = base58::check_encode(&payload);
        assert!(matches!(
            KeyMaterial::from_wif(&wif),
            Err(CryptoError::InvalidWif(_))
        ));
    }

    #[test]
    fn test_wif_bad_checksum() {
        let tampered = format!("{}1", &WIF[..WIF.len() - 1]);
        assert!(KeyMaterial::from_wif(&tampered).is_err());
    }

    #[test]
    fn test_invalid_private_keys() {
        assert!(matches!(
            KeyMaterial::from_private_key(&[1u8; 31]),
            Err(CryptoError::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            KeyMaterial::from_private_key(&[0u8; 32]),
            Err(CryptoError::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            KeyMaterial::from_private_key_hex("zz"),
            Err(CryptoError::Format(_))
        ));
    }

    #[test]
    fn test_generate_is_random() {
        let a = KeyMaterial::generate();
        let b = KeyMaterial::generate();
        assert_ne!(a.public_key(), b.public_key());
        let restored = KeyMaterial::from_wif(&a.to_wif()).unwrap();
        assert_eq!(restored.public_key(), a.public_key());
        assert!(a.address().starts_with('A'));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let rendered = format!("{:?}", make_key());
        assert!(!rendered.contains(PRIVATE_KEY));
        assert!(rendered.contains("redacted"));
    }
}
