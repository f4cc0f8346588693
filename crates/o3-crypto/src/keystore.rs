//! Credential storage capability.

use crate::keys::KeyMaterial;
use crate::CryptoError;
use std::collections::HashMap;

/// Returns signing keys by identifier.
///
/// Platform secure storage sits behind this trait; the wallet core never
/// persists keys itself.
pub trait KeyStore {
    fn private_key(&self, id: &str) -> Result<KeyMaterial, CryptoError>;
}

/// Process-local key store.
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyStore {
    keys: HashMap<String, KeyMaterial>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, key: KeyMaterial) {
        self.keys.insert(id.into(), key);
    }

    /// Decode and store a WIF, returning the key's address.
    pub fn import_wif(&mut self, id: impl Into<String>, wif: &str) -> Result<String, CryptoError> {
        let key = KeyMaterial::from_wif(wif)?;
        let address = key.address();
        self.insert(id, key);
        Ok(address)
    }

    pub fn remove(&mut self, id: &str) -> Option<KeyMaterial> {
        self.keys.remove(id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl KeyStore for MemoryKeyStore {
    fn private_key(&self, id: &str) -> Result<KeyMaterial, CryptoError> {
        self.keys
            .get(id)
            .cloned()
            .ok_or_else(|| CryptoError::KeyNotFound(id.to_string()))
    }
}
