//! NEO network constants, sizes and transaction type tags.

use serde::{Deserialize, Serialize};

// =============================================================================
// Network
// =============================================================================

/// Network type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
    Privnet,
}

impl Network {
    /// Protocol magic used in the P2P handshake.
    pub fn magic(&self) -> u32 {
        match self {
            Network::Mainnet => 7_630_401,
            Network::Testnet => 1_953_787_457,
            Network::Privnet => 56_753,
        }
    }

    /// Address version byte. NEO 2.x uses the same one on every network.
    pub fn address_version(&self) -> u8 {
        ADDRESS_VERSION
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Privnet => "privnet",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Encoding Constants
// =============================================================================

/// Address version byte (addresses start with 'A').
pub const ADDRESS_VERSION: u8 = 0x17;

/// WIF version byte.
pub const WIF_VERSION: u8 = 0x80;

/// WIF compression flag.
pub const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// Size of a script hash / account hash.
pub const SCRIPT_HASH_SIZE: usize = 20;

/// Size of a transaction id or asset id.
pub const HASH_SIZE: usize = 32;

/// Compressed secp256r1 public key.
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Raw `r || s` ECDSA signature.
pub const SIGNATURE_SIZE: usize = 64;

/// Private key length.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Decimal places of the fixed-point amount used on the wire for NEO and GAS.
pub const FIXED8_DECIMALS: u8 = 8;

/// Largest supported decimal precision (10^18 still fits a u64).
pub const MAX_DECIMALS: u8 = 18;

// =============================================================================
// Governing / Utility Assets
// =============================================================================

/// NEO (governing token), canonical big-endian hex.
pub const NEO_ASSET_ID: &str = "c56f33fc6ecfcd0c225c4ab356fee59390af8560be0e930faebe74a6daff7c9b";

/// GAS (utility token, pays fees), canonical big-endian hex.
pub const GAS_ASSET_ID: &str = "602c79718b16e442de58778e148d0b1084e3b2dffd5de6b7b16cee7969282de7";

// =============================================================================
// Transaction Types
// =============================================================================

pub mod tx_type {
    pub const MINER: u8 = 0x00;
    pub const ISSUE: u8 = 0x01;
    pub const CLAIM: u8 = 0x02;
    pub const ENROLLMENT: u8 = 0x20;
    pub const REGISTER: u8 = 0x40;
    pub const CONTRACT: u8 = 0x80;
    pub const STATE: u8 = 0x90;
    pub const PUBLISH: u8 = 0xd0;
    pub const INVOCATION: u8 = 0xd1;
}

/// Version byte emitted for every transaction kind built here.
pub const TX_VERSION: u8 = 0x00;
