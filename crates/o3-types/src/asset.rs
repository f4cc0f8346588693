//! Asset kinds.

use crate::constants::{FIXED8_DECIMALS, GAS_ASSET_ID, NEO_ASSET_ID};
use crate::error::FormatError;
use crate::hash::{ScriptHash, UInt256};
use std::fmt;

/// What an amount is denominated in.
///
/// NEO and GAS are UTXO assets identified by a 32-byte asset id. NEO is
/// indivisible in practice but still travels as a fixed-8 value. NEP-5
/// tokens live in contract storage and are moved by invocation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Neo,
    Gas,
    Token { script_hash: ScriptHash, decimals: u8 },
}

impl AssetKind {
    /// Asset id for UTXO assets; `None` for tokens.
    pub fn asset_id(&self) -> Option<UInt256> {
        let hex = match self {
            AssetKind::Neo => NEO_ASSET_ID,
            AssetKind::Gas => GAS_ASSET_ID,
            AssetKind::Token { .. } => return None,
        };
        UInt256::from_hex(hex).ok()
    }

    /// Look up a UTXO asset by id.
    pub fn from_asset_id(id: &UInt256) -> Option<AssetKind> {
        [AssetKind::Neo, AssetKind::Gas]
            .into_iter()
            .find(|kind| kind.asset_id().as_ref() == Some(id))
    }

    /// Decimal places of the on-chain fixed-point representation.
    pub fn decimals(&self) -> u8 {
        match self {
            AssetKind::Neo | AssetKind::Gas => FIXED8_DECIMALS,
            AssetKind::Token { decimals, .. } => *decimals,
        }
    }

    pub fn is_divisible(&self) -> bool {
        !matches!(self, AssetKind::Neo)
    }

    pub fn is_utxo(&self) -> bool {
        matches!(self, AssetKind::Neo | AssetKind::Gas)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AssetKind::Neo => "NEO",
            AssetKind::Gas => "GAS",
            AssetKind::Token { .. } => "NEP5",
        }
    }

    /// Parse `neo` / `gas` (case-insensitive) or a 64-char asset id.
    pub fn parse_utxo_asset(s: &str) -> Result<AssetKind, FormatError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neo" => Ok(AssetKind::Neo),
            "gas" => Ok(AssetKind::Gas),
            other => UInt256::from_hex(other)
                .ok()
                .and_then(|id| AssetKind::from_asset_id(&id))
                .ok_or_else(|| FormatError::UnknownAsset(s.to_string())),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Token { script_hash, .. } => write!(f, "NEP5({})", script_hash),
            _ => f.write_str(self.symbol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_ids() {
        assert_eq!(AssetKind::Neo.asset_id().unwrap().to_hex(), NEO_ASSET_ID);
        assert_eq!(AssetKind::Gas.asset_id().unwrap().to_hex(), GAS_ASSET_ID);
        let token = AssetKind::Token {
            script_hash: ScriptHash::from_bytes([1; 20]),
            decimals: 8,
        };
        assert!(token.asset_id().is_none());
        assert!(!token.is_utxo());
    }

    #[test]
    fn test_from_asset_id() {
        let gas = UInt256::from_hex(GAS_ASSET_ID).unwrap();
        assert_eq!(AssetKind::from_asset_id(&gas), Some(AssetKind::Gas));
        assert_eq!(AssetKind::from_asset_id(&UInt256::from_display_bytes([0; 32])), None);
    }

    #[test]
    fn test_parse_utxo_asset() {
        assert_eq!(AssetKind::parse_utxo_asset("NEO").unwrap(), AssetKind::Neo);
        assert_eq!(AssetKind::parse_utxo_asset(" gas ").unwrap(), AssetKind::Gas);
        assert_eq!(
            AssetKind::parse_utxo_asset(&format!("0x{}", NEO_ASSET_ID)).unwrap(),
            AssetKind::Neo
        );
        assert!(matches!(
            AssetKind::parse_utxo_asset("ont"),
            Err(FormatError::UnknownAsset(_))
        ));
    }

    #[test]
    fn test_divisibility_and_decimals() {
        assert!(!AssetKind::Neo.is_divisible());
        assert!(AssetKind::Gas.is_divisible());
        assert_eq!(AssetKind::Neo.decimals(), 8);
        let token = AssetKind::Token {
            script_hash: ScriptHash::from_bytes([2; 20]),
            decimals: 2,
        };
        assert_eq!(token.decimals(), 2);
    }
}
