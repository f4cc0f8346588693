//! Spendable outputs and claimable GAS records.
//!
//! Both are observed from network state and consumed at most once by a
//! constructed transaction.

use crate::amount::Amount;
use crate::asset::AssetKind;
use crate::hash::UInt256;

/// An unspent output available to fund a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendableOutput {
    pub txid: UInt256,
    pub index: u16,
    pub value: Amount,
    pub asset: AssetKind,
}

impl SpendableOutput {
    pub fn new(txid: UInt256, index: u16, value: Amount, asset: AssetKind) -> Self {
        Self {
            txid,
            index,
            value,
            asset,
        }
    }
}

/// A spent NEO output that has accrued unclaimed GAS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRecord {
    pub txid: UInt256,
    pub index: u16,
    pub unclaimed: Amount,
    pub start_height: Option<u32>,
    pub end_height: Option<u32>,
}

impl ClaimRecord {
    pub fn new(txid: UInt256, index: u16, unclaimed: Amount) -> Self {
        Self {
            txid,
            index,
            unclaimed,
            start_height: None,
            end_height: None,
        }
    }
}
