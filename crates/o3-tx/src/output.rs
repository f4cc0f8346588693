//! Output payload builder.
//!
//! One selection pass produces zero, one or two outputs of a single asset:
//! nothing when no value moves, the payment alone on an exact spend, or the
//! payment followed by change back to the sender.

use crate::types::TransactionOutput;
use crate::TxError;
use o3_types::{Amount, AssetKind, ScriptHash};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBlock {
    pub outputs: Vec<TransactionOutput>,
}

impl OutputBlock {
    pub fn count(&self) -> usize {
        self.outputs.len()
    }
}

/// Build the outputs for one asset.
///
/// `selected_total` must cover `target + fee`; the fee is whatever is left
/// unassigned, so it never appears as an output of its own.
pub fn build_outputs(
    asset: AssetKind,
    selected_total: Amount,
    target: Amount,
    recipient: &ScriptHash,
    change: &ScriptHash,
    fee: Amount,
) -> Result<OutputBlock, TxError> {
    let asset_id = asset
        .asset_id()
        .ok_or_else(|| TxError::precondition(format!("{} has no UTXO outputs", asset)))?;

    let need = target
        .checked_add(fee)
        .ok_or_else(|| TxError::precondition("target and fee differ in precision or overflow"))?;
    let leftover = selected_total.checked_sub(need).ok_or_else(|| {
        TxError::precondition(format!(
            "selected {} {} does not cover {} + fee {}",
            selected_total, asset, target, fee
        ))
    })?;

    if selected_total.is_zero() && fee.is_zero() {
        return Ok(OutputBlock::default());
    }

    let mut outputs = vec![TransactionOutput {
        asset_id,
        value: target,
        script_hash: *recipient,
    }];
    if !leftover.is_zero() {
        outputs.push(TransactionOutput {
            asset_id,
            value: leftover,
            script_hash: *change,
        });
    }
    Ok(OutputBlock { outputs })
}
