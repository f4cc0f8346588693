//! Coin selection.
//!
//! Smallest-first accumulation: spendable outputs are sorted ascending by
//! value and taken in order until the running sum covers the target. Dust is
//! consumed first. This is not a minimal-count or minimal-waste solver and
//! over-selection is accepted.

use crate::TxError;
use o3_types::{Amount, AssetKind, SpendableOutput};

/// Inputs chosen to cover a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub selected: Vec<SpendableOutput>,
    pub total: Amount,
}

impl Selection {
    pub fn empty(decimals: u8) -> Self {
        Self {
            selected: Vec::new(),
            total: Amount::zero(decimals),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Select outputs of `asset` whose sum is at least `target`.
///
/// Outputs of other assets are skipped. A zero target yields an empty
/// selection. Outputs of a different precision than `target` are a caller
/// error.
pub fn select_inputs(
    available: &[SpendableOutput],
    asset: AssetKind,
    target: Amount,
) -> Result<Selection, TxError> {
    if target.is_zero() {
        return Ok(Selection::empty(target.decimals()));
    }
    let candidates: Vec<&SpendableOutput> = available.iter().filter(|o| o.asset == asset).collect();
    if let Some(odd) = candidates
        .iter()
        .find(|o| o.value.decimals() != target.decimals())
    {
        return Err(TxError::precondition(format!(
            "output {}:{} has precision {}, target has {}",
            odd.txid,
            odd.index,
            odd.value.decimals(),
            target.decimals()
        )));
    }

    let mut sorted = candidates;
    // Stable: equal values keep their original order.
    sorted.sort_by_key(|o| o.value.units());

    let mut selected = Vec::new();
    let mut total: u64 = 0;
    for output in sorted {
        selected.push(output.clone());
        total = total
            .checked_add(output.value.units())
            .ok_or_else(|| TxError::InvalidAmount("sum of spendable outputs overflows".into()))?;
        if total >= target.units() {
            let total = Amount::from_units(total, target.decimals());
            log::debug!(
                "selected {} {} outputs totalling {} for target {}",
                selected.len(),
                asset,
                total,
                target
            );
            return Ok(Selection { selected, total });
        }
    }

    Err(TxError::InsufficientFunds {
        asset: asset.symbol().to_string(),
        need: target.to_string(),
        have: Amount::from_units(total, target.decimals()).to_string(),
    })
}
