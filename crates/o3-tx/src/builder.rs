//! Transaction assembler.
//!
//! Each builder is a pure function from a [`TransferContext`], the sender's
//! spendable outputs and an intent to an [`UnsignedTransaction`]. Every
//! asset that moves gets its own selection and output pass; passes are
//! concatenated NEO first, then GAS.

use crate::attribute::TransactionAttribute;
use crate::output::{build_outputs, OutputBlock};
use crate::script::{ContractArg, ScriptBuilder};
use crate::selection::{select_inputs, Selection};
use crate::sign::{sign_transaction, SignedTransaction};
use crate::types::{TransactionInput, TransactionKind, TransactionOutput, UnsignedTransaction};
use crate::TxError;
use o3_crypto::TransactionSigner;
use o3_types::codec::reversed;
use o3_types::constants::FIXED8_DECIMALS;
use o3_types::{Amount, AssetKind, ClaimRecord, ScriptHash, SpendableOutput};
use std::collections::HashSet;

/// One atomic GAS unit, paid back to the sender so that a pass which only
/// covers the network fee still has an output.
pub const FEE_CARRIER: Amount = Amount::from_units(1, FIXED8_DECIMALS);

/// Who is sending and what they pay on top of the transfer itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferContext {
    /// Script hash of the signing account. Change goes back here.
    pub sender: ScriptHash,
    /// Network fee in GAS, left unassigned by the outputs.
    pub fee: Amount,
    /// Suffix of the `O3X` uniqueness remark on invocations, typically the
    /// current Unix time. Supplied by the caller; invocations refuse an
    /// empty one.
    pub timestamp: String,
}

impl TransferContext {
    pub fn new(sender: ScriptHash) -> Self {
        Self {
            sender,
            fee: Amount::zero(FIXED8_DECIMALS),
            timestamp: String::new(),
        }
    }

    pub fn with_fee(mut self, fee: Amount) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}

/// Fluent front end over the builder functions.
///
/// ```ignore
/// let builder = TransactionBuilder::new(sender)
///     .set_fee(fee)
///     .set_timestamp("1540000000")
///     .add_spendable(&outputs);
/// let tx = builder.transfer(&intent)?;
/// let signed = builder.sign(&tx, &key)?;
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    ctx: TransferContext,
    spendable: Vec<SpendableOutput>,
}

impl TransactionBuilder {
    pub fn new(sender: ScriptHash) -> Self {
        Self {
            ctx: TransferContext::new(sender),
            spendable: Vec::new(),
        }
    }

    /// Network fee in GAS.
    pub fn set_fee(mut self, fee: Amount) -> Self {
        self.ctx.fee = fee;
        self
    }

    /// Uniqueness remark suffix for invocations.
    pub fn set_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.ctx.timestamp = timestamp.into();
        self
    }

    /// Add outputs available to fund the transaction.
    pub fn add_spendable(mut self, outputs: &[SpendableOutput]) -> Self {
        self.spendable.extend_from_slice(outputs);
        self
    }

    pub fn context(&self) -> &TransferContext {
        &self.ctx
    }

    pub fn transfer(&self, intent: &AssetTransfer) -> Result<UnsignedTransaction, TxError> {
        build_asset_transfer(&self.ctx, &self.spendable, intent)
    }

    pub fn claim(&self, claims: &[ClaimRecord]) -> Result<UnsignedTransaction, TxError> {
        build_claim(&self.ctx, claims)
    }

    pub fn invoke(&self, intent: &ContractInvocation) -> Result<UnsignedTransaction, TxError> {
        build_invocation(&self.ctx, &self.spendable, intent)
    }

    pub fn token_transfer(&self, intent: &TokenTransfer) -> Result<UnsignedTransaction, TxError> {
        build_token_transfer(&self.ctx, &self.spendable, intent)
    }

    /// Sign `tx` for this builder's sender.
    pub fn sign(
        &self,
        tx: &UnsignedTransaction,
        signer: &dyn TransactionSigner,
    ) -> Result<SignedTransaction, TxError> {
        sign_transaction(&self.ctx, tx, signer)
    }
}

/// Send NEO or GAS to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTransfer {
    pub asset: AssetKind,
    pub amount: Amount,
    pub recipient: ScriptHash,
    pub attributes: Vec<TransactionAttribute>,
}

/// Call a contract operation, optionally sending it NEO and GAS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInvocation {
    pub contract: ScriptHash,
    pub operation: String,
    pub args: Vec<ContractArg>,
    pub attached_neo: Amount,
    pub attached_gas: Amount,
    pub attributes: Vec<TransactionAttribute>,
}

impl ContractInvocation {
    pub fn new(contract: ScriptHash, operation: impl Into<String>, args: Vec<ContractArg>) -> Self {
        Self {
            contract,
            operation: operation.into(),
            args,
            attached_neo: Amount::zero(FIXED8_DECIMALS),
            attached_gas: Amount::zero(FIXED8_DECIMALS),
            attributes: Vec::new(),
        }
    }
}

/// NEP-5 `transfer(from, to, amount)`; `amount` carries the token's precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    pub contract: ScriptHash,
    pub amount: Amount,
    pub recipient: ScriptHash,
}

/// Inputs and outputs of one asset.
#[derive(Debug, Default)]
struct SpendPass {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl SpendPass {
    fn run(
        spendable: &[SpendableOutput],
        asset: AssetKind,
        amount: Amount,
        recipient: &ScriptHash,
        change: &ScriptHash,
        fee: Amount,
    ) -> Result<SpendPass, TxError> {
        let target = amount
            .checked_add(fee)
            .ok_or_else(|| TxError::InvalidAmount(format!("{} + fee {} overflows", amount, fee)))?;
        let Selection { selected, total } = select_inputs(spendable, asset, target)?;
        let OutputBlock { outputs } = build_outputs(asset, total, amount, recipient, change, fee)?;
        Ok(SpendPass {
            inputs: selected.iter().map(TransactionInput::from).collect(),
            outputs,
        })
    }

    fn append(&mut self, other: SpendPass) {
        self.inputs.extend(other.inputs);
        self.outputs.extend(other.outputs);
    }
}

fn require_fixed8(what: &str, amount: &Amount) -> Result<(), TxError> {
    if amount.decimals() != FIXED8_DECIMALS {
        return Err(TxError::InvalidAmount(format!(
            "{} {} must have {} decimals",
            what, amount, FIXED8_DECIMALS
        )));
    }
    Ok(())
}

fn require_whole_neo(amount: &Amount) -> Result<(), TxError> {
    if !amount.is_integral() {
        return Err(TxError::InvalidAmount(format!("NEO is indivisible, got {}", amount)));
    }
    Ok(())
}

/// The GAS pass that pays only the network fee.
fn fee_pass(ctx: &TransferContext, spendable: &[SpendableOutput]) -> Result<SpendPass, TxError> {
    if ctx.fee.is_zero() {
        return Ok(SpendPass::default());
    }
    SpendPass::run(
        spendable,
        AssetKind::Gas,
        FEE_CARRIER,
        &ctx.sender,
        &ctx.sender,
        ctx.fee,
    )
}

fn assemble(
    kind: TransactionKind,
    attributes: Vec<TransactionAttribute>,
    pass: SpendPass,
) -> Result<UnsignedTransaction, TxError> {
    let tx = UnsignedTransaction {
        kind,
        attributes,
        inputs: pass.inputs,
        outputs: pass.outputs,
    };
    tx.validate()?;
    Ok(tx)
}

/// NEO or GAS transfer.
///
/// GAS selects for `amount + fee`. NEO selects for the amount alone and, if
/// a fee is set, runs a separate GAS pass for `FEE_CARRIER + fee`.
pub fn build_asset_transfer(
    ctx: &TransferContext,
    spendable: &[SpendableOutput],
    intent: &AssetTransfer,
) -> Result<UnsignedTransaction, TxError> {
    require_fixed8("amount", &intent.amount)?;
    require_fixed8("fee", &ctx.fee)?;
    if intent.amount.is_zero() {
        return Err(TxError::InvalidAmount("transfer amount must be positive".into()));
    }

    let pass = match intent.asset {
        AssetKind::Gas => SpendPass::run(
            spendable,
            AssetKind::Gas,
            intent.amount,
            &intent.recipient,
            &ctx.sender,
            ctx.fee,
        )?,
        AssetKind::Neo => {
            require_whole_neo(&intent.amount)?;
            let mut pass = SpendPass::run(
                spendable,
                AssetKind::Neo,
                intent.amount,
                &intent.recipient,
                &ctx.sender,
                Amount::zero(FIXED8_DECIMALS),
            )?;
            pass.append(fee_pass(ctx, spendable)?);
            pass
        }
        AssetKind::Token { .. } => {
            return Err(TxError::precondition(
                "tokens move through build_token_transfer",
            ))
        }
    };

    log::debug!(
        "asset transfer: {} {} to {}",
        intent.amount,
        intent.asset,
        intent.recipient
    );
    assemble(TransactionKind::Contract, intent.attributes.clone(), pass)
}

/// Claim all unclaimed GAS in `claims` to the sender.
pub fn build_claim(
    ctx: &TransferContext,
    claims: &[ClaimRecord],
) -> Result<UnsignedTransaction, TxError> {
    if claims.is_empty() {
        return Err(TxError::InvalidAmount("no claimable GAS".into()));
    }

    let mut total = Amount::zero(FIXED8_DECIMALS);
    let mut seen = HashSet::new();
    let mut references = Vec::with_capacity(claims.len());
    for claim in claims {
        require_fixed8("unclaimed", &claim.unclaimed)?;
        total = total
            .checked_add(claim.unclaimed)
            .ok_or_else(|| TxError::InvalidAmount("claim total overflows".into()))?;
        let reference = TransactionInput::new(claim.txid, claim.index);
        if !seen.insert(reference) {
            return Err(TxError::precondition(format!(
                "claim {}:{} listed twice",
                claim.txid, claim.index
            )));
        }
        references.push(reference);
    }
    if total.is_zero() {
        return Err(TxError::InvalidAmount("no claimable GAS".into()));
    }

    let gas_id = AssetKind::Gas
        .asset_id()
        .ok_or_else(|| TxError::precondition("GAS asset id"))?;
    let pass = SpendPass {
        inputs: Vec::new(),
        outputs: vec![TransactionOutput {
            asset_id: gas_id,
            value: total,
            script_hash: ctx.sender,
        }],
    };

    log::debug!("claim: {} GAS over {} records", total, claims.len());
    assemble(
        TransactionKind::Claim { claims: references },
        vec![TransactionAttribute::claim_remark()],
        pass,
    )
}

/// Script and uniqueness attributes shared by invocations.
///
/// Without a timestamp two identical invocations would hash to the same
/// transaction id, so an empty one is refused.
fn invocation_attributes(ctx: &TransferContext) -> Result<Vec<TransactionAttribute>, TxError> {
    if ctx.timestamp.is_empty() {
        return Err(TxError::precondition(
            "invocations need a uniqueness timestamp (TransferContext::with_timestamp)",
        ));
    }
    Ok(vec![
        TransactionAttribute::script(&ctx.sender),
        TransactionAttribute::uniqueness_remark(&ctx.timestamp),
    ])
}

/// Generic contract invocation.
///
/// Attached NEO and GAS are paid to the contract. The network fee rides on
/// the GAS pass; with no GAS attached a fee-only pass pays `FEE_CARRIER`
/// back to the sender.
pub fn build_invocation(
    ctx: &TransferContext,
    spendable: &[SpendableOutput],
    intent: &ContractInvocation,
) -> Result<UnsignedTransaction, TxError> {
    require_fixed8("attached NEO", &intent.attached_neo)?;
    require_fixed8("attached GAS", &intent.attached_gas)?;
    require_fixed8("fee", &ctx.fee)?;
    require_whole_neo(&intent.attached_neo)?;

    let mut sb = ScriptBuilder::new();
    sb.contract_invoke(&intent.contract, &intent.operation, &intent.args);

    let mut pass = SpendPass::default();
    if !intent.attached_neo.is_zero() {
        pass.append(SpendPass::run(
            spendable,
            AssetKind::Neo,
            intent.attached_neo,
            &intent.contract,
            &ctx.sender,
            Amount::zero(FIXED8_DECIMALS),
        )?);
    }
    if !intent.attached_gas.is_zero() {
        pass.append(SpendPass::run(
            spendable,
            AssetKind::Gas,
            intent.attached_gas,
            &intent.contract,
            &ctx.sender,
            ctx.fee,
        )?);
    } else {
        pass.append(fee_pass(ctx, spendable)?);
    }

    let mut attributes = invocation_attributes(ctx)?;
    attributes.extend(intent.attributes.iter().cloned());

    log::debug!(
        "invocation: {}.{} with {} args, script {} bytes",
        intent.contract,
        intent.operation,
        intent.args.len(),
        sb.len()
    );
    assemble(
        TransactionKind::Invocation {
            script: sb.to_bytes(),
        },
        attributes,
        pass,
    )
}

/// NEP-5 token transfer from the sender.
///
/// UTXOs are only touched when a network fee is set.
pub fn build_token_transfer(
    ctx: &TransferContext,
    spendable: &[SpendableOutput],
    intent: &TokenTransfer,
) -> Result<UnsignedTransaction, TxError> {
    require_fixed8("fee", &ctx.fee)?;
    if intent.amount.is_zero() {
        return Err(TxError::InvalidAmount("transfer amount must be positive".into()));
    }

    let mut sb = ScriptBuilder::new();
    sb.contract_invoke(
        &intent.contract,
        "transfer",
        &[
            ContractArg::Hash160(ctx.sender),
            ContractArg::Hash160(intent.recipient),
            ContractArg::Integer(intent.amount.units() as i128),
        ],
    );

    let mut attributes = invocation_attributes(ctx)?;
    attributes.push(TransactionAttribute::description(reversed(
        intent.contract.as_bytes(),
    )));

    log::debug!(
        "token transfer: {} units of {} to {}",
        intent.amount.units(),
        intent.contract,
        intent.recipient
    );
    assemble(
        TransactionKind::Invocation {
            script: sb.to_bytes(),
        },
        attributes,
        fee_pass(ctx, spendable)?,
    )
}
