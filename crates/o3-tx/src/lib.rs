//! NEO transaction construction, signing and decoding.
//!
//! Spendable outputs and a transaction intent go in; a signed, network-ready
//! payload and its transaction id come out. Coin selection, output building,
//! attribute and script encoding and witness layout are deterministic and
//! side-effect free. Fetching outputs and submitting the payload belong to
//! the caller (see `o3-rpc`).

pub mod attribute;
pub mod builder;
pub mod decode;
pub mod output;
pub mod script;
pub mod selection;
pub mod sign;
pub mod types;

pub use attribute::{AttributeUsage, TransactionAttribute};
pub use builder::{
    build_asset_transfer, build_claim, build_invocation, build_token_transfer, AssetTransfer,
    ContractInvocation, TokenTransfer, TransactionBuilder, TransferContext,
};
pub use decode::{decode_transaction, DecodedTransaction};
pub use output::{build_outputs, OutputBlock};
pub use script::{ContractArg, ScriptBuilder, TypedArg};
pub use selection::{select_inputs, Selection};
pub use sign::{compute_transaction_id, finalize, sign, sign_transaction, SignedTransaction};
pub use types::{TransactionInput, TransactionKind, TransactionOutput, UnsignedTransaction};

use o3_crypto::{SigningError, TransactionSigner};
use o3_types::{ClaimRecord, FormatError, SpendableOutput};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TxError {
    #[error("insufficient {asset} funds: need {need}, have {have}")]
    InsufficientFunds {
        asset: String,
        need: String,
        have: String,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("unsupported argument type: {0}")]
    UnsupportedArgumentType(String),

    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),

    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl TxError {
    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        TxError::PreconditionViolation(msg.into())
    }
}

/// Build and sign a NEO or GAS transfer.
pub fn build_asset_transfer_transaction(
    ctx: &TransferContext,
    spendable: &[SpendableOutput],
    intent: &AssetTransfer,
    signer: &dyn TransactionSigner,
) -> Result<SignedTransaction, TxError> {
    let unsigned = build_asset_transfer(ctx, spendable, intent)?;
    sign_transaction(ctx, &unsigned, signer)
}

/// Build and sign a GAS claim over `claims`.
pub fn build_claim_transaction(
    ctx: &TransferContext,
    claims: &[ClaimRecord],
    signer: &dyn TransactionSigner,
) -> Result<SignedTransaction, TxError> {
    let unsigned = build_claim(ctx, claims)?;
    sign_transaction(ctx, &unsigned, signer)
}

/// Build and sign a contract invocation, optionally attaching NEO and GAS.
pub fn build_invocation_transaction(
    ctx: &TransferContext,
    spendable: &[SpendableOutput],
    intent: &ContractInvocation,
    signer: &dyn TransactionSigner,
) -> Result<SignedTransaction, TxError> {
    let unsigned = build_invocation(ctx, spendable, intent)?;
    sign_transaction(ctx, &unsigned, signer)
}

/// Build and sign a NEP-5 `transfer`.
pub fn build_token_transfer_transaction(
    ctx: &TransferContext,
    spendable: &[SpendableOutput],
    intent: &TokenTransfer,
    signer: &dyn TransactionSigner,
) -> Result<SignedTransaction, TxError> {
    let unsigned = build_token_transfer(ctx, spendable, intent)?;
    sign_transaction(ctx, &unsigned, signer)
}
