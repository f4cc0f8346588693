//! CLI command implementations.

use crate::AppContext;
use o3_crypto::{CryptoError, KeyMaterial, KeyStore, MemoryKeyStore};
use o3_rpc::{NeoNode, NodeApi, RpcError};
use o3_tx::{
    AssetTransfer, ContractArg, ContractInvocation, SignedTransaction, TokenTransfer,
    TransactionBuilder, TxError,
};
use o3_types::constants::FIXED8_DECIMALS;
use o3_types::{Amount, AssetKind, FormatError, ScriptHash, SpendableOutput};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Environment variable holding the WIF of the sending key.
const WIF_ENV: &str = "O3_WIF";
const KEY_ID: &str = "cli";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Network error: {0}")]
    Network(#[from] RpcError),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("node rejected transaction {0}")]
    Rejected(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("{0}")]
    Transaction(TxError),

    #[error("Key error: {0}")]
    Key(CryptoError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<TxError> for CliError {
    fn from(e: TxError) -> Self {
        match e {
            TxError::InsufficientFunds { asset, need, have } => {
                CliError::InsufficientFunds(format!("need {} {}, have {}", need, asset, have))
            }
            TxError::Signing(e) => CliError::Signing(e.to_string()),
            TxError::Format(e) => CliError::Input(e.to_string()),
            other => CliError::Transaction(other),
        }
    }
}

impl From<CryptoError> for CliError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Signing(e) => CliError::Signing(e.to_string()),
            other => CliError::Key(other),
        }
    }
}

impl From<FormatError> for CliError {
    fn from(e: FormatError) -> Self {
        CliError::Input(e.to_string())
    }
}

type Result<T = ()> = std::result::Result<T, CliError>;

/// Extra value moved by an invocation.
pub struct Attachments<'a> {
    pub neo: &'a str,
    pub gas: &'a str,
    pub fee: Option<&'a str>,
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Load the sending key from `O3_WIF` or an interactive prompt.
fn load_key() -> Result<KeyMaterial> {
    let wif = match std::env::var(WIF_ENV) {
        Ok(wif) if !wif.trim().is_empty() => wif,
        _ => rpassword::prompt_password("WIF: ")?,
    };
    let mut store = MemoryKeyStore::new();
    let address = store.import_wif(KEY_ID, wif.trim())?;
    log::debug!("loaded key for {}", address);
    Ok(store.private_key(KEY_ID)?)
}

/// Seconds since the Unix epoch, for the uniqueness remark.
fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        .to_string()
}

fn parse_fee(fee: Option<&str>) -> Result<Amount> {
    match fee {
        Some(text) => Ok(Amount::parse(text, FIXED8_DECIMALS)?),
        None => Ok(Amount::zero(FIXED8_DECIMALS)),
    }
}

fn parse_recipient(address: &str) -> Result<ScriptHash> {
    Ok(o3_types::parse_address(address)?)
}

fn tx_builder(key: &KeyMaterial, fee: Amount, spendable: &[SpendableOutput]) -> TransactionBuilder {
    TransactionBuilder::new(key.script_hash())
        .set_fee(fee)
        .set_timestamp(unix_timestamp())
        .add_spendable(spendable)
}

/// Fetch unspent outputs for every asset in `assets`.
async fn fetch_spendable(
    node: &dyn NodeApi,
    owner: &ScriptHash,
    assets: &[AssetKind],
) -> Result<Vec<SpendableOutput>> {
    let mut spendable = Vec::new();
    for asset in assets {
        spendable.extend(node.get_spendable_outputs(owner, *asset).await?);
    }
    Ok(spendable)
}

/// Print a dry run, or relay and report.
async fn relay(ctx: &AppContext, node: &dyn NodeApi, signed: &SignedTransaction) -> Result {
    if ctx.dry_run {
        println!("TXID: {}", signed.txid);
        println!("Raw:  {}", signed.to_hex());
        return Ok(());
    }
    if !node.submit_raw_transaction(&signed.payload).await? {
        return Err(CliError::Rejected(signed.txid.to_string()));
    }
    log::info!("relayed {} ({} bytes)", signed.txid, signed.payload.len());
    println!("TXID: {}", signed.txid);
    Ok(())
}

// ─── Commands ───────────────────────────────────────────────────────────────

pub fn show_address() -> Result {
    let key = load_key()?;
    println!("Address:     {}", key.address());
    println!("Script hash: {}", key.script_hash());
    println!("Public key:  {}", hex::encode(key.public_key()));
    Ok(())
}

pub async fn send(
    ctx: &AppContext,
    asset: &str,
    to: &str,
    amount: &str,
    fee: Option<&str>,
) -> Result {
    let asset = AssetKind::parse_utxo_asset(asset)?;
    let intent = AssetTransfer {
        asset,
        amount: Amount::parse(amount, asset.decimals())?,
        recipient: parse_recipient(to)?,
        attributes: Vec::new(),
    };
    let fee = parse_fee(fee)?;

    let key = load_key()?;
    let node = NeoNode::new(&ctx.node_url);
    let mut assets = vec![asset];
    if asset == AssetKind::Neo && !fee.is_zero() {
        assets.push(AssetKind::Gas);
    }
    let spendable = fetch_spendable(&node, &key.script_hash(), &assets).await?;

    let builder = tx_builder(&key, fee, &spendable);
    let signed = builder.sign(&builder.transfer(&intent)?, &key)?;
    println!("Sending {} {} to {}", intent.amount, asset, to);
    relay(ctx, &node, &signed).await
}

pub async fn claim(ctx: &AppContext) -> Result {
    let key = load_key()?;
    let node = NeoNode::new(&ctx.node_url);
    let claims = node.get_claimable(&key.script_hash()).await?;

    let builder = tx_builder(&key, Amount::zero(FIXED8_DECIMALS), &[]);
    let signed = builder.sign(&builder.claim(&claims)?, &key)?;
    println!("Claiming GAS from {} outputs", claims.len());
    relay(ctx, &node, &signed).await
}

pub async fn token_transfer(
    ctx: &AppContext,
    contract: &str,
    decimals: u8,
    to: &str,
    amount: &str,
    fee: Option<&str>,
) -> Result {
    let intent = TokenTransfer {
        contract: ScriptHash::from_display_hex(contract)?,
        amount: Amount::parse(amount, decimals)?,
        recipient: parse_recipient(to)?,
    };
    let fee = parse_fee(fee)?;

    let key = load_key()?;
    let node = NeoNode::new(&ctx.node_url);
    let assets: &[AssetKind] = if fee.is_zero() { &[] } else { &[AssetKind::Gas] };
    let spendable = fetch_spendable(&node, &key.script_hash(), assets).await?;

    let builder = tx_builder(&key, fee, &spendable);
    let signed = builder.sign(&builder.token_transfer(&intent)?, &key)?;
    println!("Transferring {} of {} to {}", amount, intent.contract, to);
    relay(ctx, &node, &signed).await
}

pub async fn invoke(
    ctx: &AppContext,
    contract: &str,
    operation: &str,
    args: Option<&str>,
    attach: Attachments<'_>,
) -> Result {
    let args = match args {
        Some(json) => ContractArg::parse_typed_list(json)?,
        None => Vec::new(),
    };
    let mut intent =
        ContractInvocation::new(ScriptHash::from_display_hex(contract)?, operation, args);
    intent.attached_neo = Amount::parse(attach.neo, FIXED8_DECIMALS)?;
    intent.attached_gas = Amount::parse(attach.gas, FIXED8_DECIMALS)?;
    let fee = parse_fee(attach.fee)?;

    let key = load_key()?;
    let node = NeoNode::new(&ctx.node_url);
    let mut assets = Vec::new();
    if !intent.attached_neo.is_zero() {
        assets.push(AssetKind::Neo);
    }
    if !intent.attached_gas.is_zero() || !fee.is_zero() {
        assets.push(AssetKind::Gas);
    }
    let spendable = fetch_spendable(&node, &key.script_hash(), &assets).await?;

    let builder = tx_builder(&key, fee, &spendable);
    let signed = builder.sign(&builder.invoke(&intent)?, &key)?;
    println!("Invoking {}.{}", intent.contract, operation);
    relay(ctx, &node, &signed).await
}

pub fn decode(raw: &str) -> Result {
    let bytes = o3_types::codec::from_hex(raw.trim())?;
    let decoded = o3_tx::decode_transaction(&bytes)?;
    let tx = &decoded.transaction;

    println!("TXID:       {}", decoded.txid);
    println!("Type:       {} (version {})", tx.kind.name(), decoded.version);
    if let o3_tx::TransactionKind::Invocation { script } = &tx.kind {
        println!("Script:     {}", hex::encode(script));
    }
    if let o3_tx::TransactionKind::Claim { claims } = &tx.kind {
        for claim in claims {
            println!("Claim:      {}:{}", claim.prev_hash, claim.prev_index);
        }
    }
    if let Some(gas) = decoded.invocation_gas {
        println!("System fee: {} GAS", gas);
    }
    for attr in &tx.attributes {
        println!("Attribute:  {:?} {}", attr.usage(), hex::encode(attr.data()));
    }
    for input in &tx.inputs {
        println!("Input:      {}:{}", input.prev_hash, input.prev_index);
    }
    for output in &tx.outputs {
        let asset = AssetKind::from_asset_id(&output.asset_id)
            .map(|kind| kind.symbol().to_string())
            .unwrap_or_else(|| output.asset_id.to_string());
        println!(
            "Output:     {} {} -> {}",
            output.value,
            asset,
            output.script_hash.to_address()
        );
    }
    for witness in &decoded.witnesses {
        println!("Witness:    {}", witness.script_hash().to_address());
    }
    if !decoded.witnesses.is_empty() {
        let valid = decoded.verify_witnesses()?;
        println!("Signatures: {}", if valid { "valid" } else { "INVALID" });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_message() {
        let err: CliError = TxError::InsufficientFunds {
            asset: "GAS".into(),
            need: "8.00000001".into(),
            have: "8".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Insufficient funds: need 8.00000001 GAS, have 8"
        );
    }

    #[test]
    fn test_error_categories() {
        let err: CliError = TxError::Signing(o3_crypto::SigningError::Backend("hsm".into())).into();
        assert!(matches!(err, CliError::Signing(_)));
        assert!(err.to_string().starts_with("Signing failed"));

        let err: CliError = RpcError::Timeout.into();
        assert!(err.to_string().starts_with("Network error"));

        let err: CliError = TxError::PreconditionViolation("x".into()).into();
        assert!(matches!(err, CliError::Transaction(_)));

        let err: CliError = CryptoError::InvalidWif("checksum".into()).into();
        assert!(matches!(err, CliError::Key(_)));
    }

    #[test]
    fn test_parse_fee() {
        assert!(parse_fee(None).unwrap().is_zero());
        assert_eq!(
            parse_fee(Some("0.001")).unwrap(),
            Amount::from_units(100_000, 8)
        );
        assert!(matches!(parse_fee(Some("abc")), Err(CliError::Input(_))));
    }

    #[test]
    fn test_timestamp_is_numeric() {
        let ts = unix_timestamp();
        assert!(!ts.is_empty());
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_builder_stamps_invocations() {
        let key = KeyMaterial::generate();
        let builder = tx_builder(&key, Amount::zero(FIXED8_DECIMALS), &[]);
        assert_eq!(builder.context().sender, key.script_hash());
        assert!(!builder.context().timestamp.is_empty());

        let intent = ContractInvocation::new(ScriptHash::from_bytes([3; 20]), "name", vec![]);
        let signed = builder.sign(&builder.invoke(&intent).unwrap(), &key).unwrap();
        assert!(o3_tx::decode_transaction(&signed.payload)
            .unwrap()
            .verify_witnesses()
            .unwrap());
    }

    #[test]
    fn test_decode_rejects_bad_hex() {
        assert!(matches!(decode("zz"), Err(CliError::Input(_))));
        assert!(decode("8000000000").is_ok());
    }
}
