//! NEO node capabilities used by the wallet.
//!
//! [`NodeApi`] is the seam between transaction construction and the network:
//! the builders only ever see the spendable outputs and claim records it
//! returns, and hand their signed payload back to it.

use crate::client::{RpcClient, RpcConfig};
use crate::error::RpcError;
use async_trait::async_trait;
use o3_types::amount::fixed8;
use o3_types::{Amount, AssetKind, ClaimRecord, ScriptHash, SpendableOutput, UInt256};
use serde::Deserialize;
use serde_json::{json, Value};

// =============================================================================
// Response Types
// =============================================================================

/// `getunspents` response.
#[derive(Debug, Clone, Deserialize)]
pub struct UnspentsResponse {
    #[serde(default)]
    pub balance: Vec<AssetBalance>,
    pub address: String,
}

/// Per-asset entry of a `getunspents` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetBalance {
    pub asset_hash: UInt256,
    #[serde(default)]
    pub asset_symbol: String,
    #[serde(default)]
    pub unspent: Vec<UnspentEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnspentEntry {
    pub txid: UInt256,
    pub n: u16,
    #[serde(deserialize_with = "fixed8")]
    pub value: Amount,
}

/// `getclaimable` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimableResponse {
    #[serde(default)]
    pub claimable: Vec<ClaimableEntry>,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimableEntry {
    pub txid: UInt256,
    pub n: u16,
    #[serde(deserialize_with = "fixed8")]
    pub unclaimed: Amount,
    #[serde(default)]
    pub start_height: Option<u32>,
    #[serde(default)]
    pub end_height: Option<u32>,
}

impl UnspentsResponse {
    /// Spendable outputs of one UTXO asset. Other assets are ignored.
    pub fn into_spendable(self, asset: AssetKind) -> Result<Vec<SpendableOutput>, RpcError> {
        let asset_id = asset
            .asset_id()
            .ok_or_else(|| RpcError::InvalidResponse(format!("{} has no unspent outputs", asset)))?;
        Ok(self
            .balance
            .into_iter()
            .filter(|balance| balance.asset_hash == asset_id)
            .flat_map(|balance| balance.unspent)
            .map(|entry| SpendableOutput::new(entry.txid, entry.n, entry.value, asset))
            .collect())
    }
}

impl ClaimableResponse {
    pub fn into_claims(self) -> Vec<ClaimRecord> {
        self.claimable
            .into_iter()
            .map(|entry| ClaimRecord {
                txid: entry.txid,
                index: entry.n,
                unclaimed: entry.unclaimed,
                start_height: entry.start_height,
                end_height: entry.end_height,
            })
            .collect()
    }
}

// =============================================================================
// NodeApi
// =============================================================================

/// What the wallet needs from a NEO node.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Unspent outputs of `asset` held by `address`.
    async fn get_spendable_outputs(
        &self,
        address: &ScriptHash,
        asset: AssetKind,
    ) -> Result<Vec<SpendableOutput>, RpcError>;

    /// Spent NEO outputs of `address` with unclaimed GAS.
    async fn get_claimable(&self, address: &ScriptHash) -> Result<Vec<ClaimRecord>, RpcError>;

    /// Relay a signed transaction. `Ok(false)` means the node rejected it.
    async fn submit_raw_transaction(&self, payload: &[u8]) -> Result<bool, RpcError>;

    /// Number of blocks in the node's chain.
    async fn get_block_count(&self) -> Result<u32, RpcError>;
}

/// [`NodeApi`] over a NEO 2.x JSON-RPC endpoint.
pub struct NeoNode {
    client: RpcClient,
}

impl NeoNode {
    pub fn new(url: &str) -> Self {
        Self {
            client: RpcClient::new(url),
        }
    }

    pub fn with_config(config: RpcConfig) -> Self {
        Self {
            client: RpcClient::with_config(config),
        }
    }

    /// Access the underlying RPC client.
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    async fn call_typed<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let result = self.client.call(method, params).await?;
        Ok(serde_json::from_value(result)?)
    }
}

#[async_trait]
impl NodeApi for NeoNode {
    async fn get_spendable_outputs(
        &self,
        address: &ScriptHash,
        asset: AssetKind,
    ) -> Result<Vec<SpendableOutput>, RpcError> {
        let response: UnspentsResponse = self
            .call_typed("getunspents", json!([address.to_address()]))
            .await?;
        let outputs = response.into_spendable(asset)?;
        log::debug!("{} unspent {} outputs", outputs.len(), asset);
        Ok(outputs)
    }

    async fn get_claimable(&self, address: &ScriptHash) -> Result<Vec<ClaimRecord>, RpcError> {
        let response: ClaimableResponse = self
            .call_typed("getclaimable", json!([address.to_address()]))
            .await?;
        let claims = response.into_claims();
        log::debug!("{} claimable outputs", claims.len());
        Ok(claims)
    }

    async fn submit_raw_transaction(&self, payload: &[u8]) -> Result<bool, RpcError> {
        let result = self
            .client
            .call("sendrawtransaction", json!([hex::encode(payload)]))
            .await?;
        parse_relay_result(&result)
    }

    async fn get_block_count(&self) -> Result<u32, RpcError> {
        self.call_typed("getblockcount", json!([])).await
    }
}

/// `sendrawtransaction` answers `true`/`false`, or an object with a
/// `succeed` flag on some node builds.
fn parse_relay_result(result: &Value) -> Result<bool, RpcError> {
    match result {
        Value::Bool(accepted) => Ok(*accepted),
        Value::Object(map) => map
            .get("succeed")
            .and_then(Value::as_bool)
            .ok_or_else(|| RpcError::InvalidResponse(format!("relay result {}", result))),
        other => Err(RpcError::InvalidResponse(format!("relay result {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAS_ID: &str = "602c79718b16e442de58778e148d0b1084e3b2dffd5de6b7b16cee7969282de7";
    const NEO_ID: &str = "c56f33fc6ecfcd0c225c4ab356fee59390af8560be0e930faebe74a6daff7c9b";
    const TXID: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    fn make_unspents() -> Value {
        json!({
            "balance": [
                {
                    "unspent": [
                        { "txid": TXID, "n": 0, "value": 5 },
                        { "txid": TXID, "n": 1, "value": 3.12345678 }
                    ],
                    "asset_hash": GAS_ID,
                    "asset": "GAS",
                    "asset_symbol": "GAS",
                    "amount": 8.12345678
                },
                {
                    "unspent": [{ "txid": TXID, "n": 2, "value": "100" }],
                    "asset_hash": NEO_ID,
                    "asset": "NEO",
                    "asset_symbol": "NEO",
                    "amount": 100
                }
            ],
            "address": "ALq7AWrhAueN6mJNqk6FHJjnsEoPRytLdW"
        })
    }

    #[test]
    fn test_unspents_filtered_by_asset() {
        let response: UnspentsResponse = serde_json::from_value(make_unspents()).unwrap();
        let gas = response.clone().into_spendable(AssetKind::Gas).unwrap();
        assert_eq!(gas.len(), 2);
        assert_eq!(gas[1].index, 1);
        assert_eq!(gas[1].value, Amount::from_units(312_345_678, 8));
        assert_eq!(gas[0].txid.to_hex(), TXID);

        let neo = response.into_spendable(AssetKind::Neo).unwrap();
        assert_eq!(neo.len(), 1);
        assert_eq!(neo[0].value, Amount::from_units(10_000_000_000, 8));
        assert_eq!(neo[0].asset, AssetKind::Neo);
    }

    #[test]
    fn test_unspents_empty_balance() {
        let response: UnspentsResponse =
            serde_json::from_value(json!({ "balance": [], "address": "x" })).unwrap();
        assert!(response.into_spendable(AssetKind::Gas).unwrap().is_empty());
    }

    #[test]
    fn test_unspents_token_rejected() {
        let response: UnspentsResponse = serde_json::from_value(make_unspents()).unwrap();
        let token = AssetKind::Token {
            script_hash: ScriptHash::from_bytes([1; 20]),
            decimals: 8,
        };
        assert!(matches!(
            response.into_spendable(token),
            Err(RpcError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_unspents_bad_txid() {
        let bad = json!({
            "balance": [{ "unspent": [{ "txid": "zz", "n": 0, "value": 1 }], "asset_hash": GAS_ID }],
            "address": "x"
        });
        assert!(serde_json::from_value::<UnspentsResponse>(bad).is_err());
    }

    #[test]
    fn test_claimable_parsing() {
        let response: ClaimableResponse = serde_json::from_value(json!({
            "claimable": [
                {
                    "txid": TXID,
                    "n": 3,
                    "value": 100,
                    "start_height": 1200,
                    "end_height": 1500,
                    "generated": 0.00024,
                    "sys_fee": 0.00001,
                    "unclaimed": 0.00025
                }
            ],
            "address": "ALq7AWrhAueN6mJNqk6FHJjnsEoPRytLdW",
            "unclaimed": 0.00025
        }))
        .unwrap();
        let claims = response.into_claims();
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].index, 3);
        assert_eq!(claims[0].unclaimed, Amount::from_units(25_000, 8));
        assert_eq!(claims[0].start_height, Some(1200));
        assert_eq!(claims[0].end_height, Some(1500));
    }

    #[test]
    fn test_relay_result() {
        assert!(parse_relay_result(&json!(true)).unwrap());
        assert!(!parse_relay_result(&json!(false)).unwrap());
        assert!(parse_relay_result(&json!({ "succeed": true })).unwrap());
        assert!(matches!(
            parse_relay_result(&json!("ok")),
            Err(RpcError::InvalidResponse(_))
        ));
    }
}
