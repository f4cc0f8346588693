//! NodeApi against a scripted local HTTP responder, plus live-node checks.
//!
//! Live tests run with: cargo test -p o3-rpc --test node -- --ignored
//!
//! They require a NEO 2.x node at NEO_RPC_URL (default: the first testnet seed).

use o3_rpc::{NeoNode, NodeApi, RpcConfig, RpcError};
use o3_types::{Amount, AssetKind, ScriptHash};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const ADDRESS: &str = "ALq7AWrhAueN6mJNqk6FHJjnsEoPRytLdW";

/// Read one HTTP request (headers plus content-length body) and return it.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&data).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                return text[end + 4..].to_string();
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

/// Serve the scripted `(status, body)` replies, one connection each.
/// Returns the URL and a handle yielding the request bodies received.
async fn serve(replies: Vec<(u16, String)>) -> (String, tokio::task::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in replies {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);
            let reply = format!(
                "HTTP/1.1 {} Reply\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        requests
    });
    (url, handle)
}

fn result(value: serde_json::Value) -> (u16, String) {
    (200, serde_json::json!({ "jsonrpc": "2.0", "id": 0, "result": value }).to_string())
}

fn make_node(url: &str) -> NeoNode {
    NeoNode::with_config(RpcConfig {
        url: url.to_string(),
        timeout: Duration::from_secs(5),
        retries: 2,
        retry_delay: Duration::from_millis(10),
        ..Default::default()
    })
}

fn sender() -> ScriptHash {
    o3_types::parse_address(ADDRESS).unwrap()
}

#[tokio::test]
async fn test_get_spendable_outputs() {
    let (url, handle) = serve(vec![result(serde_json::json!({
        "balance": [{
            "unspent": [{ "txid": "bb".repeat(32), "n": 1, "value": 3 }],
            "asset_hash": "602c79718b16e442de58778e148d0b1084e3b2dffd5de6b7b16cee7969282de7",
            "asset_symbol": "GAS"
        }],
        "address": ADDRESS
    }))])
    .await;

    let outputs = make_node(&url)
        .get_spendable_outputs(&sender(), AssetKind::Gas)
        .await
        .unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].value, Amount::from_units(300_000_000, 8));

    let requests = handle.await.unwrap();
    let request: serde_json::Value = serde_json::from_str(&requests[0]).unwrap();
    assert_eq!(request["method"], "getunspents");
    assert_eq!(request["params"][0], ADDRESS);
}

#[tokio::test]
async fn test_retry_after_server_error() {
    let (url, handle) = serve(vec![
        (503, "busy".to_string()),
        result(serde_json::json!(4_100_000)),
    ])
    .await;

    let count = make_node(&url).get_block_count().await.unwrap();
    assert_eq!(count, 4_100_000);
    assert_eq!(handle.await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_rpc_error_not_retried() {
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 0,
        "error": { "code": -32602, "message": "Invalid params" }
    })
    .to_string();
    let (url, handle) = serve(vec![(200, body)]).await;

    let err = make_node(&url).get_claimable(&sender()).await.unwrap_err();
    match err {
        RpcError::Rpc { code, method, .. } => {
            assert_eq!(code, -32602);
            assert_eq!(method, "getclaimable");
        }
        other => panic!("expected Rpc error, got {:?}", other),
    }
    assert_eq!(handle.await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_submit_raw_transaction() {
    let (url, handle) = serve(vec![result(serde_json::json!(true))]).await;

    let accepted = make_node(&url)
        .submit_raw_transaction(&[0x80, 0x00, 0x00, 0x00, 0x00])
        .await
        .unwrap();
    assert!(accepted);

    let requests = handle.await.unwrap();
    let request: serde_json::Value = serde_json::from_str(&requests[0]).unwrap();
    assert_eq!(request["method"], "sendrawtransaction");
    assert_eq!(request["params"][0], "8000000000");
}

#[tokio::test]
async fn test_auth_failure() {
    let (url, _handle) = serve(vec![(401, String::new())]).await;
    let err = make_node(&url).get_block_count().await.unwrap_err();
    assert!(matches!(err, RpcError::AuthFailed { .. }));
}

// ─── Live node ──────────────────────────────────────────────────────────────

fn live_node() -> NeoNode {
    let url = std::env::var("NEO_RPC_URL")
        .unwrap_or_else(|_| o3_rpc::seed_nodes::TESTNET[0].to_string());
    NeoNode::new(&url)
}

#[tokio::test]
#[ignore]
async fn test_live_block_count() {
    let count = live_node().get_block_count().await.expect("getblockcount failed");
    assert!(count > 0, "chain should have blocks");
    println!("Block count: {}", count);
}

#[tokio::test]
#[ignore]
async fn test_live_unspents() {
    let outputs = live_node()
        .get_spendable_outputs(&sender(), AssetKind::Gas)
        .await
        .expect("getunspents failed");
    println!("{} GAS outputs for {}", outputs.len(), ADDRESS);
}
