//! O3 RPC client library.
//!
//! Async JSON-RPC 2.0 client for NEO 2.x nodes, and the [`NodeApi`]
//! capability the wallet uses to fetch spendable outputs and claimable GAS
//! and to submit signed transactions.
//!
//! # Example
//!
//! ```ignore
//! use o3_rpc::{NeoNode, NodeApi};
//!
//! #[tokio::main]
//! async fn main() {
//!     let node = NeoNode::new("http://seed1.ngd.network:10332");
//!     let height = node.get_block_count().await.unwrap();
//!     println!("Height: {}", height);
//! }
//! ```

pub mod client;
pub mod error;
pub mod node;

pub use client::{RpcClient, RpcConfig};
pub use error::RpcError;
pub use node::{NeoNode, NodeApi};

use o3_types::Network;

/// Seed nodes per network.
pub mod seed_nodes {
    pub const MAINNET: &[&str] = &[
        "http://seed1.ngd.network:10332",
        "http://seed2.ngd.network:10332",
        "http://seed3.ngd.network:10332",
    ];
    pub const TESTNET: &[&str] = &[
        "http://seed1.ngd.network:20332",
        "http://seed2.ngd.network:20332",
        "http://seed3.ngd.network:20332",
    ];
    pub const PRIVNET: &[&str] = &["http://127.0.0.1:30333"];
}

/// Default RPC ports.
pub mod ports {
    pub const RPC_MAINNET: u16 = 10332;
    pub const RPC_TESTNET: u16 = 20332;
    pub const RPC_PRIVNET: u16 = 30333;
}

/// Seed node list for `network`.
pub fn seeds_for(network: Network) -> &'static [&'static str] {
    match network {
        Network::Mainnet => seed_nodes::MAINNET,
        Network::Testnet => seed_nodes::TESTNET,
        Network::Privnet => seed_nodes::PRIVNET,
    }
}

/// Default RPC port for `network`.
pub fn default_port(network: Network) -> u16 {
    match network {
        Network::Mainnet => ports::RPC_MAINNET,
        Network::Testnet => ports::RPC_TESTNET,
        Network::Privnet => ports::RPC_PRIVNET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_use_default_port() {
        for network in [Network::Mainnet, Network::Testnet, Network::Privnet] {
            let port = format!(":{}", default_port(network));
            assert!(!seeds_for(network).is_empty());
            assert!(seeds_for(network).iter().all(|url| url.ends_with(&port)));
        }
    }
}
