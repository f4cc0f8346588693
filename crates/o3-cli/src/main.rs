use clap::{Parser, Subcommand};
use o3_types::Network;

mod commands;

/// O3 NEO wallet command-line interface.
#[derive(Parser)]
#[command(name = "o3-wallet-cli")]
#[command(about = "Build, sign and relay NEO transactions")]
#[command(version)]
struct Cli {
    /// Network to use.
    #[arg(long, default_value = "mainnet")]
    network: NetworkArg,

    /// Node RPC URL (overrides the first seed node of the selected network).
    #[arg(long)]
    node: Option<String>,

    /// Print the signed transaction instead of relaying it.
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug)]
enum NetworkArg {
    Mainnet,
    Testnet,
    Privnet,
}

impl std::fmt::Display for NetworkArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_network().name())
    }
}

impl std::str::FromStr for NetworkArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "privnet" | "private" => Ok(Self::Privnet),
            _ => Err(format!("unknown network: {} (use mainnet, testnet, or privnet)", s)),
        }
    }
}

impl NetworkArg {
    fn to_network(&self) -> Network {
        match self {
            Self::Mainnet => Network::Mainnet,
            Self::Testnet => Network::Testnet,
            Self::Privnet => Network::Privnet,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the address, script hash and public key of the wallet key.
    Address,

    /// Send NEO or GAS to an address.
    Send {
        /// Asset to send (neo, gas, or a 64-character asset id).
        #[arg(long)]
        asset: String,

        /// Destination address.
        #[arg(long)]
        to: String,

        /// Amount (e.g., "1.5" GAS or "10" NEO).
        #[arg(long)]
        amount: String,

        /// Network fee in GAS.
        #[arg(long)]
        fee: Option<String>,
    },

    /// Claim all unclaimed GAS.
    Claim,

    /// Transfer a NEP-5 token.
    TokenTransfer {
        /// Token contract hash (0x-prefixed, as shown by explorers).
        #[arg(long)]
        contract: String,

        /// Token decimals.
        #[arg(long, default_value = "8")]
        decimals: u8,

        /// Destination address.
        #[arg(long)]
        to: String,

        /// Amount in token units (e.g., "12.5").
        #[arg(long)]
        amount: String,

        /// Network fee in GAS.
        #[arg(long)]
        fee: Option<String>,
    },

    /// Invoke a smart contract operation.
    Invoke {
        /// Contract hash (0x-prefixed, as shown by explorers).
        #[arg(long)]
        contract: String,

        /// Operation name.
        #[arg(long)]
        operation: String,

        /// Arguments as a JSON list of {"type": ..., "value": ...}.
        #[arg(long)]
        args: Option<String>,

        /// NEO to attach to the invocation.
        #[arg(long, default_value = "0")]
        neo: String,

        /// GAS to attach to the invocation.
        #[arg(long, default_value = "0")]
        gas: String,

        /// Network fee in GAS.
        #[arg(long)]
        fee: Option<String>,
    },

    /// Decode a raw transaction and verify its witnesses.
    Decode {
        /// Transaction hex.
        hex: String,
    },
}

/// Application context shared across commands.
struct AppContext {
    network: Network,
    node_url: String,
    dry_run: bool,
}

impl AppContext {
    fn from_cli(cli: &Cli) -> Self {
        let network = cli.network.to_network();
        let node_url = cli
            .node
            .clone()
            .unwrap_or_else(|| o3_rpc::seeds_for(network)[0].to_string());

        Self {
            network,
            node_url,
            dry_run: cli.dry_run,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let ctx = AppContext::from_cli(&cli);
    log::debug!("network {} via {}", ctx.network, ctx.node_url);

    let result = match cli.command {
        Commands::Address => commands::show_address(),
        Commands::Send {
            asset,
            to,
            amount,
            fee,
        } => commands::send(&ctx, &asset, &to, &amount, fee.as_deref()).await,
        Commands::Claim => commands::claim(&ctx).await,
        Commands::TokenTransfer {
            contract,
            decimals,
            to,
            amount,
            fee,
        } => {
            commands::token_transfer(&ctx, &contract, decimals, &to, &amount, fee.as_deref()).await
        }
        Commands::Invoke {
            contract,
            operation,
            args,
            neo,
            gas,
            fee,
        } => {
            let attach = commands::Attachments {
                neo: &neo,
                gas: &gas,
                fee: fee.as_deref(),
            };
            commands::invoke(&ctx, &contract, &operation, args.as_deref(), attach).await
        }
        Commands::Decode { hex } => commands::decode(&hex),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send() {
        let cli = Cli::try_parse_from([
            "o3-wallet-cli",
            "--network",
            "testnet",
            "--dry-run",
            "send",
            "--asset",
            "gas",
            "--to",
            "AFsCjUGzicZmXQtWpwVt6fQTZyaVe7bfEk",
            "--amount",
            "1.5",
        ])
        .unwrap();
        assert!(cli.dry_run);
        assert!(matches!(cli.network, NetworkArg::Testnet));
        match cli.command {
            Commands::Send { asset, amount, fee, .. } => {
                assert_eq!(asset, "gas");
                assert_eq!(amount, "1.5");
                assert!(fee.is_none());
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_default_node_from_network() {
        let cli = Cli::try_parse_from(["o3-wallet-cli", "--network", "privnet", "claim"]).unwrap();
        let ctx = AppContext::from_cli(&cli);
        assert_eq!(ctx.network, Network::Privnet);
        assert_eq!(ctx.node_url, o3_rpc::seed_nodes::PRIVNET[0]);

        let cli = Cli::try_parse_from(["o3-wallet-cli", "--node", "http://10.0.0.1:10332", "claim"])
            .unwrap();
        assert_eq!(AppContext::from_cli(&cli).node_url, "http://10.0.0.1:10332");
    }

    #[test]
    fn test_unknown_network_rejected() {
        assert!(Cli::try_parse_from(["o3-wallet-cli", "--network", "stagenet", "claim"]).is_err());
    }

    #[test]
    fn test_invoke_defaults() {
        let cli = Cli::try_parse_from([
            "o3-wallet-cli",
            "invoke",
            "--contract",
            "0xecc6b20d3ccac1ee9ef109af5a7cdb85706b1df9",
            "--operation",
            "name",
        ])
        .unwrap();
        match cli.command {
            Commands::Invoke { neo, gas, args, .. } => {
                assert_eq!(neo, "0");
                assert_eq!(gas, "0");
                assert!(args.is_none());
            }
            _ => panic!("expected invoke"),
        }
    }
}
