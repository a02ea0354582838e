//! ChainCall CLI — encode contract calls and query an Ethereum node.
//!
//! # Commands
//! ```text
//! chaincall block        <number|latest|pending|earliest> [--txs]
//! chaincall code         <address>
//! chaincall storage      <address> <slot> [--block <spec>]
//! chaincall call         <signature> [args..] --to <address> [--pending]
//! chaincall estimate     <signature> [args..] --to <address>
//! chaincall send         <signature> [args..] --to <address> --from <address>
//! chaincall encode       <signature> [args..]
//! chaincall block-number
//! chaincall gas-price
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use chaincall_core::abi::encode;
use chaincall_core::{Address, BlockSpec, CallOpts, Client, Data, Hash, Int, RpcFailed};

mod args;
mod endpoint;

use endpoint::Endpoint;

#[derive(Parser)]
#[command(
    name = "chaincall",
    about = "Encode contract calls and query an Ethereum node",
    long_about = "
ChainCall CLI: ABI-encode contract calls and talk to a node over HTTP,
a local IPC socket, or a hosted gateway.

ENVIRONMENT VARIABLES:
  CHAINCALL_URL              Endpoint (http(s) URL or IPC socket path)
  CHAINCALL_GATEWAY_SECRET   Project secret for hosted gateway URLs
  RUST_LOG                   Log filter, e.g. chaincall_ipc=debug
",
    version
)]
struct Cli {
    /// Endpoint: http(s) URL or IPC socket path. Unset tries the default
    /// local IPC sockets.
    #[arg(long, global = true, env = "CHAINCALL_URL")]
    url: Option<String>,

    /// Project secret sent as basic auth to hosted gateway URLs
    #[arg(long, global = true, env = "CHAINCALL_GATEWAY_SECRET", hide_env_values = true)]
    gateway_secret: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a block by number or tag
    Block {
        /// Block number (decimal or 0x hex), `latest`, `pending` or `earliest`
        block: BlockSpec,
        /// Include full transaction objects
        #[arg(long)]
        txs: bool,
    },

    /// Fetch the code deployed at an address
    Code { address: Address },

    /// Read one storage word of a contract
    Storage {
        address: Address,
        /// Slot key (hex, left-padded to 32 bytes)
        slot: Hash,
        #[arg(long, default_value = "latest")]
        block: BlockSpec,
    },

    /// Execute a contract call without mining it
    Call {
        #[command(flatten)]
        call: CallArgs,
        /// Execute against the pending block instead of the latest
        #[arg(long)]
        pending: bool,
    },

    /// Estimate the gas a contract call would use
    Estimate {
        #[command(flatten)]
        call: CallArgs,
    },

    /// Submit a contract call as a transaction (the node signs it)
    Send {
        #[command(flatten)]
        call: CallArgs,
    },

    /// Print the ABI calldata for a call without contacting a node
    Encode {
        /// Function signature, e.g. `transfer(address,uint256)`
        signature: String,
        args: Vec<String>,
    },

    /// Print the latest block number
    #[command(name = "block-number")]
    BlockNumber,

    /// Print the node's gas price
    #[command(name = "gas-price")]
    GasPrice,
}

#[derive(Args)]
struct CallArgs {
    /// Function signature, e.g. `balanceOf(address)`
    signature: String,
    /// Arguments, parsed against the signature's types. Slices are
    /// comma-separated.
    args: Vec<String>,
    /// Contract address
    #[arg(long)]
    to: Address,
    #[arg(long)]
    from: Option<Address>,
    #[arg(long)]
    gas: Option<Int>,
    #[arg(long)]
    gas_price: Option<Int>,
    /// Value in wei
    #[arg(long)]
    value: Option<Int>,
}

impl CallArgs {
    fn to_opts(&self) -> Result<CallOpts> {
        let values = args::parse_args(&self.signature, &self.args)?;
        let mut opts = CallOpts::new().to(self.to);
        if let Some(from) = self.from {
            opts = opts.from(from);
        }
        if let Some(gas) = &self.gas {
            opts = opts.gas(gas.clone());
        }
        if let Some(price) = &self.gas_price {
            opts = opts.gas_price(price.clone());
        }
        if let Some(value) = &self.value {
            opts = opts.value(value.clone());
        }
        opts.with_call(&self.signature, &values)
            .with_context(|| format!("encoding {}", self.signature))
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Lazily opened connection; `encode` never needs one.
struct Remote {
    url: Option<String>,
    gateway_secret: Option<String>,
}

impl Remote {
    async fn client(&self) -> Result<Client> {
        let endpoint = Endpoint::resolve(self.url.as_deref())?;
        let transport = endpoint.connect(self.gateway_secret.clone()).await?;
        Ok(Client::from_arc(transport))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let remote = Remote {
        url: cli.url,
        gateway_secret: cli.gateway_secret,
    };

    match cli.command {
        Commands::Encode { signature, args } => cmd_encode(&signature, &args),

        Commands::Block { block, txs } => {
            let client = remote.client().await?;
            print_json(&client.get_block(block, txs).await.map_err(rpc_error)?)
        }

        Commands::Code { address } => {
            let client = remote.client().await?;
            print_json(&client.get_code(&address).await.map_err(rpc_error)?)
        }

        Commands::Storage { address, slot, block } => {
            let client = remote.client().await?;
            print_json(&client.storage_at(&address, &slot, block).await.map_err(rpc_error)?)
        }

        Commands::Call { call, pending } => {
            let opts = call.to_opts()?;
            let client = remote.client().await?;
            let out: Data = client.const_call(&opts, pending).await.map_err(rpc_error)?;
            print_json(&out)
        }

        Commands::Estimate { call } => {
            let opts = call.to_opts()?;
            let client = remote.client().await?;
            print_quantity(&client.estimate_gas(&opts).await.map_err(rpc_error)?)
        }

        Commands::Send { call } => {
            let opts = call.to_opts()?;
            let client = remote.client().await?;
            print_json(&client.send_call(&opts).await.map_err(rpc_error)?)
        }

        Commands::BlockNumber => {
            let client = remote.client().await?;
            print_quantity(&client.block_number().await.map_err(rpc_error)?)
        }

        Commands::GasPrice => {
            let client = remote.client().await?;
            print_quantity(&client.gas_price().await.map_err(rpc_error)?)
        }
    }
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_encode(signature: &str, raw: &[String]) -> Result<()> {
    let values = args::parse_args(signature, raw)?;
    let data = encode(signature, &values).with_context(|| format!("encoding {signature}"))?;
    print_json(&Data::new(data))
}

/// Tell a node that refused the request apart from one that could not be
/// reached or answered garbage.
fn rpc_error(err: RpcFailed) -> anyhow::Error {
    let hint = if err.source.is_execution_error() {
        "the node rejected the request"
    } else {
        "the request did not complete"
    };
    anyhow::Error::new(err).context(hint)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Quantities are printed both ways; the hex form is what the node returned.
fn print_quantity(n: &Int) -> Result<()> {
    print_json(&json!({ "hex": n, "decimal": n.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaincall_core::{JsonRpcError, TransportError};

    fn failed(source: TransportError) -> RpcFailed {
        RpcFailed {
            method: "eth_call",
            source,
        }
    }

    #[test]
    fn node_rejections_are_reported_as_such() {
        let err = rpc_error(failed(TransportError::Rpc(JsonRpcError {
            code: 3,
            message: "execution reverted".into(),
            data: None,
        })));
        assert_eq!(err.to_string(), "the node rejected the request");
        assert!(format!("{err:#}").contains("execution reverted"));
    }

    #[test]
    fn transport_failures_are_reported_as_such() {
        let err = rpc_error(failed(TransportError::Http("connection refused".into())));
        assert_eq!(err.to_string(), "the request did not complete");
        assert!(format!("{err:#}").contains("connection refused"));
    }
}
