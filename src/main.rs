//! Calldata CLI
//!
//! Prints hex calldata for the automation scripts, or the full transaction
//! parameters with `--json`:
//!
//! - calldata bridge --token 0x... --amount 1000000000000000 --fee 500000000000000000
//! - calldata delegate --validator heliosvaloper1... --amount 1 --units 18
//! - calldata vote --proposal-id 12 --reason "looks good"
//! - calldata inspect 0x9ec4d363...

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use calldata_rs::address::normalize_address;
use calldata_rs::builders::{
    encode_bridge, encode_claim, encode_create_proposal, encode_delegate, encode_vote,
    BridgeParams, ClaimParams, DelegateParams, ProposalParams, VoteParams,
};
use calldata_rs::config::Config;
use calldata_rs::frame::{selector_of, selector_to_hex, CallFrame, CallKind};
use calldata_rs::tx::TransactionParams;
use calldata_rs::word::to_base_units;

#[derive(Parser)]
#[command(name = "calldata")]
#[command(about = "Build raw calldata for bridge, staking and governance calls", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print transaction parameters as JSON instead of bare calldata
    #[arg(long, global = true)]
    json: bool,

    /// Nonce to place in the JSON output
    #[arg(long, global = true, default_value_t = 0)]
    nonce: u64,

    /// Path to a .env file
    #[arg(long, global = true, default_value = ".env")]
    env_file: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Bridge tokens to another chain
    Bridge {
        /// Token contract address
        #[arg(long)]
        token: String,

        /// Amount (smallest unit unless --units is given)
        #[arg(long)]
        amount: String,

        /// Fee or destination gas (smallest unit unless --units is given)
        #[arg(long)]
        fee: String,

        /// Recipient on the destination chain (defaults to WALLET_ADDRESS)
        #[arg(long)]
        recipient: Option<String>,

        /// Destination chain id (defaults to BRIDGE_DEST_CHAIN_ID)
        #[arg(long)]
        dest_chain: Option<u64>,

        /// Decimals to convert human-readable amounts with
        #[arg(long)]
        units: Option<u8>,
    },

    /// Delegate stake to a validator
    Delegate {
        /// Validator address, hex or bech32
        #[arg(long)]
        validator: String,

        #[arg(long)]
        amount: String,

        /// Staking denom (defaults to STAKE_DENOM)
        #[arg(long)]
        denom: Option<String>,

        /// Delegator address (defaults to WALLET_ADDRESS)
        #[arg(long)]
        delegator: Option<String>,

        #[arg(long)]
        units: Option<u8>,
    },

    /// Claim staking rewards
    Claim {
        /// Reward amount or entry id
        #[arg(long, default_value = "0")]
        amount_or_id: String,

        #[arg(long)]
        delegator: Option<String>,
    },

    /// Vote on a governance proposal
    Vote {
        #[arg(long)]
        proposal_id: String,

        /// Vote against instead of in favour
        #[arg(long)]
        against: bool,

        #[arg(long, default_value = "")]
        reason: String,

        /// Voter address (defaults to WALLET_ADDRESS)
        #[arg(long)]
        voter: Option<String>,
    },

    /// Create a governance proposal
    Propose {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// JSON array of message objects
        #[arg(long, default_value = "[]")]
        messages: String,

        #[arg(long)]
        deposit: String,

        #[arg(long)]
        units: Option<u8>,
    },

    /// Compute the selector of a function signature
    Selector {
        /// Canonical signature, e.g. "transfer(address,uint256)"
        signature: String,
    },

    /// Decode the head words of existing calldata
    Inspect {
        calldata: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_from_file(&cli.env_file)?;

    let (target, calldata) = match cli.command {
        Commands::Bridge {
            token,
            amount,
            fee,
            recipient,
            dest_chain,
            units,
        } => {
            let recipient = match recipient {
                Some(r) => normalize_address(&r)?,
                None => config.require_wallet()?.to_string(),
            };
            let params = BridgeParams::new(
                dest_chain.unwrap_or(config.bridge_dest_chain_id),
                token,
                amount_arg(&amount, units)?,
                amount_arg(&fee, units)?,
                recipient,
            );
            (config.bridge_contract.clone(), encode_bridge(&params)?)
        }
        Commands::Delegate {
            validator,
            amount,
            denom,
            delegator,
            units,
        } => {
            let params = DelegateParams::new(
                wallet_arg(delegator, &config)?,
                normalize_address(&validator).wrap_err("Invalid validator address")?,
                amount_arg(&amount, units)?,
            )
            .with_denom(denom.unwrap_or_else(|| config.stake_denom.clone()));
            (config.staking_contract.clone(), encode_delegate(&params)?)
        }
        Commands::Claim {
            amount_or_id,
            delegator,
        } => {
            let params = ClaimParams::new(wallet_arg(delegator, &config)?, amount_or_id);
            (config.staking_contract.clone(), encode_claim(&params)?)
        }
        Commands::Vote {
            proposal_id,
            against,
            reason,
            voter,
        } => {
            let params = VoteParams::new(wallet_arg(voter, &config)?, proposal_id, !against, reason);
            (config.governance_contract.clone(), encode_vote(&params)?)
        }
        Commands::Propose {
            title,
            description,
            messages,
            deposit,
            units,
        } => {
            let messages: Vec<Value> =
                serde_json::from_str(&messages).wrap_err("--messages must be a JSON array")?;
            let params =
                ProposalParams::new(title, description, messages, amount_arg(&deposit, units)?);
            (
                config.governance_contract.clone(),
                encode_create_proposal(&params)?,
            )
        }
        Commands::Selector { signature } => {
            println!("{}", selector_to_hex(&selector_of(&signature)));
            return Ok(());
        }
        Commands::Inspect { calldata } => {
            inspect(&calldata)?;
            return Ok(());
        }
    };

    tracing::info!(
        kind = ?calldata.kind(),
        bytes = calldata.len(),
        "Calldata ready"
    );

    if cli.json {
        let target = target.ok_or_else(|| {
            eyre!("--json needs the target contract for this call in the environment")
        })?;
        let tx = TransactionParams::new(&target, calldata, config.gas_limit, cli.nonce)?;
        println!("{}", serde_json::to_string_pretty(&tx)?);
    } else {
        println!("{}", calldata);
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn wallet_arg(explicit: Option<String>, config: &Config) -> Result<String> {
    match explicit {
        Some(addr) => Ok(normalize_address(&addr)?),
        None => Ok(config.require_wallet()?.to_string()),
    }
}

/// Pass amounts through untouched unless a decimals count is given
fn amount_arg(raw: &str, units: Option<u8>) -> Result<String> {
    match units {
        Some(decimals) => Ok(to_base_units(raw, decimals)?.to_string()),
        None => Ok(raw.to_string()),
    }
}

fn inspect(calldata: &str) -> Result<()> {
    let frame = CallFrame::parse(calldata)?;
    let kind = frame.kind();

    println!("selector: {}", selector_to_hex(&frame.selector()));
    println!(
        "kind:     {}",
        kind.map(|k| k.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );

    let head_words = kind
        .map(|k| k.layout().len())
        .unwrap_or_else(|| frame.word_count());
    for index in 0..frame.word_count() {
        let marker = if index < head_words { "head" } else { "tail" };
        println!("[{:>3}] {} {}", index, marker, frame.word(index)?);
    }

    if let Some(kind) = kind {
        print_dynamic_fields(&frame, kind);
    }

    Ok(())
}

fn print_dynamic_fields(frame: &CallFrame, kind: CallKind) {
    for (index, param) in kind.layout().iter().enumerate() {
        if !param.is_dynamic() {
            continue;
        }
        match frame.read_string(index) {
            Ok(text) => println!("param {}: {:?}", index, text),
            Err(e) => tracing::warn!(index, error = %e, "Could not decode dynamic field"),
        }
    }
}
