//! vcp-verify - Command-line verifier for VCP evidence packs.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vcp_pack::PackError;

mod commands;
mod output;

use commands::{canonicalize, event_hash, verify};

#[derive(Parser)]
#[command(name = "vcp-verify")]
#[command(about = "Independent verification of VCP evidence packs")]
#[command(version)]
struct Cli {
    /// Log progress and per-stage detail to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Log errors only
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify an evidence pack directory (events.json, batches.json, anchors.json)
    Verify {
        /// Path to the evidence pack directory
        dir: String,
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
        /// JSON file with verification options
        #[arg(long)]
        config: Option<String>,
        /// Fail when an event lacks its own PolicyIdentification
        #[arg(long)]
        require_event_policy: bool,
        /// Report hash-chain breaks as warnings instead of failures
        #[arg(long)]
        lenient_chain: bool,
    },
    /// Show canonical form of input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Recompute the EventHash of a single event
    EventHash {
        /// Input event JSON file (or stdin if not provided)
        input: Option<String>,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Verify {
            dir,
            json,
            config,
            require_event_policy,
            lenient_chain,
        } => verify::run(verify::VerifyArgs {
            dir,
            json,
            config,
            require_event_policy,
            lenient_chain,
        }),
        Commands::Canonicalize { input } => canonicalize::run(input),
        Commands::EventHash { input } => event_hash::run(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        // A pack that cannot be loaded is distinct from one that fails verification.
        let code = if e.is::<PackError>() { 2 } else { 1 };
        std::process::exit(code);
    }
}
