//! Verify command implementation.

use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};
use vcp_core::{Verifier, VerifyOptions};
use vcp_pack::load_pack;

use crate::output::{render_json, render_text};

/// Arguments of the `verify` subcommand.
pub struct VerifyArgs {
    pub dir: String,
    pub json: bool,
    pub config: Option<String>,
    pub require_event_policy: bool,
    pub lenient_chain: bool,
}

/// Failure to read a `--config` file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn load_options(args: &VerifyArgs) -> Result<VerifyOptions, ConfigError> {
    let mut options = match &args.config {
        Some(path) => {
            let path = PathBuf::from(path);
            let bytes = std::fs::read(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse { path, source })?
        }
        None => VerifyOptions::default(),
    };

    if args.require_event_policy {
        options.require_event_policy = true;
    }
    if args.lenient_chain {
        options.chain_breaks_fatal = false;
    }
    Ok(options)
}

pub fn run(args: VerifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = load_options(&args)?;
    debug!(?options, "verification options");

    let pack = load_pack(&args.dir)?;
    let report = Verifier::new(options).verify(&pack);

    if args.json {
        println!("{}", render_json(&args.dir, &report)?);
    } else {
        print!("{}", render_text(&args.dir, &report)?);
    }

    if !report.verified() {
        info!(failures = report.failures().len(), "evidence pack failed verification");
        std::process::exit(1);
    }

    Ok(())
}
