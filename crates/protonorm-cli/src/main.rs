//! protonorm CLI
//!
//! Renders one loaded protobuf schema module in canonical form on stdout:
//!
//! ```text
//! protonorm acme.payments_pb2        # ./acme/payments_pb2.json, file acme/payments.proto
//! protonorm build/descriptor.json    # a descriptor set holding a single file
//! ```
//!
//! Descriptor sets are the JSON written by
//! `buf build --as-file-descriptor-set -o <out>.json`.
//!
//! Exit status is 0 on success and 1 on any failure; stdout then stays empty.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use protonorm_canon::canonicalize_module;
use protonorm_descriptor::DirectoryProvider;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protonorm")]
#[command(
    author,
    version,
    about = "Render a protobuf schema module in deterministic canonical form"
)]
struct Cli {
    /// Schema module identifier (`acme.payments_pb2`) or path to a descriptor-set JSON file.
    module: String,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(module = %cli.module, error = ?err, "failed to canonicalize schema module");
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let provider = DirectoryProvider::new(".");
    info!(module = %cli.module, root = %provider.root().display(), "canonicalizing schema module");

    // Rendered in full before anything reaches stdout.
    let text = canonicalize_module(&provider, &cli.module)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(text.as_bytes())
        .context("failed to write canonical output")?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
