//! # Vend Terminal Library
//!
//! Everything behind the `vend` binary, kept in a library so sessions can be
//! driven from tests with in-memory input and output.
//!
//! ## Module Organization
//! ```text
//! vend_cli/
//! ├── lib.rs       ◄─── You are here (startup & tracing)
//! ├── cli.rs       ◄─── Command line flags (clap)
//! ├── config.rs    ◄─── Layered configuration (defaults, TOML, VEND_*)
//! ├── input.rs     ◄─── Token reader over stdin
//! ├── command.rs   ◄─── Command keywords & argument parsing
//! ├── render.rs    ◄─── Channel listings, messages, JSON dumps
//! ├── session.rs   ◄─── Interactive loop & payment flow
//! └── error.rs     ◄─── Session errors
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse flags                                                         │
//! │  2. Initialize tracing (stderr, so stdout stays the terminal dialog)    │
//! │  3. Load configuration ── invalid? ──► exit 1 with the reason           │
//! │  4. Build the machine from the configured limits                        │
//! │  5. Run the session on stdin/stdout until exit or end of input          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod session;

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vend_core::VendingMachine;

use cli::Cli;
use config::VendConfig;
use session::Session;

/// Runs the terminal with flags from the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = VendConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("cannot start with configuration {}", path.display()),
        None => "cannot start with environment configuration".to_string(),
    })?;
    cli.apply(&mut config);
    debug!(?config, "configuration loaded");

    let machine = VendingMachine::new(config.limits());
    let coins = config.coin_set()?;
    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut session = Session::new(
        stdin.lock(),
        stdout.lock(),
        machine,
        coins,
        config.renderer(),
    )
    .with_prompts(config.prompts);

    let summary = session.run().context("terminal session failed")?;
    info!(
        payments = summary.payments,
        collected = %summary.collected,
        change_given = %summary.change_given,
        abandoned = %summary.abandoned,
        "terminal closed"
    );
    Ok(())
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=vend_core=trace` - Override everything
/// - `--verbose` - Debug for the vend crates
/// - Default: WARN level
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,vend_cli=debug,vend_core=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
