//! # Vend Terminal Entry Point
//!
//! ```text
//! $ vend --style compact
//! Vending machine ready. Type 'help' for commands.
//! > place A 1 3 5
//! Placed 5 x A in channel 1 at 3 each.
//! 1: AAAAA 3
//! ```
//!
//! Configuration errors exit with status 1; everything else, including end
//! of input, exits with 0.

fn main() -> anyhow::Result<()> {
    // Setup lives in lib.rs so it can be tested
    vend_cli::run()
}
