use std::io::Cursor;

use anyhow::Result;
use vend_cli::config::VendConfig;
use vend_cli::render::DisplayStyle;
use vend_cli::session::{Session, SessionSummary};
use vend_core::{Money, VendingMachine};

struct Outcome {
    output: String,
    summary: SessionSummary,
    machine: VendingMachine,
}

fn run_bytes(config: &VendConfig, script: &[u8]) -> Result<Outcome> {
    let mut session = Session::new(
        Cursor::new(script.to_vec()),
        Vec::new(),
        VendingMachine::new(config.limits()),
        config.coin_set()?,
        config.renderer(),
    )
    .with_prompts(false);

    let summary = session.run()?;
    Ok(Outcome {
        output: String::from_utf8(session.output().clone())?,
        summary,
        machine: session.machine().clone(),
    })
}

fn run_with(config: &VendConfig, script: &str) -> Result<Outcome> {
    run_bytes(config, script.as_bytes())
}

fn run(script: &str) -> Result<Outcome> {
    run_with(&VendConfig::default(), script)
}

/// Place, buy, pay with change, exit.
#[test]
fn test_purchase_and_payment_with_change() -> Result<()> {
    let outcome = run("place A 1 3 5\nbuy A 1 2\npay\n5\n2\nexit\n")?;
    let out = &outcome.output;

    assert!(out.contains("Placed 5 x A in channel 1 at 3 each."));
    assert!(out.contains("Channel 1: A, quantity 5, price 3"));
    assert!(out.contains("Bought 2 x A from channel 1 for 6. Basket total: 6."));
    assert!(out.contains("Channel 1: A, quantity 3, price 3"));
    assert!(out.contains("Total due: 6. Insert coins (1, 2, 5)."));
    assert!(out.contains("Inserted 5. Paid 5 of 6, 1 remaining."));
    assert!(out.contains("Inserted 2. Paid 7 of 6."));
    assert!(out.contains("Change: 1."));
    assert!(out.trim_end().ends_with("Goodbye."));

    assert_eq!(outcome.summary.payments, 1);
    assert_eq!(outcome.summary.collected, Money::from_units(6));
    assert_eq!(outcome.summary.change_given, Money::from_units(1));
    assert_eq!(outcome.machine.inventory().channel_quantity(1), Some(3));
    Ok(())
}

/// Coins outside the accepted set are refused and do not count.
#[test]
fn test_invalid_coin_rejected() -> Result<()> {
    let outcome = run("place A 1 2 5\nbuy A 1 1\nEND\n3\nabc\n2\nexit\n")?;

    assert!(outcome.output.contains("Error: Invalid coin: 3"));
    assert!(outcome
        .output
        .contains("Error: coin must be a whole number, got 'abc'"));
    assert!(outcome.output.contains("Exact amount, no change."));
    assert_eq!(outcome.summary.rejected, 2);
    assert_eq!(outcome.summary.collected, Money::from_units(2));
    Ok(())
}

/// Only the three most recent operations can be undone.
#[test]
fn test_fourth_undo_finds_nothing() -> Result<()> {
    let outcome = run(
        "place A 1 1 1\nplace B 2 1 2\nplace C 3 1 3\nplace D 4 1 4\n\
         undo\nundo\nback\nundo\nexit\n",
    )?;

    assert!(outcome.output.contains("Undid placement of 4 x D in channel 4."));
    assert!(outcome.output.contains("Undid placement of 2 x B in channel 2."));
    assert!(outcome.output.contains("Error: Nothing to undo"));
    assert_eq!(outcome.machine.inventory().channel_quantity(1), Some(1));
    assert_eq!(outcome.machine.inventory().total_units(), 1);
    Ok(())
}

#[test]
fn test_range_errors_are_reported() -> Result<()> {
    let outcome = run("place A 6 1 1\nplace A 1 1 51\nbuy A 1 1\nplace A 1 -2 1\nexit\n")?;
    let out = &outcome.output;

    assert!(out.contains("Error: Invalid channel 6: must be between 1 and 5"));
    assert!(out.contains("Error: Invalid quantity 51: must be between 1 and 50"));
    assert!(out.contains("Error: Insufficient stock in channel 1: available 0, requested 1"));
    assert_eq!(outcome.summary.rejected, 4);
    assert!(outcome.machine.history().is_empty());
    Ok(())
}

/// `exit` with an open basket collects payment first.
#[test]
fn test_exit_requires_payment() -> Result<()> {
    let outcome = run("place B 2 4 3\nbuy B 2 1\nexit\n2\n2\n")?;

    assert!(outcome
        .output
        .contains("Basket of 4 is still open; please pay before leaving."));
    assert!(outcome.output.contains("Total due: 4. Insert coins (1, 2, 5)."));
    assert!(outcome.output.contains("Exact amount, no change."));
    assert_eq!(outcome.summary.payments, 1);
    Ok(())
}

#[test]
fn test_end_of_input_during_payment() -> Result<()> {
    let outcome = run("place A 1 3 5\nbuy A 1 2\npay\n5\n")?;

    assert!(outcome
        .output
        .contains("Input closed during payment: 5 inserted of 6 due."));
    assert!(outcome.output.contains("Returned 2 units to stock."));
    assert_eq!(outcome.summary.payments, 0);
    assert_eq!(outcome.summary.abandoned, Money::from_units(6));
    assert_eq!(outcome.machine.inventory().channel_quantity(1), Some(5));
    Ok(())
}

/// Unpaid goods from several channels all go back.
#[test]
fn test_end_of_input_returns_whole_basket() -> Result<()> {
    let outcome = run("place A 1 3 5\nplace B 2 1 4\nbuy A 1 2\nbuy B 2 4\nbuy A 1 1\n")?;

    assert!(outcome
        .output
        .contains("Input closed; unpaid basket of 13 abandoned."));
    assert!(outcome.output.contains("Returned 7 units to stock."));
    assert_eq!(outcome.summary.abandoned, Money::from_units(13));
    assert_eq!(outcome.machine.inventory().channel_quantity(1), Some(5));
    assert_eq!(outcome.machine.inventory().channel_quantity(2), Some(4));
    Ok(())
}

/// Prices past the limit are refused instead of overflowing later.
#[test]
fn test_extreme_price_rejected() -> Result<()> {
    let outcome = run(
        "place A 1 9223372036854775807 2\nplace A 1 1000000001 1\n\
         place B 2 1000000000 50\nbuy B 2 50\npay\n5\n",
    )?;
    let out = &outcome.output;

    assert!(out.contains("Error: Validation error: price must be between 0 and 1000000000"));
    assert_eq!(outcome.summary.rejected, 2);
    assert_eq!(outcome.machine.inventory().channel_quantity(1), Some(0));

    // The largest price times the largest quantity is still a normal bill.
    assert!(out.contains("Bought 50 x B from channel 2 for 50000000000. Basket total: 50000000000."));
    assert!(out.contains("Input closed during payment: 5 inserted of 50000000000 due."));
    assert_eq!(outcome.machine.inventory().channel_quantity(2), Some(50));
    Ok(())
}

/// Bytes that are not UTF-8 are rejected as a bad command; the session
/// carries on with the next line.
#[test]
fn test_non_utf8_input_does_not_end_session() -> Result<()> {
    let mut script = b"place A 1 3 5\n".to_vec();
    script.extend_from_slice(&[0xff, 0xfe, b' ', 0xc3, b'\n']);
    script.extend_from_slice(b"buy A 1 2\npay\n5\n1\nexit\n");
    let outcome = run_bytes(&VendConfig::default(), &script)?;

    assert!(outcome.output.contains("Error: Unknown command"));
    assert!(outcome.output.contains("Bought 2 x A from channel 1 for 6."));
    assert!(outcome.output.trim_end().ends_with("Goodbye."));
    assert_eq!(outcome.summary.rejected, 1);
    assert_eq!(outcome.summary.payments, 1);
    Ok(())
}

/// Arguments may arrive on later lines.
#[test]
fn test_arguments_across_lines() -> Result<()> {
    let outcome = run("place\nA\n1 3\n5\nbuy A\n1\n2\n0\n5\n1\n")?;

    assert!(outcome.output.contains("Placed 5 x A in channel 1 at 3 each."));
    assert!(outcome.output.contains("Bought 2 x A from channel 1 for 6."));
    assert_eq!(outcome.summary.payments, 1);
    Ok(())
}

#[test]
fn test_undo_after_payment_restores_stock_only() -> Result<()> {
    let outcome = run("place A 1 3 5\nbuy A 1 2\npay\n5\n1\nundo\nexit\n")?;

    assert!(outcome.output.contains("Undid purchase of 2 x A from channel 1."));
    assert!(!outcome.output.contains("Removed"));
    assert_eq!(outcome.machine.inventory().channel_quantity(1), Some(5));
    assert_eq!(outcome.summary.collected, Money::from_units(6));
    Ok(())
}

#[test]
fn test_compact_style_with_currency_symbol() -> Result<()> {
    let config = VendConfig {
        style: DisplayStyle::Compact,
        currency_symbol: "$".to_string(),
        ..VendConfig::default()
    };
    let outcome = run_with(&config, "place A 1 3 5\nbuy A 1 1\npay\n5\nexit\n")?;

    assert!(outcome.output.contains("1: AAAAA $3"));
    assert!(outcome.output.contains("1: AAAA $3"));
    assert!(outcome.output.contains("Change: $2."));
    Ok(())
}

#[test]
fn test_configured_coins_and_limits() -> Result<()> {
    let config = VendConfig {
        max_channels: 2,
        coins: vec![1, 2, 5, 10],
        ..VendConfig::default()
    };
    let outcome = run_with(&config, "place A 3 1 1\nplace A 2 3 5\nbuy A 2 2\npay\n10\nexit\n")?;

    assert!(outcome
        .output
        .contains("Error: Invalid channel 3: must be between 1 and 2"));
    assert!(outcome.output.contains("Insert coins (1, 2, 5, 10)."));
    assert!(outcome.output.contains("Change: 4."));
    Ok(())
}

#[test]
fn test_show_and_history() -> Result<()> {
    let outcome = run("show\nhistory\nplace A 1 3 5\nbuy A 1 2\nhistory\nshow json\nhistory json\npay\n5\n1\nexit\n")?;
    let out = &outcome.output;

    assert!(out.contains("(machine is empty)"));
    assert!(out.contains("Undo history is empty."));
    assert!(out.contains("Undo history (2/3), oldest first:"));
    assert!(out.contains("place 5 x A into channel 1 at 3"));
    assert!(out.contains("purchase 2 x A from channel 1 at 3"));
    assert!(out.contains("\"channel\": 1"));
    assert!(out.contains("\"item\": \"A\""));
    assert!(out.contains("\"kind\": \"purchase\""));
    Ok(())
}

#[test]
fn test_unknown_command_and_help() -> Result<()> {
    let outcome = run("dance now\nhelp\nexit\n")?;

    assert!(outcome
        .output
        .contains("Error: Unknown command 'dance'. Type 'help' for the list of commands."));
    assert!(outcome.output.contains("place <item> <channel> <price> <quantity>"));
    assert_eq!(outcome.summary.commands, 3);
    Ok(())
}

#[test]
fn test_wrong_item_and_occupied_channel() -> Result<()> {
    let outcome = run("place A 1 3 5\nbuy B 1 1\nplace B 1 2 1\nplace A 1 3 46\nexit\n")?;
    let out = &outcome.output;

    assert!(out.contains("Error: Channel 1 does not hold item B"));
    assert!(out.contains("Error: Channel 1 still holds item A, cannot load B"));
    assert!(out.contains("Error: Channel 1 would hold 51 units, capacity is 50"));
    assert_eq!(outcome.summary.rejected, 3);
    assert_eq!(outcome.machine.inventory().channel_quantity(1), Some(5));
    Ok(())
}
