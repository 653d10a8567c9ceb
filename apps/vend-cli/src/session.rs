//! # Session
//!
//! The interactive loop: read a command, apply it to the machine, print the
//! result.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Idle ──buy──► Purchasing ──pay/exit──► Paying ──paid──► Idle          │
//! │    │  ◄─undo (basket empty)─┘                                           │
//! │    │                                                                    │
//! │    └──exit / end of input──► Terminated                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bad input never ends the session: parse failures and refused operations
//! are printed as `Error: ...` and the loop continues. Only I/O failures
//! propagate out of [`Session::run`].

use std::fmt;
use std::io::{BufRead, Write};

use tracing::{debug, info, warn};
use vend_core::{Basket, CoinSet, Money, Operation, PaymentStatus, VendingMachine};

use crate::command::{
    parse_number, BuyArgs, Field, Format, PlaceArgs, Verb, BUY_FIELDS, HELP, PLACE_FIELDS,
};
use crate::error::SessionResult;
use crate::input::TokenReader;
use crate::render::{self, Renderer};

pub const COMMAND_PROMPT: &str = "> ";
pub const COIN_PROMPT: &str = "Coin: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Purchasing,
    Paying,
    Terminated,
}

/// Counters reported when the session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Command keywords read (including unknown ones)
    pub commands: usize,
    /// Inputs or operations that were refused
    pub rejected: usize,
    /// Completed payments
    pub payments: usize,
    /// Sum of paid bills
    pub collected: Money,
    /// Sum of change handed back
    pub change_given: Money,
    /// Bills left unpaid when input ran out
    pub abandoned: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// One customer-and-operator session over a reader and a writer.
pub struct Session<R, W> {
    input: TokenReader<R>,
    output: W,
    machine: VendingMachine,
    basket: Basket,
    coins: CoinSet,
    renderer: Renderer,
    prompts: bool,
    state: SessionState,
    summary: SessionSummary,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        input: R,
        output: W,
        machine: VendingMachine,
        coins: CoinSet,
        renderer: Renderer,
    ) -> Self {
        Session {
            input: TokenReader::new(input),
            output,
            machine,
            basket: Basket::new(),
            coins,
            renderer,
            prompts: true,
            state: SessionState::Idle,
            summary: SessionSummary::default(),
        }
    }

    /// Turns input prompts on or off.
    pub fn with_prompts(mut self, prompts: bool) -> Self {
        self.prompts = prompts;
        self
    }

    /// Runs until `exit` or end of input.
    pub fn run(&mut self) -> SessionResult<SessionSummary> {
        info!(
            channels = self.machine.limits().max_channels,
            capacity = self.machine.limits().max_capacity,
            undo_depth = self.machine.limits().undo_depth,
            "vending session started"
        );
        writeln!(self.output, "Vending machine ready. Type 'help' for commands.")?;

        loop {
            self.prompt(COMMAND_PROMPT)?;
            let Some(token) = self.input.next_token()? else {
                self.end_of_input()?;
                break;
            };
            self.summary.commands += 1;

            let flow = match token.parse::<Verb>() {
                Ok(verb) => {
                    debug!(?verb, line = self.input.lines_read(), "command");
                    self.dispatch(verb)?
                }
                Err(e) => {
                    self.reject_input(&e)?;
                    Flow::Continue
                }
            };
            if flow == Flow::Stop {
                break;
            }
        }

        self.state = SessionState::Terminated;
        writeln!(self.output, "Goodbye.")?;
        self.output.flush()?;
        info!(
            commands = self.summary.commands,
            rejected = self.summary.rejected,
            payments = self.summary.payments,
            collected = %self.summary.collected,
            "vending session ended"
        );
        Ok(self.summary.clone())
    }

    pub fn machine(&self) -> &VendingMachine {
        &self.machine
    }

    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    // =========================================================================
    // Commands
    // =========================================================================

    fn dispatch(&mut self, verb: Verb) -> SessionResult<Flow> {
        match verb {
            Verb::Place => self.place(),
            Verb::Buy => self.buy(),
            Verb::Undo => self.undo(),
            Verb::Pay => self.checkout(),
            Verb::Show => self.show(),
            Verb::History => self.history(),
            Verb::Help => {
                writeln!(self.output, "{HELP}")?;
                Ok(Flow::Continue)
            }
            Verb::Exit => self.exit(),
        }
    }

    fn place(&mut self) -> SessionResult<Flow> {
        let Some(tokens) = self.read_args(&PLACE_FIELDS)? else {
            return self.end_of_input();
        };
        let args = match PlaceArgs::parse(&tokens) {
            Ok(args) => args,
            Err(e) => {
                self.reject_input(&e)?;
                return Ok(Flow::Continue);
            }
        };

        let price = Money::from_units(args.price);
        match self.machine.place(args.item, args.channel, price, args.quantity) {
            Ok(op) => {
                let line = self.renderer.placed(&op);
                writeln!(self.output, "{line}")?;
                self.show_machine()?;
            }
            Err(e) => self.reject(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn buy(&mut self) -> SessionResult<Flow> {
        let Some(tokens) = self.read_args(&BUY_FIELDS)? else {
            return self.end_of_input();
        };
        let args = match BuyArgs::parse(&tokens) {
            Ok(args) => args,
            Err(e) => {
                self.reject_input(&e)?;
                return Ok(Flow::Continue);
            }
        };

        let sale = self.machine.purchase_into(
            &mut self.basket,
            args.item,
            args.channel,
            args.quantity,
        );
        match sale {
            Ok(purchase) => {
                self.state = SessionState::Purchasing;
                let line = self.renderer.purchased(&purchase, self.basket.total());
                writeln!(self.output, "{line}")?;
                self.show_machine()?;
            }
            Err(e) => self.reject(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn undo(&mut self) -> SessionResult<Flow> {
        match self.machine.undo() {
            Ok(op) => {
                let line = self.renderer.undone(&op);
                writeln!(self.output, "{line}")?;

                let refunded = self.basket.reverse(&op);
                if refunded.is_positive() {
                    let total = self.basket.total();
                    writeln!(
                        self.output,
                        "Removed {} from basket. Basket total: {}.",
                        self.renderer.money(refunded),
                        self.renderer.money(total)
                    )?;
                }
                if self.basket.is_empty() && self.state == SessionState::Purchasing {
                    self.state = SessionState::Idle;
                }
                self.show_machine()?;
            }
            Err(e) => self.reject(&e)?,
        }
        Ok(Flow::Continue)
    }

    /// Collects coins for the open basket.
    fn checkout(&mut self) -> SessionResult<Flow> {
        if self.basket.is_empty() {
            writeln!(self.output, "Nothing to pay.")?;
            self.state = SessionState::Idle;
            return Ok(Flow::Continue);
        }

        let lines: Vec<Operation> = self.basket.lines().cloned().collect();
        let mut payment = self.basket.checkout(self.coins.clone());
        self.state = SessionState::Paying;
        if payment.owed().is_zero() {
            writeln!(self.output, "No payment needed.")?;
        } else {
            let accepted = self.renderer.coin_list(self.coins.denominations());
            writeln!(
                self.output,
                "Total due: {}. Insert coins ({}).",
                self.renderer.money(payment.owed()),
                accepted
            )?;
        }

        while !payment.is_complete() {
            self.prompt(COIN_PROMPT)?;
            let Some(token) = self.input.next_token()? else {
                warn!(
                    owed = %payment.owed(),
                    inserted = %payment.inserted(),
                    "input closed during payment"
                );
                writeln!(
                    self.output,
                    "Input closed during payment: {} inserted of {} due.",
                    self.renderer.money(payment.inserted()),
                    self.renderer.money(payment.owed())
                )?;
                self.abandon(&lines, payment.owed())?;
                return Ok(Flow::Stop);
            };

            let coin = match parse_number("coin", &token) {
                Ok(coin) => coin,
                Err(e) => {
                    self.reject(&e)?;
                    continue;
                }
            };

            match payment.insert(coin) {
                Ok(PaymentStatus::Pending { remaining }) => writeln!(
                    self.output,
                    "Inserted {}. Paid {} of {}, {} remaining.",
                    self.renderer.money(Money::from_units(coin)),
                    self.renderer.money(payment.inserted()),
                    self.renderer.money(payment.owed()),
                    self.renderer.money(remaining)
                )?,
                Ok(PaymentStatus::Complete { .. }) => writeln!(
                    self.output,
                    "Inserted {}. Paid {} of {}.",
                    self.renderer.money(Money::from_units(coin)),
                    self.renderer.money(payment.inserted()),
                    self.renderer.money(payment.owed())
                )?,
                Err(e) => self.reject(&e)?,
            }
        }

        let change = payment.change();
        if change.is_positive() {
            writeln!(self.output, "Change: {}.", self.renderer.money(change))?;
        } else if !payment.owed().is_zero() {
            writeln!(self.output, "Exact amount, no change.")?;
        }

        info!(
            owed = %payment.owed(),
            inserted = %payment.inserted(),
            change = %change,
            rejected_coins = payment.rejected_coins(),
            "payment complete"
        );
        self.summary.payments += 1;
        self.summary.collected = self.summary.collected.saturating_add(payment.owed());
        self.summary.change_given = self.summary.change_given.saturating_add(change);
        self.state = SessionState::Idle;
        Ok(Flow::Continue)
    }

    fn show(&mut self) -> SessionResult<Flow> {
        match self.trailing_format() {
            Format::Json => {
                let json = render::machine_json(&self.machine)?;
                writeln!(self.output, "{json}")?;
            }
            Format::Text => self.show_machine()?,
        }
        Ok(Flow::Continue)
    }

    fn history(&mut self) -> SessionResult<Flow> {
        match self.trailing_format() {
            Format::Json => {
                let json = render::history_json(&self.machine)?;
                writeln!(self.output, "{json}")?;
            }
            Format::Text => {
                let log = self.machine.history();
                if log.is_empty() {
                    writeln!(self.output, "Undo history is empty.")?;
                } else {
                    writeln!(
                        self.output,
                        "Undo history ({}/{}), oldest first:",
                        log.len(),
                        log.capacity()
                    )?;
                    for op in log.iter() {
                        writeln!(self.output, "  {}", self.renderer.history_entry(op))?;
                    }
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn exit(&mut self) -> SessionResult<Flow> {
        if !self.basket.is_empty() {
            writeln!(
                self.output,
                "Basket of {} is still open; please pay before leaving.",
                self.renderer.money(self.basket.total())
            )?;
            self.checkout()?;
        }
        Ok(Flow::Stop)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn end_of_input(&mut self) -> SessionResult<Flow> {
        if !self.basket.is_empty() {
            let owed = self.basket.total();
            let lines: Vec<Operation> = self.basket.lines().cloned().collect();
            self.basket = Basket::new();
            writeln!(
                self.output,
                "Input closed; unpaid basket of {} abandoned.",
                self.renderer.money(owed)
            )?;
            self.abandon(&lines, owed)?;
        }
        Ok(Flow::Stop)
    }

    /// Puts the goods of an unpaid bill back into their channels, newest
    /// first.
    fn abandon(&mut self, lines: &[Operation], owed: Money) -> SessionResult<()> {
        warn!(owed = %owed, lines = lines.len(), "unpaid basket abandoned");
        self.summary.abandoned = self.summary.abandoned.saturating_add(owed);

        let mut returned = 0u32;
        for op in lines.iter().rev() {
            match self.machine.cancel(op) {
                Ok(()) => returned = returned.saturating_add(op.quantity()),
                Err(e) => warn!(
                    seq = op.seq(),
                    channel = %op.channel(),
                    quantity = op.quantity(),
                    error = %e,
                    "unpaid goods left out of stock"
                ),
            }
        }
        if returned > 0 {
            writeln!(self.output, "Returned {returned} units to stock.")?;
        }
        Ok(())
    }

    /// Reads one token per field, prompting only when the line has run out.
    fn read_args(&mut self, fields: &[Field]) -> SessionResult<Option<Vec<String>>> {
        let mut tokens = Vec::with_capacity(fields.len());
        for field in fields {
            self.prompt(field.prompt)?;
            match self.input.next_token()? {
                Some(token) => {
                    debug!(field = field.name, %token, "argument");
                    tokens.push(token);
                }
                None => return Ok(None),
            }
        }
        Ok(Some(tokens))
    }

    fn trailing_format(&mut self) -> Format {
        match Format::from_token(self.input.peek()) {
            Some(format) => {
                self.input.take_pending();
                format
            }
            None => Format::Text,
        }
    }

    fn show_machine(&mut self) -> SessionResult<()> {
        for row in self.renderer.machine(&self.machine) {
            writeln!(self.output, "{row}")?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> SessionResult<()> {
        if self.prompts && !self.input.has_pending() {
            write!(self.output, "{text}")?;
            self.output.flush()?;
        }
        Ok(())
    }

    fn reject(&mut self, err: &dyn fmt::Display) -> SessionResult<()> {
        self.summary.rejected += 1;
        writeln!(self.output, "Error: {err}")?;
        Ok(())
    }

    /// Rejects malformed input and drops the rest of its line.
    fn reject_input(&mut self, err: &dyn fmt::Display) -> SessionResult<()> {
        let dropped = self.input.discard_line();
        if dropped > 0 {
            debug!(dropped, "discarded rest of line");
        }
        self.reject(err)
    }
}
