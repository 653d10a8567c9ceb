//! # Token Reader
//!
//! Whitespace-separated tokens pulled from a line-oriented reader.
//!
//! Arguments may follow a command on the same line or arrive on later lines,
//! so the session asks for one token at a time and only prompts when the
//! current line has run out.
//!
//! ```text
//! "place A 1"  ──►  [place] [A] [1]     pending after "place": 2
//! "3 5"        ──►  [3] [5]             read when price is needed
//! ```

use std::collections::VecDeque;
use std::io::{self, BufRead};

/// Buffered token source over any `BufRead`.
#[derive(Debug)]
pub struct TokenReader<R> {
    reader: R,
    pending: VecDeque<String>,
    lines_read: usize,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        TokenReader {
            reader,
            pending: VecDeque::new(),
            lines_read: 0,
        }
    }

    /// Next token, reading more lines as needed. `None` at end of input.
    ///
    /// Bytes that are not valid UTF-8 become `U+FFFD`, so a garbled line
    /// yields tokens that fail to parse instead of an I/O error.
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }

            line.clear();
            if self.reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }
            self.lines_read += 1;
            self.pending.extend(
                String::from_utf8_lossy(&line)
                    .split_whitespace()
                    .map(str::to_owned),
            );
        }
    }

    /// Next token on the current line without consuming it.
    pub fn peek(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    /// Consumes the next token of the current line, never reading further.
    pub fn take_pending(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    /// True when the current line still has unread tokens.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drops whatever is left on the current line, returning how many tokens
    /// were thrown away.
    pub fn discard_line(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }
}
