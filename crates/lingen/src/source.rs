//! Line-oriented input with one-line lookahead.
//!
//! Every load phase in this crate (vocabulary, rules, meaning trees) reads a
//! flat line format. `LineSource` wraps any `BufRead` with the shared
//! plumbing: a one-line peek buffer, optional blank-line skipping, optional
//! tab stripping, and 1-based physical line numbers for diagnostics.

use std::io::{self, BufRead};

/// A line reader with one-line lookahead.
///
/// Blank lines can be skipped transparently (they still count towards the
/// line number), and tabs can be stripped for formats where indentation is
/// noise. The meaning-representation parser keeps tabs: indentation is its
/// structure.
pub struct LineSource<R> {
    reader: R,
    pending: Option<String>,
    pending_line: u64,
    line: u64,
    cursor: u64,
    skip_blank: bool,
    strip_tabs: bool,
}

impl<R: BufRead> LineSource<R> {
    /// Creates a source and primes the lookahead buffer.
    pub fn new(reader: R, skip_blank: bool, strip_tabs: bool) -> io::Result<Self> {
        let mut source = Self {
            reader,
            pending: None,
            pending_line: 0,
            line: 0,
            cursor: 0,
            skip_blank,
            strip_tabs,
        };
        source.advance()?;
        Ok(source)
    }

    fn advance(&mut self) -> io::Result<()> {
        loop {
            let mut buf = String::new();
            if self.reader.read_line(&mut buf)? == 0 {
                self.pending = None;
                return Ok(());
            }
            self.cursor += 1;
            while buf.ends_with('\n') || buf.ends_with('\r') {
                buf.pop();
            }
            if self.strip_tabs {
                buf.retain(|c| c != '\t');
            }
            if self.skip_blank && buf.is_empty() {
                continue;
            }
            self.pending = Some(buf);
            self.pending_line = self.cursor;
            return Ok(());
        }
    }

    /// The next line, without consuming it. `None` at end of input.
    pub fn peek(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Consumes and returns the next line, or `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let current = self.pending.take();
        if current.is_some() {
            self.line = self.pending_line;
            self.advance()?;
        }
        Ok(current)
    }

    /// Physical line number (1-based) of the line most recently returned by
    /// [`read_line`](Self::read_line). Zero before the first read.
    pub fn line_number(&self) -> u64 {
        self.line
    }
}

/// Splits a line at the first space: `"field en name"` becomes
/// `("field", "en name")`. A line with no space yields an empty second part.
pub(crate) fn split_first_space(line: &str) -> (&str, &str) {
    match line.split_once(' ') {
        Some((head, rest)) => (head, rest),
        None => (line, ""),
    }
}
