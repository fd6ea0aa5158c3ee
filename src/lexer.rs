//! Character-driven state machine that turns configuration text into fields.
//!
//! The input is consumed one character at a time, followed by a single
//! end-of-input step (`None`) that runs through the same dispatch, so the
//! last field of a file without a trailing newline is finalized by the same
//! code path as every other field.
//!
//! # States
//!
//! - `InKey` - accumulating a key, or skipping blank lines and comment lines
//!   before one starts.
//! - `AfterKey` - whitespace followed the key; only blanks and a separator
//!   may come next. End of input here drops the key.
//! - `InValue` - accumulating an unquoted value.
//! - `InQuote` / `InSingleQuote` - inside `"..."` / `'...'`.
//! - `AfterSlash` - the previous character was a backslash.
//! - `InComment` - discarding until end of line.
//!
//! Quotes and escapes nest (`"a\"b"`), so the machine keeps a small stack:
//! value, quote, escape. Finishing an escape pops back to whatever was below
//! it.
//!
//! # Whitespace
//!
//! Leading blanks of an unquoted value are dropped. Later blanks are parked in
//! a separate buffer and only committed to the value when another real
//! character (or a quote or escape) follows, so trailing blanks vanish while
//! internal ones survive. Blanks inside quotes, and escaped blanks, are
//! always kept.

use crate::buffer::TokenBuffer;
use crate::config::Field;
use crate::error::{SyntaxErrorKind, VconfError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InKey,
    AfterKey,
    InValue,
    InQuote,
    InSingleQuote,
    AfterSlash,
    InComment,
}

/// Value, quote, escape.
const MAX_DEPTH: usize = 3;

#[derive(Debug)]
struct StateStack {
    states: [State; MAX_DEPTH],
    top: usize,
}

impl StateStack {
    fn new() -> Self {
        Self {
            states: [State::InKey; MAX_DEPTH],
            top: 0,
        }
    }

    fn current(&self) -> State {
        self.states[self.top]
    }

    /// Replace the current state without changing depth.
    fn set(&mut self, state: State) {
        self.states[self.top] = state;
    }

    fn push(&mut self, state: State) {
        debug_assert!(self.top + 1 < MAX_DEPTH, "state stack overflow");
        self.top += 1;
        self.states[self.top] = state;
    }

    fn pop(&mut self) {
        self.top = self.top.saturating_sub(1);
    }

    /// Drop back to a single top-level state.
    fn reset(&mut self, state: State) {
        self.top = 0;
        self.states[0] = state;
    }
}

fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

fn is_eol(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Parse configuration text into fields, in document order.
///
/// An embedded NUL ends the input.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Field>, VconfError> {
    let text = text.find('\0').map_or(text, |end| &text[..end]);
    let mut lexer = Lexer::new();
    let mut chars = text.chars().peekable();
    loop {
        let ch = chars.next();
        let next = chars.peek().copied();
        lexer.step(ch, next)?;
        if ch.is_none() {
            break;
        }
    }
    Ok(lexer.fields)
}

#[derive(Debug)]
struct Lexer {
    stack: StateStack,
    key: TokenBuffer,
    value: TokenBuffer,
    spaces: TokenBuffer,
    fields: Vec<Field>,
    line: usize,
    column: usize,
    key_line: usize,
}

impl Lexer {
    fn new() -> Self {
        Self {
            stack: StateStack::new(),
            key: TokenBuffer::default(),
            value: TokenBuffer::default(),
            spaces: TokenBuffer::default(),
            fields: Vec::new(),
            line: 1,
            column: 1,
            key_line: 1,
        }
    }

    /// Feed one character (`None` = end of input). `next` is the character
    /// after it, needed to pair an escaped `\r` with its `\n`.
    fn step(&mut self, ch: Option<char>, next: Option<char>) -> Result<(), VconfError> {
        match self.stack.current() {
            State::InKey => self.in_key(ch)?,
            State::AfterKey => self.after_key(ch)?,
            State::InValue => self.in_value(ch)?,
            State::InQuote => self.in_quote(ch, '"', SyntaxErrorKind::UnterminatedQuote)?,
            State::InSingleQuote => {
                self.in_quote(ch, '\'', SyntaxErrorKind::UnterminatedSingleQuote)?
            }
            State::AfterSlash => self.after_slash(ch, next)?,
            State::InComment => self.in_comment(ch),
        }
        self.advance(ch, next);
        Ok(())
    }

    fn advance(&mut self, ch: Option<char>, next: Option<char>) {
        match ch {
            Some('\n') => self.new_line(),
            Some('\r') if next != Some('\n') => self.new_line(),
            Some(_) => self.column += 1,
            None => {}
        }
    }

    fn new_line(&mut self) {
        self.line += 1;
        self.column = 1;
    }

    fn error(&self, kind: SyntaxErrorKind) -> VconfError {
        VconfError::Syntax {
            kind,
            line: self.line,
            column: self.column,
        }
    }

    fn in_key(&mut self, ch: Option<char>) -> Result<(), VconfError> {
        match ch {
            None | Some('\r' | '\n' | '#') => {
                if !self.key.is_empty() {
                    return Err(self.error(SyntaxErrorKind::KeyWithoutValue));
                }
                if ch == Some('#') {
                    self.stack.set(State::InComment);
                }
            }
            Some(c) if is_blank(c) => {
                if !self.key.is_empty() {
                    self.stack.set(State::AfterKey);
                }
            }
            Some(':' | '=') => {
                if self.key.is_empty() {
                    return Err(self.error(SyntaxErrorKind::ValueWithoutKey));
                }
                self.stack.set(State::InValue);
            }
            Some(c) => {
                if self.key.is_empty() {
                    self.key_line = self.line;
                }
                self.key.push(c)?;
            }
        }
        Ok(())
    }

    fn after_key(&mut self, ch: Option<char>) -> Result<(), VconfError> {
        match ch {
            None => {}
            Some(c) if is_blank(c) => {}
            Some(':' | '=') => self.stack.set(State::InValue),
            _ => return Err(self.error(SyntaxErrorKind::MissingSeparator)),
        }
        Ok(())
    }

    fn in_value(&mut self, ch: Option<char>) -> Result<(), VconfError> {
        match ch {
            None | Some('\r' | '\n' | '#') => {
                self.finish_field()?;
                let next = if ch == Some('#') {
                    State::InComment
                } else {
                    State::InKey
                };
                self.stack.set(next);
            }
            Some('\\') => {
                self.value.drain_from(&mut self.spaces)?;
                self.stack.push(State::AfterSlash);
            }
            Some('"') => {
                self.value.drain_from(&mut self.spaces)?;
                self.stack.push(State::InQuote);
            }
            Some('\'') => {
                self.value.drain_from(&mut self.spaces)?;
                self.stack.push(State::InSingleQuote);
            }
            Some(c) if is_blank(c) => {
                if !self.value.is_empty() {
                    self.spaces.push(c)?;
                }
            }
            Some(c) => {
                self.value.drain_from(&mut self.spaces)?;
                self.value.push(c)?;
            }
        }
        Ok(())
    }

    fn in_quote(
        &mut self,
        ch: Option<char>,
        close: char,
        unterminated: SyntaxErrorKind,
    ) -> Result<(), VconfError> {
        match ch {
            None => return Err(self.error(unterminated)),
            Some('\\') => self.stack.push(State::AfterSlash),
            Some(c) if c == close => self.stack.pop(),
            Some(c) => self.value.push(c)?,
        }
        Ok(())
    }

    fn after_slash(&mut self, ch: Option<char>, next: Option<char>) -> Result<(), VconfError> {
        match ch {
            // A trailing backslash terminates the last value.
            None => {
                self.finish_field()?;
                self.stack.reset(State::InKey);
            }
            // Wait for the '\n' so an escaped CRLF yields one newline.
            Some('\r') if next == Some('\n') => {}
            Some(c) => {
                self.stack.pop();
                if self.stack.current() == State::InSingleQuote && c != '\'' {
                    self.value.push('\\')?;
                }
                // A bare '\r' stands for a line break.
                self.value.push(if c == '\r' { '\n' } else { c })?;
            }
        }
        Ok(())
    }

    fn in_comment(&mut self, ch: Option<char>) {
        if ch.is_some_and(is_eol) {
            self.stack.set(State::InKey);
        }
    }

    fn finish_field(&mut self) -> Result<(), VconfError> {
        self.fields.try_reserve(1)?;
        self.fields.push(Field::new(
            self.key.as_str(),
            self.value.as_str(),
            self.key_line,
        ));
        self.key.clear();
        self.value.clear();
        self.spaces.clear();
        Ok(())
    }
}
