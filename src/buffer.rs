//! Append-only text buffer used by the lexer to accumulate tokens.
//!
//! Three of these live for the duration of a parse: the current key, the
//! current value, and the run of unquoted whitespace whose significance is
//! not yet known. They are cleared between fields but never shrunk, so a
//! long configuration reuses the same three allocations.

use crate::error::VconfError;

/// Capacity of the first allocation. Most keys and values fit.
const INITIAL_CAPACITY: usize = 64;

#[derive(Debug, Default)]
pub(crate) struct TokenBuffer {
    buf: String,
}

impl TokenBuffer {
    /// Append one character. NUL means "nothing to append" and is ignored.
    pub fn push(&mut self, ch: char) -> Result<(), VconfError> {
        if ch == '\0' {
            return Ok(());
        }
        self.grow_for(ch.len_utf8())?;
        self.buf.push(ch);
        Ok(())
    }

    /// Move the whole content of `other` onto the end of `self`, leaving
    /// `other` empty (with its capacity intact).
    pub fn drain_from(&mut self, other: &mut TokenBuffer) -> Result<(), VconfError> {
        if other.is_empty() {
            return Ok(());
        }
        self.grow_for(other.buf.len())?;
        self.buf.push_str(&other.buf);
        other.clear();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Double the capacity until `additional` more bytes fit.
    fn grow_for(&mut self, additional: usize) -> Result<(), VconfError> {
        let needed = self.buf.len().saturating_add(additional);
        if needed <= self.buf.capacity() {
            return Ok(());
        }
        let mut cap = self.buf.capacity().max(INITIAL_CAPACITY);
        while cap < needed {
            cap = cap.saturating_mul(2);
        }
        self.buf.try_reserve_exact(cap - self.buf.len())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_push_allocates_initial_capacity() {
        let mut buf = TokenBuffer::default();
        assert_eq!(buf.capacity(), 0);
        buf.push('a').unwrap();
        assert!(buf.capacity() >= INITIAL_CAPACITY);
        assert_eq!(buf.as_str(), "a");
    }

    #[test]
    fn nul_is_ignored() {
        let mut buf = TokenBuffer::default();
        buf.push('\0').unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn grows_by_doubling() {
        let mut buf = TokenBuffer::default();
        for _ in 0..INITIAL_CAPACITY {
            buf.push('x').unwrap();
        }
        let before = buf.capacity();
        buf.push('y').unwrap();
        assert!(buf.capacity() >= before * 2);
        assert_eq!(buf.as_str().len(), INITIAL_CAPACITY + 1);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = TokenBuffer::default();
        for ch in "hello world".chars() {
            buf.push(ch).unwrap();
        }
        let cap = buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn multibyte_characters() {
        let mut buf = TokenBuffer::default();
        for ch in "héllo→".chars() {
            buf.push(ch).unwrap();
        }
        assert_eq!(buf.as_str(), "héllo→");
    }

    #[test]
    fn drain_moves_and_empties_source() {
        let mut value = TokenBuffer::default();
        let mut spaces = TokenBuffer::default();
        value.push('a').unwrap();
        spaces.push(' ').unwrap();
        spaces.push('\t').unwrap();
        value.drain_from(&mut spaces).unwrap();
        value.push('b').unwrap();
        assert_eq!(value.as_str(), "a \tb");
        assert!(spaces.is_empty());
    }
}
