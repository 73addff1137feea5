#![forbid(unsafe_code)]

//! Fixed-capacity character buffer.
//!
//! Every console buffer (output lines, the input line, history entries) has
//! a hard upper bound on its length. [`BoundedText`] reserves that storage
//! once and rejects any write that would exceed it, leaving the contents
//! untouched. Callers never compute offsets against a terminator.

use std::fmt;

use crate::error::{CapacityError, ConsoleError};

/// A character buffer with a fixed logical capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundedText {
    chars: Vec<char>,
    capacity: usize,
}

impl BoundedText {
    /// Create an empty buffer that can hold `capacity` characters.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            chars: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Create an empty buffer, reporting allocation failure instead of aborting.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, ConsoleError> {
        let mut chars = Vec::new();
        chars
            .try_reserve_exact(capacity)
            .map_err(ConsoleError::exhausted("text buffer", capacity))?;
        Ok(Self { chars, capacity })
    }

    /// Build a buffer from `text`, keeping at most `capacity` characters.
    #[must_use]
    pub fn from_str_truncated(text: &str, capacity: usize) -> Self {
        let mut out = Self::new(capacity);
        out.chars.extend(text.chars().take(capacity));
        out
    }

    /// Copy this text into a fresh allocation of `capacity`, truncating the tail.
    pub fn try_copy_truncated(&self, capacity: usize) -> Result<Self, ConsoleError> {
        let mut out = Self::try_with_capacity(capacity)?;
        let keep = self.chars.len().min(capacity);
        out.chars.extend_from_slice(&self.chars[..keep]);
        Ok(out)
    }

    /// Number of stored characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether no characters are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Maximum number of characters this buffer accepts.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether another character would be rejected.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.chars.len() >= self.capacity
    }

    /// The stored characters.
    #[must_use]
    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }

    /// Bytes held by the backing allocation.
    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        self.chars.capacity() * std::mem::size_of::<char>()
    }

    fn check_room(&self, extra: usize) -> Result<(), CapacityError> {
        let requested = self.chars.len().saturating_add(extra);
        if requested > self.capacity {
            Err(CapacityError {
                capacity: self.capacity,
                requested,
            })
        } else {
            Ok(())
        }
    }

    /// Append a character.
    pub fn push(&mut self, ch: char) -> Result<(), CapacityError> {
        self.check_room(1)?;
        self.chars.push(ch);
        Ok(())
    }

    /// Insert a character at `index`, shifting the tail right.
    ///
    /// An `index` past the end appends.
    pub fn insert(&mut self, index: usize, ch: char) -> Result<(), CapacityError> {
        self.check_room(1)?;
        let index = index.min(self.chars.len());
        self.chars.insert(index, ch);
        Ok(())
    }

    /// Insert `text` at `index`, shifting the tail right. All or nothing.
    pub fn insert_slice(&mut self, index: usize, text: &[char]) -> Result<(), CapacityError> {
        self.check_room(text.len())?;
        let index = index.min(self.chars.len());
        self.chars.splice(index..index, text.iter().copied());
        Ok(())
    }

    /// Overwrite the character at `index`; at the end this appends.
    pub fn replace_at(&mut self, index: usize, ch: char) -> Result<(), CapacityError> {
        match self.chars.get_mut(index) {
            Some(slot) => {
                *slot = ch;
                Ok(())
            }
            None => self.push(ch),
        }
    }

    /// Remove the character at `index`, shifting the tail left.
    pub fn remove(&mut self, index: usize) -> Option<char> {
        (index < self.chars.len()).then(|| self.chars.remove(index))
    }

    /// Replace the contents with `text`, truncated to capacity.
    pub fn assign(&mut self, text: &[char]) {
        self.chars.clear();
        let keep = text.len().min(self.capacity);
        self.chars.extend_from_slice(&text[..keep]);
    }

    /// Remove every character. The allocation is kept.
    pub fn clear(&mut self) {
        self.chars.clear();
    }
}

impl fmt::Display for BoundedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write as _;
        for &ch in &self.chars {
            f.write_char(ch)?;
        }
        Ok(())
    }
}

impl PartialEq<str> for BoundedText {
    fn eq(&self, other: &str) -> bool {
        self.chars.iter().copied().eq(other.chars())
    }
}

impl PartialEq<&str> for BoundedText {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}
