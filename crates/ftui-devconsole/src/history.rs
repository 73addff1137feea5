#![forbid(unsafe_code)]

//! Bounded command history.
//!
//! Entries are kept oldest to newest with no two equal. Submitting a command
//! that is already present does not reorder anything: it only moves the
//! browse cursor onto the existing entry, so the next recall returns it.
//! When the ring is full the oldest entry is evicted.

use crate::bounded::BoundedText;
use crate::error::ConsoleError;

/// Fixed-capacity, de-duplicated command history with a browse cursor.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: Vec<BoundedText>,
    capacity: usize,
    entry_chars: usize,
    /// Entry the user is positioned at; `None` when not browsing.
    cursor: Option<usize>,
    /// The entry under the cursor has already been handed out by a recall.
    recalled: bool,
}

impl HistoryRing {
    /// Allocate a ring of `capacity` entries, each at most `entry_chars` long.
    pub fn try_new(capacity: usize, entry_chars: usize) -> Result<Self, ConsoleError> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(ConsoleError::exhausted("history", capacity))?;
        Ok(Self {
            entries,
            capacity,
            entry_chars,
            cursor: None,
            recalled: false,
        })
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum characters kept per entry.
    #[must_use]
    pub fn entry_chars(&self) -> usize {
        self.entry_chars
    }

    /// Entries from oldest to newest.
    #[must_use]
    pub fn entries(&self) -> &[BoundedText] {
        &self.entries
    }

    /// Index of the entry the browse cursor is on.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Record a submitted command.
    ///
    /// Returns `true` if a new entry was stored. Blank commands are ignored;
    /// a command equal to an existing entry only moves the cursor onto it.
    pub fn submit(&mut self, command: &str) -> bool {
        if command.trim().is_empty() || self.capacity == 0 {
            return false;
        }
        let entry = BoundedText::from_str_truncated(command, self.entry_chars);
        if let Some(existing) = self.entries.iter().position(|e| *e == entry) {
            self.cursor = Some(existing);
            self.recalled = false;
            return false;
        }
        if self.entries.len() >= self.capacity {
            self.entries.remove(0);
            crate::trace!(capacity = self.capacity, "history full, evicted oldest entry");
        }
        self.entries.push(entry);
        self.cursor = Some(self.entries.len() - 1);
        self.recalled = false;
        true
    }

    /// Step back to an older entry, wrapping from the oldest to the newest.
    pub fn previous(&mut self) -> Option<&BoundedText> {
        let newest = self.entries.len().checked_sub(1)?;
        let index = match self.cursor {
            Some(cursor) if !self.recalled => cursor,
            Some(cursor) if cursor > 0 => cursor - 1,
            _ => newest,
        };
        self.recall(index)
    }

    /// Step forward to a newer entry, wrapping from the newest to the oldest.
    pub fn next(&mut self) -> Option<&BoundedText> {
        let newest = self.entries.len().checked_sub(1)?;
        let index = match self.cursor {
            Some(cursor) if !self.recalled => cursor,
            Some(cursor) if cursor < newest => cursor + 1,
            _ => 0,
        };
        self.recall(index)
    }

    fn recall(&mut self, index: usize) -> Option<&BoundedText> {
        self.cursor = Some(index);
        self.recalled = true;
        self.entries.get(index)
    }

    /// Stop browsing.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
        self.recalled = false;
    }

    /// Copy the ring with every entry cut to `entry_chars`.
    ///
    /// Capacity is unchanged. Entries that become equal after truncation
    /// collapse into the newer one, so the no-duplicates rule still holds.
    pub fn try_retruncated(&self, entry_chars: usize) -> Result<Self, ConsoleError> {
        let mut entries: Vec<BoundedText> = Vec::new();
        entries
            .try_reserve_exact(self.capacity)
            .map_err(ConsoleError::exhausted("history", self.capacity))?;
        for entry in &self.entries {
            let cut = entry.try_copy_truncated(entry_chars)?;
            if let Some(older) = entries.iter().position(|e| *e == cut) {
                entries.remove(older);
            }
            entries.push(cut);
        }
        let (cursor, recalled) = if entries.len() == self.entries.len() {
            (self.cursor, self.recalled)
        } else {
            (None, false)
        };
        Ok(Self {
            entries,
            capacity: self.capacity,
            entry_chars,
            cursor,
            recalled,
        })
    }

    /// Bytes held by the entry table and every entry.
    #[must_use]
    pub fn footprint_bytes(&self) -> usize {
        self.entries.capacity() * std::mem::size_of::<BoundedText>()
            + self
                .entries
                .iter()
                .map(BoundedText::allocated_bytes)
                .sum::<usize>()
    }
}
