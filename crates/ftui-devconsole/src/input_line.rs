#![forbid(unsafe_code)]

//! Single-line command editor.
//!
//! The buffer is twice as wide as the console (`input_columns = 2 * columns`)
//! and holds at most `input_columns - 1` characters. Two numbers place the
//! caret: `caret_pos` is the on-screen column and `scroll_offset` is how far
//! the window is scrolled, so the logical index is their sum. The caret never
//! goes past column `columns - 3`; the reserved margin holds the prompt glyph
//! and once the caret reaches it, further movement scrolls the window.

use crate::bounded::BoundedText;
use crate::error::ConsoleError;

/// Columns reserved at the right edge for the prompt.
pub(crate) const PROMPT_MARGIN: usize = 3;

/// Editable input line with caret and horizontal scroll.
#[derive(Debug, Clone)]
pub struct InputLine {
    pub(crate) content: BoundedText,
    pub(crate) columns: usize,
    pub(crate) input_columns: usize,
    pub(crate) caret_pos: usize,
    pub(crate) scroll_offset: usize,
    pub(crate) replace_mode: bool,
    dirty: bool,
}

impl InputLine {
    /// Allocate an input line for a console `columns` wide.
    pub fn try_new(columns: usize) -> Result<Self, ConsoleError> {
        if columns == 0 {
            return Err(ConsoleError::InvalidGeometry { columns, lines: 1 });
        }
        let input_columns = columns
            .checked_mul(2)
            .ok_or(ConsoleError::ResourceExhausted {
                what: "input line",
                requested: columns,
            })?;
        Ok(Self {
            content: BoundedText::try_with_capacity(input_columns - 1)?,
            columns,
            input_columns,
            caret_pos: 0,
            scroll_offset: 0,
            replace_mode: false,
            dirty: true,
        })
    }

    /// Console width this line was sized for.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Buffer width (`2 * columns`).
    #[must_use]
    pub fn input_columns(&self) -> usize {
        self.input_columns
    }

    /// The edited text.
    #[must_use]
    pub fn text(&self) -> &BoundedText {
        &self.content
    }

    /// On-screen caret column.
    #[must_use]
    pub fn caret_pos(&self) -> usize {
        self.caret_pos
    }

    /// Horizontal scroll of the visible window.
    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Index into the text the caret sits at.
    #[must_use]
    pub fn logical_position(&self) -> usize {
        self.caret_pos + self.scroll_offset
    }

    /// Whether typed characters overwrite instead of insert.
    #[must_use]
    pub fn replace_mode(&self) -> bool {
        self.replace_mode
    }

    /// Rightmost column the caret may occupy.
    #[must_use]
    pub fn caret_limit(&self) -> usize {
        self.columns.saturating_sub(PROMPT_MARGIN)
    }

    /// The slice of text currently inside the window.
    #[must_use]
    pub fn visible_text(&self) -> &[char] {
        let width = self.columns.saturating_sub(PROMPT_MARGIN - 1).max(1);
        let chars = self.content.as_slice();
        let start = self.scroll_offset.min(chars.len());
        let end = start.saturating_add(width).min(chars.len());
        &chars[start..end]
    }

    /// Type a character at the caret.
    ///
    /// Returns `false` when the buffer is full; nothing is written then.
    pub fn insert(&mut self, ch: char) -> bool {
        let pos = self.logical_position();
        if pos + 1 >= self.input_columns {
            crate::trace!(pos, "input line full, insert rejected");
            return false;
        }
        let written = if self.replace_mode {
            self.content.replace_at(pos, ch)
        } else {
            self.content.insert(pos, ch)
        };
        if written.is_err() {
            crate::trace!(pos, "input line full, insert rejected");
            return false;
        }
        self.advance_caret();
        self.dirty = true;
        true
    }

    /// Delete the character before the caret.
    pub fn backspace(&mut self) -> bool {
        let pos = self.logical_position();
        if pos == 0 {
            return false;
        }
        if self.scroll_offset > 0 {
            self.scroll_offset -= 1;
        } else {
            self.caret_pos -= 1;
        }
        self.content.remove(pos - 1);
        self.dirty = true;
        true
    }

    /// Delete the character under the caret. The caret stays put.
    pub fn delete(&mut self) -> bool {
        let removed = self.content.remove(self.logical_position()).is_some();
        self.dirty |= removed;
        removed
    }

    /// Move the caret one character left.
    pub fn move_left(&mut self) -> bool {
        if self.caret_pos > 0 {
            self.caret_pos -= 1;
        } else if self.scroll_offset > 0 {
            self.scroll_offset -= 1;
        } else {
            return false;
        }
        self.dirty = true;
        true
    }

    /// Move the caret one character right, at most one past the last character.
    pub fn move_right(&mut self) -> bool {
        let pos = self.logical_position();
        if pos >= self.content.len() || pos + 1 >= self.input_columns {
            return false;
        }
        self.advance_caret();
        self.dirty = true;
        true
    }

    /// Move the caret to the start of the line.
    pub fn move_home(&mut self) -> bool {
        if self.logical_position() == 0 {
            return false;
        }
        self.caret_pos = 0;
        self.scroll_offset = 0;
        self.dirty = true;
        true
    }

    /// Move the caret just past the last character.
    pub fn move_end(&mut self) -> bool {
        let end = self.content.len();
        if self.logical_position() == end {
            return false;
        }
        self.place_caret(end);
        self.dirty = true;
        true
    }

    /// Splice pasted text in at the caret.
    ///
    /// Line breaks and other control characters are dropped first. If the
    /// result would not fit, the whole paste is rejected.
    pub fn paste_insert(&mut self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().filter(|ch| !ch.is_control()).collect();
        if chars.is_empty() {
            return false;
        }
        let pos = self.logical_position();
        if self.content.insert_slice(pos, &chars).is_err() {
            crate::trace!(len = chars.len(), "paste does not fit, rejected");
            return false;
        }
        self.reveal(pos + chars.len());
        self.dirty = true;
        true
    }

    /// Flip between insert and replace mode.
    pub fn toggle_replace_mode(&mut self) {
        self.replace_mode = !self.replace_mode;
        self.dirty = true;
    }

    /// Replace the whole text (history recall, completion) and put the caret at the end.
    pub fn set_text(&mut self, text: &[char]) {
        self.content.assign(text);
        self.place_caret(self.content.len());
        self.dirty = true;
    }

    /// Empty the line and home the caret. Replace mode is kept.
    pub fn clear(&mut self) {
        self.content.clear();
        self.caret_pos = 0;
        self.scroll_offset = 0;
        self.dirty = true;
    }

    /// Whether anything changed since the last [`take_dirty`](Self::take_dirty).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Bytes held by the text allocation.
    #[must_use]
    pub fn footprint_bytes(&self) -> usize {
        self.content.allocated_bytes()
    }

    fn advance_caret(&mut self) {
        if self.caret_pos >= self.caret_limit() {
            self.scroll_offset += 1;
        } else {
            self.caret_pos += 1;
        }
    }

    /// Put the caret at `logical`, as far right as the margin allows.
    pub(crate) fn place_caret(&mut self, logical: usize) {
        self.caret_pos = logical.min(self.caret_limit());
        self.scroll_offset = logical - self.caret_pos;
    }

    /// Put the caret at `logical`, scrolling only if it left the window.
    fn reveal(&mut self, logical: usize) {
        if logical < self.scroll_offset {
            self.scroll_offset = logical;
            self.caret_pos = 0;
        } else if logical - self.scroll_offset <= self.caret_limit() {
            self.caret_pos = logical - self.scroll_offset;
        } else {
            self.place_caret(logical);
        }
    }
}
