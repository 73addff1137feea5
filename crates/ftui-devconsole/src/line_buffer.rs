#![forbid(unsafe_code)]

//! Scrollback of console output lines.
//!
//! The buffer always holds exactly `n_lines` slots, oldest at index 0 and
//! newest at `n_lines - 1`. Starting a new line rotates the deque: the oldest
//! slot is popped from the front, emptied, and pushed to the back, so a
//! scroll never copies line contents.

use std::collections::VecDeque;
use std::ops::Range;

use crate::bounded::BoundedText;
use crate::error::ConsoleError;

/// Color tag carried by every output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineColor {
    /// Regular output.
    #[default]
    Message,
    /// Informational highlight.
    Notice,
    /// Something looks wrong.
    Warning,
    /// Something failed.
    Error,
    /// Something succeeded.
    Success,
}

/// Message type accepted by [`DevConsole::print`](crate::DevConsole::print).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Message,
    Notice,
    Warning,
    Error,
    Success,
    /// Wipe the scrollback instead of printing.
    Clear,
}

impl MessageKind {
    /// The line color this message prints with, or `None` for [`MessageKind::Clear`].
    #[must_use]
    pub const fn color(self) -> Option<LineColor> {
        match self {
            Self::Message => Some(LineColor::Message),
            Self::Notice => Some(LineColor::Notice),
            Self::Warning => Some(LineColor::Warning),
            Self::Error => Some(LineColor::Error),
            Self::Success => Some(LineColor::Success),
            Self::Clear => None,
        }
    }
}

/// A single line of console output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub(crate) text: BoundedText,
    pub(crate) color: LineColor,
}

impl OutputLine {
    pub(crate) fn try_new(columns: usize) -> Result<Self, ConsoleError> {
        Ok(Self {
            text: BoundedText::try_with_capacity(columns)?,
            color: LineColor::default(),
        })
    }

    /// Line contents; never longer than the buffer's column count.
    #[must_use]
    pub fn text(&self) -> &BoundedText {
        &self.text
    }

    /// Line color tag.
    #[must_use]
    pub fn color(&self) -> LineColor {
        self.color
    }

    fn reset(&mut self) {
        self.text.clear();
        self.color = LineColor::default();
    }
}

/// Fixed-size scrollback with character wrapping.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    pub(crate) lines: VecDeque<OutputLine>,
    columns: usize,
    /// The newest line is a partial line that a continuation may extend.
    pub(crate) line_open: bool,
    /// Lines the view is paged back from the newest line.
    view_offset: usize,
    dirty: bool,
}

impl LineBuffer {
    /// Allocate `n_lines` empty lines of `columns` characters each.
    pub fn try_new(columns: usize, n_lines: usize) -> Result<Self, ConsoleError> {
        if columns == 0 || n_lines == 0 {
            return Err(ConsoleError::InvalidGeometry {
                columns,
                lines: n_lines,
            });
        }
        let mut lines = VecDeque::new();
        lines
            .try_reserve_exact(n_lines)
            .map_err(ConsoleError::exhausted("scrollback", n_lines))?;
        for _ in 0..n_lines {
            lines.push_back(OutputLine::try_new(columns)?);
        }
        Ok(Self {
            lines,
            columns,
            line_open: false,
            view_offset: 0,
            dirty: true,
        })
    }

    /// Characters per line.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of line slots (always full).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false`; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `index` (0 = oldest).
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&OutputLine> {
        self.lines.get(index)
    }

    /// The newest line.
    #[must_use]
    pub fn newest(&self) -> Option<&OutputLine> {
        self.lines.back()
    }

    /// Iterate lines from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    /// Whether the newest line is an open partial line.
    #[must_use]
    pub fn has_open_line(&self) -> bool {
        self.line_open
    }

    /// Append `text`, wrapping at `columns` characters.
    ///
    /// `\n` ends the current line. Tabs and other control characters are
    /// consumed without taking a column and are not stored. A full line is
    /// committed as soon as it reaches `columns`; the next line is started
    /// lazily by the next character, so `columns * k` characters produce
    /// exactly `k` lines. With `continue_last_line`, text extends the open
    /// partial line instead of starting a new one. Empty text that does not
    /// continue a line inserts a blank line.
    pub fn append_text(&mut self, text: &str, color: LineColor, continue_last_line: bool) {
        let mut need_line = !(continue_last_line && self.line_open);

        if text.is_empty() {
            if need_line {
                self.start_line(color);
                self.line_open = true;
            }
            return;
        }

        for ch in text.chars() {
            if ch == '\n' {
                if need_line {
                    self.start_line(color);
                }
                need_line = true;
                continue;
            }
            if need_line {
                self.start_line(color);
                need_line = false;
            }
            if ch.is_control() {
                continue;
            }
            let columns = self.columns;
            if let Some(line) = self.lines.back_mut() {
                // Room is guaranteed: a line is committed the moment it fills.
                let _ = line.text.push(ch);
                if line.text.len() >= columns {
                    need_line = true;
                }
            }
        }

        self.line_open = !need_line;
        self.dirty = true;
    }

    fn start_line(&mut self, color: LineColor) {
        self.scroll();
        if let Some(line) = self.lines.back_mut() {
            line.color = color;
        }
    }

    /// Rotate every line one slot toward index 0, discarding the oldest and
    /// leaving an empty newest slot.
    pub fn scroll(&mut self) {
        if let Some(mut oldest) = self.lines.pop_front() {
            oldest.reset();
            self.lines.push_back(oldest);
        }
        if self.view_offset > 0 {
            // Keep a paged-back view on the same content.
            self.view_offset = (self.view_offset + 1).min(self.lines.len() - 1);
        }
        self.line_open = false;
        self.dirty = true;
    }

    /// Empty every line and reset every color to [`LineColor::Message`].
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.reset();
        }
        self.line_open = false;
        self.view_offset = 0;
        self.dirty = true;
    }

    /// Page the view back toward older lines.
    pub fn page_up(&mut self, rows: usize) {
        let max = self.lines.len().saturating_sub(rows.max(1));
        let next = self.view_offset.saturating_add(rows.max(1)).min(max);
        if next != self.view_offset {
            self.view_offset = next;
            self.dirty = true;
        }
    }

    /// Page the view forward toward the newest line.
    pub fn page_down(&mut self, rows: usize) {
        let next = self.view_offset.saturating_sub(rows.max(1));
        if next != self.view_offset {
            self.view_offset = next;
            self.dirty = true;
        }
    }

    /// Snap the view back to the newest line.
    pub fn reset_view(&mut self) {
        if self.view_offset != 0 {
            self.view_offset = 0;
            self.dirty = true;
        }
    }

    /// How many lines the view is paged back.
    #[must_use]
    pub fn view_offset(&self) -> usize {
        self.view_offset
    }

    /// Index range to draw when `rows` output rows are on screen.
    ///
    /// The range ends at the newest line unless the view is paged back.
    #[must_use]
    pub fn visible_range(&self, rows: usize) -> Range<usize> {
        let total = self.lines.len();
        let rows = rows.min(total);
        let offset = self.view_offset.min(total - rows);
        let end = total - offset;
        end - rows..end
    }

    /// Whether any text changed since the last [`take_dirty`](Self::take_dirty).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and reset the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Bytes held by the deque and every line allocation.
    #[must_use]
    pub fn footprint_bytes(&self) -> usize {
        let slots = self.lines.capacity() * std::mem::size_of::<OutputLine>();
        slots
            + self
                .lines
                .iter()
                .map(|line| line.text.allocated_bytes())
                .sum::<usize>()
    }
}
