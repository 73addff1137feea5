#![forbid(unsafe_code)]

//! Build-then-swap resize of the console buffers.
//!
//! [`ResizeCoordinator::resize`] reads the current [`ConsoleBuffers`] and
//! builds a complete replacement set. Nothing is mutated in place: if any
//! allocation fails the caller still holds the old, fully usable set.
//!
//! # What survives
//!
//! - Output lines are bottom-aligned. A shorter console keeps the newest
//!   lines; a taller one gains empty slots at the top. Every line is cut to
//!   the new column count.
//! - The input text is cut to the new input capacity. The caret keeps its
//!   screen column where it can and the scroll offset absorbs the rest.
//! - History keeps its capacity; entries are cut to the new input capacity.

use crate::error::ConsoleError;
use crate::history::HistoryRing;
use crate::input_line::InputLine;
use crate::line_buffer::LineBuffer;

/// The three buffers a resize replaces together.
#[derive(Debug, Clone)]
pub struct ConsoleBuffers {
    pub lines: LineBuffer,
    pub input: InputLine,
    pub history: HistoryRing,
}

impl ConsoleBuffers {
    /// Fresh, empty buffers for a `columns` by `lines` console.
    pub fn try_new(
        columns: usize,
        lines: usize,
        history_lines: usize,
    ) -> Result<Self, ConsoleError> {
        let input = InputLine::try_new(columns)?;
        let entry_chars = input.text().capacity();
        Ok(Self {
            lines: LineBuffer::try_new(columns, lines)?,
            history: HistoryRing::try_new(history_lines, entry_chars)?,
            input,
        })
    }

    /// Bytes held by all three buffers.
    #[must_use]
    pub fn footprint_bytes(&self) -> usize {
        self.lines.footprint_bytes() + self.input.footprint_bytes() + self.history.footprint_bytes()
    }
}

/// Rebuilds [`ConsoleBuffers`] for a new geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeCoordinator;

impl ResizeCoordinator {
    /// Build buffers for `new_columns` by `new_lines`, carrying content over.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::InvalidGeometry`] for a zero dimension and
    /// [`ConsoleError::ResourceExhausted`] if an allocation fails. `current`
    /// is never touched.
    pub fn resize(
        current: &ConsoleBuffers,
        new_columns: usize,
        new_lines: usize,
    ) -> Result<ConsoleBuffers, ConsoleError> {
        if new_columns == 0 || new_lines == 0 {
            return Err(ConsoleError::InvalidGeometry {
                columns: new_columns,
                lines: new_lines,
            });
        }

        let lines = Self::resize_lines(&current.lines, new_columns, new_lines)?;
        let input = Self::resize_input(&current.input, new_columns)?;
        let history = current
            .history
            .try_retruncated(input.text().capacity())?;

        crate::debug!(
            old_columns = current.lines.columns(),
            old_lines = current.lines.len(),
            new_columns,
            new_lines,
            "console buffers rebuilt"
        );
        Ok(ConsoleBuffers {
            lines,
            input,
            history,
        })
    }

    fn resize_lines(
        old: &LineBuffer,
        new_columns: usize,
        new_lines: usize,
    ) -> Result<LineBuffer, ConsoleError> {
        let mut lines = LineBuffer::try_new(new_columns, new_lines)?;
        let kept = old.len().min(new_lines);
        let targets = lines.lines.iter_mut().skip(new_lines - kept);
        let sources = old.lines.iter().skip(old.len() - kept);
        for (target, source) in targets.zip(sources) {
            target.text.assign(source.text.as_slice());
            target.color = source.color;
        }
        // A partial line stays open only if it still has room to grow.
        lines.line_open = old.line_open
            && lines
                .newest()
                .is_some_and(|line| line.text().len() < new_columns);
        Ok(lines)
    }

    fn resize_input(old: &InputLine, new_columns: usize) -> Result<InputLine, ConsoleError> {
        let mut input = InputLine::try_new(new_columns)?;
        input.content.assign(old.content.as_slice());
        input.replace_mode = old.replace_mode;

        let logical = old.logical_position().min(input.content.len());
        input.caret_pos = old.caret_pos.min(input.caret_limit()).min(logical);
        input.scroll_offset = logical - input.caret_pos;
        Ok(input)
    }
}
