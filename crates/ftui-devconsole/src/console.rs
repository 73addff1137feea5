#![forbid(unsafe_code)]

//! The drop-down developer console.
//!
//! [`DevConsole`] ties the buffers, the history, and the slide animation to
//! the host's event stream. Every entry point is a synchronous call made by
//! the host: characters, keys, pastes, resizes, and the two timer ticks
//! (slide and caret flash). Rendering reads a [`ConsoleSnapshot`] and asks
//! [`DevConsole::take_dirty`] what changed since the last frame.
//!
//! # Example
//!
//! ```
//! use ftui_devconsole::{ConsoleConfig, ConsoleKey, DetachedHost, DevConsole, MessageKind};
//!
//! let mut console = DevConsole::new(40, 12, ConsoleConfig::default(), Box::new(DetachedHost))?;
//! console.print(Some("ready"), MessageKind::Success, true);
//!
//! console.toggle(false);
//! while console.tick() {}
//!
//! for ch in "help".chars() {
//!     console.handle_char(ch);
//! }
//! console.handle_key(ConsoleKey::Enter);
//! assert_eq!(console.history().entries()[0], "help");
//! # Ok::<(), ftui_devconsole::ConsoleError>(())
//! ```

use std::ops::Range;

use bitflags::bitflags;

use crate::animator::{SlideAnimator, SlidePhase};
use crate::clipboard::ClipboardSource;
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::history::HistoryRing;
use crate::host::{CommandCatalog, CommandExecutor, ConsoleHandle, ConsoleHost};
use crate::input_line::InputLine;
use crate::line_buffer::{LineBuffer, LineColor, MessageKind, OutputLine};
use crate::resize::{ConsoleBuffers, ResizeCoordinator};

bitflags! {
    /// What changed since the last [`DevConsole::take_dirty`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        /// Scrollback text, colors, or view offset.
        const LINES = 1 << 0;
        /// Input text, caret, or caret visibility.
        const INPUT = 1 << 1;
        /// Slide offset or phase.
        const OFFSET = 1 << 2;
        /// Console dimensions.
        const GEOMETRY = 1 << 3;
    }
}

/// Editing and navigation keys the console understands.
///
/// Mapping platform key codes onto these is the host's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleKey {
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    /// Toggle insert/replace mode.
    Insert,
    /// Submit the input line.
    Enter,
    /// Recall an older history entry.
    Up,
    /// Recall a newer history entry.
    Down,
    /// Complete or cycle a command name.
    Tab,
    PageUp,
    PageDown,
}

/// Command-name cycle started by the first Tab.
#[derive(Debug, Clone)]
struct Completion {
    candidates: Vec<String>,
    next: usize,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct ConsoleSnapshot<'a> {
    /// Rows of console on screen.
    pub offset: i32,
    pub phase: SlidePhase,
    /// Scrollback indices to draw, oldest first.
    pub visible_range: Range<usize>,
    /// Full input text.
    pub input_text: &'a [char],
    /// Input text inside the horizontal window.
    pub input_window: &'a [char],
    pub caret_pos: usize,
    pub scroll_offset: usize,
    pub replace_mode: bool,
    pub caret_visible: bool,
    lines: &'a LineBuffer,
}

impl<'a> ConsoleSnapshot<'a> {
    /// Lines inside [`visible_range`](Self::visible_range), oldest first.
    pub fn visible_lines(&self) -> impl Iterator<Item = &'a OutputLine> + '_ {
        self.visible_range
            .clone()
            .filter_map(move |index| self.lines.line(index))
    }
}

/// Drop-down developer console.
pub struct DevConsole {
    buffers: ConsoleBuffers,
    animator: SlideAnimator,
    config: ConsoleConfig,
    columns: usize,
    lines: usize,
    handle: ConsoleHandle,
    host: Box<dyn ConsoleHost>,
    catalog: Option<Box<dyn CommandCatalog>>,
    executor: Option<Box<dyn CommandExecutor>>,
    completion: Option<Completion>,
    caret_visible: bool,
    flash_count: u32,
    dirty: DirtyFlags,
}

impl std::fmt::Debug for DevConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevConsole")
            .field("columns", &self.columns)
            .field("lines", &self.lines)
            .field("phase", &self.animator.phase())
            .field("offset", &self.animator.current_offset())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DevConsole {
    /// Build a closed console `columns` wide and `lines` tall and register it
    /// with `host`. Out-of-range config values are clamped to 1.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::InvalidGeometry`] for a zero dimension, or
    /// [`ConsoleError::ResourceExhausted`] if the buffers cannot be allocated.
    pub fn new(
        columns: usize,
        lines: usize,
        config: ConsoleConfig,
        mut host: Box<dyn ConsoleHost>,
    ) -> Result<Self, ConsoleError> {
        #[cfg(feature = "tracing")]
        if let Err(errors) = config.validate() {
            for error in &errors {
                crate::warn!(%error, "console config value out of range, clamped");
            }
        }
        let config = config.clamped();
        let buffers = ConsoleBuffers::try_new(columns, lines, config.history_lines)?;
        let (full, partial) = SlideAnimator::extents_for_lines(lines);
        let animator = SlideAnimator::new(config.slide_step, full, partial);
        let handle = ConsoleHandle::default();
        host.set_console(Some(handle.clone()));
        crate::info!(columns, lines, "developer console attached");
        Ok(Self {
            buffers,
            animator,
            config,
            columns,
            lines,
            handle,
            host,
            catalog: None,
            executor: None,
            completion: None,
            caret_visible: true,
            flash_count: 0,
            dirty: DirtyFlags::all(),
        })
    }

    /// Use `catalog` for Tab completion (builder).
    #[must_use]
    pub fn with_catalog(mut self, catalog: Box<dyn CommandCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Hand submitted lines to `executor` (builder).
    #[must_use]
    pub fn with_executor(mut self, executor: Box<dyn CommandExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// A handle that prints into this console.
    #[must_use]
    pub fn handle(&self) -> ConsoleHandle {
        self.handle.clone()
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Current `(columns, lines)`.
    #[must_use]
    pub fn geometry(&self) -> (usize, usize) {
        (self.columns, self.lines)
    }

    #[must_use]
    pub fn line_buffer(&self) -> &LineBuffer {
        &self.buffers.lines
    }

    #[must_use]
    pub fn input(&self) -> &InputLine {
        &self.buffers.input
    }

    #[must_use]
    pub fn history(&self) -> &HistoryRing {
        &self.buffers.history
    }

    #[must_use]
    pub fn animator(&self) -> &SlideAnimator {
        &self.animator
    }

    /// Whether the console currently takes keyboard input.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.animator.is_active()
    }

    /// Write to the scrollback.
    ///
    /// `new_line` starts a fresh line; otherwise the text continues the open
    /// partial line. `None` text with `new_line` inserts a blank line.
    /// [`MessageKind::Clear`] wipes the scrollback and ignores the text.
    pub fn print(&mut self, text: Option<&str>, kind: MessageKind, new_line: bool) {
        self.apply_pending();
        self.print_now(text, kind, new_line);
    }

    fn print_now(&mut self, text: Option<&str>, kind: MessageKind, new_line: bool) {
        match kind.color() {
            Some(color) => {
                self.buffers
                    .lines
                    .append_text(text.unwrap_or_default(), color, !new_line);
            }
            None => self.buffers.lines.clear(),
        }
    }

    fn apply_pending(&mut self) {
        for pending in self.handle.take_pending() {
            self.print_now(pending.text.as_deref(), pending.kind, pending.new_line);
        }
    }

    /// Show, hide, or switch between partial and full height.
    pub fn toggle(&mut self, open_full: bool) {
        self.apply_pending();
        self.animator.toggle(open_full);
        self.dirty |= DirtyFlags::OFFSET;
    }

    /// Ask for the console to open on the next tick.
    pub fn activate_request(&mut self) {
        self.animator.activate_request();
    }

    /// Ask for the console to close on the next tick.
    pub fn deactivate_request(&mut self) {
        self.animator.deactivate_request();
    }

    /// Advance the slide animation. Returns whether more ticks are needed.
    pub fn tick(&mut self) -> bool {
        self.apply_pending();
        let before = (self.animator.phase(), self.animator.current_offset());
        let more = self.animator.tick();
        if before != (self.animator.phase(), self.animator.current_offset()) {
            self.dirty |= DirtyFlags::OFFSET;
        }
        more
    }

    /// Advance the caret blink. Returns whether caret visibility flipped.
    pub fn flash_tick(&mut self) -> bool {
        if !self.config.prompt_flash || !self.animator.is_visible() {
            return false;
        }
        self.flash_count += 1;
        if self.flash_count < self.config.flash_period_ticks {
            return false;
        }
        self.flash_count = 0;
        self.caret_visible = !self.caret_visible;
        self.dirty |= DirtyFlags::INPUT;
        true
    }

    /// Whether the caret is drawn this frame.
    #[must_use]
    pub fn caret_visible(&self) -> bool {
        self.caret_visible || !self.config.prompt_flash
    }

    fn show_caret(&mut self) {
        if !self.caret_visible {
            self.dirty |= DirtyFlags::INPUT;
        }
        self.caret_visible = true;
        self.flash_count = 0;
    }

    /// Type a character. Control characters and input while the console is
    /// inactive are ignored.
    pub fn handle_char(&mut self, ch: char) -> bool {
        self.apply_pending();
        if !self.animator.is_active() || ch.is_control() {
            return false;
        }
        self.completion = None;
        let changed = self.buffers.input.insert(ch);
        if changed {
            self.show_caret();
        }
        changed
    }

    /// Handle an editing or navigation key. Returns whether anything changed.
    pub fn handle_key(&mut self, key: ConsoleKey) -> bool {
        self.apply_pending();
        if !self.animator.is_active() {
            return false;
        }
        if key != ConsoleKey::Tab {
            self.completion = None;
        }
        let changed = match key {
            ConsoleKey::Left => self.buffers.input.move_left(),
            ConsoleKey::Right => self.buffers.input.move_right(),
            ConsoleKey::Home => self.buffers.input.move_home(),
            ConsoleKey::End => self.buffers.input.move_end(),
            ConsoleKey::Backspace => self.buffers.input.backspace(),
            ConsoleKey::Delete => self.buffers.input.delete(),
            ConsoleKey::Insert => {
                self.buffers.input.toggle_replace_mode();
                true
            }
            ConsoleKey::Enter => self.submit(),
            ConsoleKey::Up => self.recall(true),
            ConsoleKey::Down => self.recall(false),
            ConsoleKey::Tab => self.complete(),
            ConsoleKey::PageUp | ConsoleKey::PageDown => {
                let rows = self.page_rows();
                let before = self.buffers.lines.view_offset();
                if key == ConsoleKey::PageUp {
                    self.buffers.lines.page_up(rows);
                } else {
                    self.buffers.lines.page_down(rows);
                }
                before != self.buffers.lines.view_offset()
            }
        };
        if changed {
            self.show_caret();
        }
        changed
    }

    fn submit(&mut self) -> bool {
        let line = self.buffers.input.text().to_string();
        self.buffers.input.clear();
        if line.trim().is_empty() {
            return true;
        }
        self.buffers.lines.reset_view();
        self.buffers
            .lines
            .append_text(&format!("> {line}"), LineColor::Message, false);
        self.buffers.history.submit(&line);
        crate::debug!(command = %line, "command submitted");
        if let Some(executor) = self.executor.as_mut() {
            executor.execute(&line);
        }
        self.apply_pending();
        true
    }

    fn recall(&mut self, older: bool) -> bool {
        let ConsoleBuffers { history, input, .. } = &mut self.buffers;
        let entry = if older {
            history.previous()
        } else {
            history.next()
        };
        match entry {
            Some(entry) => {
                input.set_text(entry.as_slice());
                true
            }
            None => false,
        }
    }

    fn complete(&mut self) -> bool {
        if self.completion.is_none() {
            let Some(catalog) = self.catalog.as_ref() else {
                return false;
            };
            let prefix = self.buffers.input.text().to_string();
            let candidates: Vec<String> = catalog
                .command_names()
                .into_iter()
                .filter(|name| name.starts_with(prefix.as_str()))
                .collect();
            if candidates.is_empty() {
                return false;
            }
            self.completion = Some(Completion {
                candidates,
                next: 0,
            });
        }
        let Some(state) = self.completion.as_mut() else {
            return false;
        };
        let Some(name) = state.candidates.get(state.next) else {
            return false;
        };
        let chars: Vec<char> = name.chars().collect();
        state.next = (state.next + 1) % state.candidates.len();
        self.buffers.input.set_text(&chars);
        true
    }

    /// Rows of output shown when the console is at its target height.
    fn page_rows(&self) -> usize {
        usize::try_from(self.animator.target_offset())
            .unwrap_or(0)
            .saturating_sub(1)
            .max(1)
    }

    /// Rows of output on screen right now; the bottom row is the prompt.
    fn output_rows(&self) -> usize {
        usize::try_from(self.animator.current_offset())
            .unwrap_or(0)
            .saturating_sub(1)
    }

    /// Paste from `clipboard` at the caret.
    ///
    /// A failed read prints an error line and leaves the input untouched.
    pub fn paste(&mut self, clipboard: &mut dyn ClipboardSource) -> bool {
        self.apply_pending();
        if !self.animator.is_active() {
            return false;
        }
        match clipboard.read_text() {
            Ok(text) => {
                self.completion = None;
                let changed = self.buffers.input.paste_insert(&text);
                if changed {
                    self.show_caret();
                }
                changed
            }
            Err(err) => {
                crate::warn!(error = %err, "paste aborted");
                self.buffers.lines.append_text(
                    &format!("paste failed: {err}"),
                    LineColor::Error,
                    false,
                );
                false
            }
        }
    }

    /// Rebuild every buffer for a new console size.
    ///
    /// # Errors
    ///
    /// On failure the console keeps its previous size and contents.
    pub fn resize(&mut self, columns: usize, lines: usize) -> Result<(), ConsoleError> {
        self.apply_pending();
        let span = crate::debug_span!("devconsole.resize", columns, lines);
        let _guard = span.enter();
        match ResizeCoordinator::resize(&self.buffers, columns, lines) {
            Ok(buffers) => {
                self.buffers = buffers;
                self.columns = columns;
                self.lines = lines;
                self.completion = None;
                let (full, partial) = SlideAnimator::extents_for_lines(lines);
                self.animator.set_extents(full, partial);
                self.dirty |= DirtyFlags::all();
                crate::debug!(columns, lines, "resize committed");
                Ok(())
            }
            Err(err) => {
                crate::warn!(error = %err, columns, lines, "resize failed, keeping previous size");
                Err(err)
            }
        }
    }

    /// Read and reset what changed since the last call.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        let mut dirty = std::mem::take(&mut self.dirty);
        if self.buffers.lines.take_dirty() {
            dirty |= DirtyFlags::LINES;
        }
        if self.buffers.input.take_dirty() {
            dirty |= DirtyFlags::INPUT;
        }
        dirty
    }

    /// Read-only view for the renderer.
    #[must_use]
    pub fn snapshot(&self) -> ConsoleSnapshot<'_> {
        let input = &self.buffers.input;
        ConsoleSnapshot {
            offset: self.animator.current_offset(),
            phase: self.animator.phase(),
            visible_range: self.buffers.lines.visible_range(self.output_rows()),
            input_text: input.text().as_slice(),
            input_window: input.visible_text(),
            caret_pos: input.caret_pos(),
            scroll_offset: input.scroll_offset(),
            replace_mode: input.replace_mode(),
            caret_visible: self.caret_visible(),
            lines: &self.buffers.lines,
        }
    }

    /// Bytes allocated by the console's buffers.
    #[must_use]
    pub fn footprint_bytes(&self) -> usize {
        self.buffers.footprint_bytes()
    }
}

impl Drop for DevConsole {
    fn drop(&mut self) {
        self.host.set_console(None);
        crate::info!("developer console detached");
    }
}
