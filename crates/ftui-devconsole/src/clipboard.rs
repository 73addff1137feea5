#![forbid(unsafe_code)]

//! Clipboard boundary.
//!
//! The console reads the clipboard exactly once per paste, through
//! [`ClipboardSource`]. A failed read is reported to the user and the paste
//! is dropped; it is never retried.

use std::fmt;

/// Clipboard read errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard service is reachable.
    NotAvailable,
    /// The clipboard holds no text.
    Empty,
    /// The service answered with an error.
    ReadError(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "clipboard not available"),
            Self::Empty => write!(f, "clipboard is empty"),
            Self::ReadError(msg) => write!(f, "clipboard read failed: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Something the console can paste from.
pub trait ClipboardSource {
    /// Read the current clipboard text. Called once per paste.
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// In-process clipboard holding a string, or nothing.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard pre-filled with `text` (builder).
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Some(text.into()),
        }
    }

    /// Replace the clipboard text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.contents = Some(text.into());
    }

    /// Empty the clipboard.
    pub fn clear(&mut self) {
        self.contents = None;
    }
}

impl ClipboardSource for MemoryClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        match &self.contents {
            Some(text) if !text.is_empty() => Ok(text.clone()),
            _ => Err(ClipboardError::Empty),
        }
    }
}

/// A clipboard that is never reachable (headless hosts).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl ClipboardSource for NoClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::NotAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_reads_text() {
        let mut clip = MemoryClipboard::with_text("status");
        assert_eq!(clip.read_text().as_deref(), Ok("status"));
        // Reading does not consume.
        assert_eq!(clip.read_text().as_deref(), Ok("status"));
    }

    #[test]
    fn empty_memory_clipboard_errors() {
        let mut clip = MemoryClipboard::new();
        assert_eq!(clip.read_text(), Err(ClipboardError::Empty));
        clip.set_text("");
        assert_eq!(clip.read_text(), Err(ClipboardError::Empty));
        clip.set_text("x");
        clip.clear();
        assert_eq!(clip.read_text(), Err(ClipboardError::Empty));
    }

    #[test]
    fn no_clipboard_is_unavailable() {
        assert_eq!(NoClipboard.read_text(), Err(ClipboardError::NotAvailable));
        assert_eq!(
            ClipboardError::ReadError("denied".into()).to_string(),
            "clipboard read failed: denied"
        );
    }
}
