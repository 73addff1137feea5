#![forbid(unsafe_code)]

//! Drop-down developer console core.
//!
//! The pieces, leaves first:
//!
//! - [`LineBuffer`]: fixed-count scrollback with character wrapping.
//! - [`InputLine`]: single-line editor with caret and horizontal scroll.
//! - [`HistoryRing`]: bounded, de-duplicated command history.
//! - [`ResizeCoordinator`]: rebuilds all three for a new size, all or nothing.
//! - [`SlideAnimator`]: the open/close slide, one tick at a time.
//!
//! [`DevConsole`] wires them to a host. Drawing, key-code mapping, timers,
//! the OS clipboard, and command execution stay with the host and are
//! reached through [`ConsoleHost`], [`CommandCatalog`], [`CommandExecutor`],
//! and [`ClipboardSource`].

pub mod animator;
pub mod bounded;
pub mod clipboard;
pub mod config;
pub mod console;
pub mod error;
pub mod history;
pub mod host;
pub mod input_line;
pub mod line_buffer;
pub mod logging;
pub mod resize;

pub use animator::{OpenExtent, SlideAnimator, SlidePhase};
pub use bounded::BoundedText;
pub use clipboard::{ClipboardError, ClipboardSource, MemoryClipboard, NoClipboard};
pub use config::{ConsoleConfig, ConsoleConfigError, ConsoleConfigParse};
pub use console::{ConsoleKey, ConsoleSnapshot, DevConsole, DirtyFlags};
pub use error::{CapacityError, ConsoleError};
pub use history::HistoryRing;
pub use host::{CommandCatalog, CommandExecutor, ConsoleHandle, ConsoleHost, DetachedHost};
pub use input_line::InputLine;
pub use line_buffer::{LineBuffer, LineColor, MessageKind, OutputLine};
pub use resize::{ConsoleBuffers, ResizeCoordinator};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
