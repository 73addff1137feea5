#![forbid(unsafe_code)]

//! Collaborators the console talks to.
//!
//! The host application owns command execution and the list of command
//! names. It learns about the console through [`ConsoleHost::set_console`],
//! which hands it a [`ConsoleHandle`] it can print through from anywhere on
//! the UI thread. Prints made through the handle are queued and land in the
//! scrollback at the start of the console's next event.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::line_buffer::MessageKind;

/// The host's slot for the active console.
pub trait ConsoleHost {
    /// Called with `Some` when a console is built and `None` when it is dropped.
    fn set_console(&mut self, console: Option<ConsoleHandle>);
}

/// Ordered source of command names, used for completion.
pub trait CommandCatalog {
    fn command_names(&self) -> Vec<String>;
}

/// Runs a submitted command line.
pub trait CommandExecutor {
    fn execute(&mut self, command_line: &str);
}

/// A host with no console slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl ConsoleHost for DetachedHost {
    fn set_console(&mut self, _console: Option<ConsoleHandle>) {}
}

impl CommandCatalog for Vec<String> {
    fn command_names(&self) -> Vec<String> {
        self.clone()
    }
}

impl CommandCatalog for &[&str] {
    fn command_names(&self) -> Vec<String> {
        self.iter().map(|name| (*name).to_string()).collect()
    }
}

impl<F> CommandExecutor for F
where
    F: FnMut(&str),
{
    fn execute(&mut self, command_line: &str) {
        self(command_line);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingPrint {
    pub(crate) text: Option<String>,
    pub(crate) kind: MessageKind,
    pub(crate) new_line: bool,
}

/// Cloneable print queue into a console.
///
/// Single-threaded by construction: the handle is neither `Send` nor `Sync`.
#[derive(Debug, Clone, Default)]
pub struct ConsoleHandle {
    queue: Rc<RefCell<VecDeque<PendingPrint>>>,
}

impl ConsoleHandle {
    /// Queue a print. Same arguments as [`DevConsole::print`](crate::DevConsole::print).
    pub fn print(&self, text: Option<&str>, kind: MessageKind, new_line: bool) {
        self.queue.borrow_mut().push_back(PendingPrint {
            text: text.map(str::to_owned),
            kind,
            new_line,
        });
    }

    /// Prints waiting to be applied.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Whether `self` and `other` feed the same console.
    #[must_use]
    pub fn same_console(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.queue, &other.queue)
    }

    pub(crate) fn take_pending(&self) -> VecDeque<PendingPrint> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}
