#![forbid(unsafe_code)]

//! Error types for the console core.

use std::collections::TryReserveError;
use std::fmt;

/// Errors that abort a console construction or resize.
///
/// Both variants leave any existing console state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// The requested geometry has a zero dimension.
    InvalidGeometry { columns: usize, lines: usize },
    /// A buffer allocation failed.
    ResourceExhausted {
        /// Which buffer was being allocated.
        what: &'static str,
        /// Number of elements requested.
        requested: usize,
    },
}

impl ConsoleError {
    pub(crate) fn exhausted(
        what: &'static str,
        requested: usize,
    ) -> impl FnOnce(TryReserveError) -> Self {
        move |_| Self::ResourceExhausted { what, requested }
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry { columns, lines } => {
                write!(f, "invalid console geometry {columns}x{lines} (both must be >= 1)")
            }
            Self::ResourceExhausted { what, requested } => {
                write!(f, "out of memory allocating {what} ({requested} elements)")
            }
        }
    }
}

impl std::error::Error for ConsoleError {}

/// A write that would exceed a [`BoundedText`](crate::BoundedText) capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// Capacity of the text that rejected the write.
    pub capacity: usize,
    /// Length the text would have had after the write.
    pub requested: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text capacity exceeded: {} chars requested, capacity {}",
            self.requested, self.capacity
        )
    }
}

impl std::error::Error for CapacityError {}
