#![forbid(unsafe_code)]

//! Slide-in/slide-out state machine for the console.
//!
//! The console hangs from the top of the viewport; its offset is how many
//! rows of it are showing. Each [`SlideAnimator::tick`] moves the offset a
//! fixed step toward the target. A toggle, activation request, or resize
//! received mid-slide only changes the target: the current offset is never
//! reset, so motion continues smoothly from wherever it is.
//!
//! ```text
//!            toggle              tick (reached)
//!   Closed ─────────▶ Opening ─────────────────▶ OpenPartial / OpenFull
//!     ▲                 │  ▲                            │
//!     │ tick (reached)  │  │ toggle                     │ toggle
//!     │                 ▼  │                            ▼
//!     └───────────────── Closing ◀──────────────────────┘
//! ```

/// Rows moved per tick unless configured otherwise.
pub const DEFAULT_SLIDE_STEP: i32 = 2;

/// Where the console is in its open/close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlidePhase {
    /// Fully hidden.
    #[default]
    Closed,
    /// Moving toward an open extent.
    Opening,
    /// Resting at half height.
    OpenPartial,
    /// Resting at full height.
    OpenFull,
    /// Moving toward hidden.
    Closing,
}

impl SlidePhase {
    /// Whether the offset is still moving.
    #[must_use]
    pub const fn is_moving(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

/// The two resting heights of an open console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpenExtent {
    #[default]
    Partial,
    Full,
}

impl OpenExtent {
    const fn resting_phase(self) -> SlidePhase {
        match self {
            Self::Partial => SlidePhase::OpenPartial,
            Self::Full => SlidePhase::OpenFull,
        }
    }
}

/// Drives the console's vertical offset one tick at a time.
#[derive(Debug, Clone)]
pub struct SlideAnimator {
    phase: SlidePhase,
    current_offset: i32,
    target_offset: i32,
    step: i32,
    extent: OpenExtent,
    full_extent: i32,
    partial_extent: i32,
    reopen_pending: bool,
    reclose_pending: bool,
}

impl SlideAnimator {
    /// A closed console that slides `step` rows per tick between 0 and the
    /// given extents.
    #[must_use]
    pub fn new(step: i32, full_extent: i32, partial_extent: i32) -> Self {
        let mut animator = Self {
            phase: SlidePhase::Closed,
            current_offset: 0,
            target_offset: 0,
            step: step.max(1),
            extent: OpenExtent::Partial,
            full_extent: 0,
            partial_extent: 0,
            reopen_pending: false,
            reclose_pending: false,
        };
        animator.store_extents(full_extent, partial_extent);
        animator
    }

    /// Extents for a console `lines` rows tall: full height and half height.
    #[must_use]
    pub fn extents_for_lines(lines: usize) -> (i32, i32) {
        let full = i32::try_from(lines).unwrap_or(i32::MAX).max(1);
        (full, (full / 2).max(1))
    }

    #[must_use]
    pub fn phase(&self) -> SlidePhase {
        self.phase
    }

    /// Rows of console currently showing.
    #[must_use]
    pub fn current_offset(&self) -> i32 {
        self.current_offset
    }

    /// Rows the console is heading toward.
    #[must_use]
    pub fn target_offset(&self) -> i32 {
        self.target_offset
    }

    /// Extent used for the current or most recent opening.
    #[must_use]
    pub fn extent(&self) -> OpenExtent {
        self.extent
    }

    #[must_use]
    pub fn step(&self) -> i32 {
        self.step
    }

    /// Whether any part of the console is on screen.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase != SlidePhase::Closed
    }

    /// Whether the console is open or opening (and so owns keyboard input).
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            SlidePhase::Opening | SlidePhase::OpenPartial | SlidePhase::OpenFull
        )
    }

    /// Whether the host should keep delivering ticks.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        self.phase.is_moving() || self.reopen_pending || self.reclose_pending
    }

    /// Show, hide, or switch the height of the console.
    ///
    /// A hidden or closing console starts opening toward the requested
    /// extent. An open or opening console asked for the other extent is
    /// redirected there; asked for the same extent, it starts closing.
    pub fn toggle(&mut self, open_full: bool) {
        let requested = if open_full {
            OpenExtent::Full
        } else {
            OpenExtent::Partial
        };
        self.reopen_pending = false;
        self.reclose_pending = false;
        match self.phase {
            SlidePhase::Closed | SlidePhase::Closing => self.begin_opening(requested),
            _ if requested != self.extent => self.begin_opening(requested),
            _ => self.begin_closing(),
        }
    }

    /// Ask for the console to open; applied on the next tick.
    pub fn activate_request(&mut self) {
        self.reopen_pending = true;
        self.reclose_pending = false;
    }

    /// Ask for the console to close; applied on the next tick.
    pub fn deactivate_request(&mut self) {
        self.reclose_pending = true;
        self.reopen_pending = false;
    }

    /// Advance one step. Returns whether more ticks are needed.
    pub fn tick(&mut self) -> bool {
        self.resolve_pending();
        if self.phase.is_moving() {
            let delta = self.target_offset - self.current_offset;
            self.current_offset += delta.signum() * delta.abs().min(self.step);
            if self.current_offset == self.target_offset {
                let settled = match self.phase {
                    SlidePhase::Closing => SlidePhase::Closed,
                    _ => self.extent.resting_phase(),
                };
                self.set_phase(settled);
            }
        }
        self.needs_tick()
    }

    /// Apply new extents after a resize.
    ///
    /// A console at rest snaps to its new height; one in motion keeps its
    /// current offset and heads for the corrected target.
    pub fn set_extents(&mut self, full_extent: i32, partial_extent: i32) {
        self.store_extents(full_extent, partial_extent);
        match self.phase {
            SlidePhase::Opening => self.target_offset = self.extent_offset(self.extent),
            SlidePhase::OpenPartial | SlidePhase::OpenFull => {
                self.target_offset = self.extent_offset(self.extent);
                self.current_offset = self.target_offset;
            }
            SlidePhase::Closing | SlidePhase::Closed => {}
        }
    }

    fn store_extents(&mut self, full_extent: i32, partial_extent: i32) {
        self.full_extent = full_extent.max(1);
        self.partial_extent = partial_extent.clamp(1, self.full_extent);
    }

    fn extent_offset(&self, extent: OpenExtent) -> i32 {
        match extent {
            OpenExtent::Partial => self.partial_extent,
            OpenExtent::Full => self.full_extent,
        }
    }

    fn resolve_pending(&mut self) {
        if std::mem::take(&mut self.reopen_pending) && !self.is_active() {
            self.begin_opening(self.extent);
        }
        if std::mem::take(&mut self.reclose_pending) && self.is_active() {
            self.begin_closing();
        }
    }

    fn begin_opening(&mut self, extent: OpenExtent) {
        self.extent = extent;
        self.target_offset = self.extent_offset(extent);
        let phase = if self.current_offset == self.target_offset {
            extent.resting_phase()
        } else {
            SlidePhase::Opening
        };
        self.set_phase(phase);
    }

    fn begin_closing(&mut self) {
        self.target_offset = 0;
        let phase = if self.current_offset == 0 {
            SlidePhase::Closed
        } else {
            SlidePhase::Closing
        };
        self.set_phase(phase);
    }

    fn set_phase(&mut self, phase: SlidePhase) {
        if self.phase != phase {
            crate::debug!(
                from = ?self.phase,
                to = ?phase,
                offset = self.current_offset,
                target = self.target_offset,
                "console slide phase"
            );
            self.phase = phase;
        }
    }
}

impl Default for SlideAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_SLIDE_STEP, 1, 1)
    }
}
