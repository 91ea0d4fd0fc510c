#![forbid(unsafe_code)]

//! Frame-coalesced window recomputation.
//!
//! [`ViewportDriver`] sits between a host's scroll/resize signals and a
//! [`VirtualizedState`]. Events are folded into an [`EventCoalescer`]; the
//! first event after a frame requests the next one from the
//! [`FrameScheduler`], and later events ride along. When the frame fires the
//! driver applies everything that accumulated and recomputes exactly once.
//!
//! # Lifecycle
//!
//! ```text
//! unmeasured ──Attach/Resize──▶ measured ──Detach──▶ unmeasured
//!      │                            │
//!      └──────────unmount()─────────┴──▶ unmounted (terminal)
//! ```
//!
//! After [`unmount`](ViewportDriver::unmount) the pending frame is cancelled,
//! events are dropped and late frame callbacks are ignored.
//!
//! # Scrolling flag
//!
//! Frames that apply a scroll event set the state's scrolling flag. It
//! clears once no scroll event has arrived for `scroll_idle`
//! (see [`WindowConfig::scroll_idle`](vwin_widgets::WindowConfig)), checked
//! by [`tick_at`](ViewportDriver::tick_at).
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use vwin_core::device::StaticDevice;
//! use vwin_core::event::{Event, ScrollEvent};
//! use vwin_core::geometry::ViewportState;
//! use vwin_runtime::{ManualFrameScheduler, ViewportDriver};
//! use vwin_widgets::{VirtualizedState, WindowConfig};
//!
//! let state = VirtualizedState::new(50.0, 1000, WindowConfig::default());
//! let mut driver = ViewportDriver::new(state, ManualFrameScheduler::new(), StaticDevice(false));
//!
//! driver.handle_event(Event::Attach(ViewportState::new(0.0, 600.0, 800.0)));
//! driver.handle_event(Event::Scroll(ScrollEvent::new(1000.0)));
//! driver.handle_event(Event::Scroll(ScrollEvent::new(2000.0)));
//!
//! let frame = driver.scheduler_mut().take_next().unwrap();
//! let window = driver.on_frame(frame, Instant::now()).unwrap();
//! assert_eq!(window.start_index, 38);
//! assert_eq!(driver.stats().recomputes, 1);
//! ```

use std::time::{Duration, Instant};

use vwin_core::device::DeviceInfo;
use vwin_core::event::Event;
use vwin_core::event_coalescer::EventCoalescer;
use vwin_widgets::virtualized::{Phase, VirtualizedState, Window};

use crate::frame::{FrameHandle, FrameScheduler};

#[inline]
fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier)
        .unwrap_or(Duration::ZERO)
}

/// Counters for one driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Events accepted while mounted.
    pub events: u64,
    /// Events dropped because the driver was unmounted.
    pub dropped_events: u64,
    /// Frames requested from the scheduler.
    pub frames_requested: u64,
    /// Frame callbacks that did work.
    pub frames: u64,
    /// Frame callbacks ignored (stale handle or after unmount).
    pub ignored_frames: u64,
    /// Window recomputations.
    pub recomputes: u64,
}

/// Drives a [`VirtualizedState`] from host events and frames.
#[derive(Debug)]
pub struct ViewportDriver<S, D> {
    state: VirtualizedState,
    coalescer: EventCoalescer,
    // Pass-through events (and anything coalesced before them), in order.
    staged: Vec<Event>,
    scheduler: S,
    device: D,
    pending_frame: Option<FrameHandle>,
    last_scroll_event: Option<Instant>,
    stats: DriverStats,
}

impl<S: FrameScheduler, D: DeviceInfo> ViewportDriver<S, D> {
    /// Create a driver around existing state.
    pub fn new(state: VirtualizedState, scheduler: S, device: D) -> Self {
        Self {
            state,
            coalescer: EventCoalescer::new(),
            staged: Vec::new(),
            scheduler,
            device,
            pending_frame: None,
            last_scroll_event: None,
            stats: DriverStats::default(),
        }
    }

    /// Windowing state.
    #[must_use]
    pub fn state(&self) -> &VirtualizedState {
        &self.state
    }

    /// Latest window.
    #[must_use]
    pub fn window(&self) -> &Window {
        self.state.window()
    }

    /// Lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// The frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The frame scheduler, mutably (to fire manual frames).
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The device collaborator.
    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Counters.
    #[must_use]
    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Whether a frame is requested and not yet handled.
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Whether a scroll is in progress.
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.state.is_scrolling()
    }

    /// Handle a host event now.
    pub fn handle_event(&mut self, event: Event) -> bool {
        self.handle_event_at(event, Instant::now())
    }

    /// Handle a host event at a specific time (for testing).
    ///
    /// Returns `false` when the event was dropped because the driver is
    /// unmounted.
    pub fn handle_event_at(&mut self, event: Event, now: Instant) -> bool {
        if self.is_unmounted() {
            self.stats.dropped_events += 1;
            vwin_core::trace!(event = event.name(), "event after unmount dropped");
            return false;
        }
        self.stats.events += 1;
        if matches!(event, Event::Scroll(_)) {
            self.last_scroll_event = Some(now);
        }
        if let Some(passthrough) = self.coalescer.push(event) {
            // Keep ordering: whatever was coalesced so far happened first.
            self.staged.extend(self.coalescer.flush());
            self.staged.push(passthrough);
        }
        self.ensure_frame();
        true
    }

    /// Replace the collection length; recomputed on the next frame.
    pub fn set_total_items(&mut self, total_items: usize) {
        if self.is_unmounted() || total_items == self.state.total_items() {
            return;
        }
        self.state.set_total_items(total_items);
        self.ensure_frame();
    }

    /// Replace the item (or row) extent; recomputed on the next frame.
    pub fn set_item_extent(&mut self, item_extent: f64) {
        if self.is_unmounted() {
            return;
        }
        self.state.set_item_extent(item_extent);
        self.ensure_frame();
    }

    /// Frame callback.
    ///
    /// Applies every accumulated event and recomputes once. Returns `None`
    /// for stale handles and for frames that fire after unmount.
    pub fn on_frame(&mut self, handle: FrameHandle, now: Instant) -> Option<&Window> {
        if self.is_unmounted() || self.pending_frame != Some(handle) {
            self.stats.ignored_frames += 1;
            vwin_core::trace!(frame = handle.id(), "stale frame ignored");
            return None;
        }
        self.pending_frame = None;
        self.stats.frames += 1;

        let _span = vwin_core::debug_span!("viewport_frame", frame = handle.id()).entered();

        let mut scrolled = false;
        let staged = std::mem::take(&mut self.staged);
        for event in staged.iter().chain(self.coalescer.flush().iter()) {
            scrolled |= matches!(event, Event::Scroll(_));
            self.state.apply_event(event);
        }
        if scrolled {
            self.state.set_scrolling(true);
        }
        self.state.recompute(&self.device);
        self.stats.recomputes += 1;

        // A frame can land after the idle window already elapsed.
        self.tick_at(now);
        Some(self.state.window())
    }

    /// Clear the scrolling flag once scrolling has been idle long enough.
    ///
    /// Returns `true` when the flag was cleared by this call, which is the
    /// host's cue to re-render items that rendered cheaply while scrolling.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if !self.state.is_scrolling() {
            return false;
        }
        let idle = self.state.config().scroll_idle;
        let last = match self.last_scroll_event {
            Some(last) => last,
            None => {
                self.state.set_scrolling(false);
                return true;
            }
        };
        // Scroll events still waiting for a frame keep the flag alive.
        if self.coalescer.pending_scroll_count() > 0 {
            return false;
        }
        if duration_since_or_zero(now, last) >= idle {
            self.state.set_scrolling(false);
            vwin_core::trace!("scrolling idle");
            return true;
        }
        false
    }

    /// Time until the scrolling flag would clear, if scrolling.
    #[must_use]
    pub fn time_until_idle(&self, now: Instant) -> Option<Duration> {
        if !self.state.is_scrolling() {
            return None;
        }
        let idle = self.state.config().scroll_idle;
        let elapsed = self
            .last_scroll_event
            .map_or(idle, |last| duration_since_or_zero(now, last));
        Some(idle.saturating_sub(elapsed))
    }

    /// Tear down: cancel the pending frame and stop all computation.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.coalescer.clear();
        self.staged.clear();
        self.last_scroll_event = None;
        self.state.unmount();
    }

    /// Whether [`unmount`](Self::unmount) was called.
    #[must_use]
    pub fn is_unmounted(&self) -> bool {
        self.state.phase() == Phase::Unmounted
    }

    fn ensure_frame(&mut self) {
        if self.pending_frame.is_none() {
            let handle = self.scheduler.request_frame();
            self.stats.frames_requested += 1;
            self.pending_frame = Some(handle);
        }
    }
}
