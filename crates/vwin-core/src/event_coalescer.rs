#![forbid(unsafe_code)]

//! Coalescing of high-frequency viewport events.
//!
//! Browsers and terminals can deliver dozens of scroll and resize signals
//! between two frames. Only the latest of each matters for windowing, so
//! [`EventCoalescer`] keeps:
//!
//! - the most recent scroll offset (latest wins),
//! - the most recent container size (latest wins),
//!
//! and passes attach/detach events straight through. The caller drains the
//! pending state once per frame with [`EventCoalescer::flush`].
//!
//! # Usage
//!
//! ```
//! use vwin_core::event::{Event, ScrollEvent};
//! use vwin_core::event_coalescer::EventCoalescer;
//! use vwin_core::geometry::Size;
//!
//! let mut coalescer = EventCoalescer::new();
//! assert!(coalescer.push(ScrollEvent::new(10.0).into()).is_none());
//! assert!(coalescer.push(ScrollEvent::new(40.0).into()).is_none());
//! assert!(coalescer.push(Size::new(800.0, 600.0).into()).is_none());
//!
//! // Resize first, then the latest scroll.
//! let pending = coalescer.flush();
//! assert_eq!(pending, vec![
//!     Event::Resize(Size::new(800.0, 600.0)),
//!     Event::Scroll(ScrollEvent::new(40.0)),
//! ]);
//! assert!(!coalescer.has_pending());
//! ```

use crate::event::{Event, ScrollEvent};
use crate::geometry::Size;

/// Coalesces scroll and resize events between frames.
///
/// Not thread-safe; use from the single UI/event thread. All operations are
/// O(1) and at most two events are ever pending.
#[derive(Debug, Clone, Default)]
pub struct EventCoalescer {
    pending_scroll: Option<Pending<ScrollEvent>>,
    pending_resize: Option<Pending<Size>>,
}

#[derive(Debug, Clone, Copy)]
struct Pending<T> {
    latest: T,
    /// Raw events folded into `latest`.
    count: u32,
}

impl<T> Pending<T> {
    fn first(latest: T) -> Self {
        Self { latest, count: 1 }
    }

    fn replace(self, latest: T) -> Self {
        Self {
            latest,
            count: self.count.saturating_add(1),
        }
    }
}

impl EventCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.
    ///
    /// Returns `None` when the event was folded into pending state, or
    /// `Some(event)` for events that must be handled immediately. Pending
    /// events are not flushed automatically; callers decide whether a
    /// pass-through event invalidates them (see [`EventCoalescer::clear`]).
    pub fn push(&mut self, event: Event) -> Option<Event> {
        match event {
            Event::Scroll(scroll) => {
                self.pending_scroll = Some(match self.pending_scroll {
                    Some(pending) => pending.replace(scroll),
                    None => Pending::first(scroll),
                });
                None
            }
            Event::Resize(size) => {
                self.pending_resize = Some(match self.pending_resize {
                    Some(pending) => pending.replace(size),
                    None => Pending::first(size),
                });
                None
            }
            Event::Attach(_) | Event::Detach => Some(event),
        }
    }

    /// Drain pending events: the resize (if any) first, then the scroll.
    ///
    /// Resize goes first because the scroll offset has to be clamped
    /// against the new container extent.
    pub fn flush(&mut self) -> Vec<Event> {
        let mut events = Vec::with_capacity(2);
        if let Some(resize) = self.pending_resize.take() {
            events.push(Event::Resize(resize.latest));
        }
        if let Some(scroll) = self.pending_scroll.take() {
            events.push(Event::Scroll(scroll.latest));
        }
        events
    }

    /// Drop all pending events without delivering them.
    pub fn clear(&mut self) {
        self.pending_scroll = None;
        self.pending_resize = None;
    }

    /// Whether any events are waiting for a flush.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_scroll.is_some() || self.pending_resize.is_some()
    }

    /// Number of raw scroll events folded into the pending scroll.
    #[must_use]
    pub fn pending_scroll_count(&self) -> u32 {
        self.pending_scroll.map_or(0, |p| p.count)
    }

    /// Number of raw resize events folded into the pending resize.
    #[must_use]
    pub fn pending_resize_count(&self) -> u32 {
        self.pending_resize.map_or(0, |p| p.count)
    }

    /// Latest pending scroll offset, if any.
    #[must_use]
    pub fn pending_scroll_offset(&self) -> Option<f64> {
        self.pending_scroll.map(|p| p.latest.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ViewportState;

    #[test]
    fn scrolls_latest_wins() {
        let mut c = EventCoalescer::new();
        for offset in [10.0, 20.0, 35.0] {
            assert!(c.push(ScrollEvent::new(offset).into()).is_none());
        }
        assert_eq!(c.pending_scroll_count(), 3);
        assert_eq!(c.pending_scroll_offset(), Some(35.0));
        assert_eq!(c.flush(), vec![Event::Scroll(ScrollEvent::new(35.0))]);
    }

    #[test]
    fn resizes_latest_wins() {
        let mut c = EventCoalescer::new();
        c.push(Size::new(700.0, 500.0).into());
        c.push(Size::new(900.0, 650.0).into());
        assert_eq!(c.pending_resize_count(), 2);
        assert_eq!(c.flush(), vec![Event::Resize(Size::new(900.0, 650.0))]);
    }

    #[test]
    fn attach_and_detach_pass_through() {
        let mut c = EventCoalescer::new();
        c.push(ScrollEvent::new(5.0).into());
        let attach = Event::Attach(ViewportState::new(0.0, 600.0, 800.0));
        assert_eq!(c.push(attach), Some(attach));
        assert_eq!(c.push(Event::Detach), Some(Event::Detach));
        // Pass-through does not flush.
        assert!(c.has_pending());
    }

    #[test]
    fn flush_empties_and_orders_resize_first() {
        let mut c = EventCoalescer::new();
        c.push(ScrollEvent::new(100.0).into());
        c.push(Size::new(320.0, 480.0).into());
        let events = c.flush();
        assert!(matches!(events[0], Event::Resize(_)));
        assert!(matches!(events[1], Event::Scroll(_)));
        assert!(!c.has_pending());
        assert!(c.flush().is_empty());
        assert_eq!(c.pending_scroll_count(), 0);
    }

    #[test]
    fn clear_drops_pending() {
        let mut c = EventCoalescer::new();
        c.push(ScrollEvent::new(1.0).into());
        c.push(Size::new(1.0, 1.0).into());
        c.clear();
        assert!(!c.has_pending());
        assert_eq!(c.pending_scroll_offset(), None);
    }
}
