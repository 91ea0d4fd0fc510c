#![forbid(unsafe_code)]

//! Viewport events.
//!
//! Hosts translate their platform signals (DOM `scroll`/`resize`, a
//! `ResizeObserver`, a terminal resize, ...) into these events and feed them
//! to the windowing driver. Values are absolute, not deltas: a scroll event
//! carries the container's current offset, a resize carries the new size.

use crate::geometry::{Size, ViewportState};

/// A viewport signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The container scrolled to a new offset.
    Scroll(ScrollEvent),
    /// The container changed size.
    Resize(Size),
    /// The container was attached and measured for the first time.
    Attach(ViewportState),
    /// The container reference went away (host-side unmount or re-parent).
    Detach,
}

impl Event {
    /// Whether this event can be folded into a later one of the same kind.
    #[inline]
    pub const fn is_coalescable(&self) -> bool {
        matches!(self, Self::Scroll(_) | Self::Resize(_))
    }

    /// Short stable name, used in log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scroll(_) => "scroll",
            Self::Resize(_) => "resize",
            Self::Attach(_) => "attach",
            Self::Detach => "detach",
        }
    }
}

/// A scroll position report.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollEvent {
    /// Current scroll offset of the container.
    pub offset: f64,
}

impl ScrollEvent {
    /// Create a scroll event at `offset`.
    #[inline]
    pub const fn new(offset: f64) -> Self {
        Self { offset }
    }
}

impl From<ScrollEvent> for Event {
    fn from(event: ScrollEvent) -> Self {
        Self::Scroll(event)
    }
}

impl From<Size> for Event {
    fn from(size: Size) -> Self {
        Self::Resize(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_scroll_and_resize_coalesce() {
        assert!(Event::from(ScrollEvent::new(10.0)).is_coalescable());
        assert!(Event::from(Size::new(800.0, 600.0)).is_coalescable());
        assert!(!Event::Attach(ViewportState::UNMEASURED).is_coalescable());
        assert!(!Event::Detach.is_coalescable());
    }

    #[test]
    fn names_are_stable() {
        assert_eq!(Event::Detach.name(), "detach");
        assert_eq!(Event::Scroll(ScrollEvent::default()).name(), "scroll");
    }
}
