#![forbid(unsafe_code)]

//! Sticky and floating placement as a pure function of scroll state.
//!
//! Headers, table-of-contents rails and call-to-action bars that "stick"
//! while the page scrolls are usually driven by imperative measurement in
//! scroll handlers. Here the decision is a pure function
//! `(ScrollSnapshot, StickyGeometry, StickyConfig) -> StickyDecision`; the
//! host's adapter reads the DOM (or equivalent) into the inputs and applies
//! the decision, and nothing else touches layout.
//!
//! Coordinates: `anchor_top` and `boundary_bottom` are in content space
//! (distance from the top of the scrolled content). Returned `top` values are
//! in viewport space (distance from the top of the scroll container).

/// Scroll position for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollSnapshot {
    /// Current scroll offset.
    pub offset: f64,
    /// Offset at the previous decision, used to derive direction.
    pub previous_offset: f64,
}

impl ScrollSnapshot {
    /// Create a snapshot.
    #[must_use]
    pub const fn new(offset: f64, previous_offset: f64) -> Self {
        Self {
            offset,
            previous_offset,
        }
    }

    /// Whether the user is scrolling toward the end of the content.
    #[must_use]
    pub fn is_scrolling_down(&self) -> bool {
        self.offset > self.previous_offset
    }
}

/// Measured geometry of a sticky element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickyGeometry {
    /// Natural top of the element in content space.
    pub anchor_top: f64,
    /// Height of the element.
    pub element_height: f64,
    /// Inset from the viewport top while stuck (CSS `top`).
    pub offset_top: f64,
    /// Bottom edge of the containing block; `None` sticks forever.
    pub boundary_bottom: Option<f64>,
}

/// Behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyConfig {
    /// Hide the element while scrolling down, reveal on scroll up.
    pub hide_on_scroll_down: bool,
    /// Distance past the anchor before hiding kicks in.
    pub hide_after: f64,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            hide_on_scroll_down: false,
            hide_after: 64.0,
        }
    }
}

/// Where the element should be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StickyDecision {
    /// In normal flow; the anchor has not been reached.
    Static,
    /// Pinned at `top` in viewport space.
    Stuck {
        /// Viewport-space top edge.
        top: f64,
    },
    /// Pushed up by the end of its containing block.
    Floating {
        /// Viewport-space top edge; may be negative.
        top: f64,
    },
    /// Stuck but hidden (scrolling down with hide-on-scroll enabled).
    Hidden,
}

impl StickyDecision {
    /// Whether the element leaves normal flow.
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// Decide placement for one frame.
///
/// Non-finite inputs yield [`StickyDecision::Static`].
#[must_use]
pub fn decide(
    scroll: &ScrollSnapshot,
    geometry: &StickyGeometry,
    config: &StickyConfig,
) -> StickyDecision {
    let finite = scroll.offset.is_finite()
        && scroll.previous_offset.is_finite()
        && geometry.anchor_top.is_finite()
        && geometry.element_height.is_finite()
        && geometry.offset_top.is_finite()
        && geometry.boundary_bottom.is_none_or(f64::is_finite);
    if !finite {
        return StickyDecision::Static;
    }

    let offset = scroll.offset.max(0.0);
    let height = geometry.element_height.max(0.0);
    let stick_start = geometry.anchor_top - geometry.offset_top;
    if offset < stick_start {
        return StickyDecision::Static;
    }

    if let Some(bottom) = geometry.boundary_bottom {
        let release_at = bottom - height - geometry.offset_top;
        if offset > release_at {
            return StickyDecision::Floating {
                top: bottom - height - offset,
            };
        }
    }

    if config.hide_on_scroll_down
        && scroll.is_scrolling_down()
        && offset - stick_start > config.hide_after
    {
        return StickyDecision::Hidden;
    }

    StickyDecision::Stuck {
        top: geometry.offset_top,
    }
}
