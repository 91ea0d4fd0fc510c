#![forbid(unsafe_code)]

//! Viewport windowing for large collections of fixed-extent items.
//!
//! Given a scroll offset, a container extent and a per-row extent, this
//! module computes the smallest contiguous index range that must be
//! materialized to cover the viewport plus an overscan margin, and the
//! spacer extents that keep the total scrollable extent equal to that of the
//! full collection.
//!
//! Lists and grids share one implementation: a list is a grid with one
//! column. All index math is done in rows and converted to item indices by
//! multiplying with the column count.
//!
//! # Core Types
//!
//! - [`WindowInputs`] - one snapshot of everything the calculation needs
//! - [`Window`] - the result: index range, spacers, and visible range
//! - [`compute_window`] - the pure calculation
//! - [`FallbackPolicy`] - when to skip windowing and render everything
//! - [`VirtualizedState`] - owns inputs across events and recomputes
//! - [`VirtualizedList`] - borrows items and drives a render callback
//!
//! # Example
//!
//! ```
//! use vwin_widgets::virtualized::{compute_window, WindowInputs};
//!
//! let inputs = WindowInputs::list(1000, 50.0)
//!     .with_container_extent(600.0)
//!     .with_scroll_offset(2000.0);
//! let window = compute_window(&inputs);
//! assert_eq!(window.start_index, 38);
//! assert_eq!(window.visible_count, 16);
//! assert_eq!(window.leading_spacer, 38.0 * 50.0);
//! ```
//!
//! # Invariants
//!
//! 1. `start_index + visible_count <= total_items`.
//! 2. `leading_spacer + rendered_extent() + trailing_spacer == content_extent()`.
//! 3. `start_row * item_extent <= scroll_offset` (the window never starts
//!    below the viewport top).
//! 4. Recomputing from identical inputs yields an identical window.
//!
//! # Failure Modes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | `container_extent == 0` | Unmeasured window: nothing rendered, trailing spacer holds the full extent |
//! | Non-positive or non-finite item extent | Full window (render everything) |
//! | Non-finite scroll offset or invalid container extent | Full window |
//! | Negative scroll offset | Clamped to 0 |
//! | Scroll offset past the end | Clamped to the maximum scroll offset |

use std::fmt;
use std::ops::Range;

use vwin_core::InputError;
use vwin_core::device::DeviceInfo;
use vwin_core::event::Event;
use vwin_core::geometry::ViewportState;
use vwin_layout::ColumnConfig;

use crate::config::{DEFAULT_FALLBACK_THRESHOLD, DEFAULT_OVERSCAN, WindowConfig};

// ============================================================================
// Inputs
// ============================================================================

/// Everything one window calculation depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowInputs {
    /// Number of items in the collection.
    pub total_items: usize,
    /// Extent of one item (list) or one row (grid) along the scroll axis.
    pub item_extent: f64,
    /// Rows rendered beyond each edge of the viewport.
    pub overscan: usize,
    /// Current scroll offset of the container.
    pub scroll_offset: f64,
    /// Visible extent of the container; `0` means unmeasured.
    pub container_extent: f64,
    /// Items per row; `1` for lists.
    pub columns: usize,
}

impl WindowInputs {
    /// Inputs for a list of `total_items` items of `item_extent` each.
    #[must_use]
    pub fn list(total_items: usize, item_extent: f64) -> Self {
        Self::grid(total_items, item_extent, 1)
    }

    /// Inputs for a grid with `columns` items per row of `row_extent`.
    #[must_use]
    pub fn grid(total_items: usize, row_extent: f64, columns: usize) -> Self {
        Self {
            total_items,
            item_extent: row_extent,
            overscan: DEFAULT_OVERSCAN,
            scroll_offset: 0.0,
            container_extent: 0.0,
            columns,
        }
    }

    /// Set overscan rows.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Set the scroll offset.
    #[must_use]
    pub fn with_scroll_offset(mut self, scroll_offset: f64) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    /// Set the container extent.
    #[must_use]
    pub fn with_container_extent(mut self, container_extent: f64) -> Self {
        self.container_extent = container_extent;
        self
    }

    /// Take offset and extent from a viewport snapshot.
    #[must_use]
    pub fn with_viewport(mut self, viewport: &ViewportState) -> Self {
        self.scroll_offset = viewport.scroll_offset;
        self.container_extent = viewport.container_extent;
        self
    }

    /// Check for degenerate values.
    ///
    /// Negative but finite scroll offsets are accepted (elastic overscroll)
    /// and clamped during the calculation.
    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.item_extent.is_finite() && self.item_extent > 0.0) {
            return Err(InputError::InvalidItemExtent(self.item_extent));
        }
        if !(self.container_extent.is_finite() && self.container_extent >= 0.0) {
            return Err(InputError::InvalidContainerExtent(self.container_extent));
        }
        if !self.scroll_offset.is_finite() {
            return Err(InputError::NonFiniteScrollOffset(self.scroll_offset));
        }
        if self.columns == 0 {
            return Err(InputError::ZeroColumns);
        }
        Ok(())
    }

    /// Number of rows: `ceil(total_items / columns)`.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.total_items.div_ceil(self.columns.max(1))
    }

    /// Full scrollable extent of the collection.
    #[must_use]
    pub fn content_extent(&self) -> f64 {
        rows_extent(self.total_rows(), self.item_extent)
    }

    /// Largest meaningful scroll offset.
    #[must_use]
    pub fn max_scroll_offset(&self) -> f64 {
        (self.content_extent() - self.container_extent).max(0.0)
    }
}

// ============================================================================
// Window
// ============================================================================

/// Why windowing was skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FallbackReason {
    /// Fewer items than the fallback threshold.
    BelowThreshold,
    /// The device is classified as resource-constrained.
    ConstrainedDevice,
    /// Inputs were degenerate.
    InvalidInput(InputError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowThreshold => f.write_str("below threshold"),
            Self::ConstrainedDevice => f.write_str("constrained device"),
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
        }
    }
}

/// How a [`Window`] was produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowMode {
    /// Only the computed slice is rendered.
    Windowed,
    /// Every item is rendered.
    Full(FallbackReason),
    /// The container is not measured yet; nothing is rendered.
    Unmeasured,
}

/// The slice of a collection to materialize.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// First item to render.
    pub start_index: usize,
    /// Number of items to render from `start_index`.
    pub visible_count: usize,
    /// Empty extent before the first rendered row.
    pub leading_spacer: f64,
    /// Empty extent after the last rendered row.
    pub trailing_spacer: f64,
    /// Items per row used for this window.
    pub columns: usize,
    /// Row extent used for this window (`0` when the input extent was invalid).
    pub item_extent: f64,
    /// Collection length this window was computed for.
    pub total_items: usize,
    /// How the window was produced.
    pub mode: WindowMode,
    visible: Range<usize>,
}

impl Window {
    /// A window that renders nothing. Used before the first computation.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            start_index: 0,
            visible_count: 0,
            leading_spacer: 0.0,
            trailing_spacer: 0.0,
            columns: 1,
            item_extent: 0.0,
            total_items: 0,
            mode: WindowMode::Unmeasured,
            visible: 0..0,
        }
    }

    /// Render every item, without spacers.
    #[must_use]
    pub fn full(inputs: &WindowInputs, reason: FallbackReason) -> Self {
        let item_extent = match reason {
            FallbackReason::InvalidInput(_) => 0.0,
            _ => inputs.item_extent,
        };
        // Everything is rendered, but only the viewport's rows count as visible.
        let visible = if inputs.validate().is_ok() && inputs.container_extent > 0.0 {
            rows_to_indices(visible_row_span(inputs), inputs.columns, inputs.total_items)
        } else {
            0..inputs.total_items
        };
        Self {
            start_index: 0,
            visible_count: inputs.total_items,
            leading_spacer: 0.0,
            trailing_spacer: 0.0,
            columns: inputs.columns.max(1),
            item_extent,
            total_items: inputs.total_items,
            mode: WindowMode::Full(reason),
            visible,
        }
    }

    /// Render nothing, but reserve the full extent so the scrollbar is right.
    #[must_use]
    pub fn unmeasured(inputs: &WindowInputs) -> Self {
        Self {
            start_index: 0,
            visible_count: 0,
            leading_spacer: 0.0,
            trailing_spacer: inputs.content_extent(),
            columns: inputs.columns.max(1),
            item_extent: inputs.item_extent,
            total_items: inputs.total_items,
            mode: WindowMode::Unmeasured,
            visible: 0..0,
        }
    }

    /// Item index range to render.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index()
    }

    /// One past the last rendered item.
    #[must_use]
    pub fn end_index(&self) -> usize {
        self.start_index + self.visible_count
    }

    /// Whether nothing is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible_count == 0
    }

    /// Whether windowing was applied.
    #[must_use]
    pub fn is_windowed(&self) -> bool {
        matches!(self.mode, WindowMode::Windowed)
    }

    /// Whether an index is rendered.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    /// Items strictly inside the viewport, without overscan.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        self.visible.clone()
    }

    /// Strictly visible indices as a list.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible.clone().collect()
    }

    /// First rendered row.
    #[must_use]
    pub fn start_row(&self) -> usize {
        self.start_index / self.columns
    }

    /// Number of rendered rows (a partial last row counts).
    #[must_use]
    pub fn rendered_rows(&self) -> usize {
        self.end_index().div_ceil(self.columns) - self.start_row()
    }

    /// Extent occupied by rendered rows.
    #[must_use]
    pub fn rendered_extent(&self) -> f64 {
        match self.mode {
            // Full windows lay out every row themselves; nothing is spaced.
            WindowMode::Full(_) => self.content_extent(),
            _ => rows_extent(self.rendered_rows(), self.item_extent),
        }
    }

    /// Extent of the whole collection.
    #[must_use]
    pub fn content_extent(&self) -> f64 {
        rows_extent(self.total_items.div_ceil(self.columns), self.item_extent)
    }

    /// Row and column of an item.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.total_items).then(|| (index / self.columns, index % self.columns))
    }

    /// Content-space offset of an item's row.
    #[must_use]
    pub fn item_offset(&self, index: usize) -> Option<f64> {
        self.position_of(index)
            .map(|(row, _)| rows_extent(row, self.item_extent))
    }
}

#[inline]
fn rows_extent(rows: usize, extent: f64) -> f64 {
    rows as f64 * extent
}

/// Row containing `offset`, corrected so `row * extent <= offset`.
fn row_at_offset(offset: f64, extent: f64, total_rows: usize) -> usize {
    debug_assert!(offset >= 0.0 && extent > 0.0);
    let mut row = ((offset / extent).floor() as usize).min(total_rows);
    while row > 0 && rows_extent(row, extent) > offset {
        row -= 1;
    }
    row
}

/// First row ending at or beyond `offset`, corrected so `row * extent >= offset`.
fn row_end_at_offset(offset: f64, extent: f64, total_rows: usize) -> usize {
    let mut row = ((offset / extent).ceil() as usize).min(total_rows);
    while row < total_rows && rows_extent(row, extent) < offset {
        row += 1;
    }
    row
}

/// Rows intersecting the viewport, for valid and measured inputs.
fn visible_row_span(inputs: &WindowInputs) -> Range<usize> {
    let extent = inputs.item_extent;
    let total_rows = inputs.total_rows();
    let offset = inputs.scroll_offset.clamp(0.0, inputs.max_scroll_offset());
    let first = row_at_offset(offset, extent, total_rows);
    let end = row_end_at_offset(offset + inputs.container_extent, extent, total_rows);
    first..end
}

fn rows_to_indices(rows: Range<usize>, columns: usize, total_items: usize) -> Range<usize> {
    let start = rows.start.saturating_mul(columns).min(total_items);
    let end = rows.end.saturating_mul(columns).min(total_items);
    start..end
}

// ============================================================================
// Calculation
// ============================================================================

/// Compute the window for one snapshot of inputs.
///
/// This is the pure windowing calculation. It does not apply the fallback
/// threshold or the device classification; see [`FallbackPolicy::apply`].
#[must_use]
pub fn compute_window(inputs: &WindowInputs) -> Window {
    if let Err(err) = inputs.validate() {
        vwin_core::warn!(%err, "degenerate window inputs, rendering full collection");
        return Window::full(inputs, FallbackReason::InvalidInput(err));
    }
    if inputs.container_extent == 0.0 {
        return Window::unmeasured(inputs);
    }

    let extent = inputs.item_extent;
    let columns = inputs.columns;
    let total_rows = inputs.total_rows();
    let visible_rows = visible_row_span(inputs);
    let (first_visible_row, end_visible_row) = (visible_rows.start, visible_rows.end);

    // Rendered rows: visible rows plus overscan on both sides.
    let start_row = first_visible_row.saturating_sub(inputs.overscan);
    let rows_in_viewport = (inputs.container_extent / extent).ceil() as usize;
    let span = rows_in_viewport.saturating_add(inputs.overscan.saturating_mul(2));
    let end_row = start_row
        .saturating_add(span)
        .max(end_visible_row.saturating_add(inputs.overscan))
        .min(total_rows);

    let start_index = start_row.saturating_mul(columns).min(inputs.total_items);
    let end_index = end_row.saturating_mul(columns).min(inputs.total_items);

    Window {
        start_index,
        visible_count: end_index - start_index,
        leading_spacer: rows_extent(start_row, extent),
        trailing_spacer: rows_extent(total_rows - end_row, extent),
        columns,
        item_extent: extent,
        total_items: inputs.total_items,
        mode: WindowMode::Windowed,
        visible: rows_to_indices(visible_rows, columns, inputs.total_items),
    }
}

/// Where to place an item when scrolling it into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    /// Item row at the top of the viewport.
    #[default]
    Start,
    /// Item row centered in the viewport.
    Center,
    /// Item row at the bottom of the viewport.
    End,
    /// Scroll as little as possible to make the row fully visible.
    Nearest,
}

/// Scroll offset that brings `index` into view, clamped to the scroll range.
///
/// Returns `None` for out-of-range indices or degenerate inputs.
#[must_use]
pub fn scroll_offset_for_index(inputs: &WindowInputs, index: usize, align: ScrollAlign) -> Option<f64> {
    if index >= inputs.total_items || inputs.validate().is_err() {
        return None;
    }
    let extent = inputs.item_extent;
    let viewport = inputs.container_extent;
    let row_top = rows_extent(index / inputs.columns, extent);
    let row_bottom = row_top + extent;
    let target = match align {
        ScrollAlign::Start => row_top,
        ScrollAlign::Center => row_top - (viewport - extent) / 2.0,
        ScrollAlign::End => row_bottom - viewport,
        ScrollAlign::Nearest => {
            let current = inputs.scroll_offset;
            if row_top < current {
                row_top
            } else if row_bottom > current + viewport {
                row_bottom - viewport
            } else {
                current
            }
        }
    };
    Some(target.clamp(0.0, inputs.max_scroll_offset()))
}

// ============================================================================
// Fallback policy
// ============================================================================

/// Decides when windowing is not worth it.
///
/// Short collections and constrained devices render everything: windowing
/// overhead buys nothing for a handful of items, and scroll-driven
/// re-rendering costs more than it saves on weak hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    threshold: usize,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_THRESHOLD)
    }
}

impl FallbackPolicy {
    /// Policy rendering collections shorter than `threshold` in full.
    #[must_use]
    pub const fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Never fall back because of length.
    #[must_use]
    pub const fn never() -> Self {
        Self::new(0)
    }

    /// Length threshold.
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Reason to skip windowing, if any.
    pub fn reason(&self, inputs: &WindowInputs, device: &impl DeviceInfo) -> Option<FallbackReason> {
        if let Err(err) = inputs.validate() {
            return Some(FallbackReason::InvalidInput(err));
        }
        if inputs.total_items < self.threshold {
            return Some(FallbackReason::BelowThreshold);
        }
        if device.is_resource_constrained() {
            return Some(FallbackReason::ConstrainedDevice);
        }
        None
    }

    /// Compute the window, or the full collection when windowing is skipped.
    #[must_use]
    pub fn apply(&self, inputs: &WindowInputs, device: &impl DeviceInfo) -> Window {
        match self.reason(inputs, device) {
            // Degenerate inputs are reported by the calculation itself.
            None | Some(FallbackReason::InvalidInput(_)) => compute_window(inputs),
            Some(reason) => {
                vwin_core::debug!(
                    total = inputs.total_items,
                    threshold = self.threshold,
                    %reason,
                    "windowing skipped"
                );
                Window::full(inputs, reason)
            }
        }
    }
}

// ============================================================================
// VirtualizedState
// ============================================================================

/// Callback receiving the strictly visible item indices.
pub type VisibleItemsCallback = Box<dyn FnMut(&[usize]) + Send>;

/// Lifecycle of a windowed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No measured container yet.
    #[default]
    Unmeasured,
    /// A measured container; windows are recomputed on every change.
    Measured,
    /// Torn down; no further computation happens.
    Unmounted,
}

/// Windowing state for one container.
///
/// Holds the latest viewport snapshot, collection length, item extent and
/// column configuration, and recomputes a [`Window`] from scratch on
/// [`recompute`](Self::recompute). Hosts call that at most once per frame;
/// see `vwin-runtime` for a driver that does the frame coalescing.
pub struct VirtualizedState {
    config: WindowConfig,
    columns: ColumnConfig,
    item_extent: f64,
    total_items: usize,
    viewport: ViewportState,
    resolved_columns: usize,
    phase: Phase,
    window: Window,
    scrolling: bool,
    on_visible_items: Option<VisibleItemsCallback>,
    last_reported: Option<Range<usize>>,
    recompute_count: u64,
}

impl fmt::Debug for VirtualizedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualizedState")
            .field("config", &self.config)
            .field("columns", &self.columns)
            .field("item_extent", &self.item_extent)
            .field("total_items", &self.total_items)
            .field("viewport", &self.viewport)
            .field("resolved_columns", &self.resolved_columns)
            .field("phase", &self.phase)
            .field("window", &self.window)
            .field("scrolling", &self.scrolling)
            .field("on_visible_items", &self.on_visible_items.is_some())
            .field("recompute_count", &self.recompute_count)
            .finish()
    }
}

impl VirtualizedState {
    /// State for a list of `total_items` items of `item_extent` each.
    #[must_use]
    pub fn new(item_extent: f64, total_items: usize, config: WindowConfig) -> Self {
        Self {
            config,
            columns: ColumnConfig::default(),
            item_extent,
            total_items,
            viewport: ViewportState::UNMEASURED,
            resolved_columns: 1,
            phase: Phase::Unmeasured,
            window: Window::empty(),
            scrolling: false,
            on_visible_items: None,
            last_reported: None,
            recompute_count: 0,
        }
    }

    /// Use a grid column configuration (`item_extent` is then a row extent).
    #[must_use]
    pub fn with_columns(mut self, columns: impl Into<ColumnConfig>) -> Self {
        self.columns = columns.into();
        self.resolved_columns = self.resolve_columns();
        self
    }

    /// Register the visible-items callback.
    #[must_use]
    pub fn on_visible_items<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[usize]) + Send + 'static,
    {
        self.on_visible_items = Some(Box::new(callback));
        self
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Latest computed window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Latest viewport snapshot.
    #[must_use]
    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    /// Collection length.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Resolved column count for the current width.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.resolved_columns
    }

    /// Whether a scroll is in progress (set by the host or driver).
    #[must_use]
    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    /// Number of recomputations performed.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Mark scrolling as started or finished.
    pub fn set_scrolling(&mut self, scrolling: bool) {
        self.scrolling = scrolling;
    }

    /// Update the collection length.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
    }

    /// Update the item (or row) extent.
    pub fn set_item_extent(&mut self, item_extent: f64) {
        self.item_extent = item_extent;
    }

    /// Replace the viewport snapshot. Columns are re-resolved when the width changes.
    pub fn set_viewport(&mut self, viewport: ViewportState) {
        let width_changed = viewport.container_width != self.viewport.container_width;
        self.viewport = viewport;
        if width_changed {
            self.resolved_columns = self.resolve_columns();
        }
    }

    /// Fold one event into the viewport snapshot.
    ///
    /// Returns `true` when the snapshot changed. Ignored once unmounted.
    pub fn apply_event(&mut self, event: &Event) -> bool {
        if self.phase == Phase::Unmounted {
            return false;
        }
        let next = match *event {
            Event::Scroll(scroll) => self.viewport.with_scroll_offset(scroll.offset),
            Event::Resize(size) => self.viewport.with_size(size),
            Event::Attach(viewport) => viewport,
            Event::Detach => ViewportState::UNMEASURED,
        };
        if next == self.viewport {
            return false;
        }
        self.set_viewport(next);
        true
    }

    /// Inputs for the next calculation.
    #[must_use]
    pub fn inputs(&self) -> WindowInputs {
        let container_extent = self
            .config
            .container_height
            .unwrap_or(self.viewport.container_extent);
        WindowInputs::grid(self.total_items, self.item_extent, self.resolved_columns)
            .with_overscan(self.config.overscan)
            .with_scroll_offset(self.viewport.scroll_offset)
            .with_container_extent(container_extent)
    }

    /// Recompute the window from scratch.
    ///
    /// Fires the visible-items callback at most once, and only when the
    /// strictly visible range differs from the last one reported. Once
    /// unmounted this returns the last window without computing.
    pub fn recompute(&mut self, device: &impl DeviceInfo) -> &Window {
        if self.phase == Phase::Unmounted {
            vwin_core::trace!("recompute after unmount ignored");
            return &self.window;
        }

        let inputs = self.inputs();
        let _span = vwin_core::debug_span!(
            "window_recompute",
            total = inputs.total_items,
            columns = inputs.columns,
            offset = inputs.scroll_offset,
            extent = inputs.container_extent
        )
        .entered();

        self.window = self.config.fallback_policy().apply(&inputs, device);
        self.recompute_count += 1;

        let next_phase = if self.window.mode == WindowMode::Unmeasured {
            Phase::Unmeasured
        } else {
            Phase::Measured
        };
        if next_phase != self.phase {
            vwin_core::info!(from = ?self.phase, to = ?next_phase, "window phase change");
            self.phase = next_phase;
        }

        self.report_visible();
        vwin_core::debug!(
            start = self.window.start_index,
            count = self.window.visible_count,
            mode = ?self.window.mode,
            "window recomputed"
        );
        &self.window
    }

    /// Offset that brings `index` into view, for the host to apply.
    #[must_use]
    pub fn scroll_offset_for(&self, index: usize, align: ScrollAlign) -> Option<f64> {
        scroll_offset_for_index(&self.inputs(), index, align)
    }

    /// Tear down: drop the callback and stop all further computation.
    pub fn unmount(&mut self) {
        if self.phase != Phase::Unmounted {
            vwin_core::info!(recomputes = self.recompute_count, "window unmounted");
        }
        self.phase = Phase::Unmounted;
        self.on_visible_items = None;
        self.scrolling = false;
    }

    fn resolve_columns(&self) -> usize {
        self.columns
            .resolve(self.viewport.container_width, &self.config.breakpoints)
    }

    fn report_visible(&mut self) {
        if self.window.mode == WindowMode::Unmeasured {
            // Nothing is on screen; the next measured window reports again.
            self.last_reported = None;
            return;
        }
        let visible = self.window.visible_range();
        if self.last_reported.as_ref() == Some(&visible) {
            return;
        }
        if let Some(callback) = self.on_visible_items.as_mut() {
            let indices: Vec<usize> = visible.clone().collect();
            callback(&indices);
        }
        self.last_reported = Some(visible);
    }
}

// ============================================================================
// VirtualizedList
// ============================================================================

/// Whole-collection placeholder states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// The container is not measured yet.
    Loading,
    /// The collection has no items.
    Empty,
}

/// Per-item information handed to the render callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemContext {
    /// Index in the collection.
    pub index: usize,
    /// Grid row (equal to `index` for lists).
    pub row: usize,
    /// Grid column (`0` for lists).
    pub column: usize,
    /// Content-space offset of the item's row.
    pub offset: f64,
    /// Whether a scroll is in progress; hosts may render cheap stand-ins.
    pub is_scrolling: bool,
}

/// Output of [`VirtualizedList::render`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput<R> {
    /// Render a placeholder instead of any items.
    Placeholder(PlaceholderKind),
    /// Render these items between two spacers.
    Items {
        /// Extent of the spacer before the items.
        leading_spacer: f64,
        /// Rendered items, in index order.
        items: Vec<R>,
        /// Extent of the spacer after the items.
        trailing_spacer: f64,
    },
}

impl<R> RenderOutput<R> {
    /// Rendered items, or an empty slice for placeholders.
    #[must_use]
    pub fn items(&self) -> &[R] {
        match self {
            Self::Items { items, .. } => items,
            Self::Placeholder(_) => &[],
        }
    }
}

/// A borrowed collection rendered through a [`VirtualizedState`].
#[derive(Debug)]
pub struct VirtualizedList<'a, T> {
    items: &'a [T],
}

impl<'a, T> VirtualizedList<'a, T> {
    /// Wrap a collection.
    #[must_use]
    pub fn new(items: &'a [T]) -> Self {
        Self { items }
    }

    /// Collection length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Materialize the current window through `render`.
    ///
    /// `state.window()` is used as-is; the range is clamped to the borrowed
    /// slice in case the two disagree about the length.
    pub fn render<R, F>(&self, state: &VirtualizedState, mut render: F) -> RenderOutput<R>
    where
        F: FnMut(ItemContext, &T) -> R,
    {
        if self.items.is_empty() {
            return RenderOutput::Placeholder(PlaceholderKind::Empty);
        }
        let window = state.window();
        if window.mode == WindowMode::Unmeasured {
            return RenderOutput::Placeholder(PlaceholderKind::Loading);
        }

        let end = window.end_index().min(self.items.len());
        let start = window.start_index.min(end);
        let columns = window.columns.max(1);
        let is_scrolling = state.is_scrolling();

        let _span = vwin_core::debug_span!(
            "virtualized_render",
            start = start,
            end = end,
            items = self.items.len()
        )
        .entered();

        let items = self.items[start..end]
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let index = start + i;
                let row = index / columns;
                let ctx = ItemContext {
                    index,
                    row,
                    column: index % columns,
                    offset: rows_extent(row, window.item_extent),
                    is_scrolling,
                };
                render(ctx, item)
            })
            .collect();

        RenderOutput::Items {
            leading_spacer: window.leading_spacer,
            items,
            trailing_spacer: window.trailing_spacer,
        }
    }
}
