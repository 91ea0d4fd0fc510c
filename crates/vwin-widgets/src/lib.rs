#![forbid(unsafe_code)]

//! Windowed lists and grids.
//!
//! [`virtualized`] holds the windowing calculation and the state that feeds
//! it; [`config`] holds the shared knobs.

pub mod config;
pub mod virtualized;

pub use config::{ConfigError, WindowConfig};
pub use virtualized::{
    FallbackPolicy, FallbackReason, ItemContext, Phase, PlaceholderKind, RenderOutput,
    ScrollAlign, VirtualizedList, VirtualizedState, Window, WindowInputs, WindowMode,
    compute_window, scroll_offset_for_index,
};
