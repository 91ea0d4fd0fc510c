#![forbid(unsafe_code)]

//! Core: viewport geometry, scroll/resize events, coalescing, and device
//! capability detection.

pub mod device;
pub mod error;
pub mod event;
pub mod event_coalescer;
pub mod geometry;
pub mod logging;

pub use error::InputError;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
