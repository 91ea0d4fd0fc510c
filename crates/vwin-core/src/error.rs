#![forbid(unsafe_code)]

//! Error types for windowing inputs.
//!
//! None of these are surfaced to hosts as failures: the windowing layer
//! absorbs them by rendering the full collection. They exist so the
//! fallback decision can be logged and tested precisely.

use std::fmt;

/// A degenerate input to the windowing calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputError {
    /// Item extent is zero, negative, or not finite.
    InvalidItemExtent(f64),
    /// Container extent is negative or not finite.
    InvalidContainerExtent(f64),
    /// Scroll offset is NaN or infinite.
    NonFiniteScrollOffset(f64),
    /// Column count resolved to zero.
    ZeroColumns,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidItemExtent(v) => write!(f, "item extent must be positive and finite, got {v}"),
            Self::InvalidContainerExtent(v) => {
                write!(f, "container extent must be non-negative and finite, got {v}")
            }
            Self::NonFiniteScrollOffset(v) => write!(f, "scroll offset must be finite, got {v}"),
            Self::ZeroColumns => f.write_str("column count must be at least 1"),
        }
    }
}

impl std::error::Error for InputError {}
