#![forbid(unsafe_code)]

//! Grid column configuration.
//!
//! A grid either has a fixed column count or picks one per breakpoint from
//! the container width. Resolution happens once per resize and always yields
//! at least one column, so row/item index math never divides by zero.

use crate::{Breakpoint, Breakpoints, Responsive};

/// Column count for a windowed grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnConfig {
    /// Same count at every width.
    Fixed(usize),
    /// Count chosen by container-width breakpoint.
    Responsive(Responsive<usize>),
}

impl Default for ColumnConfig {
    /// A single column: a plain list.
    fn default() -> Self {
        Self::Fixed(1)
    }
}

impl From<usize> for ColumnConfig {
    fn from(columns: usize) -> Self {
        Self::Fixed(columns)
    }
}

impl From<Responsive<usize>> for ColumnConfig {
    fn from(columns: Responsive<usize>) -> Self {
        Self::Responsive(columns)
    }
}

impl ColumnConfig {
    /// Responsive configuration from small/medium/large counts.
    #[must_use]
    pub fn responsive(sm: usize, md: usize, lg: usize) -> Self {
        Self::Responsive(
            Responsive::new(sm)
                .at(Breakpoint::Md, md)
                .at(Breakpoint::Lg, lg),
        )
    }

    /// Resolve against a container width. Never returns 0.
    #[must_use]
    pub fn resolve(&self, container_width: f64, breakpoints: &Breakpoints) -> usize {
        let raw = match self {
            Self::Fixed(n) => *n,
            Self::Responsive(map) => *map.resolve(breakpoints.classify_width(container_width)),
        };
        raw.max(1)
    }

    /// Whether the count can change with width.
    #[must_use]
    pub const fn is_responsive(&self) -> bool {
        matches!(self, Self::Responsive(_))
    }
}
