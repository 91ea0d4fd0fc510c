#![forbid(unsafe_code)]

//! Layout primitives for windowed collections.
//!
//! - [`Breakpoint`] / [`Breakpoints`] - classify a container width into a tier
//! - [`Responsive`] - a value per tier with inheritance from smaller tiers
//! - [`ColumnConfig`] - fixed or responsive grid column counts
//! - [`sticky`] - pure sticky/floating placement decisions from scroll state

pub mod columns;
pub mod responsive;
pub mod sticky;

pub use columns::ColumnConfig;
pub use responsive::Responsive;
pub use vwin_core::geometry::{Size, ViewportState};

/// Responsive breakpoint tiers for container widths.
///
/// | Breakpoint | Default width range |
/// |------------|---------------------|
/// | `Sm`       | < 760               |
/// | `Md`       | 760 – 1023          |
/// | `Lg`       | ≥ 1024              |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Breakpoint {
    /// Phones and narrow containers.
    Sm,
    /// Tablets and mid-size containers.
    Md,
    /// Desktop-width containers.
    Lg,
}

impl Breakpoint {
    /// All breakpoints in ascending order.
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Sm, Breakpoint::Md, Breakpoint::Lg];

    /// Ordinal index (0–2).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Breakpoint::Sm => 0,
            Breakpoint::Md => 1,
            Breakpoint::Lg => 2,
        }
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Breakpoint thresholds.
///
/// Each field is the minimum container width for that tier. `Sm` starts at 0.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoints {
    /// Minimum width for `Md`.
    pub md: f64,
    /// Minimum width for `Lg`.
    pub lg: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Breakpoints {
    /// Default thresholds: 760 / 1024.
    pub const DEFAULT: Self = Self {
        md: 760.0,
        lg: 1024.0,
    };

    /// Create thresholds, sanitized to be non-negative and non-decreasing.
    ///
    /// Non-finite values fall back to the default threshold for that tier.
    #[must_use]
    pub fn new(md: f64, lg: f64) -> Self {
        let md = if md.is_finite() { md.max(0.0) } else { Self::DEFAULT.md };
        let lg = if lg.is_finite() { lg.max(md) } else { Self::DEFAULT.lg.max(md) };
        Self { md, lg }
    }

    /// Classify a width. NaN and negative widths classify as `Sm`.
    #[inline]
    #[must_use]
    pub fn classify_width(self, width: f64) -> Breakpoint {
        if width >= self.lg {
            Breakpoint::Lg
        } else if width >= self.md {
            Breakpoint::Md
        } else {
            Breakpoint::Sm
        }
    }

    /// Classify a size by its width.
    #[inline]
    #[must_use]
    pub fn classify_size(self, size: Size) -> Breakpoint {
        self.classify_width(size.width)
    }

    /// Whether `width` is at least tier `min`.
    #[inline]
    #[must_use]
    pub fn at_least(self, width: f64, min: Breakpoint) -> bool {
        self.classify_width(width) >= min
    }

    /// Minimum width for a tier.
    #[must_use]
    pub const fn threshold(self, bp: Breakpoint) -> f64 {
        match bp {
            Breakpoint::Sm => 0.0,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
        }
    }
}
