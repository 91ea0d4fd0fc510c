#![forbid(unsafe_code)]

//! Breakpoint-keyed values with inheritance.
//!
//! [`Responsive<T>`] holds a base value for [`Breakpoint::Sm`] plus optional
//! overrides for larger tiers. A tier without an override inherits from the
//! nearest smaller tier that has one.
//!
//! ```
//! use vwin_layout::{Breakpoint, Responsive};
//!
//! let columns = Responsive::new(1).at(Breakpoint::Lg, 4);
//! assert_eq!(columns.resolve(Breakpoint::Sm), &1);
//! assert_eq!(columns.resolve(Breakpoint::Md), &1); // inherits from Sm
//! assert_eq!(columns.resolve(Breakpoint::Lg), &4);
//! ```
//!
//! `resolve` never fails: the base value always exists.

use super::Breakpoint;

/// A value per breakpoint tier.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Responsive<T> {
    base: T,
    md: Option<T>,
    lg: Option<T>,
}

impl<T> Responsive<T> {
    /// Create with a base value used by every tier until overridden.
    #[must_use]
    pub fn new(base: T) -> Self {
        Self {
            base,
            md: None,
            lg: None,
        }
    }

    /// Create from explicit per-tier values.
    #[must_use]
    pub fn from_tiers(sm: T, md: Option<T>, lg: Option<T>) -> Self {
        Self { base: sm, md, lg }
    }

    /// Set a tier's value (builder).
    #[must_use]
    pub fn at(mut self, bp: Breakpoint, value: T) -> Self {
        self.set(bp, value);
        self
    }

    /// Set a tier's value. Setting `Sm` replaces the base value.
    pub fn set(&mut self, bp: Breakpoint, value: T) {
        match bp {
            Breakpoint::Sm => self.base = value,
            Breakpoint::Md => self.md = Some(value),
            Breakpoint::Lg => self.lg = Some(value),
        }
    }

    /// Remove a tier's override. Clearing `Sm` is a no-op.
    pub fn clear(&mut self, bp: Breakpoint) {
        match bp {
            Breakpoint::Sm => {}
            Breakpoint::Md => self.md = None,
            Breakpoint::Lg => self.lg = None,
        }
    }

    /// Resolve the value for a tier, walking down to `Sm`.
    #[must_use]
    pub fn resolve(&self, bp: Breakpoint) -> &T {
        let md = self.md.as_ref();
        let lg = self.lg.as_ref();
        match bp {
            Breakpoint::Sm => &self.base,
            Breakpoint::Md => md.unwrap_or(&self.base),
            Breakpoint::Lg => lg.or(md).unwrap_or(&self.base),
        }
    }

    /// Whether a tier has its own value. `Sm` always does.
    #[must_use]
    pub fn has_explicit(&self, bp: Breakpoint) -> bool {
        match bp {
            Breakpoint::Sm => true,
            Breakpoint::Md => self.md.is_some(),
            Breakpoint::Lg => self.lg.is_some(),
        }
    }

    /// Explicitly set tiers and their values, in ascending order.
    pub fn explicit_values(&self) -> impl Iterator<Item = (Breakpoint, &T)> {
        [
            (Breakpoint::Sm, Some(&self.base)),
            (Breakpoint::Md, self.md.as_ref()),
            (Breakpoint::Lg, self.lg.as_ref()),
        ]
        .into_iter()
        .filter_map(|(bp, v)| v.map(|v| (bp, v)))
    }

    /// Map every stored value.
    #[must_use]
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Responsive<U> {
        Responsive {
            base: f(&self.base),
            md: self.md.as_ref().map(&f),
            lg: self.lg.as_ref().map(&f),
        }
    }
}

impl<T: Clone> Responsive<T> {
    /// Resolve and clone.
    #[must_use]
    pub fn resolve_cloned(&self, bp: Breakpoint) -> T {
        self.resolve(bp).clone()
    }
}

impl<T: Default> Default for Responsive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Responsive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Responsive(")?;
        for (i, (bp, val)) in self.explicit_values().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{bp}={val}")?;
        }
        write!(f, ")")
    }
}
