#![forbid(unsafe_code)]

//! Window configuration.
//!
//! [`WindowConfig`] collects the knobs shared by list and grid windowing.
//! Values come from `Default`, from builder methods, or from `VWIN_*`
//! environment variables layered over the defaults:
//!
//! | Variable | Field | Example |
//! |----------|-------|---------|
//! | `VWIN_OVERSCAN` | `overscan` | `3` |
//! | `VWIN_FALLBACK_THRESHOLD` | `fallback_threshold` | `20` |
//! | `VWIN_BREAKPOINT_MD` | `breakpoints.md` | `760` |
//! | `VWIN_BREAKPOINT_LG` | `breakpoints.lg` | `1024` |
//! | `VWIN_SCROLL_IDLE_MS` | `scroll_idle` | `150` |
//! | `VWIN_CONTAINER_HEIGHT` | `container_height` | `600` |
//!
//! Unset variables keep the default; set-but-invalid variables are an error.

use std::env;
use std::fmt;
use std::time::Duration;

use vwin_layout::Breakpoints;

use crate::virtualized::FallbackPolicy;

/// Extra rows rendered on each side of the viewport.
pub const DEFAULT_OVERSCAN: usize = 2;

/// Collections shorter than this render in full.
pub const DEFAULT_FALLBACK_THRESHOLD: usize = 20;

/// Time without scroll events before the scrolling flag clears.
pub const DEFAULT_SCROLL_IDLE: Duration = Duration::from_millis(150);

/// Shared windowing configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WindowConfig {
    /// Rows rendered beyond each edge of the viewport.
    pub overscan: usize,
    /// Below this many items, windowing is skipped.
    pub fallback_threshold: usize,
    /// Width thresholds for responsive column counts.
    pub breakpoints: Breakpoints,
    /// Fixed container height; overrides the measured extent when set.
    pub container_height: Option<f64>,
    /// Idle time after the last scroll event before scrolling is over.
    pub scroll_idle: Duration,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            overscan: DEFAULT_OVERSCAN,
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            breakpoints: Breakpoints::DEFAULT,
            container_height: None,
            scroll_idle: DEFAULT_SCROLL_IDLE,
        }
    }
}

impl WindowConfig {
    /// Set overscan rows.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Set the full-render threshold.
    #[must_use]
    pub fn with_fallback_threshold(mut self, threshold: usize) -> Self {
        self.fallback_threshold = threshold;
        self
    }

    /// Set breakpoints.
    #[must_use]
    pub fn with_breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Use a fixed container height instead of the measured one.
    #[must_use]
    pub fn with_container_height(mut self, height: f64) -> Self {
        self.container_height = Some(height);
        self
    }

    /// Set the scroll idle time.
    #[must_use]
    pub fn with_scroll_idle(mut self, idle: Duration) -> Self {
        self.scroll_idle = idle;
        self
    }

    /// Fallback policy derived from this configuration.
    #[must_use]
    pub fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy::new(self.fallback_threshold)
    }

    /// Check values that the type system does not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(height) = self.container_height
            && !(height.is_finite() && height > 0.0)
        {
            return Err(ConfigError::InvalidContainerHeight(height));
        }
        let bp = self.breakpoints;
        if !(bp.md.is_finite() && bp.lg.is_finite() && bp.md >= 0.0 && bp.lg >= bp.md) {
            return Err(ConfigError::UnorderedBreakpoints { md: bp.md, lg: bp.lg });
        }
        Ok(())
    }

    /// Defaults overridden by `VWIN_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = parse_var::<usize>(&lookup, "VWIN_OVERSCAN")? {
            config.overscan = v;
        }
        if let Some(v) = parse_var::<usize>(&lookup, "VWIN_FALLBACK_THRESHOLD")? {
            config.fallback_threshold = v;
        }
        let md = parse_var::<f64>(&lookup, "VWIN_BREAKPOINT_MD")?;
        let lg = parse_var::<f64>(&lookup, "VWIN_BREAKPOINT_LG")?;
        if md.is_some() || lg.is_some() {
            config.breakpoints = Breakpoints {
                md: md.unwrap_or(config.breakpoints.md),
                lg: lg.unwrap_or(config.breakpoints.lg),
            };
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "VWIN_SCROLL_IDLE_MS")? {
            config.scroll_idle = Duration::from_millis(ms);
        }
        if let Some(height) = parse_var::<f64>(&lookup, "VWIN_CONTAINER_HEIGHT")? {
            config.container_height = Some(height);
        }

        config.validate()?;
        vwin_core::debug!(
            overscan = config.overscan,
            fallback_threshold = config.fallback_threshold,
            "window config loaded"
        );
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

/// Invalid window configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// An environment variable did not parse.
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
    /// `container_height` is zero, negative, or not finite.
    InvalidContainerHeight(f64),
    /// Breakpoints are negative, non-finite, or out of order.
    UnorderedBreakpoints {
        /// Medium threshold.
        md: f64,
        /// Large threshold.
        lg: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: {value:?}"),
            Self::InvalidContainerHeight(h) => {
                write!(f, "container height must be positive and finite, got {h}")
            }
            Self::UnorderedBreakpoints { md, lg } => {
                write!(f, "breakpoints must satisfy 0 <= md <= lg, got md={md} lg={lg}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.overscan, 2);
        assert_eq!(config.fallback_threshold, 20);
        assert_eq!(config.breakpoints, Breakpoints::DEFAULT);
        assert_eq!(config.container_height, None);
        assert_eq!(config.scroll_idle, Duration::from_millis(150));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_lookup_is_default() {
        let config = WindowConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, WindowConfig::default());
    }

    #[test]
    fn lookup_overrides() {
        let config = WindowConfig::from_lookup(lookup(&[
            ("VWIN_OVERSCAN", "4"),
            ("VWIN_FALLBACK_THRESHOLD", " 50 "),
            ("VWIN_BREAKPOINT_LG", "1280"),
            ("VWIN_SCROLL_IDLE_MS", "90"),
            ("VWIN_CONTAINER_HEIGHT", "640"),
        ]))
        .unwrap();
        assert_eq!(config.overscan, 4);
        assert_eq!(config.fallback_threshold, 50);
        assert_eq!(config.breakpoints.md, 760.0);
        assert_eq!(config.breakpoints.lg, 1280.0);
        assert_eq!(config.scroll_idle, Duration::from_millis(90));
        assert_eq!(config.container_height, Some(640.0));
    }

    #[test]
    fn invalid_value_is_reported() {
        let err = WindowConfig::from_lookup(lookup(&[("VWIN_OVERSCAN", "-1")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "VWIN_OVERSCAN",
                value: "-1".into()
            }
        );
        assert!(err.to_string().contains("VWIN_OVERSCAN"));
    }

    #[test]
    fn unordered_breakpoints_rejected() {
        let err = WindowConfig::from_lookup(lookup(&[("VWIN_BREAKPOINT_MD", "2000")])).unwrap_err();
        assert!(matches!(err, ConfigError::UnorderedBreakpoints { .. }));
    }

    #[test]
    fn bad_container_height_rejected() {
        let config = WindowConfig::default().with_container_height(0.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidContainerHeight(0.0))
        );
        let config = WindowConfig::default().with_container_height(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_chain() {
        let config = WindowConfig::default()
            .with_overscan(0)
            .with_fallback_threshold(0)
            .with_breakpoints(Breakpoints::new(600.0, 900.0))
            .with_scroll_idle(Duration::ZERO);
        assert_eq!(config.overscan, 0);
        assert_eq!(config.fallback_policy().threshold(), 0);
        assert_eq!(config.breakpoints.lg, 900.0);
    }
}
