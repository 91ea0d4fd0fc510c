#![forbid(unsafe_code)]

//! vwin public facade crate.
//!
//! Re-exports the windowing calculator, its configuration, the geometry and
//! event primitives, and (with the default `runtime` feature) the frame
//! driver. The prelude covers day-to-day use.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use vwin_core::InputError;
pub use vwin_core::device::{
    DetectInputs, DeviceCapabilities, DeviceClass, DeviceInfo, DeviceProfile,
    ParseDeviceClassError, StaticDevice,
};
pub use vwin_core::event::{Event, ScrollEvent};
pub use vwin_core::event_coalescer::EventCoalescer;
pub use vwin_core::geometry::{Size, ViewportState};

// --- Layout re-exports -----------------------------------------------------

pub use vwin_layout::sticky::{ScrollSnapshot, StickyConfig, StickyDecision, StickyGeometry};
pub use vwin_layout::{Breakpoint, Breakpoints, ColumnConfig, Responsive};

// --- Widget re-exports -----------------------------------------------------

pub use vwin_widgets::{
    ConfigError, FallbackPolicy, FallbackReason, ItemContext, Phase, PlaceholderKind,
    RenderOutput, ScrollAlign, VirtualizedList, VirtualizedState, Window, WindowConfig,
    WindowInputs, WindowMode, compute_window, scroll_offset_for_index,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use vwin_runtime::{
    DriverStats, FrameHandle, FrameScheduler, ManualFrameScheduler, ViewportDriver,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for vwin hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid configuration or environment override.
    Config(ConfigError),
    /// Degenerate window inputs, for hosts that validate up front.
    Input(InputError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration: {err}"),
            Self::Input(err) => write!(f, "window input: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Input(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<InputError> for Error {
    fn from(err: InputError) -> Self {
        Self::Input(err)
    }
}

/// Standard result type for vwin APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load [`WindowConfig`] from `VWIN_*` environment variables.
pub fn config_from_env() -> Result<WindowConfig> {
    Ok(WindowConfig::from_env()?)
}

/// Validate inputs, then compute the window.
///
/// [`compute_window`] absorbs degenerate inputs by rendering everything;
/// this variant reports them instead.
pub fn try_compute_window(inputs: &WindowInputs) -> Result<Window> {
    inputs.validate()?;
    Ok(compute_window(inputs))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ColumnConfig, DeviceCapabilities, DeviceInfo, Error, Event, ItemContext, RenderOutput,
        Result, ScrollEvent, Size, ViewportState, VirtualizedList, VirtualizedState, Window,
        WindowConfig, WindowInputs, compute_window,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{ManualFrameScheduler, ViewportDriver};

    pub use crate::{core, layout, widgets};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use vwin_core as core;
pub use vwin_layout as layout;
#[cfg(feature = "runtime")]
pub use vwin_runtime as runtime;
pub use vwin_widgets as widgets;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_convert_and_display() {
        let err: Error = InputError::ZeroColumns.into();
        assert_eq!(err, Error::Input(InputError::ZeroColumns));
        assert!(err.to_string().starts_with("window input:"));
        assert!(std::error::Error::source(&err).is_some());

        let err: Error = ConfigError::InvalidContainerHeight(-1.0).into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn try_compute_reports_degenerate_inputs() {
        let bad = WindowInputs::list(10, 0.0).with_container_extent(100.0);
        assert_eq!(
            try_compute_window(&bad),
            Err(Error::Input(InputError::InvalidItemExtent(0.0)))
        );
        let good = WindowInputs::list(1000, 50.0).with_container_extent(600.0);
        assert_eq!(try_compute_window(&good).map(|w| w.visible_count), Ok(16));
    }

    #[test]
    fn prelude_is_usable() {
        use crate::prelude::*;
        let window = compute_window(&WindowInputs::list(1000, 50.0).with_container_extent(600.0));
        let _: Result<Window> = Ok(window);
    }
}
