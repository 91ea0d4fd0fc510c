#![forbid(unsafe_code)]

//! Geometric primitives for scroll containers.
//!
//! All values are in a caller-chosen 1D unit along each axis (typically CSS
//! or logical pixels). The scroll axis is vertical; widths only feed
//! responsive column resolution.

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Zero size (an unmeasured container).
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Whether both dimensions are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

/// Read-only snapshot of a scrollable container.
///
/// Refreshed from scroll and resize signals; never persisted. A snapshot with
/// `container_extent == 0` is *unmeasured* (the container is not attached or
/// has not been laid out yet).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    /// Distance scrolled from the top of the content.
    pub scroll_offset: f64,
    /// Visible extent of the container along the scroll axis.
    pub container_extent: f64,
    /// Width of the container, used to pick responsive column counts.
    pub container_width: f64,
}

impl ViewportState {
    /// State before the container is attached.
    pub const UNMEASURED: Self = Self {
        scroll_offset: 0.0,
        container_extent: 0.0,
        container_width: 0.0,
    };

    /// Create a viewport snapshot.
    #[inline]
    pub const fn new(scroll_offset: f64, container_extent: f64, container_width: f64) -> Self {
        Self {
            scroll_offset,
            container_extent,
            container_width,
        }
    }

    /// Create a snapshot from a container size and scroll offset.
    #[inline]
    pub const fn from_size(size: Size, scroll_offset: f64) -> Self {
        Self::new(scroll_offset, size.height, size.width)
    }

    /// Whether the container has a positive extent along the scroll axis.
    #[inline]
    pub fn is_measured(&self) -> bool {
        self.container_extent > 0.0
    }

    /// Container size as a [`Size`].
    #[inline]
    pub const fn container_size(&self) -> Size {
        Size::new(self.container_width, self.container_extent)
    }

    /// Copy with a new scroll offset.
    #[must_use]
    pub const fn with_scroll_offset(self, scroll_offset: f64) -> Self {
        Self {
            scroll_offset,
            ..self
        }
    }

    /// Copy with a new container size.
    #[must_use]
    pub const fn with_size(self, size: Size) -> Self {
        Self {
            container_extent: size.height,
            container_width: size.width,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_empty_and_finite() {
        assert!(Size::ZERO.is_empty());
        assert!(Size::new(10.0, -1.0).is_empty());
        assert!(!Size::new(10.0, 20.0).is_empty());
        assert!(!Size::new(f64::NAN, 1.0).is_finite());
        // NaN compares false, so a NaN size is treated as empty.
        assert!(Size::new(f64::NAN, 1.0).is_empty());
    }

    #[test]
    fn unmeasured_until_extent_positive() {
        assert!(!ViewportState::UNMEASURED.is_measured());
        assert!(!ViewportState::new(0.0, 0.0, 800.0).is_measured());
        assert!(ViewportState::new(0.0, 600.0, 800.0).is_measured());
    }

    #[test]
    fn with_size_keeps_offset() {
        let state = ViewportState::new(120.0, 600.0, 800.0).with_size(Size::new(1024.0, 700.0));
        assert_eq!(state.scroll_offset, 120.0);
        assert_eq!(state.container_extent, 700.0);
        assert_eq!(state.container_width, 1024.0);
        assert_eq!(state.container_size(), Size::new(1024.0, 700.0));
    }

    #[test]
    fn from_size_maps_height_to_extent() {
        let state = ViewportState::from_size(Size::new(320.0, 480.0), 10.0);
        assert_eq!(state, ViewportState::new(10.0, 480.0, 320.0));
    }
}
