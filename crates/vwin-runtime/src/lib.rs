#![forbid(unsafe_code)]

//! Runtime: frame scheduling and the viewport driver.
//!
//! The driver turns a stream of host scroll/resize events into one window
//! recomputation per frame, and owns the mount/unmount lifecycle.

pub mod driver;
pub mod frame;

pub use driver::{DriverStats, ViewportDriver};
pub use frame::{FrameHandle, FrameScheduler, ManualFrameScheduler};
