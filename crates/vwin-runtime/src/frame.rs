#![forbid(unsafe_code)]

//! Frame scheduling.
//!
//! A host exposes its "next frame" primitive (an animation-frame callback, a
//! vsync tick, a render loop iteration) through [`FrameScheduler`]. The
//! driver requests at most one frame at a time and cancels it on teardown.
//!
//! [`ManualFrameScheduler`] records requests and lets the caller decide when
//! frames fire. It is deterministic and is what tests and headless hosts use.

/// Opaque identifier of a requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Wrap a raw host identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Host frame primitive.
pub trait FrameScheduler {
    /// Ask for a callback on the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn request_frame(&mut self) -> FrameHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle);
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Box<S> {
    fn request_frame(&mut self) -> FrameHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle);
    }
}

/// Scheduler whose frames fire only when the caller says so.
#[derive(Debug, Default, Clone)]
pub struct ManualFrameScheduler {
    next_id: u64,
    pending: Vec<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualFrameScheduler {
    /// Create an idle scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames requested and not yet fired or cancelled.
    #[must_use]
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Whether any frame is waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take every pending frame, oldest first, as if they all fired now.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    /// Take the oldest pending frame.
    pub fn take_next(&mut self) -> Option<FrameHandle> {
        (!self.pending.is_empty()).then(|| self.pending.remove(0))
    }

    /// Total frames ever requested.
    #[must_use]
    pub fn requested_count(&self) -> u64 {
        self.requested
    }

    /// Total frames cancelled while pending.
    #[must_use]
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_ordered() {
        let mut s = ManualFrameScheduler::new();
        let a = s.request_frame();
        let b = s.request_frame();
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(s.pending(), &[a, b]);
        assert_eq!(s.requested_count(), 2);
    }

    #[test]
    fn cancel_removes_pending() {
        let mut s = ManualFrameScheduler::new();
        let a = s.request_frame();
        s.cancel_frame(a);
        assert!(!s.has_pending());
        assert_eq!(s.cancelled_count(), 1);
        // Second cancel of the same handle is a no-op.
        s.cancel_frame(a);
        assert_eq!(s.cancelled_count(), 1);
    }

    #[test]
    fn take_due_drains() {
        let mut s = ManualFrameScheduler::new();
        let a = s.request_frame();
        assert_eq!(s.take_due(), vec![a]);
        assert!(s.take_due().is_empty());
        assert_eq!(s.take_next(), None);
    }

    #[test]
    fn works_through_mut_ref() {
        fn request(mut s: impl FrameScheduler) -> FrameHandle {
            s.request_frame()
        }
        let mut s = ManualFrameScheduler::new();
        let h = request(&mut s);
        assert_eq!(s.take_next(), Some(h));
        assert_eq!(FrameHandle::new(h.id()), h);
    }
}
