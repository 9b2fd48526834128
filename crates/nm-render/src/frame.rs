//! Frame scheduling: coalesce redraw requests into one paint per frame.
//!
//! The host environment (browser `requestAnimationFrame`, a winit redraw
//! request, a test) implements [`FrameHost`]. The core asks for a frame at
//! most once until the host calls back with the paint.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Something that can call us back on the next display refresh.
pub trait FrameHost {
    /// Arrange for the owner's paint callback to run on the next frame.
    fn request_frame(&mut self);
}

/// A single in-flight "draw requested" flag in front of a [`FrameHost`].
pub struct FrameScheduler {
    pending: bool,
    host: Box<dyn FrameHost>,
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl FrameScheduler {
    pub fn new(host: Box<dyn FrameHost>) -> Self {
        Self {
            pending: false,
            host,
        }
    }

    /// Request a paint. Returns `true` if this call actually asked the host
    /// for a frame, `false` if one was already pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        self.host.request_frame();
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Called by the owner when the host's frame arrives, before painting.
    /// Clearing first means a request made while painting schedules the
    /// next frame instead of being dropped. Returns whether a frame was pending.
    pub fn begin_frame(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }
}

/// A host that only counts requests. The caller drives frames by hand.
#[derive(Debug, Clone, Default)]
pub struct CountingFrameHost {
    requests: Rc<Cell<usize>>,
}

impl CountingFrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared view of the request count that outlives the boxed host.
    pub fn counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.requests)
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl FrameHost for CountingFrameHost {
    fn request_frame(&mut self) {
        self.requests.set(self.requests.get() + 1);
    }
}
