/// Opaque token for one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's per-frame callback mechanism.
///
/// The engine requests at most one frame at a time and cancels it on teardown.
pub trait FrameHost {
    /// Schedule one callback and return its handle.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a scheduled callback. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A frame host driven by hand: requested frames queue up until the caller fires them.
#[derive(Debug, Default)]
pub struct ManualFrameHost {
    next_id: u64,
    pending: Option<FrameHandle>,
    cancelled: Vec<FrameHandle>,
    requested: u64,
}

impl ManualFrameHost {
    /// Create a host with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// The scheduled callback, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Remove and return the scheduled callback so the caller can fire it.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Handles cancelled so far, in cancellation order.
    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Total number of `request_frame` calls.
    pub fn requested(&self) -> u64 {
        self.requested
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}
