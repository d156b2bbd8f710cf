/// A status update emitted after each transferred block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub phase: &'static str,
    pub current: usize,
    pub max: usize,
}

/// Receives transfer progress. Best-effort; it cannot fail a transfer.
pub trait ProgressSink {
    fn status(&mut self, status: &Status);
}

impl<F: FnMut(&Status)> ProgressSink for F {
    fn status(&mut self, status: &Status) {
        self(status)
    }
}

/// No-op sink that discards all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn status(&mut self, _status: &Status) {}
}
