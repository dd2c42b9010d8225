//! Display refresh scheduling.

use std::time::{Duration, Instant};

/// Ticket for one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Fires requested frames at a fixed refresh interval.
///
/// A request fires once, on the first refresh after it was made. Callers
/// that want a continuous loop request the next frame from inside the
/// frame they are handling.
#[derive(Debug)]
pub struct FrameScheduler {
    interval: Duration,
    next_id: u64,
    /// Outstanding requests in request order.
    pending: Vec<FrameHandle>,
    last_refresh: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_id: 0,
            pending: Vec::new(),
            last_refresh: None,
        }
    }

    /// Scheduler refreshing `fps` times per second.
    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Request a callback on the next refresh.
    pub fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(handle);
        handle
    }

    /// Withdraw a request. Returns false if it already fired or was never
    /// made.
    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|&h| h != handle);
        self.pending.len() != before
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    /// Time left until the next refresh with work to do, or `None` when no
    /// frame is requested.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if self.pending.is_empty() {
            return None;
        }
        Some(match self.last_refresh {
            Some(last) => (last + self.interval).saturating_duration_since(now),
            None => Duration::ZERO,
        })
    }

    /// Run a refresh if one is due, handing back the requests it fires.
    pub fn take_due(&mut self, now: Instant) -> Vec<FrameHandle> {
        if self.time_until_due(now) != Some(Duration::ZERO) {
            return Vec::new();
        }
        self.last_refresh = Some(now);
        std::mem::take(&mut self.pending)
    }
}
