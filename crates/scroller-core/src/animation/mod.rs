#![forbid(unsafe_code)]

//! Frame-driven animation primitives.
//!
//! Smoothing runs and inertial decay are not self-rescheduling callbacks.
//! Each owner keeps a [`TokenSource`] and a [`FrameQueue`]; starting a run
//! issues a fresh [`AnimationToken`] and schedules its next step in the queue.
//! Once per animation frame the owner drains the queue and applies only the
//! steps whose token is still current.
//!
//! # Invariants
//!
//! 1. Tokens are strictly increasing; a token is never reissued.
//! 2. At most one token is current per source.
//! 3. A step scheduled under a superseded token is discarded at its frame
//!    check, so at most one stale frame per run is ever observed.
//! 4. Draining the queue empties it; steps scheduled while handling the
//!    drained batch land in the next frame.

pub mod smooth;

/// Generation identifier for one animation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationToken(u64);

impl AnimationToken {
    /// Raw generation number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Issues tokens and remembers which one is current.
#[derive(Debug, Clone, Default)]
pub struct TokenSource {
    next: u64,
    current: Option<AnimationToken>,
}

impl TokenSource {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: 0,
            current: None,
        }
    }

    /// Issue a fresh token and make it current, superseding the previous one.
    pub fn issue(&mut self) -> AnimationToken {
        let token = AnimationToken(self.next);
        self.next = self.next.saturating_add(1);
        self.current = Some(token);
        token
    }

    /// Invalidate the current token without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    /// Whether `token` is still the current one.
    #[must_use]
    pub fn is_current(&self, token: AnimationToken) -> bool {
        self.current == Some(token)
    }
}

/// A step waiting for the next animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledFrame<T> {
    pub token: AnimationToken,
    pub step: T,
}

/// Steps scheduled for the next animation frame.
#[derive(Debug, Clone)]
pub struct FrameQueue<T> {
    pending: Vec<ScheduledFrame<T>>,
}

impl<T> Default for FrameQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameQueue<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Schedule `step` for the next frame under `token`.
    pub fn schedule(&mut self, token: AnimationToken, step: T) {
        self.pending.push(ScheduledFrame { token, step });
    }

    /// Take every step scheduled so far.
    pub fn drain(&mut self) -> Vec<ScheduledFrame<T>> {
        std::mem::take(&mut self.pending)
    }

    /// Whether any step waits for a frame.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every waiting step.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_monotonic_and_supersede() {
        let mut src = TokenSource::new();
        let a = src.issue();
        let b = src.issue();
        assert!(b > a);
        assert!(!src.is_current(a));
        assert!(src.is_current(b));
        src.invalidate();
        assert!(!src.is_current(b));
        let c = src.issue();
        assert_eq!(c.get(), 2);
    }

    #[test]
    fn queue_drain_empties() {
        let mut src = TokenSource::new();
        let mut q = FrameQueue::new();
        let t = src.issue();
        q.schedule(t, 1u8);
        q.schedule(t, 2u8);
        let frames = q.drain();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].step, 2);
        assert!(q.is_empty());
    }
}
