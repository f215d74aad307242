//! The two countdown disciplines used by the simulation.
//!
//! [`TickTimer`] counts simulation frames and therefore runs slower or faster
//! with the tick rate. [`DeadlineTimer`] stores an absolute wall-clock
//! deadline in milliseconds and is independent of the tick rate.

use serde::{Deserialize, Serialize};

/// Milliseconds on the host's monotonic clock.
pub type Millis = u64;

/// Frame-counted countdown, decremented once per simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickTimer {
    remaining: u32,
    duration: u32,
}

impl TickTimer {
    /// An idle timer.
    pub const fn idle() -> Self {
        Self {
            remaining: 0,
            duration: 0,
        }
    }

    /// A timer that is already running for `ticks` frames.
    pub const fn running(ticks: u32) -> Self {
        Self {
            remaining: ticks,
            duration: ticks,
        }
    }

    /// (Re)start the countdown from `ticks`.
    pub fn start(&mut self, ticks: u32) {
        self.remaining = ticks;
        self.duration = ticks;
    }

    /// Advance one frame. Returns `true` on the tick the timer runs out.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Fraction of the window still to run, in `[0, 1]`.
    pub fn fraction_remaining(&self) -> f32 {
        if self.duration == 0 {
            0.0
        } else {
            self.remaining as f32 / self.duration as f32
        }
    }
}

/// Wall-clock deadline. Expiry is evaluated by comparing `now` against the
/// stored deadline rather than by counting down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineTimer {
    started_at: Option<Millis>,
    deadline: Option<Millis>,
}

impl DeadlineTimer {
    /// A timer with no deadline set; [`is_ready`](Self::is_ready) is `true`.
    pub const fn unset() -> Self {
        Self {
            started_at: None,
            deadline: None,
        }
    }

    /// A timer that expires `duration_ms` after `now`.
    pub fn starting_at(now: Millis, duration_ms: Millis) -> Self {
        let mut timer = Self::unset();
        timer.start(now, duration_ms);
        timer
    }

    pub fn start(&mut self, now: Millis, duration_ms: Millis) {
        self.started_at = Some(now);
        self.deadline = Some(now.saturating_add(duration_ms));
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.deadline
    }

    /// `true` once `now` is strictly past the deadline.
    pub fn is_expired(&self, now: Millis) -> bool {
        self.deadline.is_some_and(|d| now > d)
    }

    /// Cooldown reading: `true` if no deadline is set or it has been reached.
    pub fn is_ready(&self, now: Millis) -> bool {
        self.deadline.is_none_or(|d| now >= d)
    }

    /// Fraction of the window still to run, in `[0, 1]`.
    pub fn fraction_remaining(&self, now: Millis) -> f32 {
        match (self.started_at, self.deadline) {
            (Some(start), Some(end)) if end > start && now < end => {
                (end - now) as f32 / (end - start) as f32
            },
            _ => 0.0,
        }
    }
}
