//! Repeating timed tasks with explicit cancellation.
//!
//! A [`RepeatingTask`] is advanced by the frame loop and reports how many
//! intervals elapsed. It stops firing once its [`CancelToken`] is cancelled.
//! The owner keeps a [`TaskHandle`]; dropping the handle (for example when the
//! owning entity is despawned) cancels the task.

use bevy::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Owning handle for a task. Cancels the task when dropped.
#[derive(Debug)]
pub struct TaskHandle {
    token: CancelToken,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if !self.token.is_cancelled() {
            debug!("task handle dropped, cancelling");
        }
        self.token.cancel();
    }
}

const MIN_INTERVAL: Duration = Duration::from_millis(1);
const MAX_INTERVAL: Duration = Duration::from_secs(3600);

/// Interval in seconds as a `Duration` within `MIN_INTERVAL..=MAX_INTERVAL`.
/// NaN and non-positive values give the minimum; infinite or overflowing
/// values give the maximum.
fn interval_duration(secs: f32) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return MIN_INTERVAL;
    }
    Duration::try_from_secs_f32(secs)
        .unwrap_or(MAX_INTERVAL)
        .clamp(MIN_INTERVAL, MAX_INTERVAL)
}

/// Fires every `interval` of advanced time until cancelled.
#[derive(Debug)]
pub struct RepeatingTask {
    timer: Timer,
    token: CancelToken,
}

impl RepeatingTask {
    /// Create a task and the handle that controls it.
    ///
    /// Intervals shorter than a millisecond are raised to one millisecond so a
    /// single long frame can never report an unbounded number of firings.
    /// Intervals are capped at an hour.
    #[must_use]
    pub fn new(interval_secs: f32) -> (Self, TaskHandle) {
        let interval = interval_duration(interval_secs);
        let token = CancelToken::new();
        let task = Self {
            timer: Timer::new(interval, TimerMode::Repeating),
            token: token.clone(),
        };
        (task, TaskHandle { token })
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Advance by `delta` and return how many intervals completed.
    /// Always zero once cancelled.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        if self.is_cancelled() {
            return 0;
        }
        self.timer.tick(delta);
        self.timer.times_finished_this_tick()
    }

    /// Change the interval, keeping the elapsed time.
    pub fn set_interval(&mut self, interval_secs: f32) {
        self.timer.set_duration(interval_duration(interval_secs));
    }
}
