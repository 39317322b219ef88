//! Stock cooperative tasks: time-sliced tweens and fixed-interval loops.

use super::scheduler::{CooperativeTask, TaskStatus};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Interpolates an `f32` from `start` to `end` across several ticks.
///
/// Each step applies the value for the elapsed time so far; the step after
/// the duration has elapsed applies `end` exactly and finishes.
pub struct Tween {
    start: f32,
    end: f32,
    duration: Duration,
    elapsed: Duration,
    apply: Box<dyn FnMut(f32)>,
}

impl Tween {
    pub fn new(start: f32, end: f32, duration: Duration, apply: impl FnMut(f32) + 'static) -> Self {
        Self {
            start,
            end,
            duration,
            elapsed: Duration::ZERO,
            apply: Box::new(apply),
        }
    }

    /// Linear interpolation with `t` clamped to `0.0..=1.0`.
    pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        start + (end - start) * t
    }

    /// Fraction of the duration already elapsed.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

impl CooperativeTask for Tween {
    fn step(&mut self, dt: Duration) -> TaskStatus {
        if self.elapsed >= self.duration {
            (self.apply)(self.end);
            return TaskStatus::Done;
        }

        let value = Self::lerp(self.start, self.end, self.progress());
        (self.apply)(value);
        self.elapsed += dt;
        TaskStatus::Pending
    }
}

impl Debug for Tween {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tween")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

/// Repeating act-then-wait loop.
///
/// Acts on its first step, then again each time at least `interval` has
/// accumulated. Acts at most once per tick.
pub struct Periodic {
    interval: Duration,
    waited: Duration,
    remaining: Option<u32>,
    action: Box<dyn FnMut()>,
}

impl Periodic {
    pub fn new(interval: Duration, action: impl FnMut() + 'static) -> Self {
        Self {
            interval,
            waited: interval,
            remaining: None,
            action: Box::new(action),
        }
    }

    /// Stops after `count` actions.
    pub fn times(mut self, count: u32) -> Self {
        self.remaining = Some(count);
        self
    }
}

impl CooperativeTask for Periodic {
    fn step(&mut self, dt: Duration) -> TaskStatus {
        if self.remaining == Some(0) {
            return TaskStatus::Done;
        }

        if self.waited >= self.interval {
            (self.action)();
            self.waited = Duration::ZERO;
            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
                if *remaining == 0 {
                    return TaskStatus::Done;
                }
            }
        }
        self.waited += dt;
        TaskStatus::Pending
    }
}

impl Debug for Periodic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Periodic")
            .field("interval", &self.interval)
            .field("waited", &self.waited)
            .field("remaining", &self.remaining)
            .finish()
    }
}
