//! Fixed-timestep game clock.
//!
//! Each rendered frame reports how much wall-clock time passed. The clock
//! converts that into a whole number of owed fixed steps and keeps the
//! remainder for the next frame. A frame's delta is capped at `max_frame_dt`,
//! and `fixed_dt` has a floor, so one frame never owes more than
//! `max_frame_dt / fixed_dt` steps.

use std::time::Instant;

use thiserror::Error;

pub const DEFAULT_FIXED_DT: f64 = 1.0 / 60.0;
pub const DEFAULT_MAX_FRAME_DT: f64 = 0.25;

/// Shortest fixed step accepted (1 kHz).
pub const MIN_FIXED_DT: f64 = 1.0 / 1000.0;
/// Longest frame the clock will catch up on.
pub const MAX_FRAME_DT: f64 = 1.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClockError {
    #[error("fixed step {0}s must be finite and at least {min}s", min = MIN_FIXED_DT)]
    FixedStep(f64),

    #[error(
        "max frame time {max_frame_dt}s must be finite, between the fixed step {fixed_dt}s and {}s",
        MAX_FRAME_DT
    )]
    MaxFrame { fixed_dt: f64, max_frame_dt: f64 },
}

pub struct Clock {
    fixed_dt: f64,
    max_frame_dt: f64,
    remainder: f64,
    owed_steps: u32,
    frame_dt: f64,
    elapsed: f64,
    step_count: u64,
    frame_count: u64,
    last_instant: Instant,
}

impl Clock {
    pub fn new(fixed_dt: f64, max_frame_dt: f64) -> Result<Self, ClockError> {
        if !fixed_dt.is_finite() || fixed_dt < MIN_FIXED_DT {
            return Err(ClockError::FixedStep(fixed_dt));
        }
        if !max_frame_dt.is_finite() || max_frame_dt < fixed_dt || max_frame_dt > MAX_FRAME_DT {
            return Err(ClockError::MaxFrame {
                fixed_dt,
                max_frame_dt,
            });
        }
        Ok(Self {
            fixed_dt,
            max_frame_dt,
            remainder: 0.0,
            owed_steps: 0,
            frame_dt: 0.0,
            elapsed: 0.0,
            step_count: 0,
            frame_count: 0,
            last_instant: Instant::now(),
        })
    }

    /// Start a frame using the wall-clock time since the previous one.
    /// Returns the fixed steps now owed.
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt)
    }

    /// Start a frame of `real_dt` seconds. Non-finite and negative deltas
    /// count as zero. Returns the fixed steps now owed.
    pub fn advance(&mut self, real_dt: f64) -> u32 {
        let mut frame_dt = if real_dt.is_finite() { real_dt.max(0.0) } else { 0.0 };
        if frame_dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms, capping to {:.1}ms",
                frame_dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            frame_dt = self.max_frame_dt;
        }
        self.frame_dt = frame_dt;
        self.frame_count += 1;

        let pending = self.remainder + frame_dt;
        let whole = (pending / self.fixed_dt).floor();
        self.remainder = pending - whole * self.fixed_dt;
        // `whole` is bounded by (max_frame_dt + fixed_dt) / MIN_FIXED_DT.
        self.owed_steps = self.owed_steps.saturating_add(whole as u32);
        self.owed_steps
    }

    /// Take one owed step, returning its length.
    pub fn next_step(&mut self) -> Option<f64> {
        if self.owed_steps == 0 {
            return None;
        }
        self.owed_steps -= 1;
        self.step_count += 1;
        self.elapsed += self.fixed_dt;
        Some(self.fixed_dt)
    }

    /// How far the simulation is into the next step, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        self.remainder / self.fixed_dt
    }

    /// Drop owed and partial steps so time spent stopped is not replayed.
    pub fn resume(&mut self) {
        self.last_instant = Instant::now();
        self.remainder = 0.0;
        self.owed_steps = 0;
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    pub fn max_frame_dt(&self) -> f64 {
        self.max_frame_dt
    }

    pub fn frame_dt(&self) -> f64 {
        self.frame_dt
    }

    pub fn owed_steps(&self) -> u32 {
        self.owed_steps
    }

    /// Simulated time, the sum of all steps taken.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
            remainder: 0.0,
            owed_steps: 0,
            frame_dt: 0.0,
            elapsed: 0.0,
            step_count: 0,
            frame_count: 0,
            last_instant: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(clock: &mut Clock) -> u32 {
        let mut steps = 0;
        while clock.next_step().is_some() {
            steps += 1;
        }
        steps
    }

    #[test]
    fn owes_whole_fixed_steps_only() {
        let mut clock = Clock::new(0.125, 1.0).unwrap();
        assert_eq!(clock.advance(0.4375), 3);
        assert_eq!(drain(&mut clock), 3);
        assert_eq!(clock.alpha(), 0.5);
        assert_eq!(clock.elapsed(), 0.375);
    }

    #[test]
    fn remainder_carries_into_next_frame() {
        let mut clock = Clock::new(0.125, 1.0).unwrap();
        assert_eq!(clock.advance(0.0625), 0);
        assert_eq!(clock.advance(0.0625), 1);
        assert_eq!(drain(&mut clock), 1);
        assert_eq!(clock.step_count(), 1);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut clock = Clock::new(0.125, 0.5).unwrap();
        assert_eq!(clock.advance(3.0), 4);
        assert_eq!(clock.frame_dt(), 0.5);
    }

    #[test]
    fn bad_deltas_count_as_zero() {
        let mut clock = Clock::default();
        for dt in [-1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(clock.advance(dt), 0);
            assert_eq!(clock.frame_dt(), 0.0);
        }
        assert_eq!(drain(&mut clock), 0);
    }

    #[test]
    fn resume_discards_owed_time() {
        let mut clock = Clock::new(0.125, 1.0).unwrap();
        clock.advance(0.5);
        clock.resume();
        assert_eq!(clock.owed_steps(), 0);
        assert_eq!(drain(&mut clock), 0);
    }

    #[test]
    fn zero_or_tiny_fixed_step_is_rejected() {
        for fixed_dt in [0.0, -0.1, 1e-300, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(Clock::new(fixed_dt, 0.25), Err(ClockError::FixedStep(_))),
                "fixed_dt {fixed_dt}"
            );
        }
    }

    #[test]
    fn max_frame_must_cover_one_step_and_stay_bounded() {
        assert!(matches!(
            Clock::new(0.1, 0.05),
            Err(ClockError::MaxFrame { .. })
        ));
        assert!(matches!(
            Clock::new(0.1, 10.0),
            Err(ClockError::MaxFrame { .. })
        ));
        assert!(matches!(
            Clock::new(0.1, f64::NAN),
            Err(ClockError::MaxFrame { .. })
        ));
    }

    #[test]
    fn smallest_step_and_longest_frame_owe_a_bounded_count() {
        let mut clock = Clock::new(MIN_FIXED_DT, MAX_FRAME_DT).unwrap();
        let owed = clock.advance(f64::MAX);
        assert!((999..=1001).contains(&owed), "owed {owed}");
        assert_eq!(drain(&mut clock), owed);
    }

    #[test]
    fn default_clock_uses_sixty_hertz() {
        let clock = Clock::default();
        assert_eq!(clock.fixed_dt(), DEFAULT_FIXED_DT);
        assert_eq!(clock.max_frame_dt(), DEFAULT_MAX_FRAME_DT);
    }
}
