//! Top-level game context.
//!
//! One `Game` value is created by the host when the surface is ready and is
//! passed by reference to whatever needs it. There is no process-wide game
//! pointer.
//!
//! Lifecycle:
//!
//!   initialize -> step* -> stop -> resume -> step* -> finish? -> terminate
//!
//! `stop` pauses stepping (app sent to background), `finish` records that the
//! game asked to exit so the host can wind down, `terminate` releases the game
//! for good. Stepping a stopped or terminated game does nothing.

use glam::Vec3;
use risk_core::{logi, Clock, ClockError};

use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Orientation {
    Landscape = 0,
    Portrait = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
}

impl Screen {
    pub fn orientation(&self) -> Orientation {
        if self.width >= self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorState {
    pub acceleration: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Running,
    Stopped,
    Terminated,
}

pub struct Game {
    pub clock: Clock,
    pub sensor: SensorState,
    pub screen: Screen,
    /// Frames rendered during the last full second.
    pub fps: u32,
    lifecycle: Lifecycle,
    finished: bool,
    frames_this_second: u32,
    second_timer: f64,
}

impl Game {
    pub fn initialize(
        config: &GameConfig,
        screen_width: u32,
        screen_height: u32,
    ) -> Result<Self, ClockError> {
        let clock = Clock::new(config.fixed_dt(), config.max_accumulator)?;
        let screen = Screen {
            width: screen_width,
            height: screen_height,
        };
        logi!(
            "Game initialized: {}x{} {:?}, {} Hz fixed step",
            screen.width,
            screen.height,
            screen.orientation(),
            config.step_rate_hz
        );
        Ok(Self {
            clock,
            sensor: SensorState::default(),
            screen,
            fps: 0,
            lifecycle: Lifecycle::Running,
            finished: false,
            frames_this_second: 0,
            second_timer: 0.0,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle != Lifecycle::Terminated
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by one rendered frame of `real_dt` seconds, calling
    /// `on_fixed_step` once per fixed simulation step. Returns the number of
    /// fixed steps taken.
    pub fn step(&mut self, real_dt: f64, mut on_fixed_step: impl FnMut(f64)) -> u32 {
        match self.lifecycle {
            Lifecycle::Running => {}
            Lifecycle::Stopped => return 0,
            Lifecycle::Terminated => {
                log::warn!("Step called on a terminated game");
                return 0;
            }
        }

        self.clock.advance(real_dt);
        let mut steps = 0;
        while let Some(dt) = self.clock.next_step() {
            on_fixed_step(dt);
            steps += 1;
        }

        self.frames_this_second += 1;
        self.second_timer += self.clock.frame_dt();
        if self.second_timer >= 1.0 {
            self.fps = self.frames_this_second;
            self.frames_this_second = 0;
            self.second_timer -= 1.0;
        }

        steps
    }

    pub fn stop(&mut self) {
        if self.lifecycle == Lifecycle::Running {
            logi!("Game stopped");
            self.lifecycle = Lifecycle::Stopped;
        }
    }

    pub fn resume(&mut self) {
        if self.lifecycle == Lifecycle::Stopped {
            logi!("Game resumed");
            self.clock.resume();
            self.lifecycle = Lifecycle::Running;
        }
    }

    pub fn finish(&mut self) {
        logi!("Game finished");
        self.finished = true;
    }

    pub fn terminate(&mut self) {
        if self.lifecycle != Lifecycle::Terminated {
            logi!(
                "Game terminated after {} frames, {} fixed steps",
                self.clock.frame_count(),
                self.clock.step_count()
            );
            self.lifecycle = Lifecycle::Terminated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        let config = GameConfig {
            step_rate_hz: 8.0,
            max_accumulator: 1.0,
            ..GameConfig::default()
        };
        Game::initialize(&config, 1280, 720).expect("config timing is valid")
    }

    #[test]
    fn orientation_follows_screen_aspect() {
        assert_eq!(
            Screen { width: 1280, height: 720 }.orientation(),
            Orientation::Landscape
        );
        assert_eq!(
            Screen { width: 720, height: 1280 }.orientation(),
            Orientation::Portrait
        );
        assert_eq!(Orientation::Portrait as u8, 1);
    }

    #[test]
    fn initialize_rejects_timing_the_clock_cannot_run() {
        let config = GameConfig {
            step_rate_hz: 1e300,
            ..GameConfig::default()
        };
        let err = Game::initialize(&config, 1280, 720).err().expect("step too small");
        assert!(matches!(err, ClockError::FixedStep(_)));

        let config = GameConfig {
            step_rate_hz: 10.0,
            max_accumulator: 0.05,
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::initialize(&config, 1280, 720),
            Err(ClockError::MaxFrame { .. })
        ));
    }

    #[test]
    fn step_runs_fixed_steps_for_elapsed_time() {
        let mut game = game();
        let mut seen = Vec::new();
        let steps = game.step(0.375, |dt| seen.push(dt));

        assert_eq!(steps, 3);
        assert_eq!(seen, vec![0.125; 3]);
        assert_eq!(game.clock.step_count(), 3);
    }

    #[test]
    fn fps_is_counted_per_second_of_frames() {
        let mut game = game();
        for _ in 0..4 {
            game.step(0.25, |_| {});
        }
        assert_eq!(game.fps, 4);
    }

    #[test]
    fn stopped_game_does_not_step_until_resumed() {
        let mut game = game();
        game.stop();
        assert_eq!(game.step(0.5, |_| {}), 0);
        assert!(game.is_initialized());

        game.resume();
        assert_eq!(game.step(0.25, |_| {}), 2);
    }

    #[test]
    fn terminated_game_ignores_steps_and_resume() {
        let mut game = game();
        assert!(game.is_initialized());
        game.terminate();
        assert!(!game.is_initialized());
        assert_eq!(game.step(0.5, |_| {}), 0);

        game.resume();
        assert!(!game.is_initialized());
        assert_eq!(game.step(0.5, |_| {}), 0);
    }

    #[test]
    fn finish_is_reported_to_host() {
        let mut game = game();
        assert!(!game.is_finished());
        game.finish();
        assert!(game.is_finished());
    }

    #[test]
    fn sensor_starts_at_rest() {
        let mut game = game();
        assert_eq!(game.sensor.acceleration, Vec3::ZERO);
        game.sensor.acceleration = Vec3::new(0.0, -9.81, 0.5);
        assert_eq!(game.sensor.acceleration.y, -9.81);
    }
}
