//! Time system for the Ironhaven simulation
//!
//! All timestamps inside the core are milliseconds of game time since start.
//! Heat decay, log pruning and awareness decay are driven by [`Interval`]s
//! checked from the single per-frame tick rather than by detached timers.

use serde::{Deserialize, Serialize};

/// Milliseconds of game time
pub type Millis = u64;

pub const SECOND: Millis = 1_000;
pub const MINUTE: Millis = 60 * SECOND;

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since game start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Whether the simulation is paused
    pub paused: bool,
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = raw_delta.clamp(0.0, self.config.max_delta_time) * self.config.time_scale;
        self.total_time += self.delta_time as f64;
    }

    /// Current timestamp in milliseconds
    pub fn now(&self) -> Millis {
        (self.total_time * 1000.0) as Millis
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

/// A periodic trigger polled with the current timestamp.
///
/// `poll` returns how many whole periods elapsed since the last firing, so a
/// long frame still applies every missed decay step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    period: Millis,
    last_fired: Millis,
}

impl Interval {
    pub fn new(period: Millis) -> Self {
        Self::starting_at(period, 0)
    }

    pub fn starting_at(period: Millis, now: Millis) -> Self {
        Self {
            period: period.max(1),
            last_fired: now,
        }
    }

    pub fn period(&self) -> Millis {
        self.period
    }

    /// Number of periods that completed since the last call
    pub fn poll(&mut self, now: Millis) -> u32 {
        if now < self.last_fired + self.period {
            return 0;
        }
        let fired = (now - self.last_fired) / self.period;
        self.last_fired += fired * self.period;
        fired as u32
    }

    /// Whether at least one period completed (consumes all of them)
    pub fn ready(&mut self, now: Millis) -> bool {
        self.poll(now) > 0
    }

    /// Restart the period from `now`
    pub fn reset(&mut self, now: Millis) {
        self.last_fired = now;
    }
}
