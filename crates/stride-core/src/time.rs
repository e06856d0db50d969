//! Time system for Stride
//!
//! Tracks frame delta time and accumulates it into fixed physics steps, so a host can run
//! the per-frame hook and the per-physics-tick hook at independent rates.

use serde::{Deserialize, Serialize};

/// Errors raised by an unusable time configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    #[error("Fixed timestep must be positive, got {0}")]
    InvalidTimestep(f32),

    #[error("Maximum delta time must be at least one fixed step ({fixed}), got {max}")]
    InvalidMaxDelta { fixed: f32, max: f32 },
}

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for physics (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 50.0,
            max_delta_time: 0.25,
        }
    }
}

impl TimeConfig {
    /// Check that the configuration can drive a simulation
    pub fn validate(&self) -> Result<(), TimeError> {
        if !(self.fixed_timestep > 0.0) {
            return Err(TimeError::InvalidTimestep(self.fixed_timestep));
        }
        if self.max_delta_time < self.fixed_timestep {
            return Err(TimeError::InvalidMaxDelta {
                fixed: self.fixed_timestep,
                max: self.max_delta_time,
            });
        }
        Ok(())
    }
}

/// Game time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Fixed steps processed since start
    pub fixed_step_count: u64,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(TimeConfig::default())
    }
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
            fixed_step_count: 0,
            fixed_accumulator: 0.0,
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;
        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        self.fixed_step_count += steps as u64;
        steps
    }

    /// The fixed step length in seconds
    pub fn fixed_delta(&self) -> f32 {
        self.config.fixed_timestep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time() {
        let mut time = GameTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);

        let mut slow = GameTime::new(TimeConfig {
            time_scale: 0.5,
            ..Default::default()
        });
        slow.update(0.04);
        assert!((slow.delta_time - 0.02).abs() < 1e-6);
        assert!((slow.unscaled_delta_time - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_steps_accumulate_across_frames() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.02,
            ..Default::default()
        });

        // Three 60 Hz frames cover two and a half 50 Hz steps
        let mut steps = 0;
        for _ in 0..3 {
            time.update(1.0 / 60.0);
            steps += time.fixed_steps();
        }
        assert_eq!(steps, 2);
        assert_eq!(time.fixed_step_count, 2);
    }

    #[test]
    fn test_max_delta_clamps_long_frames() {
        let mut time = GameTime::default();
        time.update(5.0);
        assert_eq!(time.unscaled_delta_time, 0.25);
        assert_eq!(time.fixed_steps(), 12);
    }

    #[test]
    fn test_validate_rejects_bad_timestep() {
        let config = TimeConfig {
            fixed_timestep: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(TimeError::InvalidTimestep(0.0)));

        let config = TimeConfig {
            fixed_timestep: 0.5,
            max_delta_time: 0.1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TimeError::InvalidMaxDelta { .. })));
        assert!(TimeConfig::default().validate().is_ok());
    }
}
