//! Eased speed cap
//!
//! State changes move the cap instead of clamping velocity outright; the flat speed then
//! glides from where it was towards the new cap, faster the harder the player pushes
//! the stick.

use stride_core::math::lerp_clamped;
use stride_core::StopwatchTimer;

/// Flat speeds within this of the cap snap onto it
const SNAP_EPSILON: f32 = 0.05;
/// Keeps the ease finite with no move input
const INPUT_EPSILON: f32 = 0.05;

/// Speed cap and the baseline it eases from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedBudget {
    /// Flat speed at the moment the cap last changed
    pub speed_when_changed: f32,
    /// Cap the flat speed eases towards
    pub current_max_speed: f32,
    change_timer: StopwatchTimer,
}

impl SpeedBudget {
    pub fn new(max_speed: f32) -> Self {
        Self {
            speed_when_changed: max_speed,
            current_max_speed: max_speed,
            change_timer: StopwatchTimer::new(),
        }
    }

    /// Start easing from `flat_speed` towards `max_speed`
    pub fn reset_baseline(&mut self, max_speed: f32, flat_speed: f32) {
        self.change_timer.restart();
        self.speed_when_changed = flat_speed;
        self.current_max_speed = max_speed;
    }

    /// Move the cap without restarting the ease
    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.current_max_speed = max_speed;
    }

    pub fn tick(&mut self, dt: f32) {
        self.change_timer.tick(dt);
    }

    /// Seconds since the baseline was last reset
    pub fn elapsed(&self) -> f32 {
        self.change_timer.elapsed()
    }

    /// Speed allowed for a flat speed of `flat_speed`, or `None` when under the cap
    pub fn limit(&self, flat_speed: f32, duration: f32, input_magnitude: f32) -> Option<f32> {
        if flat_speed <= self.current_max_speed {
            return None;
        }
        let span = duration * (input_magnitude + INPUT_EPSILON);
        let t = if span > 0.0 { self.elapsed() / span } else { 1.0 };
        let eased = lerp_clamped(self.speed_when_changed, self.current_max_speed, t);
        if (eased - self.current_max_speed).abs() < SNAP_EPSILON {
            Some(self.current_max_speed)
        } else {
            Some(eased)
        }
    }
}
