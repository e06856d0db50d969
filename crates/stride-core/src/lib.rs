//! Stride Core - Shared primitives for the Stride locomotion core
//!
//! This crate provides the foundational pieces used by the physics and game crates:
//! - Vector math (re-exported from glam) plus plane projection helpers
//! - Countdown and stopwatch timers driven by explicit deltas
//! - Fixed-timestep game time for running frame and physics rates side by side

pub mod math;
pub mod time;
pub mod timer;

pub use glam::{Quat, Vec2, Vec3};
pub use time::{GameTime, TimeConfig, TimeError};
pub use timer::{CountdownTimer, StopwatchTimer};
