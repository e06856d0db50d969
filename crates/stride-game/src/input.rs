//! Input latching for locomotion actions
//!
//! Hosts forward raw events through [`InputHandler`]; the controller reads the resulting
//! [`InputState`] during its physics tick and clears the edge flags once the tick is done.

use glam::Vec2;
use stride_core::math::clamp_unit;

/// Edge and level state of one button
///
/// `pressed` and `released` survive until the end of the next physics tick, whether or
/// not anything consumed them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputLatch {
    /// Went down since the last physics tick
    pub pressed: bool,
    /// Currently down
    pub held: bool,
    /// Went up since the last physics tick
    pub released: bool,
}

impl InputLatch {
    /// Record a button edge
    pub fn set(&mut self, down: bool) {
        if down {
            if !self.held {
                self.pressed = true;
            }
            self.held = true;
        } else {
            if self.held {
                self.released = true;
            }
            self.held = false;
        }
    }

    /// Pressed this tick or still held from before
    pub fn is_active(&self) -> bool {
        self.pressed || self.held
    }

    /// Drop the edge flags, keeping the level
    pub fn clear_edges(&mut self) {
        self.pressed = false;
        self.released = false;
    }
}

/// Current state of all locomotion inputs
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Jump button latch
    pub jump: InputLatch,
    /// Crouch button latch
    pub crouch: InputLatch,
    /// Move vector, x = strafe, y = forward, at most unit length
    pub move_input: Vec2,
    /// Pointer look delta accumulated since the last frame tick
    pub look_delta: Vec2,
    /// Stick look rate, applied every frame tick
    pub look_rate: Vec2,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear edge flags (called once at the end of every physics tick)
    pub fn clear_edges(&mut self) {
        self.jump.clear_edges();
        self.crouch.clear_edges();
    }
}

/// Routes host input callbacks into an [`InputState`]
#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    /// Current input state
    pub state: InputState,
}

impl InputHandler {
    /// Create a new input handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Move stick or keys; vectors longer than one are normalized
    pub fn on_move(&mut self, input: Vec2) {
        self.state.move_input = clamp_unit(input);
    }

    /// Look input; pointer deltas accumulate, stick values replace the current rate
    pub fn on_look(&mut self, input: Vec2, is_pointer: bool) {
        if is_pointer {
            self.state.look_delta += input;
        } else {
            self.state.look_rate = clamp_unit(input);
        }
    }

    /// Jump button edge
    pub fn on_jump(&mut self, down: bool) {
        self.state.jump.set(down);
    }

    /// Crouch button edge
    pub fn on_crouch(&mut self, down: bool) {
        self.state.crouch.set(down);
    }

    /// Take the pointer delta gathered since the last call
    pub fn take_look_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.state.look_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_edges() {
        let mut handler = InputHandler::new();
        handler.on_jump(true);
        assert!(handler.state.jump.pressed);
        assert!(handler.state.jump.held);

        // Repeat events while held do not re-trigger
        handler.state.clear_edges();
        handler.on_jump(true);
        assert!(!handler.state.jump.pressed);
        assert!(handler.state.jump.held);

        handler.on_jump(false);
        assert!(handler.state.jump.released);
        assert!(!handler.state.jump.held);

        handler.state.clear_edges();
        assert_eq!(handler.state.jump, InputLatch::default());
    }

    #[test]
    fn test_tap_within_one_tick_keeps_both_edges() {
        let mut handler = InputHandler::new();
        handler.on_crouch(true);
        handler.on_crouch(false);

        let crouch = handler.state.crouch;
        assert!(crouch.pressed);
        assert!(crouch.released);
        assert!(!crouch.held);
        assert!(crouch.is_active());
    }

    #[test]
    fn test_move_input_normalized() {
        let mut handler = InputHandler::new();
        handler.on_move(Vec2::new(1.0, 1.0));
        assert!((handler.state.move_input.length() - 1.0).abs() < 1e-6);

        handler.on_move(Vec2::new(0.0, 0.5));
        assert_eq!(handler.state.move_input, Vec2::new(0.0, 0.5));
    }

    #[test]
    fn test_look_routing() {
        let mut handler = InputHandler::new();
        handler.on_look(Vec2::new(3.0, 1.0), true);
        handler.on_look(Vec2::new(2.0, 0.0), true);
        handler.on_look(Vec2::new(0.5, 0.0), false);

        assert_eq!(handler.take_look_delta(), Vec2::new(5.0, 1.0));
        assert_eq!(handler.take_look_delta(), Vec2::ZERO);
        assert_eq!(handler.state.look_rate, Vec2::new(0.5, 0.0));
    }
}
