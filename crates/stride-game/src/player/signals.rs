//! Per-tick signal snapshot and the locomotion transition table

use glam::Vec3;

use super::machine::StateMachine;
use super::state::MovementState;
use crate::input::InputLatch;

/// Wall seen by the forward sphere cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    /// Surface normal facing the character
    pub normal: Vec3,
    /// Angle between the look direction and the wall (degrees)
    pub look_angle: f32,
}

/// Everything the transition guards read, captured once per physics tick after the
/// sensors refresh
#[derive(Debug, Clone, Copy, Default)]
pub struct Signals {
    pub state: MovementState,
    pub grounded: bool,
    /// Velocity along world up
    pub vertical_speed: f32,
    /// Speed with the slope-normal component removed
    pub flat_speed: f32,
    pub jump: InputLatch,
    pub crouch: InputLatch,
    pub jump_locked: bool,
    pub coyote_running: bool,
    pub exiting_crouch: bool,
    pub exiting_climb: bool,
    pub minimum_slide_speed: f32,
    pub wall: Option<WallContact>,
    pub max_wall_look_angle: f32,
    /// Whether the current wall matches the one last climbed
    pub same_wall: bool,
    pub climb_finished: bool,
}

impl Signals {
    /// A jump press that should turn into a jump this tick
    pub fn is_entering_jump(&self) -> bool {
        let unlocked_press = self.jump.pressed && !self.jump_locked;
        let default_jump = unlocked_press && self.grounded;
        let coyote_jump =
            unlocked_press && self.coyote_running && self.state == MovementState::Falling;
        (default_jump || coyote_jump) && !self.exiting_crouch
    }

    /// Crouch pressed this tick or still held
    pub fn wants_crouch(&self) -> bool {
        self.crouch.is_active()
    }

    /// Crouching while moving fast enough on the ground
    pub fn is_sliding(&self) -> bool {
        self.wants_crouch() && self.grounded && self.flat_speed > self.minimum_slide_speed
    }

    /// The wall check passes and the player asked to climb
    pub fn is_entering_climb(&self) -> bool {
        let Some(wall) = self.wall else {
            return false;
        };
        wall.look_angle < self.max_wall_look_angle
            && self.jump.pressed
            && (!self.exiting_climb || !self.same_wall)
    }

    /// Jump let go, climb time used up, or the wall is gone
    pub fn is_exiting_climb(&self) -> bool {
        self.jump.released || self.climb_finished || self.wall.is_none()
    }

    fn airborne_falling(&self) -> bool {
        !self.grounded && self.vertical_speed <= 0.0
    }

    fn airborne_rising(&self) -> bool {
        !self.grounded && self.vertical_speed > 0.0
    }
}

/// Build the locomotion transition table
///
/// Declaration order is significant: for each state the first satisfied guard wins.
pub fn locomotion_machine() -> StateMachine<Signals> {
    use MovementState::*;

    let mut machine: StateMachine<Signals> = StateMachine::new(Falling);

    machine.add_transition(Falling, Grounded, |s| s.grounded);
    machine.add_transition(Grounded, Falling, Signals::airborne_falling);
    machine.add_transition(Grounded, Rising, Signals::airborne_rising);
    machine.add_transition(Rising, Falling, Signals::airborne_falling);
    machine.add_transition(Rising, Grounded, |s| s.grounded);

    for from in [Grounded, Falling, Sliding, Crouching] {
        machine.add_transition(from, Jumping, Signals::is_entering_jump);
    }
    machine.add_transition(Jumping, Falling, |s| s.vertical_speed < 0.0);
    machine.add_transition(Jumping, Rising, |s| s.vertical_speed > 0.0 && s.jump.released);

    machine.add_transition(Grounded, Sliding, Signals::is_sliding);
    machine.add_transition(Sliding, Crouching, |s| !s.is_sliding() && s.wants_crouch());
    machine.add_transition(Sliding, Grounded, |s| {
        !s.is_sliding() && s.grounded && !s.wants_crouch()
    });
    machine.add_transition(Sliding, Falling, Signals::airborne_falling);
    machine.add_transition(Sliding, Rising, Signals::airborne_rising);

    machine.add_transition(Grounded, Crouching, |s| s.wants_crouch() && !s.is_sliding());
    machine.add_transition(Crouching, Grounded, |s| s.crouch.released || !s.crouch.held);
    machine.add_transition(Crouching, Falling, Signals::airborne_falling);
    machine.add_transition(Crouching, Rising, Signals::airborne_rising);

    for from in [Jumping, Rising, Falling] {
        machine.add_transition(from, Climbing, Signals::is_entering_climb);
    }
    machine.add_transition(Climbing, Falling, Signals::is_exiting_climb);

    machine
}

#[cfg(test)]
mod tests {
    use super::*;
    use MovementState::*;

    fn pressed() -> InputLatch {
        InputLatch {
            pressed: true,
            held: true,
            released: false,
        }
    }

    fn held() -> InputLatch {
        InputLatch {
            pressed: false,
            held: true,
            released: false,
        }
    }

    fn released() -> InputLatch {
        InputLatch {
            pressed: false,
            held: false,
            released: true,
        }
    }

    fn grounded(state: MovementState) -> Signals {
        Signals {
            state,
            grounded: true,
            minimum_slide_speed: 1.0,
            max_wall_look_angle: 30.0,
            climb_finished: true,
            ..Default::default()
        }
    }

    fn wall(look_angle: f32) -> Option<WallContact> {
        Some(WallContact {
            normal: Vec3::Z,
            look_angle,
        })
    }

    fn next(signals: Signals) -> Option<MovementState> {
        let mut machine = locomotion_machine();
        machine.set_initial_state(signals.state);
        machine.next_state(&signals)
    }

    #[test]
    fn test_jump_intent() {
        let mut s = grounded(Grounded);
        s.jump = pressed();
        assert!(s.is_entering_jump());

        s.jump_locked = true;
        assert!(!s.is_entering_jump());

        s.jump_locked = false;
        s.exiting_crouch = true;
        assert!(!s.is_entering_jump());

        // Holding is not pressing
        let mut s = grounded(Grounded);
        s.jump = held();
        assert!(!s.is_entering_jump());
    }

    #[test]
    fn test_coyote_jump_only_from_falling() {
        let mut s = grounded(Falling);
        s.grounded = false;
        s.jump = pressed();
        assert!(!s.is_entering_jump());

        s.coyote_running = true;
        assert!(s.is_entering_jump());

        s.state = Rising;
        assert!(!s.is_entering_jump());
    }

    #[test]
    fn test_airborne_split_by_vertical_speed() {
        let mut s = grounded(Grounded);
        s.grounded = false;
        assert_eq!(next(s), Some(Falling));

        s.vertical_speed = 2.0;
        assert_eq!(next(s), Some(Rising));

        s.state = Rising;
        assert_eq!(next(s), None);
        s.vertical_speed = -0.1;
        assert_eq!(next(s), Some(Falling));
    }

    #[test]
    fn test_slide_or_crouch_by_speed() {
        let mut s = grounded(Grounded);
        s.crouch = held();
        s.flat_speed = 5.0;
        assert_eq!(next(s), Some(Sliding));

        s.flat_speed = 0.5;
        assert_eq!(next(s), Some(Crouching));
    }

    #[test]
    fn test_leaving_a_slide() {
        let mut s = grounded(Sliding);
        s.crouch = held();
        s.flat_speed = 0.5;
        assert_eq!(next(s), Some(Crouching));

        s.crouch = released();
        assert_eq!(next(s), Some(Grounded));

        s.grounded = false;
        assert_eq!(next(s), Some(Falling));
    }

    #[test]
    fn test_jump_beats_standing_up() {
        // Crouch released and jump pressed on the same tick while crouched
        let mut s = grounded(Crouching);
        s.crouch = released();
        s.jump = pressed();
        assert_eq!(next(s), Some(Jumping));

        // Sliding off a ledge leaves the exit-crouch flag set inside the coyote window
        let mut s = grounded(Sliding);
        s.grounded = false;
        s.vertical_speed = -1.0;
        assert_eq!(next(s), Some(Falling));

        s.state = Falling;
        s.coyote_running = true;
        s.exiting_crouch = true;
        s.jump = pressed();
        assert_eq!(next(s), None);

        s.exiting_crouch = false;
        assert_eq!(next(s), Some(Jumping));
    }

    #[test]
    fn test_crouch_tap_stands_up() {
        // Pressed and released before the tick that entered the crouch
        let mut s = grounded(Crouching);
        s.crouch = InputLatch::default();
        assert_eq!(next(s), Some(Grounded));

        s.crouch = held();
        assert_eq!(next(s), None);
    }

    #[test]
    fn test_jump_beats_slide() {
        let mut s = grounded(Grounded);
        s.crouch = pressed();
        s.jump = pressed();
        s.flat_speed = 5.0;
        assert_eq!(next(s), Some(Jumping));
    }

    #[test]
    fn test_climb_entry_rules() {
        let mut s = grounded(Falling);
        s.grounded = false;
        s.vertical_speed = -1.0;
        s.climb_finished = false;
        s.wall = wall(10.0);
        assert_eq!(next(s), None);

        s.jump = pressed();
        assert_eq!(next(s), Some(Climbing));

        s.wall = wall(45.0);
        assert_eq!(next(s), None);

        s.wall = wall(10.0);
        s.exiting_climb = true;
        s.same_wall = true;
        assert_eq!(next(s), None);

        s.same_wall = false;
        assert_eq!(next(s), Some(Climbing));
    }

    #[test]
    fn test_climb_exit_rules() {
        let mut s = grounded(Climbing);
        s.grounded = false;
        s.climb_finished = false;
        s.jump = held();
        s.wall = wall(5.0);
        assert_eq!(next(s), None);

        s.jump = released();
        assert_eq!(next(s), Some(Falling));

        s.jump = held();
        s.climb_finished = true;
        assert_eq!(next(s), Some(Falling));

        s.climb_finished = false;
        s.wall = None;
        assert_eq!(next(s), Some(Falling));
    }

    #[test]
    fn test_jumping_waits_for_release_to_rise() {
        let mut s = grounded(Jumping);
        s.jump = held();
        s.vertical_speed = 3.0;
        assert_eq!(next(s), None);

        s.jump = released();
        assert_eq!(next(s), Some(Rising));

        s.vertical_speed = -0.5;
        assert_eq!(next(s), Some(Falling));
    }
}
