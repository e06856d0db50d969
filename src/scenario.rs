//! Demo level and scripted input for the headless run

use glam::{Vec2, Vec3};
use stride_game::LocomotionController;
use stride_physics::PhysicsWorld;
use tracing::info;

/// Where the character spawns, a little above the floor
pub const SPAWN: Vec3 = Vec3::new(0.0, 1.5, 0.0);

/// Build the floor, a climbable wall straight ahead and a ramp behind the spawn
pub fn build_level(world: &mut PhysicsWorld) {
    world.create_ground(0.0);
    world.create_static_box(Vec3::new(4.0, 3.0, 0.25), Vec3::new(0.0, 3.0, -16.0));
    world.create_ramp(Vec3::new(2.0, 0.25, 4.0), Vec3::new(0.0, 1.0, 8.0), -15.0);
    world.sync_queries();
    info!("Demo level built");
}

/// One input change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    Move(Vec2),
    Jump(bool),
    Crouch(bool),
    /// Stick look rate
    Turn(Vec2),
}

/// Input cues ordered by time
#[derive(Debug, Clone)]
pub struct Script {
    cues: Vec<(f32, Cue)>,
    next: usize,
}

impl Script {
    pub fn new(mut cues: Vec<(f32, Cue)>) -> Self {
        cues.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { cues, next: 0 }
    }

    /// Run forward, jump, slide, climb the wall, then turn around and walk up the ramp
    pub fn demo() -> Self {
        Self::new(vec![
            (0.5, Cue::Move(Vec2::new(0.0, 1.0))),
            (1.0, Cue::Jump(true)),
            (1.1, Cue::Jump(false)),
            (2.2, Cue::Crouch(true)),
            (2.9, Cue::Crouch(false)),
            (4.5, Cue::Jump(true)),
            (4.6, Cue::Jump(false)),
            (4.75, Cue::Jump(true)),
            (6.0, Cue::Jump(false)),
            (7.0, Cue::Turn(Vec2::new(1.0, 0.0))),
            (8.0, Cue::Turn(Vec2::ZERO)),
            (11.5, Cue::Move(Vec2::ZERO)),
        ])
    }

    /// Feed every cue due by `time` to the controller
    pub fn apply_until(&mut self, time: f32, controller: &mut LocomotionController) {
        while let Some(&(at, cue)) = self.cues.get(self.next) {
            if at > time {
                break;
            }
            match cue {
                Cue::Move(input) => controller.on_move(input),
                Cue::Jump(pressed) => controller.on_jump(pressed),
                Cue::Crouch(pressed) => controller.on_crouch(pressed),
                Cue::Turn(rate) => controller.on_look(rate, false),
            }
            self.next += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.cues.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_game::{LocomotionConfig, MovementState};

    #[test]
    fn test_script_plays_in_order() {
        let mut script = Script::new(vec![
            (0.2, Cue::Jump(false)),
            (0.1, Cue::Jump(true)),
            (0.3, Cue::Move(Vec2::new(0.0, 1.0))),
        ]);
        let mut controller = LocomotionController::new(LocomotionConfig::default()).unwrap();

        script.apply_until(0.15, &mut controller);
        assert!(controller.input().jump.held);
        assert!(!script.is_finished());

        script.apply_until(1.0, &mut controller);
        assert!(!controller.input().jump.held);
        assert_eq!(controller.input().move_input, Vec2::new(0.0, 1.0));
        assert!(script.is_finished());
        assert_eq!(controller.current_state(), MovementState::Falling);
    }

    #[test]
    fn test_character_settles_on_demo_floor() {
        let mut world = PhysicsWorld::new();
        build_level(&mut world);
        let config = LocomotionConfig::default();
        let handles = world.spawn_character(&config.body, SPAWN);
        let mut controller = LocomotionController::new(config).unwrap();

        for _ in 0..100 {
            let mut body = stride_physics::CharacterBody::new(&mut world, handles).unwrap();
            controller.fixed_tick(&mut body, 1.0 / 50.0);
            world.step();
        }

        assert_eq!(controller.current_state(), MovementState::Grounded);
        let body = world.body(handles.body).unwrap();
        assert!((body.translation().y - 1.1).abs() < 0.05);
    }
}
