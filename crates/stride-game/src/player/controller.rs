//! Locomotion controller
//!
//! Owns the state machine and all state the movement modes share. Each physics tick runs
//! the same pipeline:
//!
//! 1. refresh ground and wall sensors
//! 2. evaluate transitions on a signal snapshot (at most one fires)
//! 3. apply the active state's contribution, then gravity, ground adjustment, the speed
//!    limit and drag
//! 4. clear input edges
//!
//! The order is part of the contract: moving a step shifts transition timing by a tick.

use glam::{Vec2, Vec3};
use stride_core::math::{component_along, project_on_plane, UP};
use stride_core::CountdownTimer;
use stride_physics::{CharacterBackend, ForceMode};
use tracing::{debug, error, info};

use super::config::LocomotionConfig;
use super::events::LocomotionEvent;
use super::machine::{StateChange, StateMachine};
use super::modes::{ClimbGuard, CrouchGuard, JumpGuard};
use super::sensors::{GroundSensor, SlopeInfo, WallSensor};
use super::signals::{locomotion_machine, Signals};
use super::speed::SpeedBudget;
use super::state::MovementState;
use crate::error::LocomotionError;
use crate::input::{InputHandler, InputState};
use crate::look::LookController;

/// Shared state the movement modes read and write
pub(crate) struct MotorState {
    pub config: LocomotionConfig,
    pub ground: GroundSensor,
    pub wall: WallSensor,
    pub slope: SlopeInfo,
    pub speed: SpeedBudget,
    pub jump: JumpGuard,
    pub crouch: CrouchGuard,
    pub climb: ClimbGuard,
    pub coyote: CountdownTimer,
    /// Body position sampled at the start of the physics tick
    pub position: Vec3,
    /// Body velocity sampled at the start of the physics tick
    pub velocity: Vec3,
    pub events: Vec<LocomotionEvent>,
}

impl MotorState {
    fn new(config: LocomotionConfig) -> Self {
        let ground = GroundSensor::new(&config.body, config.sensors.ground_mask);
        let wall = WallSensor::new(
            config.climb.sphere_radius,
            config.climb.detection_distance,
            config.climb.wall_recheck_factor,
            config.climb.same_wall_dot,
            config.sensors.wall_mask,
        );
        let climb = ClimbGuard::new(config.climb.climb_time);
        let coyote = CountdownTimer::new(config.jump.coyote_time);
        let speed = SpeedBudget::new(config.movement.movement_speed);

        Self {
            config,
            ground,
            wall,
            slope: SlopeInfo::default(),
            speed,
            jump: JumpGuard::default(),
            crouch: CrouchGuard::default(),
            climb,
            coyote,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            events: Vec::with_capacity(16),
        }
    }
}

/// Per-tick context handed to the state hooks: shared state plus the borrowed body
pub(crate) struct Motor<'a, B: ?Sized> {
    pub core: &'a mut MotorState,
    pub body: &'a mut B,
    pub input: &'a InputState,
    /// Flat look direction
    pub forward: Vec3,
    /// Flat right direction
    pub right: Vec3,
    /// Physics step length
    pub dt: f32,
}

impl<B: CharacterBackend + ?Sized> Motor<'_, B> {
    /// Current velocity with the slope-normal component removed
    pub fn flat_velocity(&self) -> Vec3 {
        project_on_plane(self.body.velocity(), self.core.slope.normal)
    }

    /// Velocity the move input asks for at full speed ratio, along the slope plane
    pub fn move_velocity(&self) -> Vec3 {
        let normal = self.core.slope.normal;
        let forward = project_on_plane(self.forward, normal).normalize_or_zero();
        let right = project_on_plane(self.right, normal).normalize_or_zero();
        let input: Vec2 = self.input.move_input;
        (forward * input.y + right * input.x) * self.core.config.movement.movement_speed
    }

    /// Push the body along the move input, scaled by the state's speed ratio
    pub fn calculate_velocity(&mut self, ratio: f32) {
        let impulse = self.move_velocity() * ratio;
        if impulse != Vec3::ZERO {
            self.body.apply_force(impulse, ForceMode::Impulse);
        }
    }

    /// Pull the body down while nothing is under it
    pub fn handle_gravity(&mut self, state: MovementState) {
        if self.core.ground.is_grounded() || state == MovementState::Climbing {
            return;
        }
        let gravity = self.core.config.movement.gravity;
        self.body.apply_velocity_delta(-UP * gravity * self.dt);
    }

    /// Hold the body at stance height above the ground
    pub fn adjust_to_ground(&mut self, state: MovementState) {
        if state != MovementState::Grounded || !self.core.ground.is_grounded() {
            return;
        }
        let velocity = self.body.velocity();
        let along_slope = project_on_plane(velocity, self.core.slope.normal);
        let target = along_slope + self.core.ground.adjustment_velocity(self.dt);
        self.body.apply_velocity_delta(target - velocity);
    }

    /// Ease the flat speed down to the current cap instead of clamping it
    pub fn handle_speed_limit(&mut self, state: MovementState) {
        if !state.profile().speed_limited {
            return;
        }
        let normal = self.core.slope.normal;
        let velocity = self.body.velocity();
        let flat = project_on_plane(velocity, normal);
        let Some(speed) = self.core.speed.limit(
            flat.length(),
            self.core.config.movement.time_to_change_speed,
            self.input.move_input.length(),
        ) else {
            return;
        };
        let target = flat.normalize_or_zero() * speed + component_along(velocity, normal);
        self.body.apply_velocity_delta(target - velocity);
    }

    /// Ground drag on the ground, the slide's own drag while sliding, none in the air
    pub fn handle_drag(&mut self, state: MovementState) {
        let drag = if !self.core.ground.is_grounded() {
            0.0
        } else if state == MovementState::Sliding {
            self.core.config.slide.slide_drag_ratio
        } else {
            self.core.config.movement.ground_drag
        };
        self.body.set_drag(drag);
    }

    /// Reset the speed ease so the cap returns to the base move speed
    pub fn setup_lerp_to_default_speed(&mut self) {
        let flat_speed = self.flat_velocity().length();
        let movement_speed = self.core.config.movement.movement_speed;
        self.core.speed.reset_baseline(movement_speed, flat_speed);
    }
}

/// Physics-driven first-person locomotion for one character
pub struct LocomotionController {
    machine: StateMachine<Signals>,
    core: MotorState,
    input: InputHandler,
    look: LookController,
    attached: bool,
    enabled: bool,
}

impl LocomotionController {
    /// Create a controller, rejecting unusable configuration
    pub fn new(config: LocomotionConfig) -> Result<Self, LocomotionError> {
        config.validate()?;
        let look = LookController::with_config(config.look.clone());
        Ok(Self {
            machine: locomotion_machine(),
            core: MotorState::new(config),
            input: InputHandler::new(),
            look,
            attached: false,
            enabled: true,
        })
    }

    /// Configure a body for force-driven movement
    ///
    /// Runs automatically on the first physics tick if the host does not call it.
    pub fn attach<B: CharacterBackend + ?Sized>(&mut self, body: &mut B) {
        body.freeze_rotation();
        body.use_gravity(false);
        body.set_drag(0.0);
        body.resize_collider(self.core.ground.collider_height(), self.core.config.body.radius());
        self.attached = true;
        info!(
            state = %self.machine.current_state(),
            "Locomotion controller attached"
        );
    }

    /// Stop simulating after a setup failure; ticks become no-ops
    pub fn disable(&mut self, reason: &LocomotionError) {
        error!(%reason, "Locomotion controller disabled");
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // Input

    pub fn on_move(&mut self, input: Vec2) {
        self.input.on_move(input);
    }

    pub fn on_look(&mut self, input: Vec2, is_pointer: bool) {
        self.input.on_look(input, is_pointer);
    }

    pub fn on_jump(&mut self, pressed: bool) {
        self.input.on_jump(pressed);
    }

    pub fn on_crouch(&mut self, pressed: bool) {
        self.input.on_crouch(pressed);
    }

    // Ticks

    /// Frame-rate hook: look integration, timers and per-frame state work
    pub fn tick(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        let delta = self.input.take_look_delta();
        self.look.handle_pointer(delta);
        self.look.handle_stick(self.input.state.look_rate, dt);

        self.core.coyote.tick(dt);
        self.core.speed.tick(dt);
        self.machine.tick(&mut self.core, dt);
    }

    /// Physics-rate hook: the only place that touches the body or changes state
    pub fn fixed_tick<B: CharacterBackend + ?Sized>(&mut self, body: &mut B, dt: f32) {
        if !self.enabled {
            return;
        }
        if !self.attached {
            self.attach(body);
        }

        self.refresh_sensors(body);
        let signals = self.signals();

        let mut motor = Motor {
            core: &mut self.core,
            body,
            input: &self.input.state,
            forward: self.look.flat_forward(),
            right: self.look.right(),
            dt,
        };
        let change = self.machine.fixed_tick(&signals, &mut motor);

        let state = self.machine.current_state();
        motor.handle_gravity(state);
        motor.adjust_to_ground(state);
        motor.handle_speed_limit(state);
        motor.handle_drag(state);

        if let Some(change) = change {
            self.record_change(change);
        }
        self.clear_latches();
    }

    fn refresh_sensors<B: CharacterBackend + ?Sized>(&mut self, body: &B) {
        let core = &mut self.core;
        core.position = body.position();
        core.velocity = body.velocity();

        core.ground.refresh(body, core.position);
        core.slope = SlopeInfo::from_sensor(&core.ground, core.config.sensors.slope_angle_threshold);

        let hold_normal = match self.machine.current_state() {
            MovementState::Climbing => core.climb.last_wall_normal,
            _ => None,
        };
        let origin = core.position + core.ground.center_offset();
        core.wall.refresh(body, origin, self.look.flat_forward(), hold_normal);
    }

    /// Snapshot of everything the transition guards read
    pub fn signals(&self) -> Signals {
        let core = &self.core;
        let wall = core.wall.contact();
        let same_wall = match (wall, core.climb.last_wall_normal) {
            (Some(wall), Some(last)) => core.wall.is_same_wall(wall.normal, last),
            _ => false,
        };

        Signals {
            state: self.machine.current_state(),
            grounded: core.ground.is_grounded(),
            vertical_speed: core.velocity.dot(UP),
            flat_speed: project_on_plane(core.velocity, core.slope.normal).length(),
            jump: self.input.state.jump,
            crouch: self.input.state.crouch,
            jump_locked: core.jump.locked,
            coyote_running: core.coyote.is_running(),
            exiting_crouch: core.crouch.exiting,
            exiting_climb: core.climb.exiting,
            minimum_slide_speed: core.config.slide.minimum_slide_speed,
            wall,
            max_wall_look_angle: core.config.climb.max_wall_look_angle,
            same_wall,
            climb_finished: core.climb.timer.is_finished(),
        }
    }

    fn record_change(&mut self, change: StateChange) {
        debug!(from = %change.from, to = %change.to, "Movement state changed");
        self.core.events.push(LocomotionEvent::StateChanged {
            from: change.from,
            to: change.to,
        });

        let landed = change.to == MovementState::Grounded
            && (change.from.is_airborne() || change.from == MovementState::Climbing);
        if landed {
            self.core.events.push(LocomotionEvent::Landed {
                position: self.core.position,
                impact_speed: (-self.core.velocity.dot(UP)).max(0.0),
            });
        }
    }

    /// Drop this tick's input edges; a jump release also frees the jump lock
    fn clear_latches(&mut self) {
        if self.input.state.jump.released {
            self.core.jump.locked = false;
        }
        self.input.state.clear_edges();
    }

    // Observers

    pub fn current_state(&self) -> MovementState {
        self.machine.current_state()
    }

    pub fn current_state_name(&self) -> &'static str {
        self.machine.current_state().name()
    }

    /// Whether a jump press would start a jump on the next physics tick
    pub fn is_entering_jump(&self) -> bool {
        self.signals().is_entering_jump()
    }

    pub fn is_jump_locked(&self) -> bool {
        self.core.jump.locked
    }

    pub fn is_grounded(&self) -> bool {
        self.core.ground.is_grounded()
    }

    pub fn slope(&self) -> SlopeInfo {
        self.core.slope
    }

    pub fn speed_budget(&self) -> &SpeedBudget {
        &self.core.speed
    }

    /// Flat speed sampled at the start of the last physics tick
    pub fn flat_speed(&self) -> f32 {
        project_on_plane(self.core.velocity, self.core.slope.normal).length()
    }

    /// Normal of the wall most recently climbed
    pub fn last_wall_normal(&self) -> Option<Vec3> {
        self.core.climb.last_wall_normal
    }

    pub fn ground_sensor(&self) -> &GroundSensor {
        &self.core.ground
    }

    pub fn input(&self) -> &InputState {
        &self.input.state
    }

    pub fn look(&self) -> &LookController {
        &self.look
    }

    pub fn look_mut(&mut self) -> &mut LookController {
        &mut self.look
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.core.config
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, LocomotionEvent> {
        self.core.events.drain(..)
    }
}
