//! Stride - Headless first-person locomotion demo
//!
//! Runs the locomotion controller against a rapier world with a scripted input timeline
//! and logs what the character does.

mod scenario;
mod settings;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use stride_core::GameTime;
use stride_game::{LocomotionController, LocomotionEvent};
use stride_physics::{CharacterBody, PhysicsConfig, PhysicsWorld};

use scenario::{Script, SPAWN};
use settings::SimulationSettings;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Stride locomotion demo...");

    let settings = SimulationSettings::load();
    if std::env::args().any(|arg| arg == "--write-settings") {
        settings.save().context("Failed to save settings")?;
    }
    settings.time.validate().context("Invalid time settings")?;

    let mut game_time = GameTime::new(settings.time.clone());
    let mut world = PhysicsWorld::with_config(PhysicsConfig {
        timestep: game_time.fixed_delta(),
        ..settings.physics.clone()
    });
    scenario::build_level(&mut world);

    let handles = world.spawn_character(&settings.locomotion.body, SPAWN);
    let mut controller = LocomotionController::new(settings.locomotion.clone())
        .context("Failed to create locomotion controller")?;
    let mut script = Script::demo();

    let frame_delta = 1.0 / settings.run.frame_rate.max(1.0);
    let frames = (settings.run.duration / frame_delta).ceil() as u64;

    for _ in 0..frames {
        game_time.update(frame_delta);
        script.apply_until(game_time.total_time as f32, &mut controller);
        controller.tick(game_time.delta_time);

        for _ in 0..game_time.fixed_steps() {
            match CharacterBody::new(&mut world, handles) {
                Ok(mut body) => controller.fixed_tick(&mut body, game_time.fixed_delta()),
                Err(e) => {
                    if controller.is_enabled() {
                        controller.disable(&e.into());
                    }
                }
            }
            world.step();
        }

        for event in controller.drain_events() {
            log_event(&event, game_time.total_time);
        }
    }

    if !script.is_finished() {
        warn!("Run ended before the input script finished");
    }

    let position = world
        .body(handles.body)
        .map(|body| *body.translation());
    info!(
        state = controller.current_state_name(),
        frames = game_time.frame_count,
        physics_steps = game_time.fixed_step_count,
        ?position,
        "Demo finished"
    );
    Ok(())
}

fn log_event(event: &LocomotionEvent, time: f64) {
    match event {
        LocomotionEvent::Jumped { position, apex } => {
            info!(time, ?position, ?apex, "Jumped");
        }
        LocomotionEvent::Landed {
            position,
            impact_speed,
        } => {
            info!(time, ?position, impact_speed, "Landed");
        }
        LocomotionEvent::StateChanged { from, to } => {
            debug!(time, %from, %to, "State changed");
        }
    }
}
