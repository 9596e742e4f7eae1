//! Outpost - persistent isometric base scene with live skirmish simulation
//! and a stage-machine travel animator for the player's vehicle.

// ============================================================================
// MODULES
// ============================================================================

pub mod components;
pub mod constants;
pub mod game;
pub mod hud;
pub mod iso;
pub mod rendering;
pub mod resources;
pub mod settings;
pub mod systems;
pub mod world;

// ============================================================================
// IMPORTS
// ============================================================================

use bevy::prelude::*;

use iso::Projector;
use resources::*;
use systems::*;

// ============================================================================
// BEVY APP - frame phases and system wiring
// ============================================================================

/// Per-frame simulation phases. Chained so agents resolve before
/// projectiles, projectiles before battle evaluation, and everything before
/// the visual sync — one consistent tick snapshot.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Agents,  // wander movement + fire decisions
    Combat,  // projectile flight, hits, casualties
    Battle,  // lifecycle entry/exit evaluation
    Animate, // travel sequencer + ship tweens
    Sync,    // input, transforms, HUD-facing state
}

/// Wire the simulation core: everything needed headless (tests run exactly
/// this plus a manually advanced clock).
pub fn build_sim(app: &mut App) {
    app.add_message::<IncomingRaid>()
        .add_message::<BattleResolved>()
        .add_message::<TravelCompleted>()
        .init_resource::<Projector>()
        .init_resource::<KillStats>()
        .init_resource::<StatusMessage>()
        .init_resource::<VehicleState>()
        .init_resource::<PlayerVehicle>()
        .init_resource::<BattlePhase>()
        .init_resource::<ScreenFx>()
        .init_resource::<TravelQueue>()
        .init_resource::<ActiveTravel>()
        .configure_sets(
            Update,
            (Step::Agents, Step::Combat, Step::Battle, Step::Animate, Step::Sync).chain(),
        )
        // Flush casualties before the battle evaluates faction survival.
        .add_systems(
            Update,
            bevy::ecs::schedule::ApplyDeferred
                .after(Step::Combat)
                .before(Step::Battle),
        )
        .add_systems(Startup, world::setup_world)
        .add_systems(
            Update,
            (wander_system, fire_system).chain().in_set(Step::Agents),
        )
        .add_systems(
            Update,
            (projectile_system, death_cleanup_system)
                .chain()
                .in_set(Step::Combat),
        )
        .add_systems(
            Update,
            (defend_trigger_system, dropship_landing_system, battle_end_system)
                .chain()
                .in_set(Step::Battle),
        )
        .add_systems(
            Update,
            (travel_system, ship_tween_system).in_set(Step::Animate),
        );
}

/// Wire the full application: simulation core plus camera, rendering sync,
/// the demo game-logic driver, settings and the egui HUD.
pub fn build_app(app: &mut App) {
    build_sim(app);

    app.insert_resource(settings::load_settings())
        .init_resource::<game::GameBalance>()
        .init_resource::<game::VehicleLevel>()
        .init_resource::<game::MissionClock>()
        .add_systems(Startup, rendering::setup_camera)
        .add_systems(
            Update,
            (
                drag_pan_system,
                rendering::sync_scene_anchor,
                rendering::sync_units,
                rendering::sync_unit_bodies,
                rendering::sync_health_bars,
                rendering::sync_projectiles,
                rendering::sync_vehicle_visibility,
            )
                .in_set(Step::Sync),
        )
        .add_systems(
            Update,
            (
                game::demo_input_system,
                game::travel_outcome_system,
                game::battle_outcome_system,
                game::status_expiry_system,
            )
                .in_set(Step::Sync),
        );

    hud::register_ui(app);
}

// ============================================================================
// TEST HARNESS - headless app with a hand-cranked clock
// ============================================================================

#[cfg(test)]
pub mod testing {
    use std::time::Duration;

    use bevy::prelude::*;

    use crate::components::*;
    use crate::constants::UNIT_Z;
    use crate::iso;
    use crate::resources::*;

    /// Headless simulation app. No windowing, no rendering; `Time` is a
    /// plain resource advanced by `tick`.
    pub fn sim_app() -> App {
        let mut app = App::new();
        app.init_resource::<Time>();
        crate::build_sim(&mut app);
        // Run Startup so the world (anchor, landmarks, ships) exists.
        app.update();
        app
    }

    /// Advance the frame clock by `dt` seconds and run one update.
    pub fn tick(app: &mut App, dt: f32) {
        let mut time = app.world_mut().resource_mut::<Time>();
        time.advance_by(Duration::from_secs_f32(dt));
        app.update();
    }

    /// Spawn a bare combat unit (no visual children) for targeted tests.
    /// The shoot timer starts effectively disarmed.
    pub fn spawn_unit(
        app: &mut App,
        cell: Vec2,
        kind: UnitKind,
        faction: Faction,
        health: f32,
    ) -> Entity {
        let anchor = app.world().resource::<SceneAnchor>().0;
        let world = iso::project(cell);
        app.world_mut()
            .spawn((
                Unit,
                kind,
                faction,
                GridPos(cell),
                Heading(Vec2::new(0.2, 0.1)),
                Health(health),
                MaxHealth(health),
                ShootTimer { since_last: 0.0, interval: 999.0 },
                Transform::from_xyz(world.x, -world.y, UNIT_Z),
                Visibility::default(),
                ChildOf(anchor),
            ))
            .id()
    }

    /// Living (ally, enemy) unit counts.
    pub fn count_units(app: &mut App) -> (u32, u32) {
        let mut allies = 0;
        let mut enemies = 0;
        let mut q = app.world_mut().query_filtered::<&Faction, With<Unit>>();
        for faction in q.iter(app.world()) {
            match faction {
                Faction::Ally => allies += 1,
                Faction::Enemy => enemies += 1,
                Faction::Neutral => {}
            }
        }
        (allies, enemies)
    }

    pub fn send_incoming_raid(app: &mut App) {
        app.world_mut()
            .resource_mut::<Messages<IncomingRaid>>()
            .write(IncomingRaid);
    }

    pub fn drain_resolved(app: &mut App) -> Vec<u32> {
        app.world_mut()
            .resource_mut::<Messages<BattleResolved>>()
            .drain()
            .map(|m| m.survivors)
            .collect()
    }

    pub fn drain_completed(
        app: &mut App,
    ) -> Vec<(TravelKind, Result<ArrivalOutcome, TravelError>)> {
        app.world_mut()
            .resource_mut::<Messages<TravelCompleted>>()
            .drain()
            .map(|m| (m.kind, m.result))
            .collect()
    }
}
