//! Battle lifecycle - skirmish entry, faction survival, resolution, cleanup

use bevy::prelude::*;
use rand::Rng;

use crate::components::*;
use crate::constants::*;
use crate::iso::{self, Projector};
use crate::resources::*;
use crate::world::HOME_CELL;

/// Spawn a cluster of units of one kind and faction around a grid cell.
fn spawn_cluster(
    commands: &mut Commands,
    anchor: Entity,
    rng: &mut impl Rng,
    count: u32,
    kind: UnitKind,
    faction: Faction,
    center: Vec2,
    max_health: f32,
) {
    for _ in 0..count {
        let offset = Vec2::new(
            rng.random_range(-SPAWN_CLUSTER_SPREAD..SPAWN_CLUSTER_SPREAD),
            rng.random_range(-SPAWN_CLUSTER_SPREAD..SPAWN_CLUSTER_SPREAD),
        );
        let cell = (center + offset).clamp(Vec2::ZERO, Vec2::splat(GRID_SIZE));
        let heading = Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(-0.5..0.5));
        let size = kind.sprite_size();
        let world = iso::project(cell);

        let body_color = kind.color(faction).with_alpha(match faction {
            Faction::Enemy => 0.8,
            Faction::Ally | Faction::Neutral => 1.0,
        });

        let unit = commands
            .spawn((
                Unit,
                kind,
                faction,
                GridPos(cell),
                Heading(heading),
                Health(max_health),
                MaxHealth(max_health),
                ShootTimer {
                    since_last: 0.0,
                    interval: rng.random_range(SHOOT_INTERVAL_MIN..SHOOT_INTERVAL_MAX),
                },
                Transform::from_xyz(world.x, -world.y, UNIT_Z),
                Visibility::default(),
                ChildOf(anchor),
            ))
            .id();

        let bar_y = size.y + 6.0;
        commands.spawn((
            UnitBody,
            BelongsTo(unit),
            Sprite::from_color(body_color, size),
            Transform::from_xyz(0.0, size.y / 2.0, 0.0),
            ChildOf(unit),
        ));
        commands.spawn((
            HealthBarBg,
            BelongsTo(unit),
            Sprite::from_color(Color::srgb(0.85, 0.1, 0.1), Vec2::new(HEALTH_BAR_W, HEALTH_BAR_H)),
            Transform::from_xyz(0.0, bar_y, 0.01),
            ChildOf(unit),
        ));
        commands.spawn((
            HealthBarFill,
            BelongsTo(unit),
            Sprite::from_color(Color::srgb(0.2, 0.95, 0.2), Vec2::new(HEALTH_BAR_W, HEALTH_BAR_H)),
            Transform::from_xyz(0.0, bar_y, 0.02),
            ChildOf(unit),
        ));
    }
}

/// Defend entry: an incoming raid lands a dropship at a random right-edge
/// cell. Guarded by "idle", "player owns a vehicle" and "vehicle docked";
/// anything else drops the trigger silently.
pub fn defend_trigger_system(
    mut events: MessageReader<IncomingRaid>,
    mut commands: Commands,
    anchor: Res<SceneAnchor>,
    vehicle: Res<VehicleState>,
    owned: Res<PlayerVehicle>,
    mut phase: ResMut<BattlePhase>,
) {
    for _ in events.read() {
        if !phase.is_idle() || !owned.owned || vehicle.in_flight() {
            info!("defend trigger dropped (phase {:?}, vehicle {:?})", *phase, *vehicle);
            continue;
        }

        let mut rng = rand::rng();
        let landing = Vec2::new(GRID_SIZE - 1.0, rng.random_range(0.0..GRID_SIZE));
        let start = iso::project(Vec2::new(-DROPSHIP_OFFMAP_CELLS, landing.y));

        commands.spawn((
            EnemyShip,
            ShipTween {
                from: start,
                to: iso::project(landing),
                duration: DROPSHIP_TWEEN_SECS,
                elapsed: 0.0,
                despawn_on_done: false,
            },
            Sprite::from_color(Color::srgb(0.75, 0.25, 0.25), Vec2::new(SHIP_SIZE.0, SHIP_SIZE.1)),
            // Mirrored: the raiders fly in nose-first from off-map.
            Transform::from_xyz(start.x, -start.y, SHIP_Z).with_scale(Vec3::new(-1.0, 1.0, 1.0)),
            ChildOf(anchor.0),
        ));

        *phase = BattlePhase::EnemyApproach { landing };
        info!("incoming raid: dropship on approach to {:?}", landing);
    }
}

/// Once the dropship lands, spawn both factions and open the skirmish.
pub fn dropship_landing_system(
    mut commands: Commands,
    anchor: Res<SceneAnchor>,
    mut phase: ResMut<BattlePhase>,
    landed: Query<Entity, (With<EnemyShip>, With<TweenDone>)>,
) {
    let BattlePhase::EnemyApproach { landing } = *phase else {
        return;
    };
    let Some(ship) = landed.iter().next() else {
        return;
    };
    commands.entity(ship).remove::<TweenDone>();

    let mut rng = rand::rng();
    let enemies = rng.random_range(DEFEND_ENEMY_MIN..=DEFEND_ENEMY_MAX);
    let allies = rng.random_range(DEFEND_ALLY_MIN..=DEFEND_ALLY_MAX);
    spawn_cluster(
        &mut commands, anchor.0, &mut rng,
        enemies, UnitKind::Mech, Faction::Enemy, landing, UNIT_MAX_HEALTH,
    );
    spawn_cluster(
        &mut commands, anchor.0, &mut rng,
        allies, UnitKind::Soldier, Faction::Ally, HOME_CELL, UNIT_MAX_HEALTH,
    );

    *phase = BattlePhase::Fighting { landed: Some(landing) };
    info!("defend battle: {} mechs down, {} soldiers mustered", enemies, allies);
}

/// Raid-out entry, fired from inside the cinematic raid sequence. The player
/// is the aggressor, so there is no arrival animation. Returns false when a
/// battle is already running (the trigger is dropped, not queued).
pub fn begin_raid_battle(
    commands: &mut Commands,
    anchor: Entity,
    phase: &mut BattlePhase,
) -> bool {
    if !phase.is_idle() {
        info!("raid-out trigger dropped (phase {:?})", *phase);
        return false;
    }

    let mut rng = rand::rng();
    let enemies = rng.random_range(RAID_ENEMY_MIN..=RAID_ENEMY_MAX);
    let allies = rng.random_range(RAID_ALLY_MIN..=RAID_ALLY_MAX);
    spawn_cluster(
        commands, anchor, &mut rng,
        enemies, UnitKind::Soldier, Faction::Enemy, HOME_CELL, UNIT_MAX_HEALTH,
    );
    spawn_cluster(
        commands, anchor, &mut rng,
        allies, UnitKind::Mech, Faction::Ally, HOME_CELL, RAID_MECH_MAX_HEALTH,
    );

    *phase = BattlePhase::Fighting { landed: None };
    info!("raid battle: {} defenders vs {} mechs", enemies, allies);
    true
}

/// Evaluate faction survival every tick and resolve the battle when one
/// side is wiped out.
pub fn battle_end_system(
    mut commands: Commands,
    mut phase: ResMut<BattlePhase>,
    mut kill_stats: ResMut<KillStats>,
    mut resolved: MessageWriter<BattleResolved>,
    projector: Res<Projector>,
    windows: Query<&Window>,
    living: Query<(&Faction, &Health), (With<Unit>, Without<Dead>)>,
    combatants: Query<(Entity, &Faction), With<Unit>>,
    dropships: Query<Entity, With<EnemyShip>>,
) {
    let BattlePhase::Fighting { landed } = *phase else {
        return;
    };

    let mut allies = 0u32;
    let mut enemies = 0u32;
    for (faction, health) in living.iter() {
        if health.0 <= 0.0 {
            continue;
        }
        match faction {
            Faction::Ally => allies += 1,
            Faction::Enemy => enemies += 1,
            Faction::Neutral => {}
        }
    }
    if allies > 0 && enemies > 0 {
        return;
    }

    let survivors = allies;
    if enemies == 0 && survivors > 0 {
        kill_stats.raid_wins += 1;
    }

    // Clean up all battle participants; neutral bystanders stay.
    for (entity, faction) in combatants.iter() {
        match faction {
            Faction::Ally | Faction::Enemy => commands.entity(entity).despawn(),
            Faction::Neutral => {}
        }
    }

    // Mirror the arrival with a symmetric departure when a dropship landed.
    if let Some(cell) = landed {
        let from = iso::project(cell);
        let exit_x = windows
            .single()
            .map(|w| projector.screen_to_world(Vec2::new(w.width() + 50.0, 0.0)).x)
            .unwrap_or(from.x + OFFMAP_FALLBACK_PX);
        for ship in dropships.iter() {
            commands.entity(ship).insert(ShipTween {
                from,
                to: Vec2::new(exit_x, from.y),
                duration: DROPSHIP_TWEEN_SECS,
                elapsed: 0.0,
                despawn_on_done: true,
            });
        }
    }

    resolved.write(BattleResolved { survivors });
    *phase = BattlePhase::Idle;
    info!("battle resolved: {} ally survivors", survivors);
}

/// Advance straight-line ship tweens (dropship arrival and departure).
pub fn ship_tween_system(
    time: Res<Time>,
    mut commands: Commands,
    mut ships: Query<(Entity, &mut ShipTween, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut tween, mut transform) in ships.iter_mut() {
        tween.elapsed += dt;
        let t = (tween.elapsed / tween.duration).clamp(0.0, 1.0);
        let pos = tween.from.lerp(tween.to, ease_in_out(t));
        transform.translation.x = pos.x;
        transform.translation.y = -pos.y;

        if tween.elapsed >= tween.duration {
            if tween.despawn_on_done {
                commands.entity(entity).despawn();
            } else {
                commands.entity(entity).remove::<ShipTween>().insert(TweenDone);
            }
        }
    }
}

/// Cubic ease-in-out, the same curve the CSS `ease` transitions read as.
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Quadratic ease-in for launch tilts.
pub fn ease_in(t: f32) -> f32 {
    t * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{count_units, drain_resolved, send_incoming_raid, tick, sim_app};
    use bevy::ecs::system::RunSystemOnce;

    fn trigger_raid_battle(app: &mut App) -> bool {
        app.world_mut()
            .run_system_once(
                |mut commands: Commands,
                 anchor: Res<SceneAnchor>,
                 mut phase: ResMut<BattlePhase>| {
                    begin_raid_battle(&mut commands, anchor.0, &mut phase)
                },
            )
            .expect("system ran")
    }

    #[test]
    fn defend_spawns_after_dropship_lands() {
        let mut app = sim_app();
        send_incoming_raid(&mut app);
        tick(&mut app, 0.05);
        assert!(matches!(
            *app.world().resource::<BattlePhase>(),
            BattlePhase::EnemyApproach { .. }
        ));
        assert_eq!(count_units(&mut app), (0, 0));

        // Ride out the landing tween.
        for _ in 0..25 {
            tick(&mut app, 0.05);
        }
        let (allies, enemies) = count_units(&mut app);
        assert!((DEFEND_ALLY_MIN..=DEFEND_ALLY_MAX).contains(&allies));
        assert!((DEFEND_ENEMY_MIN..=DEFEND_ENEMY_MAX).contains(&enemies));
        assert!(matches!(
            *app.world().resource::<BattlePhase>(),
            BattlePhase::Fighting { landed: Some(_) }
        ));
    }

    #[test]
    fn trigger_while_active_is_a_noop() {
        let mut app = sim_app();
        assert!(trigger_raid_battle(&mut app));
        tick(&mut app, 0.02);
        let before = count_units(&mut app);

        // Second raid-out trigger is rejected outright.
        assert!(!trigger_raid_battle(&mut app));
        // Defend trigger while Active is dropped too.
        send_incoming_raid(&mut app);
        tick(&mut app, 0.02);
        assert_eq!(count_units(&mut app), before);
    }

    #[test]
    fn defend_requires_a_docked_vehicle() {
        let mut app = sim_app();
        *app.world_mut().resource_mut::<VehicleState>() = VehicleState::InTransit;
        send_incoming_raid(&mut app);
        tick(&mut app, 0.05);
        assert!(app.world().resource::<BattlePhase>().is_idle());
        assert_eq!(count_units(&mut app), (0, 0));
    }

    #[test]
    fn defend_requires_vehicle_ownership() {
        let mut app = sim_app();
        app.world_mut().resource_mut::<PlayerVehicle>().owned = false;
        send_incoming_raid(&mut app);
        tick(&mut app, 0.05);
        assert!(app.world().resource::<BattlePhase>().is_idle());
        assert_eq!(count_units(&mut app), (0, 0));
    }

    #[test]
    fn raid_battle_spawn_bands() {
        let mut app = sim_app();
        assert!(trigger_raid_battle(&mut app));
        tick(&mut app, 0.02);
        let (allies, enemies) = count_units(&mut app);
        assert!((RAID_ALLY_MIN..=RAID_ALLY_MAX).contains(&allies));
        assert!((RAID_ENEMY_MIN..=RAID_ENEMY_MAX).contains(&enemies));
        // Raid mechs carry the raised health band.
        let mut q = app
            .world_mut()
            .query::<(&Faction, &MaxHealth, &UnitKind)>();
        for (faction, max, kind) in q.iter(app.world()) {
            if *faction == Faction::Ally {
                assert_eq!(*kind, UnitKind::Mech);
                assert_eq!(max.0, RAID_MECH_MAX_HEALTH);
            }
        }
    }

    #[test]
    fn resolution_with_zero_survivors() {
        let mut app = sim_app();
        trigger_raid_battle(&mut app);
        tick(&mut app, 0.02);
        let wins_before = app.world().resource::<KillStats>().raid_wins;

        let mut q = app.world_mut().query::<(&Faction, &mut Health)>();
        for (faction, mut health) in q.iter_mut(app.world_mut()) {
            if *faction == Faction::Ally {
                health.0 = 0.0;
            }
        }
        tick(&mut app, 0.02);

        let resolved = drain_resolved(&mut app);
        assert_eq!(resolved, vec![0]);
        assert!(app.world().resource::<BattlePhase>().is_idle());
        assert_eq!(app.world().resource::<KillStats>().raid_wins, wins_before);
        assert_eq!(count_units(&mut app), (0, 0));
    }

    #[test]
    fn resolution_with_allies_standing_counts_a_raid_win() {
        let mut app = sim_app();
        trigger_raid_battle(&mut app);
        tick(&mut app, 0.02);

        let mut q = app.world_mut().query::<(&Faction, &mut Health)>();
        for (faction, mut health) in q.iter_mut(app.world_mut()) {
            if *faction == Faction::Enemy {
                health.0 = 0.0;
            }
        }
        tick(&mut app, 0.02);

        let resolved = drain_resolved(&mut app);
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0] > 0);
        assert_eq!(app.world().resource::<KillStats>().raid_wins, 1);
        assert_eq!(count_units(&mut app), (0, 0));
        // Exactly one resolution: further ticks stay quiet.
        tick(&mut app, 0.02);
        assert!(drain_resolved(&mut app).is_empty());
    }

    #[test]
    fn neutral_bystanders_survive_cleanup() {
        let mut app = sim_app();
        let dog = crate::testing::spawn_unit(
            &mut app,
            Vec2::new(8.0, 15.0),
            UnitKind::Soldier,
            Faction::Neutral,
            100.0,
        );
        trigger_raid_battle(&mut app);
        tick(&mut app, 0.02);

        let mut q = app.world_mut().query::<(&Faction, &mut Health)>();
        for (faction, mut health) in q.iter_mut(app.world_mut()) {
            if *faction == Faction::Enemy {
                health.0 = 0.0;
            }
        }
        tick(&mut app, 0.02);
        assert!(app.world().get_entity(dog).is_ok(), "neutral unit not swept");
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(ease_in(0.0), 0.0);
        assert_eq!(ease_in(1.0), 1.0);
    }
}
