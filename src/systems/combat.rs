//! Combat resolver - fire decisions, projectile flight, hits and casualties

use bevy::prelude::*;
use rand::Rng;

use crate::components::*;
use crate::constants::*;
use crate::iso::{self, Projector};
use crate::resources::{is_counted_kill, KillStats, SceneAnchor};

/// Multiplicative jitter in `1 ± COMBAT_JITTER`.
fn jitter(rng: &mut impl Rng) -> f32 {
    1.0 + rng.random_range(-COMBAT_JITTER..COMBAT_JITTER)
}

/// Is a screen-space point beyond the padded viewport bound?
pub fn outside_viewport(screen: Vec2, viewport: Vec2) -> bool {
    screen.x < -VIEWPORT_CULL_PAD
        || screen.x > viewport.x + VIEWPORT_CULL_PAD
        || screen.y < -VIEWPORT_CULL_PAD
        || screen.y > viewport.y + VIEWPORT_CULL_PAD
}

/// Advance shoot timers and emit projectiles.
///
/// A shooter picks a uniformly random living unit of a different,
/// non-neutral faction — no range or line-of-sight check; any opposing unit
/// anywhere on the grid is a valid target.
pub fn fire_system(
    time: Res<Time>,
    mut commands: Commands,
    anchor: Res<SceneAnchor>,
    mut shooters: Query<
        (Entity, &GridPos, &Faction, &UnitKind, &mut ShootTimer),
        (With<Unit>, Without<Dead>),
    >,
    targets: Query<(Entity, &GridPos, &Faction, &Health), (With<Unit>, Without<Dead>)>,
) {
    let dt = time.delta_secs();
    let mut rng = rand::rng();

    for (shooter, pos, faction, kind, mut timer) in shooters.iter_mut() {
        timer.since_last += dt;
        if timer.since_last < timer.interval {
            continue;
        }
        timer.since_last = 0.0;
        timer.interval = rng.random_range(SHOOT_INTERVAL_MIN..SHOOT_INTERVAL_MAX);

        let candidates: Vec<(Entity, Vec2)> = targets
            .iter()
            .filter(|(e, _, f, h)| *e != shooter && faction.hostile_to(**f) && h.0 > 0.0)
            .map(|(e, g, _, _)| (e, g.0))
            .collect();
        if candidates.is_empty() {
            continue;
        }
        let (target, target_cell) = candidates[rng.random_range(0..candidates.len())];

        let from = iso::project(pos.0);
        let to = iso::project(target_cell);
        let dir = (to - from).normalize_or(Vec2::X);
        let speed = PROJECTILE_SPEED * jitter(&mut rng);
        let damage = kind.damage() * jitter(&mut rng);

        commands.spawn((
            Projectile { velocity: dir * speed, damage, faction: *faction, target },
            WorldPos(from),
            Sprite::from_color(
                faction.projectile_color(),
                Vec2::splat(PROJECTILE_DOT_SIZE),
            ),
            Transform::from_xyz(from.x, -from.y, PROJECTILE_Z),
            ChildOf(anchor.0),
        ));
    }
}

/// Advance projectiles, resolve hits, and cull shots beyond the viewport.
///
/// A despawned target makes the entity lookup fail and the shot simply flies
/// on until the bound discards it — a miss, not an error.
pub fn projectile_system(
    time: Res<Time>,
    mut commands: Commands,
    projector: Res<Projector>,
    windows: Query<&Window>,
    mut kill_stats: ResMut<KillStats>,
    mut projectiles: Query<(Entity, &Projectile, &mut WorldPos)>,
    mut units: Query<(&GridPos, &Faction, &mut Health), (With<Unit>, Without<Dead>)>,
) {
    let dt = time.delta_secs();
    let viewport = windows
        .single()
        .ok()
        .map(|w| Vec2::new(w.width(), w.height()));

    for (entity, shot, mut pos) in projectiles.iter_mut() {
        pos.0 += shot.velocity * dt;

        if let Ok((target_pos, target_faction, mut health)) = units.get_mut(shot.target) {
            if health.0 > 0.0 {
                let impact = iso::project(target_pos.0);
                if pos.0.distance(impact) < PROJECTILE_HIT_RADIUS {
                    health.0 = (health.0 - shot.damage).max(0.0);
                    commands.entity(entity).despawn();
                    if health.0 <= 0.0 {
                        commands.entity(shot.target).insert(Dead);
                        if is_counted_kill(shot.faction, *target_faction) {
                            kill_stats.kills += 1;
                        }
                    }
                    continue;
                }
            }
        }

        // Simulation-cost bound, not a gameplay rule.
        if let Some(viewport) = viewport {
            if outside_viewport(projector.world_to_screen(pos.0), viewport) {
                commands.entity(entity).despawn();
            }
        }
    }
}

/// Remove casualties. Runs after hit resolution so a unit despawns exactly
/// once, on the frame its health first reached zero.
pub fn death_cleanup_system(
    mut commands: Commands,
    dead: Query<Entity, (With<Unit>, With<Dead>)>,
) {
    for entity in dead.iter() {
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::VehicleState;
    use crate::testing::{spawn_unit, tick, sim_app};

    #[test]
    fn adjacent_duel_fires_one_projectile_then_hits() {
        let mut app = sim_app();
        // Shooter fires immediately; the target never does.
        let shooter = spawn_unit(
            &mut app,
            Vec2::new(6.0, 14.0),
            UnitKind::Soldier,
            Faction::Ally,
            100.0,
        );
        app.world_mut().entity_mut(shooter).insert(ShootTimer { since_last: 0.0, interval: 0.0 });
        let target = spawn_unit(
            &mut app,
            Vec2::new(6.5, 14.0),
            UnitKind::Soldier,
            Faction::Enemy,
            100.0,
        );
        app.world_mut().entity_mut(target).insert(ShootTimer { since_last: 0.0, interval: 999.0 });

        tick(&mut app, 0.02);
        let count = app
            .world_mut()
            .query::<&Projectile>()
            .iter(app.world())
            .count();
        assert_eq!(count, 1, "exactly one projectile after one resolver tick");

        // Let the shot cross the hit radius threshold.
        for _ in 0..40 {
            tick(&mut app, 0.02);
            let left = app
                .world_mut()
                .query::<&Projectile>()
                .iter(app.world())
                .count();
            if left == 0 {
                break;
            }
        }
        let left = app
            .world_mut()
            .query::<&Projectile>()
            .iter(app.world())
            .count();
        assert_eq!(left, 0, "projectile list empty after the hit");

        let health = app.world().get::<Health>(target).map(|h| h.0);
        // Soldier damage band: 20 ± 10%.
        let health = health.expect("target still has a health readout");
        assert!(
            health >= 100.0 - SOLDIER_DAMAGE * 1.1 && health <= 100.0 - SOLDIER_DAMAGE * 0.9,
            "health {} outside the shooter's damage band",
            health
        );
        // Vehicle untouched by combat.
        assert_eq!(*app.world().resource::<VehicleState>(), VehicleState::Docked);
    }

    #[test]
    fn ally_kill_of_enemy_increments_counter_once() {
        let mut app = sim_app();
        let shooter = spawn_unit(&mut app, Vec2::new(6.0, 14.0), UnitKind::Mech, Faction::Ally, 100.0);
        app.world_mut().entity_mut(shooter).insert(ShootTimer { since_last: 0.0, interval: 0.0 });
        let victim = spawn_unit(&mut app, Vec2::new(6.4, 14.0), UnitKind::Soldier, Faction::Enemy, 5.0);
        app.world_mut().entity_mut(victim).insert(ShootTimer { since_last: 0.0, interval: 999.0 });

        for _ in 0..60 {
            tick(&mut app, 0.02);
            if app.world().get_entity(victim).is_err() {
                break;
            }
        }
        assert!(app.world().get_entity(victim).is_err(), "victim removed on death");
        assert_eq!(app.world().resource::<KillStats>().kills, 1);
    }

    #[test]
    fn enemy_kill_of_ally_is_not_counted() {
        let mut app = sim_app();
        let shooter = spawn_unit(&mut app, Vec2::new(6.0, 14.0), UnitKind::Mech, Faction::Enemy, 100.0);
        app.world_mut().entity_mut(shooter).insert(ShootTimer { since_last: 0.0, interval: 0.0 });
        let victim = spawn_unit(&mut app, Vec2::new(6.4, 14.0), UnitKind::Soldier, Faction::Ally, 5.0);
        app.world_mut().entity_mut(victim).insert(ShootTimer { since_last: 0.0, interval: 999.0 });

        for _ in 0..60 {
            tick(&mut app, 0.02);
            if app.world().get_entity(victim).is_err() {
                break;
            }
        }
        assert!(app.world().get_entity(victim).is_err());
        assert_eq!(app.world().resource::<KillStats>().kills, 0);
    }

    #[test]
    fn health_clamps_at_zero() {
        let mut app = sim_app();
        let shooter = spawn_unit(&mut app, Vec2::new(6.0, 14.0), UnitKind::Mech, Faction::Ally, 100.0);
        app.world_mut().entity_mut(shooter).insert(ShootTimer { since_last: 0.0, interval: 0.0 });
        let victim = spawn_unit(&mut app, Vec2::new(6.4, 14.0), UnitKind::Soldier, Faction::Enemy, 1.0);
        app.world_mut().entity_mut(victim).insert(ShootTimer { since_last: 0.0, interval: 999.0 });

        for _ in 0..60 {
            tick(&mut app, 0.02);
            if let Some(h) = app.world().get::<Health>(victim) {
                assert!(h.0 >= 0.0, "health never goes negative");
            } else {
                break;
            }
        }
    }

    #[test]
    fn stale_target_is_treated_as_a_miss() {
        let mut app = sim_app();
        let target = spawn_unit(&mut app, Vec2::new(6.5, 14.0), UnitKind::Soldier, Faction::Enemy, 100.0);
        let anchor = app.world().resource::<SceneAnchor>().0;
        let from = iso::project(Vec2::new(6.0, 14.0));
        app.world_mut().spawn((
            Projectile {
                velocity: Vec2::new(50.0, 0.0),
                damage: 20.0,
                faction: Faction::Ally,
                target,
            },
            WorldPos(from),
            Transform::from_xyz(from.x, -from.y, PROJECTILE_Z),
            ChildOf(anchor),
        ));
        app.world_mut().entity_mut(target).despawn();

        // The shot flies on harmlessly; no window exists here so the bound
        // never fires, and nothing panics on the dead entity id.
        for _ in 0..10 {
            tick(&mut app, 0.05);
        }
        let count = app
            .world_mut()
            .query::<&Projectile>()
            .iter(app.world())
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn viewport_bound_is_padded() {
        let viewport = Vec2::new(800.0, 600.0);
        assert!(!outside_viewport(Vec2::new(-49.0, 300.0), viewport));
        assert!(outside_viewport(Vec2::new(-51.0, 300.0), viewport));
        assert!(outside_viewport(Vec2::new(400.0, 651.0), viewport));
        assert!(!outside_viewport(Vec2::new(849.0, 649.0), viewport));
    }
}
