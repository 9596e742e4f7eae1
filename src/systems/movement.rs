//! Agent movement - reflect-and-re-randomize wandering with obstacle checks

use bevy::prelude::*;
use rand::Rng;

use crate::components::*;
use crate::constants::{GRID_SIZE, LANDMARK_BLOCK_RADIUS};
use crate::iso;

/// One wander step. Returns the committed position and heading.
///
/// The proposed move is rejected when it leaves the grid on either axis or
/// its projected world position falls within the block radius of any
/// obstacle; a rejected mover reverses its X heading and re-randomizes Y
/// (keeping the old Y when the fresh draw is exactly zero). This is
/// deliberately not pathfinding: units wander and bounce, they do not seek.
pub fn wander_step(
    pos: Vec2,
    heading: Vec2,
    speed: f32,
    dt: f32,
    obstacles: &[Vec2],
    rng: &mut impl Rng,
) -> (Vec2, Vec2) {
    let proposed = pos + heading * speed * dt;
    let inside = proposed.x >= 0.0
        && proposed.x <= GRID_SIZE
        && proposed.y >= 0.0
        && proposed.y <= GRID_SIZE;

    let blocked = inside && {
        let world = iso::project(proposed);
        obstacles
            .iter()
            .any(|o| world.distance(*o) < LANDMARK_BLOCK_RADIUS)
    };

    if !inside || blocked {
        let fresh: f32 = rng.random_range(-0.5..0.5);
        let new_y = if fresh != 0.0 { fresh } else { heading.y };
        (pos, Vec2::new(-heading.x, new_y))
    } else {
        (proposed, heading)
    }
}

/// Advance every living unit by the frame delta.
pub fn wander_system(
    time: Res<Time>,
    landmarks: Query<&GridPos, (With<Landmark>, Without<Unit>)>,
    mut units: Query<(&mut GridPos, &mut Heading, &UnitKind), (With<Unit>, Without<Dead>)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    let obstacles: Vec<Vec2> = landmarks.iter().map(|g| iso::project(g.0)).collect();
    let mut rng = rand::rng();

    for (mut pos, mut heading, kind) in units.iter_mut() {
        let (next, dir) = wander_step(pos.0, heading.0, kind.speed(), dt, &obstacles, &mut rng);
        pos.0 = next;
        heading.0 = dir;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_never_leave_the_grid() {
        let mut rng = rand::rng();
        let mut pos = Vec2::new(0.1, GRID_SIZE - 0.1);
        let mut heading = Vec2::new(-0.5, 0.5);
        for _ in 0..2000 {
            let (p, h) = wander_step(pos, heading, 0.6, 0.25, &[], &mut rng);
            pos = p;
            heading = h;
            assert!(pos.x >= 0.0 && pos.x <= GRID_SIZE, "x out of bounds: {}", pos.x);
            assert!(pos.y >= 0.0 && pos.y <= GRID_SIZE, "y out of bounds: {}", pos.y);
        }
    }

    #[test]
    fn boundary_rejection_reverses_x_heading() {
        let mut rng = rand::rng();
        let pos = Vec2::new(0.01, 10.0);
        let heading = Vec2::new(-0.5, 0.1);
        let (p, h) = wander_step(pos, heading, 1.0, 0.5, &[], &mut rng);
        assert_eq!(p, pos);
        assert_eq!(h.x, 0.5);
    }

    #[test]
    fn landmark_blocks_the_move() {
        let mut rng = rand::rng();
        let pos = Vec2::new(5.0, 5.0);
        let heading = Vec2::new(0.5, 0.0);
        // Obstacle sitting right on the proposed cell.
        let obstacle = iso::project(Vec2::new(5.25, 5.0));
        let (p, h) = wander_step(pos, heading, 1.0, 0.5, &[obstacle], &mut rng);
        assert_eq!(p, pos);
        assert_eq!(h.x, -0.5);
    }

    #[test]
    fn clear_move_commits() {
        let mut rng = rand::rng();
        let pos = Vec2::new(5.0, 5.0);
        let heading = Vec2::new(0.4, -0.2);
        let (p, h) = wander_step(pos, heading, 1.0, 0.5, &[], &mut rng);
        assert_eq!(p, pos + heading * 0.5);
        assert_eq!(h, heading);
    }
}
