//! World setup - landmark placement, scene anchor, destination catalog

use bevy::prelude::*;
use rand::Rng;

use crate::components::*;
use crate::constants::*;
use crate::iso;
use crate::rendering::bottom_anchored;
use crate::resources::{SceneAnchor, TravelTarget};

/// Grid cell of the home pad (grid center). The docked vehicle, ally spawn
/// clusters and the travel animator all reference this one cell.
pub const HOME_CELL: Vec2 = Vec2::new(GRID_SIZE / 2.0, GRID_SIZE / 2.0);

/// Named mission/raid destinations in grid cells. Order matters: numeric
/// and unknown identifiers fall back into this list positionally.
pub const DESTINATIONS: [(&str, Vec2); 3] = [
    ("MiningRun", Vec2::new(4.0, 6.0)),
    ("BlackMarket", Vec2::new(7.0, 4.0)),
    ("ArtifactHunt", Vec2::new(2.0, 8.0)),
];

/// Map a travel target to grid coordinates. Never fails: unknown names take
/// the first entry, indices wrap modulo the list length.
pub fn resolve_destination(target: &TravelTarget) -> Vec2 {
    match target {
        TravelTarget::Named(name) => DESTINATIONS
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, cell)| *cell)
            .unwrap_or(DESTINATIONS[0].1),
        TravelTarget::Index(i) => DESTINATIONS[i % DESTINATIONS.len()].1,
    }
}

/// Uniformly random cell in the lower half of the grid, keeping the visual
/// base clustered below the horizon line.
fn rand_lower_cell(rng: &mut impl Rng) -> Vec2 {
    let half = GRID_SIZE / 2.0;
    Vec2::new(
        rng.random_range(1.0..GRID_SIZE).floor(),
        half + rng.random_range(0.0..half).floor(),
    )
}

/// Spawn the scene anchor, floor, landmarks and vehicle sprites. Runs once
/// at startup; landmark positions are fixed for the session.
pub fn setup_world(mut commands: Commands) {
    let anchor = commands
        .spawn((Transform::default(), Visibility::default()))
        .id();
    commands.insert_resource(SceneAnchor(anchor));

    // Floor, centered on the grid center and clipped to its own bounds by
    // virtue of being a bounded quad.
    let center = iso::project(HOME_CELL);
    commands.spawn((
        Sprite::from_color(Color::srgb(0.48, 0.24, 0.16), Vec2::new(FLOOR_W, FLOOR_H)),
        Transform::from_xyz(center.x, -center.y, FLOOR_Z),
        ChildOf(anchor),
    ));

    let mut rng = rand::rng();
    let mut landmarks: Vec<(Landmark, Vec2)> = Vec::new();
    for _ in 0..BUILDING_COUNT {
        landmarks.push((Landmark::Building, rand_lower_cell(&mut rng)));
    }
    for _ in 0..ROCK_COUNT {
        landmarks.push((Landmark::Rock, rand_lower_cell(&mut rng)));
    }
    for _ in 0..CRATE_COUNT {
        landmarks.push((Landmark::Crate, rand_lower_cell(&mut rng)));
    }
    landmarks.push((Landmark::Dog, rand_lower_cell(&mut rng)));
    landmarks.push((Landmark::HomePad, HOME_CELL));

    for (kind, cell) in landmarks {
        let size = kind.sprite_size();
        commands.spawn((
            kind,
            GridPos(cell),
            Sprite::from_color(kind.color(), size),
            bottom_anchored(iso::project(cell), size.y, LANDMARK_Z),
            ChildOf(anchor),
        ));
    }

    // Docked vehicle at the home pad, plus the (initially hidden) travel
    // overlay that stands in for it while a sequence runs.
    let ship_size = Vec2::new(SHIP_SIZE.0, SHIP_SIZE.1);
    let home = iso::project(HOME_CELL);
    commands.spawn((
        PlayerShip,
        Sprite::from_color(Color::srgb(0.78, 0.78, 0.82), ship_size),
        bottom_anchored(home, ship_size.y, SHIP_Z),
        ChildOf(anchor),
    ));
    commands.spawn((
        TravelOverlay,
        Sprite::from_color(Color::srgb(0.78, 0.78, 0.82), ship_size),
        bottom_anchored(home, ship_size.y, OVERLAY_Z),
        Visibility::Hidden,
        ChildOf(anchor),
    ));

    info!("world ready: {}x{} grid, home pad at {:?}", GRID_SIZE, GRID_SIZE, HOME_CELL);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_derives_from_floor_width() {
        // Two half-tiles per cell across the floor, halved.
        assert_eq!(GRID_SIZE, 20.0);
    }

    #[test]
    fn named_destination_resolves() {
        let cell = resolve_destination(&TravelTarget::Named("MiningRun".into()));
        assert_eq!(cell, Vec2::new(4.0, 6.0));
    }

    #[test]
    fn index_falls_back_modulo_list_length() {
        // 7 mod 3 = 1 -> BlackMarket
        let cell = resolve_destination(&TravelTarget::Index(7));
        assert_eq!(cell, Vec2::new(7.0, 4.0));
    }

    #[test]
    fn unknown_name_falls_back_positionally() {
        let cell = resolve_destination(&TravelTarget::Named("SmugglersDen".into()));
        assert_eq!(cell, DESTINATIONS[0].1);
    }

    #[test]
    fn lower_cells_stay_in_lower_half() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let cell = rand_lower_cell(&mut rng);
            assert!(cell.x >= 1.0 && cell.x < GRID_SIZE);
            assert!(cell.y >= GRID_SIZE / 2.0 && cell.y < GRID_SIZE);
        }
    }
}
