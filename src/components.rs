//! ECS Components - units, landmarks, projectiles, overlay sprites

use bevy::prelude::*;

use crate::constants::*;

// ============================================================================
// UNITS
// ============================================================================

/// Marker for autonomous roaming combat units.
#[derive(Component)]
pub struct Unit;

/// Position in grid cells. Sub-cell precision keeps motion smooth.
#[derive(Component, Clone, Copy, Debug)]
pub struct GridPos(pub Vec2);

/// Wander direction in grid space. Not normalized; the spawn draw in
/// [-0.5, 0.5] per axis is kept as-is so unit gaits vary.
#[derive(Component, Clone, Copy, Debug)]
pub struct Heading(pub Vec2);

/// Unit silhouette. Mechs hit harder and walk slower than soldiers.
#[derive(Component, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum UnitKind {
    Soldier,
    Mech,
}

impl UnitKind {
    pub fn speed(self) -> f32 {
        match self {
            UnitKind::Soldier => SOLDIER_SPEED,
            UnitKind::Mech => MECH_SPEED,
        }
    }

    /// Damage base before the per-shot jitter.
    pub fn damage(self) -> f32 {
        match self {
            UnitKind::Soldier => SOLDIER_DAMAGE,
            UnitKind::Mech => MECH_DAMAGE,
        }
    }

    pub fn sprite_size(self) -> Vec2 {
        let (w, h) = match self {
            UnitKind::Soldier => SOLDIER_SIZE,
            UnitKind::Mech => MECH_SIZE,
        };
        Vec2::new(w, h)
    }

    /// Body color for this silhouette and side.
    pub fn color(self, faction: Faction) -> Color {
        match (self, faction) {
            (UnitKind::Soldier, Faction::Ally) => Color::srgb(0.45, 0.75, 0.45),
            (UnitKind::Soldier, Faction::Enemy) => Color::srgb(0.80, 0.45, 0.35),
            (UnitKind::Soldier, Faction::Neutral) => Color::srgb(0.65, 0.65, 0.55),
            (UnitKind::Mech, Faction::Ally) => Color::srgb(0.40, 0.55, 0.85),
            (UnitKind::Mech, Faction::Enemy) => Color::srgb(0.75, 0.30, 0.30),
            (UnitKind::Mech, Faction::Neutral) => Color::srgb(0.60, 0.60, 0.60),
        }
    }
}

/// Which side a unit fights for. A unit never fires at its own faction or at
/// `Neutral`.
#[derive(Component, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Faction {
    Ally,
    Enemy,
    Neutral,
}

impl Faction {
    /// Valid fire target for a shooter of this faction?
    pub fn hostile_to(self, other: Faction) -> bool {
        match (self, other) {
            (Faction::Neutral, _) | (_, Faction::Neutral) => false,
            (a, b) => a != b,
        }
    }

    pub fn projectile_color(self) -> Color {
        match self {
            Faction::Ally => Color::srgb(1.0, 0.95, 0.3),
            Faction::Enemy => Color::srgb(1.0, 0.5, 0.2),
            Faction::Neutral => Color::srgb(0.8, 0.8, 0.8),
        }
    }
}

/// Current health. Clamped at zero; zero is the death threshold.
#[derive(Component, Clone, Copy, Debug)]
pub struct Health(pub f32);

#[derive(Component, Clone, Copy, Debug)]
pub struct MaxHealth(pub f32);

/// Fire-decision timer. A unit shoots when `since_last` reaches `interval`,
/// then draws a fresh interval.
#[derive(Component, Clone, Copy, Debug)]
pub struct ShootTimer {
    pub since_last: f32,
    pub interval: f32,
}

/// Unit is dead and pending removal. Inserted exactly once, when health
/// first reaches zero.
#[derive(Component)]
pub struct Dead;

// ============================================================================
// LANDMARKS
// ============================================================================

/// Static scenery. Obstacles for wandering units, draw targets otherwise.
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Landmark {
    Building,
    Rock,
    Crate,
    Dog,
    HomePad,
}

impl Landmark {
    pub fn sprite_size(self) -> Vec2 {
        let (w, h) = match self {
            Landmark::Building => BUILDING_SIZE,
            Landmark::Rock => ROCK_SIZE,
            Landmark::Crate => CRATE_SIZE,
            Landmark::Dog => DOG_SIZE,
            Landmark::HomePad => SHIP_SIZE,
        };
        Vec2::new(w, h)
    }

    pub fn color(self) -> Color {
        match self {
            Landmark::Building => Color::srgb(0.55, 0.40, 0.30),
            Landmark::Rock => Color::srgb(0.45, 0.40, 0.38),
            Landmark::Crate => Color::srgb(0.70, 0.58, 0.35),
            Landmark::Dog => Color::srgb(0.90, 0.88, 0.80),
            Landmark::HomePad => Color::srgb(0.35, 0.32, 0.30),
        }
    }
}

// ============================================================================
// PROJECTILES
// ============================================================================

/// In-flight shot. The target is a generation-checked entity id: if the
/// target despawns mid-flight the lookup fails and the shot just flies on
/// until the viewport bound discards it.
#[derive(Component, Clone, Copy, Debug)]
pub struct Projectile {
    pub velocity: Vec2,
    pub damage: f32,
    pub faction: Faction,
    pub target: Entity,
}

/// Projectile position in world pixels (grid-projected space).
#[derive(Component, Clone, Copy, Debug)]
pub struct WorldPos(pub Vec2);

// ============================================================================
// OVERLAY SPRITES
// ============================================================================

/// The player's vehicle as drawn docked at the home pad.
#[derive(Component)]
pub struct PlayerShip;

/// The travel overlay sprite, shown only while a travel sequence runs.
#[derive(Component)]
pub struct TravelOverlay;

/// The raiders' dropship, present only around defend battles.
#[derive(Component)]
pub struct EnemyShip;

/// Straight-line world-pixel tween for a ship sprite.
#[derive(Component, Clone, Copy, Debug)]
pub struct ShipTween {
    pub from: Vec2,
    pub to: Vec2,
    pub duration: f32,
    pub elapsed: f32,
    pub despawn_on_done: bool,
}

/// Set when a ShipTween finishes (and the sprite was not despawned).
#[derive(Component)]
pub struct TweenDone;

// ============================================================================
// VISUAL CHILDREN
// ============================================================================

/// Red backing bar behind a unit's health readout.
#[derive(Component)]
pub struct HealthBarBg;

/// Green fill scaled by current health ratio.
#[derive(Component)]
pub struct HealthBarFill;

/// The body quad of a unit (the child that flips and squashes).
#[derive(Component)]
pub struct UnitBody;

/// Which unit a visual child belongs to. Kept alongside the transform
/// hierarchy so sync systems can read the owner's state directly.
#[derive(Component, Clone, Copy, Debug)]
pub struct BelongsTo(pub Entity);
