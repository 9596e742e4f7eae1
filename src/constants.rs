//! Constants - Tuning parameters for the base scene and skirmish simulation

/// Isometric tile footprint in world pixels.
pub const TILE_W: f32 = 64.0;
pub const TILE_H: f32 = 32.0;

/// Floor backdrop dimensions in world pixels. The grid is derived from the
/// floor width the same way the art was authored: two half-tiles per cell.
pub const FLOOR_W: f32 = 1280.0;
pub const FLOOR_H: f32 = 640.0;

/// Side length of the square grid, in cells. `2*FLOOR_W/TILE_W` total
/// half-cells, halved. Fixed for the session.
pub const GRID_SIZE: f32 = (2.0 * FLOOR_W / TILE_W) / 2.0;

/// Fixed camera scale. There is no zoom; only pan is mutable.
pub const CAMERA_SCALE: f32 = 1.5;

/// Fraction of the viewport height the home pad is shifted below center on
/// startup, so the base sits in the lower part of the screen.
pub const HOME_FRAMING_SHIFT: f32 = 0.3;

// ============================================================================
// LANDMARKS
// ============================================================================

pub const BUILDING_COUNT: usize = 5;
pub const ROCK_COUNT: usize = 7;
pub const CRATE_COUNT: usize = 7;

/// Obstacle radius around a landmark's projected position, in world pixels.
pub const LANDMARK_BLOCK_RADIUS: f32 = TILE_W * 0.5;

// ============================================================================
// AGENTS
// ============================================================================

/// Wander speed in grid cells per second. Mechs read slower on screen.
pub const SOLDIER_SPEED: f32 = 0.6;
pub const MECH_SPEED: f32 = 0.4;

pub const UNIT_MAX_HEALTH: f32 = 100.0;

/// Raised health band for the mechs escorting an outbound raid.
pub const RAID_MECH_MAX_HEALTH: f32 = 140.0;

/// Seconds between shots: a fresh interval is drawn uniformly from this band
/// after every shot.
pub const SHOOT_INTERVAL_MIN: f32 = 1.0;
pub const SHOOT_INTERVAL_MAX: f32 = 3.0;

/// Soldier walk cycle alternates every this many seconds.
pub const WALK_FRAME_SECS: f32 = 0.3;

// ============================================================================
// PROJECTILES
// ============================================================================

/// Base projectile speed in world pixels per second, jittered ±10% per shot.
pub const PROJECTILE_SPEED: f32 = 200.0;

/// Per-kind damage base, jittered ±10% per shot.
pub const SOLDIER_DAMAGE: f32 = 20.0;
pub const MECH_DAMAGE: f32 = 35.0;

/// Multiplicative jitter band applied to projectile speed and damage.
pub const COMBAT_JITTER: f32 = 0.1;

/// Hit radius around the target's projected position, in world pixels.
pub const PROJECTILE_HIT_RADIUS: f32 = 10.0;

/// Projectiles this far outside the viewport (screen pixels) are discarded.
pub const VIEWPORT_CULL_PAD: f32 = 50.0;

pub const PROJECTILE_DOT_SIZE: f32 = 6.0;

// ============================================================================
// BATTLES
// ============================================================================

/// Defend entry: enemy mechs landing at the map edge.
pub const DEFEND_ENEMY_MIN: u32 = 2;
pub const DEFEND_ENEMY_MAX: u32 = 4;

/// Defend entry: ally soldiers mustering at the home pad.
pub const DEFEND_ALLY_MIN: u32 = 3;
pub const DEFEND_ALLY_MAX: u32 = 5;

/// Raid-out entry: defending soldiers at the target base.
pub const RAID_ENEMY_MIN: u32 = 3;
pub const RAID_ENEMY_MAX: u32 = 5;

/// Raid-out entry: attacking mechs.
pub const RAID_ALLY_MIN: u32 = 2;
pub const RAID_ALLY_MAX: u32 = 4;

/// Grid-cell spread of a spawn cluster around its center.
pub const SPAWN_CLUSTER_SPREAD: f32 = 2.0;

/// Seconds the enemy dropship takes to land or depart.
pub const DROPSHIP_TWEEN_SECS: f32 = 1.0;

/// Grid cells the dropship starts off-map to the left when arriving.
pub const DROPSHIP_OFFMAP_CELLS: f32 = 5.0;

// ============================================================================
// TRAVEL
// ============================================================================

pub const LAUNCH_SECS: f32 = 0.5;
pub const CRUISE_SECS: f32 = 1.0;
pub const TURN_HOME_SECS: f32 = 0.3;
pub const RETURN_SECS: f32 = 1.0;
pub const ARRIVAL_HOLD_SECS: f32 = 0.2;

/// Launch tilt in radians (nose up) and rise in world pixels.
pub const LAUNCH_TILT: f32 = -20.0 * core::f32::consts::PI / 180.0;
pub const LAUNCH_RISE: f32 = 36.0;

pub const FADE_SECS: f32 = 0.4;
pub const BANNER_SECS: f32 = 1.2;
pub const OFFMAP_SECS: f32 = 0.8;

/// Fixed simulated duration the raid-out sequence holds on the skirmish so
/// the caller can treat the battle entry as an awaited animation beat.
pub const RAID_BATTLE_HOLD_SECS: f32 = 4.0;

/// World-pixel overshoot used for off-map fly-out points when no window is
/// available to measure the real viewport.
pub const OFFMAP_FALLBACK_PX: f32 = 2000.0;

// ============================================================================
// HUD
// ============================================================================

/// Status panel auto-hides after this many seconds.
pub const STATUS_HIDE_SECS: f32 = 3.0;

// ============================================================================
// SPRITE SIZES (world pixels; flat-color quads stand in for the atlas art)
// ============================================================================

pub const SOLDIER_SIZE: (f32, f32) = (14.0, 28.0);
pub const MECH_SIZE: (f32, f32) = (26.0, 40.0);
pub const SHIP_SIZE: (f32, f32) = (48.0, 24.0);
pub const BUILDING_SIZE: (f32, f32) = (40.0, 56.0);
pub const ROCK_SIZE: (f32, f32) = (20.0, 14.0);
pub const CRATE_SIZE: (f32, f32) = (16.0, 16.0);
pub const DOG_SIZE: (f32, f32) = (10.0, 8.0);

pub const HEALTH_BAR_W: f32 = 40.0;
pub const HEALTH_BAR_H: f32 = 4.0;

// Draw layers, bottom to top.
pub const FLOOR_Z: f32 = 0.0;
pub const LANDMARK_Z: f32 = 1.0;
pub const SHIP_Z: f32 = 2.0;
pub const UNIT_Z: f32 = 3.0;
pub const PROJECTILE_Z: f32 = 4.0;
pub const OVERLAY_Z: f32 = 5.0;
