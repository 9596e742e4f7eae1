//! Rendering - camera setup, scene anchor sync, and per-frame visual sync
//! of units, health bars and projectiles.
//!
//! Simulation state lives in grid/world coordinates (y down, per `iso`);
//! this module is the one place that flips into Bevy's y-up world. The whole
//! scene hangs off a single anchor entity whose transform carries the camera
//! pan and the fixed scale, so children position in raw world pixels.

use bevy::prelude::*;

use crate::components::*;
use crate::constants::*;
use crate::iso::{self, Projector};
use crate::resources::{PlayerVehicle, SceneAnchor, VehicleState};
use crate::world::HOME_CELL;

/// Transform for a sprite whose feet sit at `world` (bottom-anchored draw).
pub fn bottom_anchored(world: Vec2, height: f32, z: f32) -> Transform {
    Transform::from_xyz(world.x, -world.y + height / 2.0, z)
}

/// Marker component for the main game camera.
#[derive(Component)]
pub struct MainCamera;

/// Spawn the 2D camera and frame the home pad: centered horizontally,
/// shifted below center so the base fills the lower screen.
pub fn setup_camera(
    mut commands: Commands,
    windows: Query<&Window>,
    mut projector: ResMut<Projector>,
) {
    commands.spawn((Camera2d, MainCamera));

    if let Ok(window) = windows.single() {
        let home = iso::project(HOME_CELL);
        let size = Vec2::new(window.width(), window.height());
        projector.pan = Vec2::new(
            size.x / 2.0 - home.x * projector.scale,
            size.y * (0.5 + HOME_FRAMING_SHIFT) - home.y * projector.scale,
        );
        info!("camera framed on home pad, pan {:?}", projector.pan);
    }
}

/// Keep the scene anchor's transform in sync with the projector so child
/// sprites land exactly where `to_screen` says they should. Window resizes
/// re-derive the anchor but leave camera state untouched.
pub fn sync_scene_anchor(
    projector: Res<Projector>,
    anchor: Res<SceneAnchor>,
    windows: Query<&Window>,
    mut transforms: Query<&mut Transform>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok(mut transform) = transforms.get_mut(anchor.0) else {
        return;
    };
    let half = Vec2::new(window.width(), window.height()) / 2.0;
    transform.translation.x = projector.pan.x - half.x;
    transform.translation.y = half.y - projector.pan.y;
    transform.scale = Vec3::new(projector.scale, projector.scale, 1.0);
}

/// Move unit roots to their projected grid positions.
pub fn sync_units(mut units: Query<(&GridPos, &mut Transform), (With<Unit>, Changed<GridPos>)>) {
    for (pos, mut transform) in units.iter_mut() {
        let world = iso::project(pos.0);
        transform.translation.x = world.x;
        transform.translation.y = -world.y;
    }
}

/// Flip bodies to face their heading and run the soldier walk cycle (two
/// phases alternating, as the original's frame pair did).
pub fn sync_unit_bodies(
    time: Res<Time>,
    owners: Query<(&Heading, &UnitKind), With<Unit>>,
    mut bodies: Query<(&BelongsTo, &mut Transform), With<UnitBody>>,
) {
    let frame = (time.elapsed_secs() / WALK_FRAME_SECS) as u32 % 2;
    for (owner, mut transform) in bodies.iter_mut() {
        let Ok((heading, kind)) = owners.get(owner.0) else {
            continue;
        };
        let facing = if heading.0.x < 0.0 { -1.0 } else { 1.0 };
        let squash = match kind {
            UnitKind::Soldier if frame == 1 => 0.92,
            _ => 1.0,
        };
        transform.scale = Vec3::new(facing, squash, 1.0);
    }
}

/// Scale health-bar fills by the owner's health ratio, shrinking from the
/// right like a draining canvas rect.
pub fn sync_health_bars(
    owners: Query<(&Health, &MaxHealth), With<Unit>>,
    mut fills: Query<(&BelongsTo, &mut Transform), With<HealthBarFill>>,
) {
    for (owner, mut transform) in fills.iter_mut() {
        let Ok((health, max)) = owners.get(owner.0) else {
            continue;
        };
        let ratio = (health.0 / max.0).clamp(0.0, 1.0);
        transform.scale.x = ratio;
        transform.translation.x = -(1.0 - ratio) * HEALTH_BAR_W / 2.0;
    }
}

/// Move projectile dots to their world positions.
pub fn sync_projectiles(
    mut projectiles: Query<(&WorldPos, &mut Transform), With<Projectile>>,
) {
    for (pos, mut transform) in projectiles.iter_mut() {
        transform.translation.x = pos.0.x;
        transform.translation.y = -pos.0.y;
    }
}

/// The docked vehicle sprite draws only while a vehicle is owned and
/// actually docked; the travel overlay owns the visual otherwise.
pub fn sync_vehicle_visibility(
    vehicle: Res<VehicleState>,
    owned: Res<PlayerVehicle>,
    mut ships: Query<&mut Visibility, With<PlayerShip>>,
) {
    for mut visibility in ships.iter_mut() {
        *visibility = if !owned.owned || vehicle.in_flight() {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_anchor_puts_feet_on_the_point() {
        let t = bottom_anchored(Vec2::new(100.0, 40.0), 20.0, 3.0);
        // Sprite center sits half a height above the (flipped) anchor point.
        assert_eq!(t.translation.x, 100.0);
        assert_eq!(t.translation.y, -30.0);
        assert_eq!(t.translation.z, 3.0);
    }
}
