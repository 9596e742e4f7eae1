//! Camera input - pointer/touch drag panning. No zoom, no clamping.

use bevy::prelude::*;

use crate::iso::Projector;
use crate::settings::UserSettings;

/// Drag with the left mouse button or one finger to pan. Deltas feed the
/// shared projector pan directly; panning clean off the floor is allowed.
pub fn drag_pan_system(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    settings: Option<Res<UserSettings>>,
    mut projector: ResMut<Projector>,
    mut last_cursor: Local<Option<Vec2>>,
) {
    let sensitivity = settings.map(|s| s.pan_sensitivity).unwrap_or(1.0);

    // Touch drag: bevy tracks per-touch deltas for us.
    let mut touch_iter = touches.iter();
    if let Some(touch) = touch_iter.next() {
        if touch_iter.next().is_none() {
            projector.pan += touch.delta() * sensitivity;
        }
        *last_cursor = None;
        return;
    }

    if !mouse.pressed(MouseButton::Left) {
        *last_cursor = None;
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    if let Some(previous) = *last_cursor {
        projector.pan += (cursor - previous) * sensitivity;
    }
    *last_cursor = Some(cursor);
}
