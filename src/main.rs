//! Outpost - isometric base scene with live skirmishes and vehicle travel.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bevy::prelude::*;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Outpost".into(),
            resolution: (1280, 720).into(),
            ..default()
        }),
        ..default()
    }));

    app.add_plugins(bevy_egui::EguiPlugin::default());
    app.add_plugins(bevy_framepace::FramepacePlugin);

    // Wire up ECS systems
    outpost::build_app(&mut app);

    // Apply saved display settings on startup
    app.add_systems(
        Startup,
        |settings: Res<outpost::settings::UserSettings>,
         mut winit_settings: ResMut<bevy::winit::WinitSettings>,
         mut framepace: ResMut<bevy_framepace::FramepaceSettings>| {
            if settings.background_fps {
                winit_settings.unfocused_mode = bevy::winit::UpdateMode::Continuous;
            }
            framepace.limiter = if settings.frame_cap > 0.0 {
                bevy_framepace::Limiter::from_framerate(settings.frame_cap)
            } else {
                bevy_framepace::Limiter::Auto
            };
        },
    );

    app.run();
}
