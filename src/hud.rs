//! HUD - egui top bar with counters, centered status panel, and the
//! full-screen fade/banner overlay the cinematic raid sequence drives.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use crate::game::{GameBalance, VehicleLevel};
use crate::resources::{KillStats, ScreenFx, StatusMessage, VehicleState};

/// Register the HUD systems. Panels claim layout before overlays paint.
pub fn register_ui(app: &mut App) {
    app.add_systems(
        EguiPrimaryContextPass,
        (hud_bar_system, status_panel_system, fx_overlay_system).chain(),
    );
}

fn hud_bar_system(
    mut contexts: EguiContexts,
    stats: Res<KillStats>,
    balance: Res<GameBalance>,
    level: Res<VehicleLevel>,
    vehicle: Res<VehicleState>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    egui::TopBottomPanel::top("hud_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("AT {:.1}", balance.0));
            ui.separator();
            ui.label(format!("Ship L{}", level.0));
            ui.separator();
            ui.label(format!("Kills: {}", stats.kills));
            ui.separator();
            ui.label(format!("Raids won: {}", stats.raid_wins));
            ui.separator();
            let state = match *vehicle {
                VehicleState::Docked => "docked",
                VehicleState::InTransit => "in transit",
                VehicleState::Returning => "returning",
            };
            ui.label(format!("Vehicle: {state}"));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.small("1/2/3 mission · R raid · E bad raid · D incoming · drag to pan");
            });
        });
    });
    Ok(())
}

fn status_panel_system(
    mut contexts: EguiContexts,
    status: Res<StatusMessage>,
) -> Result {
    let Some(text) = status.text.clone() else {
        return Ok(());
    };
    let ctx = contexts.ctx_mut()?;
    egui::Area::new(egui::Id::new("status_panel"))
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(egui::RichText::new(text).size(18.0).strong());
            });
        });
    Ok(())
}

/// Paint the travel sequence's fade-to-black and banner text over
/// everything else.
fn fx_overlay_system(mut contexts: EguiContexts, fx: Res<ScreenFx>) -> Result {
    if fx.fade <= 0.0 && fx.banner.is_none() {
        return Ok(());
    }
    let ctx = contexts.ctx_mut()?;
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new("travel_fx"))
        .order(egui::Order::Foreground)
        .fixed_pos(egui::pos2(0.0, 0.0))
        .interactable(false)
        .show(ctx, |ui| {
            let painter = ui.painter();
            if fx.fade > 0.0 {
                let alpha = (fx.fade.clamp(0.0, 1.0) * 255.0) as u8;
                painter.rect_filled(screen, 0, egui::Color32::from_black_alpha(alpha));
            }
            if let Some(banner) = &fx.banner {
                painter.text(
                    screen.center(),
                    egui::Align2::CENTER_CENTER,
                    &banner.text,
                    egui::FontId::proportional(32.0),
                    egui::Color32::WHITE,
                );
            }
        });
    Ok(())
}
