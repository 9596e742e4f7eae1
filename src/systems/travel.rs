//! Travel animator - stage machine for vehicle trips, advanced by the frame
//! clock like everything else.
//!
//! A sequence is a queue of stages with one elapsed-time accumulator. Plain
//! missions run launch / cruise / return; raids run the cinematic variant
//! with fades, banners, an off-map fly-out pair, and the raid-out battle
//! entry mid-sequence. A failing gameplay callback reroutes the queue onto
//! the compensating return tail and the error is delivered unchanged when
//! the vehicle docks.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::components::TravelOverlay;
use crate::constants::*;
use crate::iso::{self, Projector};
use crate::resources::*;
use crate::systems::battle::{begin_raid_battle, ease_in, ease_in_out};
use crate::world::{resolve_destination, HOME_CELL};

#[derive(Clone, Debug)]
enum TravelStage {
    /// Rise off the pad, nose up.
    Launch { secs: f32 },
    /// Tweened flight to a destination, leveling out.
    CruiseTo { dest: Vec2, secs: f32 },
    /// Fly past the viewport edge.
    OffMapOut { secs: f32 },
    /// Re-enter from off-map and settle at a point.
    OffMapIn { to: Vec2, secs: f32 },
    Hold { secs: f32 },
    FadeOut { secs: f32 },
    FadeIn { secs: f32 },
    Banner { text: &'static str, secs: f32 },
    /// Run the wrapped gameplay callback (and the raid-out battle trigger).
    Engage,
    /// Fixed beat holding on the skirmish before heading home.
    HoldBattle { secs: f32 },
    /// Nose down toward home.
    TurnHome { secs: f32 },
    ReturnHome { secs: f32 },
    Dock,
}

impl TravelStage {
    fn secs(&self) -> f32 {
        match self {
            TravelStage::Launch { secs }
            | TravelStage::CruiseTo { secs, .. }
            | TravelStage::OffMapOut { secs }
            | TravelStage::OffMapIn { secs, .. }
            | TravelStage::Hold { secs }
            | TravelStage::FadeOut { secs }
            | TravelStage::FadeIn { secs }
            | TravelStage::Banner { secs, .. }
            | TravelStage::HoldBattle { secs }
            | TravelStage::TurnHome { secs }
            | TravelStage::ReturnHome { secs } => *secs,
            TravelStage::Engage | TravelStage::Dock => 0.0,
        }
    }

    fn is_motion(&self) -> bool {
        matches!(
            self,
            TravelStage::OffMapOut { .. }
                | TravelStage::OffMapIn { .. }
                | TravelStage::TurnHome { .. }
                | TravelStage::ReturnHome { .. }
        )
    }
}

/// The currently running sequence, if any.
pub struct TravelSequence {
    kind: TravelKind,
    stages: VecDeque<TravelStage>,
    elapsed: f32,
    entered: bool,
    // Overlay pose in world pixels (y down) and screen-convention radians.
    pos: Vec2,
    rot: f32,
    from_pos: Vec2,
    from_rot: f32,
    target: Vec2,
    on_arrival: Option<ArrivalFn>,
    outcome: Option<Result<ArrivalOutcome, TravelError>>,
}

#[derive(Resource, Default)]
pub struct ActiveTravel(pub Option<TravelSequence>);

fn hover_point(home: Vec2) -> Vec2 {
    home - Vec2::new(0.0, LAUNCH_RISE)
}

/// Compensating tail that brings the vehicle home and docks it. Used by the
/// normal scripts and by the error reroute.
fn return_tail(kind: TravelKind) -> VecDeque<TravelStage> {
    let home = iso::project(HOME_CELL);
    match kind {
        TravelKind::Mission => VecDeque::from([
            TravelStage::TurnHome { secs: TURN_HOME_SECS },
            TravelStage::ReturnHome { secs: RETURN_SECS },
            TravelStage::Dock,
        ]),
        TravelKind::Raid => VecDeque::from([
            TravelStage::OffMapOut { secs: OFFMAP_SECS },
            TravelStage::FadeOut { secs: FADE_SECS },
            TravelStage::Banner { text: "RETURNING HOME", secs: 1.0 },
            TravelStage::FadeIn { secs: FADE_SECS },
            TravelStage::OffMapIn { to: hover_point(home), secs: OFFMAP_SECS },
            TravelStage::ReturnHome { secs: RETURN_SECS },
            TravelStage::Dock,
        ]),
    }
}

fn mission_script(dest: Vec2) -> VecDeque<TravelStage> {
    let mut stages = VecDeque::from([
        TravelStage::Launch { secs: LAUNCH_SECS },
        TravelStage::CruiseTo { dest, secs: CRUISE_SECS },
        TravelStage::Engage,
        TravelStage::Hold { secs: ARRIVAL_HOLD_SECS },
    ]);
    stages.extend(return_tail(TravelKind::Mission));
    stages
}

fn raid_script(dest: Vec2) -> VecDeque<TravelStage> {
    let mut stages = VecDeque::from([
        TravelStage::Launch { secs: LAUNCH_SECS },
        TravelStage::OffMapOut { secs: OFFMAP_SECS },
        TravelStage::FadeOut { secs: FADE_SECS },
        TravelStage::Banner { text: "ENTERING HOSTILE AIRSPACE", secs: BANNER_SECS },
        TravelStage::FadeIn { secs: FADE_SECS },
        TravelStage::OffMapIn { to: dest, secs: OFFMAP_SECS },
        TravelStage::Engage,
        TravelStage::HoldBattle { secs: RAID_BATTLE_HOLD_SECS },
    ]);
    stages.extend(return_tail(TravelKind::Raid));
    stages
}

/// World x just past the right viewport edge; falls back to a fixed
/// overshoot when no window is available to measure.
fn offmap_x(projector: &Projector, window: Option<&Window>, base_x: f32) -> f32 {
    match window {
        Some(w) => projector
            .screen_to_world(Vec2::new(w.width() + 80.0, 0.0))
            .x,
        None => base_x + OFFMAP_FALLBACK_PX,
    }
}

/// Snapshot the pose and resolve the stage's target point on entry.
fn enter_stage(
    seq: &mut TravelSequence,
    stage: &TravelStage,
    projector: &Projector,
    window: Option<&Window>,
    vehicle: &mut VehicleState,
    fx: &mut ScreenFx,
) {
    seq.from_pos = seq.pos;
    seq.from_rot = seq.rot;

    if seq.outcome.is_some() && stage.is_motion() {
        *vehicle = VehicleState::Returning;
    }

    match stage {
        TravelStage::CruiseTo { dest, .. } => seq.target = *dest,
        TravelStage::OffMapOut { .. } => {
            seq.target = Vec2::new(offmap_x(projector, window, seq.pos.x), seq.pos.y);
        }
        TravelStage::OffMapIn { to, .. } => {
            // Teleport off-map first; the original repositions the overlay
            // with transitions disabled before flying it in.
            seq.from_pos = Vec2::new(offmap_x(projector, window, to.x), to.y);
            seq.pos = seq.from_pos;
            seq.target = *to;
        }
        TravelStage::ReturnHome { .. } => seq.target = iso::project(HOME_CELL),
        TravelStage::Banner { text, secs } => {
            fx.banner = Some(Banner { text: (*text).to_string(), remaining: *secs });
        }
        _ => {}
    }
}

/// Apply a stage at progress `t` in [0, 1].
fn apply_stage(seq: &mut TravelSequence, stage: &TravelStage, t: f32, fx: &mut ScreenFx) {
    match stage {
        TravelStage::Launch { .. } => {
            let k = ease_in(t);
            seq.pos = seq.from_pos - Vec2::new(0.0, LAUNCH_RISE * k);
            seq.rot = seq.from_rot + (LAUNCH_TILT - seq.from_rot) * k;
        }
        TravelStage::CruiseTo { .. } | TravelStage::OffMapIn { .. } => {
            let k = ease_in_out(t);
            seq.pos = seq.from_pos.lerp(seq.target, k);
            seq.rot = seq.from_rot * (1.0 - k);
        }
        TravelStage::OffMapOut { .. } => {
            seq.pos = seq.from_pos.lerp(seq.target, ease_in_out(t));
        }
        TravelStage::TurnHome { .. } => {
            seq.rot = seq.from_rot + (-LAUNCH_TILT - seq.from_rot) * ease_in(t);
        }
        TravelStage::ReturnHome { .. } => {
            let k = ease_in_out(t);
            seq.pos = seq.from_pos.lerp(seq.target, k);
            seq.rot = seq.from_rot * (1.0 - k);
        }
        TravelStage::FadeOut { .. } => fx.fade = t,
        TravelStage::FadeIn { .. } => fx.fade = 1.0 - t,
        TravelStage::Banner { secs, .. } => {
            if let Some(banner) = fx.banner.as_mut() {
                banner.remaining = (secs - seq.elapsed).max(0.0);
            }
        }
        TravelStage::Hold { .. } | TravelStage::HoldBattle { .. } => {}
        TravelStage::Engage | TravelStage::Dock => {}
    }
}

/// Advance the active sequence, or start the next queued request.
pub fn travel_system(
    time: Res<Time>,
    mut commands: Commands,
    mut active: ResMut<ActiveTravel>,
    mut queue: ResMut<TravelQueue>,
    mut vehicle: ResMut<VehicleState>,
    mut phase: ResMut<BattlePhase>,
    mut fx: ResMut<ScreenFx>,
    mut completed: MessageWriter<TravelCompleted>,
    anchor: Res<SceneAnchor>,
    projector: Res<Projector>,
    windows: Query<&Window>,
    mut overlay: Query<(&mut Transform, &mut Visibility), With<TravelOverlay>>,
) {
    let window = windows.single().ok();

    if active.0.is_none() {
        let Some(request) = queue.0.pop_front() else {
            return;
        };
        let home = iso::project(HOME_CELL);
        let dest = iso::project(resolve_destination(&request.target));
        let stages = match request.kind {
            TravelKind::Mission => mission_script(dest),
            TravelKind::Raid => raid_script(dest),
        };
        *vehicle = VehicleState::InTransit;
        if let Ok((mut transform, mut visibility)) = overlay.single_mut() {
            transform.translation = Vec3::new(home.x, -home.y, OVERLAY_Z);
            transform.rotation = Quat::IDENTITY;
            *visibility = Visibility::Visible;
        }
        active.0 = Some(TravelSequence {
            kind: request.kind,
            stages,
            elapsed: 0.0,
            entered: false,
            pos: home,
            rot: 0.0,
            from_pos: home,
            from_rot: 0.0,
            target: dest,
            on_arrival: request.on_arrival,
            outcome: None,
        });
        info!("travel started: {:?} -> {:?}", request.kind, request.target);
        return;
    }

    let Ok((mut transform, mut visibility)) = overlay.single_mut() else {
        // Compensation cannot run without the overlay sprite; fall back to
        // force-resetting the flight state so nothing stays wedged.
        let seq = active.0.take().expect("checked above");
        *vehicle = VehicleState::Docked;
        fx.fade = 0.0;
        fx.banner = None;
        completed.write(TravelCompleted {
            kind: seq.kind,
            result: seq.outcome.unwrap_or_else(|| Ok(ArrivalOutcome::default())),
        });
        warn!("travel overlay missing; flight state force-reset");
        return;
    };

    let seq = active.0.as_mut().expect("checked above");
    seq.elapsed += time.delta_secs();
    let mut docked = false;

    loop {
        let Some(stage) = seq.stages.front().cloned() else {
            docked = true;
            break;
        };

        if !seq.entered {
            enter_stage(seq, &stage, &projector, window, &mut *vehicle, &mut *fx);
            seq.entered = true;
        }

        let secs = stage.secs();
        if secs <= 0.0 {
            match stage {
                TravelStage::Engage => {
                    if seq.kind == TravelKind::Raid {
                        // Mid-sequence battle entry; dropped if one is active.
                        begin_raid_battle(&mut commands, anchor.0, &mut *phase);
                    }
                    let result = match seq.on_arrival.take() {
                        Some(callback) => callback(),
                        None => Ok(ArrivalOutcome::default()),
                    };
                    match result {
                        Ok(outcome) => {
                            seq.outcome = Some(Ok(outcome));
                            seq.stages.pop_front();
                        }
                        Err(err) => {
                            warn!("gameplay call failed mid-travel: {}", err);
                            let banner = match seq.kind {
                                TravelKind::Mission => "MISSION FAILED",
                                TravelKind::Raid => "RAID FAILED",
                            };
                            seq.outcome = Some(Err(err));
                            let mut tail = VecDeque::from([TravelStage::Banner {
                                text: banner,
                                secs: 1.0,
                            }]);
                            tail.extend(return_tail(seq.kind));
                            seq.stages = tail;
                            *vehicle = VehicleState::Returning;
                        }
                    }
                    seq.entered = false;
                    continue;
                }
                TravelStage::Dock => {
                    seq.stages.pop_front();
                    docked = true;
                    break;
                }
                _ => {
                    seq.stages.pop_front();
                    seq.entered = false;
                    continue;
                }
            }
        }

        let t = (seq.elapsed / secs).min(1.0);
        apply_stage(seq, &stage, t, &mut *fx);

        if seq.elapsed >= secs {
            if let TravelStage::Banner { .. } = stage {
                fx.banner = None;
            }
            seq.elapsed -= secs;
            seq.stages.pop_front();
            seq.entered = false;
            continue;
        }
        break;
    }

    if docked {
        let seq = active.0.take().expect("sequence present");
        let home = iso::project(HOME_CELL);
        *visibility = Visibility::Hidden;
        transform.translation = Vec3::new(home.x, -home.y, OVERLAY_Z);
        transform.rotation = Quat::IDENTITY;
        *vehicle = VehicleState::Docked;
        fx.fade = 0.0;
        fx.banner = None;
        completed.write(TravelCompleted {
            kind: seq.kind,
            result: seq.outcome.unwrap_or_else(|| Ok(ArrivalOutcome::default())),
        });
        info!("travel complete: vehicle docked");
    } else {
        let seq = active.0.as_ref().expect("sequence present");
        transform.translation = Vec3::new(seq.pos.x, -seq.pos.y, OVERLAY_Z);
        transform.rotation = Quat::from_rotation_z(-seq.rot);
    }
}
