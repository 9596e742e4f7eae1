//! Demo game-logic driver - the in-process collaborator that exercises the
//! travel and battle seams end to end.
//!
//! Stands in for the real server-backed game logic: missions and raids are
//! resolved by local dice with the original catalog's odds and rewards, and
//! outcomes land in the balance and status panel. Keys: 1/2/3 launch
//! missions (hold Shift for shielded mode), R raids the next target, E
//! forces a raid whose gameplay call fails, D simulates an incoming raid.

use bevy::prelude::*;
use rand::Rng;

use crate::constants::STATUS_HIDE_SECS;
use crate::resources::*;

/// Seconds between missions (the original gates at 8 hours).
pub const MISSION_COOLDOWN_SECS: f32 = 8.0 * 3600.0;

pub struct MissionSpec {
    pub name: &'static str,
    pub chance: f64,
    pub base_reward: f64,
}

pub static MISSIONS: [MissionSpec; 3] = [
    MissionSpec { name: "MiningRun", chance: 0.90, base_reward: 10.0 },
    MissionSpec { name: "BlackMarket", chance: 0.70, base_reward: 30.0 },
    MissionSpec { name: "ArtifactHunt", chance: 0.50, base_reward: 60.0 },
];

pub struct RaidTargetSpec {
    pub name: &'static str,
    pub chance: f64,
    pub loot: f64,
}

pub static RAID_TARGETS: [RaidTargetSpec; 3] = [
    RaidTargetSpec { name: "Decoy Freighter", chance: 0.0, loot: 0.0 },
    RaidTargetSpec { name: "Unshielded Depot", chance: 0.7, loot: 20.0 },
    RaidTargetSpec { name: "Shielded Cache", chance: 0.5, loot: 15.0 },
];

/// Credits balance shown in the HUD.
#[derive(Resource)]
pub struct GameBalance(pub f64);

impl Default for GameBalance {
    fn default() -> Self {
        Self(100.0)
    }
}

/// Vehicle upgrade level; mission rewards scale with it.
#[derive(Resource)]
pub struct VehicleLevel(pub u32);

impl Default for VehicleLevel {
    fn default() -> Self {
        Self(1)
    }
}

/// Mission cooldown bookkeeping.
#[derive(Resource, Default)]
pub struct MissionClock {
    pub last_completed: Option<f32>,
}

fn mission_callback(spec: &'static MissionSpec, level: u32, shielded: bool) -> ArrivalFn {
    Box::new(move || {
        let roll: f64 = rand::rng().random();
        if roll < spec.chance {
            let mut reward = spec.base_reward * f64::from(level);
            if shielded {
                reward = (reward * 0.8).floor();
            }
            Ok(ArrivalOutcome { reward, status: Some(format!("+{reward} AT")) })
        } else {
            Ok(ArrivalOutcome { reward: 0.0, status: Some("Mission failed".into()) })
        }
    })
}

fn raid_callback(spec: &'static RaidTargetSpec) -> ArrivalFn {
    Box::new(move || {
        let roll: f64 = rand::rng().random();
        if roll < spec.chance {
            Ok(ArrivalOutcome { reward: spec.loot, status: Some(format!("+{} AT", spec.loot)) })
        } else {
            Ok(ArrivalOutcome { reward: 0.0, status: Some("Raid failed".into()) })
        }
    })
}

/// Keyboard front-end for the demo driver.
pub fn demo_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    vehicle: Res<VehicleState>,
    level: Res<VehicleLevel>,
    clock: Res<MissionClock>,
    mut queue: ResMut<TravelQueue>,
    mut status: ResMut<StatusMessage>,
    mut incoming: MessageWriter<IncomingRaid>,
    mut next_raid: Local<usize>,
) {
    let now = time.elapsed_secs();
    let shielded = keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);

    let mission_key = [
        (KeyCode::Digit1, 0usize),
        (KeyCode::Digit2, 1),
        (KeyCode::Digit3, 2),
    ]
    .into_iter()
    .find(|(key, _)| keys.just_pressed(*key));

    if let Some((_, idx)) = mission_key {
        if vehicle.in_flight() {
            status.set("Vehicle already deployed", now);
        } else if clock
            .last_completed
            .is_some_and(|t| now - t < MISSION_COOLDOWN_SECS)
        {
            status.set("On cooldown", now);
        } else {
            let spec = &MISSIONS[idx];
            status.set(format!("Launching {}\u{2026}", spec.name), now);
            queue.0.push_back(TravelRequest {
                target: TravelTarget::Named(spec.name.to_string()),
                kind: TravelKind::Mission,
                on_arrival: Some(mission_callback(spec, level.0, shielded)),
            });
        }
    }

    if keys.just_pressed(KeyCode::KeyR) {
        if vehicle.in_flight() {
            status.set("Vehicle already deployed", now);
        } else {
            let idx = *next_raid % RAID_TARGETS.len();
            *next_raid += 1;
            let spec = &RAID_TARGETS[idx];
            status.set(format!("Raiding {}\u{2026}", spec.name), now);
            queue.0.push_back(TravelRequest {
                target: TravelTarget::Index(idx),
                kind: TravelKind::Raid,
                on_arrival: Some(raid_callback(spec)),
            });
        }
    }

    // Raid whose wrapped gameplay call fails, to show cleanup-on-error.
    if keys.just_pressed(KeyCode::KeyE) {
        if vehicle.in_flight() {
            status.set("Vehicle already deployed", now);
        } else {
            status.set("Raiding (bad uplink)\u{2026}", now);
            queue.0.push_back(TravelRequest {
                target: TravelTarget::Index(1),
                kind: TravelKind::Raid,
                on_arrival: Some(Box::new(|| {
                    Err(TravelError::Gameplay("raid uplink lost".into()))
                })),
            });
        }
    }

    // Pretend the transport layer just told us we are being raided.
    if keys.just_pressed(KeyCode::KeyD) {
        incoming.write(IncomingRaid);
    }
}

/// Apply travel outcomes to the balance and the status panel; errors were
/// already carried through the compensating return and surface here.
pub fn travel_outcome_system(
    time: Res<Time>,
    mut completed: MessageReader<TravelCompleted>,
    mut balance: ResMut<GameBalance>,
    mut clock: ResMut<MissionClock>,
    mut status: ResMut<StatusMessage>,
) {
    let now = time.elapsed_secs();
    for done in completed.read() {
        if done.kind == TravelKind::Mission {
            clock.last_completed = Some(now);
        }
        match &done.result {
            Ok(outcome) => {
                if outcome.reward != 0.0 {
                    balance.0 += outcome.reward;
                }
                if let Some(text) = &outcome.status {
                    status.set(text.clone(), now);
                }
            }
            Err(err) => {
                status.set(format!("Raid aborted: {err}"), now);
            }
        }
    }
}

/// Push battle resolutions into the status panel.
pub fn battle_outcome_system(
    time: Res<Time>,
    mut resolved: MessageReader<BattleResolved>,
    mut status: ResMut<StatusMessage>,
) {
    let now = time.elapsed_secs();
    for outcome in resolved.read() {
        if outcome.survivors > 0 {
            status.set(
                format!("Skirmish won \u{2014} {} still standing", outcome.survivors),
                now,
            );
        } else {
            status.set("Base overrun", now);
        }
    }
}

/// Expire the status message after the auto-hide window.
pub fn status_expiry_system(time: Res<Time>, mut status: ResMut<StatusMessage>) {
    if status.text.is_some() && time.elapsed_secs() - status.shown_at > STATUS_HIDE_SECS {
        status.text = None;
    }
}
