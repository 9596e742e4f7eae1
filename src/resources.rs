//! ECS Resources - shared simulation state and the crate's message seam

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::components::Faction;

// ============================================================================
// COUNTERS & STATUS (read by the HUD, pushed to by the simulation)
// ============================================================================

/// Counters surfaced to the HUD. `kills` counts ally-sourced enemy kills;
/// `raid_wins` counts battles that ended with allies standing.
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct KillStats {
    pub kills: u32,
    pub raid_wins: u32,
}

/// One-line status panel. Auto-hidden by the HUD after a few seconds.
#[derive(Resource, Default)]
pub struct StatusMessage {
    pub text: Option<String>,
    pub shown_at: f32,
}

impl StatusMessage {
    pub fn set(&mut self, text: impl Into<String>, now: f32) {
        self.text = Some(text.into());
        self.shown_at = now;
    }
}

// ============================================================================
// VEHICLE
// ============================================================================

/// Where the player's vehicle is. Single source of truth for "in flight":
/// the docked sprite draws only in `Docked`, and the defend trigger requires
/// `Docked`.
#[derive(Resource, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum VehicleState {
    #[default]
    Docked,
    InTransit,
    Returning,
}

impl VehicleState {
    pub fn in_flight(self) -> bool {
        self != VehicleState::Docked
    }
}

/// Whether the player currently owns a vehicle. Written by the game-logic
/// collaborator, read by the defend guard.
#[derive(Resource, Clone, Copy, Debug)]
pub struct PlayerVehicle {
    pub owned: bool,
}

impl Default for PlayerVehicle {
    fn default() -> Self {
        Self { owned: true }
    }
}

// ============================================================================
// BATTLE LIFECYCLE
// ============================================================================

/// Battle state machine. At most one battle at a time; triggers received
/// outside `Idle` are dropped.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub enum BattlePhase {
    #[default]
    Idle,
    /// Defend entry: the dropship is still on approach; combatants spawn
    /// when it lands.
    EnemyApproach { landing: Vec2 },
    /// Skirmish running. `landed` records the dropship cell so its
    /// departure can mirror the arrival.
    Fighting { landed: Option<Vec2> },
}

impl BattlePhase {
    pub fn is_idle(self) -> bool {
        matches!(self, BattlePhase::Idle)
    }
}

/// Incoming-raid notification from the transport collaborator. Starts a
/// defend battle if the guards pass.
#[derive(Message, Clone, Copy, Debug)]
pub struct IncomingRaid;

/// Raised once per battle when one faction's living-agent count reaches
/// zero. `survivors` counts living allies at resolution time.
#[derive(Message, Clone, Copy, Debug)]
pub struct BattleResolved {
    pub survivors: u32,
}

// ============================================================================
// TRAVEL SEAM
// ============================================================================

/// Errors surfaced by a travel sequence. Gameplay failures are carried
/// through the compensating return stages and delivered unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TravelError {
    #[error("{0}")]
    Gameplay(String),
}

/// What the wrapped gameplay call produced at the destination.
#[derive(Debug, Clone, Default)]
pub struct ArrivalOutcome {
    pub reward: f64,
    pub status: Option<String>,
}

/// Gameplay callback run at the destination, wrapping the caller's own
/// network call.
pub type ArrivalFn = Box<dyn FnOnce() -> Result<ArrivalOutcome, TravelError> + Send + Sync>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TravelKind {
    /// Plain three-stage trip: launch, cruise, return.
    Mission,
    /// Cinematic variant: fades, banners, off-map fly-out, and the raid-out
    /// battle entry mid-sequence.
    Raid,
}

/// Mission/raid destination identifier. Unknown names and numeric indices
/// fall back to the positional destination list, never an error.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TravelTarget {
    Named(String),
    Index(usize),
}

pub struct TravelRequest {
    pub target: TravelTarget,
    pub kind: TravelKind,
    pub on_arrival: Option<ArrivalFn>,
}

/// Pending travel requests from game-logic collaborators. Popped when no
/// sequence is active.
#[derive(Resource, Default)]
pub struct TravelQueue(pub VecDeque<TravelRequest>);

/// Delivered when a travel sequence docks. Carries the gameplay callback's
/// outcome, or its error preserved through the compensating return.
#[derive(Message)]
pub struct TravelCompleted {
    pub kind: TravelKind,
    pub result: Result<ArrivalOutcome, TravelError>,
}

// ============================================================================
// SCREEN EFFECTS
// ============================================================================

/// Full-screen fade and banner overlay state, painted by the HUD.
#[derive(Resource, Default)]
pub struct ScreenFx {
    /// 0 = clear, 1 = fully black.
    pub fade: f32,
    pub banner: Option<Banner>,
}

pub struct Banner {
    pub text: String,
    pub remaining: f32,
}

// ============================================================================
// SCENE
// ============================================================================

/// Root entity the whole scene hangs off. Its transform carries camera pan
/// and the fixed scale, so children position in raw world pixels.
#[derive(Resource, Clone, Copy, Debug)]
pub struct SceneAnchor(pub Entity);

/// Record of a kill for attribution: which faction shot, which died.
pub fn is_counted_kill(shooter: Faction, victim: Faction) -> bool {
    shooter == Faction::Ally && victim == Faction::Enemy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ally_on_enemy_kills_count() {
        assert!(is_counted_kill(Faction::Ally, Faction::Enemy));
        assert!(!is_counted_kill(Faction::Enemy, Faction::Ally));
        assert!(!is_counted_kill(Faction::Ally, Faction::Neutral));
        assert!(!is_counted_kill(Faction::Ally, Faction::Ally));
    }

    #[test]
    fn travel_error_message_is_preserved() {
        let err = TravelError::Gameplay("raid endpoint unreachable".into());
        assert_eq!(err.to_string(), "raid endpoint unreachable");
    }
}
