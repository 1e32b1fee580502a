//! Global events and the battle report.
//!
//! Events are how the simulation talks to the outside world: a render or
//! audio layer reads `HitLanded` and `BattleEnded` without touching the
//! fighters directly.

use bevy::prelude::*;

/// Sent once per resolved hit, blocked or not.
#[derive(Event, Debug, Clone)]
pub struct HitLanded {
    pub attacker: Entity,
    pub defender: Entity,
    /// Health actually removed (chip damage for blocked specials, else 0 when blocked)
    pub damage: f32,
    pub critical: bool,
    pub blocked: bool,
    /// Centre of the overlapping hitbox, for effect placement
    pub position: Vec2,
}

/// Sent when a fighter breaks out of the opponent's combo.
#[derive(Event, Debug, Clone)]
pub struct ComboBroken {
    pub fighter: Entity,
    /// Fighter whose combo was dropped
    pub attacker: Entity,
    pub hits: u32,
}

/// Sent when a strike lands on a counter stance.
#[derive(Event, Debug, Clone)]
pub struct Countered {
    /// Fighter holding the counter stance
    pub defender: Entity,
    /// Fighter whose strike was countered
    pub attacker: Entity,
}

/// Aggregated statistics, from the player's perspective.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleStats {
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub max_combo: u32,
    pub time_elapsed_ms: f64,
}

/// Final result of a battle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleOutcome {
    pub victory: bool,
    pub score: u32,
    pub stats: BattleStats,
}

/// Sent exactly once per battle, when a fighter is knocked out or the round
/// timer runs out. An external abort does not send it.
#[derive(Event, Debug, Clone)]
pub struct BattleEnded {
    pub outcome: BattleOutcome,
}

/// Last battle outcome, kept after the `BattleEnded` event has been dropped.
#[derive(Resource, Debug, Default)]
pub struct BattleReport {
    pub outcome: Option<BattleOutcome>,
}
