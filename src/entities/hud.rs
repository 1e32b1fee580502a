//! HUD state published once per tick for the render layer.

use bevy::prelude::*;

use super::components::{Fighter, Health, Side};
use crate::combat::{battle_score, Combo, DamageLedger, RoundTimer, SpecialMeter};
use crate::core::SimClock;

/// Per-side HUD values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudFighter {
    pub name: String,
    pub health: f32,
    pub max_health: f32,
    pub combo: u32,
    pub meter: f32,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HudState {
    pub player: HudFighter,
    pub boss: HudFighter,
    /// Whole seconds left on the round timer
    pub time_remaining: u32,
    /// Running score from the player's perspective
    pub score: u32,
}

pub fn update_hud(
    clock: Res<SimClock>,
    timer: Res<RoundTimer>,
    mut hud: ResMut<HudState>,
    fighters: Query<(&Fighter, &Name, &Health, &Combo, &SpecialMeter, &DamageLedger)>,
) {
    for (fighter, name, health, combo, meter, ledger) in fighters.iter() {
        let view = HudFighter {
            name: name.as_str().to_string(),
            health: health.current,
            max_health: health.maximum,
            combo: combo.count,
            meter: meter.value(),
        };
        if fighter.side == Side::Player {
            hud.score = battle_score(health.current, combo.max, ledger.dealt, clock.elapsed_ms);
            hud.player = view;
        } else {
            hud.boss = view;
        }
    }
    hud.time_remaining = (timer.remaining_ms / 1000.0).ceil().max(0.0) as u32;
}
