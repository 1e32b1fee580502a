//! AI systems - turn controller commands into intent events.

use bevy::prelude::*;

use super::components::*;
use crate::combat::{CombatState, SpecialMeter};
use crate::core::{CombatRng, SimClock};
use crate::entities::{Body, Fighter, Health};
use crate::input::IntentEvent;

/// Let every AI controller look at its opponent and emit intents.
pub fn drive_ai(
    clock: Res<SimClock>,
    mut rng: ResMut<CombatRng>,
    mut controllers: Query<(
        &Fighter,
        &Body,
        &CombatState,
        &Health,
        &SpecialMeter,
        &mut AiController,
    )>,
    fighters: Query<(&Fighter, &Body, &CombatState)>,
    mut intents: EventWriter<IntentEvent>,
) {
    let now = clock.now_ms();

    for (fighter, body, combat, health, meter, mut controller) in controllers.iter_mut() {
        let opponent_side = fighter.side.opponent();
        let Some((_, opponent_body, opponent_combat)) = fighters
            .iter()
            .find(|(other, ..)| other.side == opponent_side)
        else {
            continue;
        };

        let situation = Situation {
            own_x: body.position.x,
            own_state: combat.state,
            health_fraction: health.percentage(),
            meter_full: meter.is_full(),
            opponent_x: opponent_body.position.x,
            opponent_state: opponent_combat.state,
        };

        for command in controller.update(&situation, clock.timestep_ms, &mut rng) {
            let event = match command {
                AiCommand::Press(intent) => IntentEvent::press(fighter.side, intent, now),
                AiCommand::Release(intent) => IntentEvent::release(fighter.side, intent, now),
            };
            intents.send(event);
        }
    }
}
