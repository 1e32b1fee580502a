//! Fighter spawning for a new battle.

use bevy::prelude::*;

use super::components::*;
use crate::ai::AiController;
use crate::animation::{SpriteAnimation, Visual};
use crate::combat::{CombatState, Combo, ComboBreaker, DamageLedger, SpecialMeter};
use crate::config::{AiProfile, FighterConfig};
use crate::effects::EffectCooldowns;
use crate::input::{ControlState, InputHistory};

/// Spawn one fighter with every component the simulation needs.
pub fn spawn_fighter(
    commands: &mut Commands,
    config: &FighterConfig,
    side: Side,
    position: Vec2,
    facing: Facing,
    ai: Option<AiProfile>,
) -> Entity {
    let mut fighter = commands.spawn((
        (
            Name::new(config.name.clone()),
            Fighter {
                side,
                archetype: config.archetype.clone(),
            },
            Body::new(position, config.size, facing, config.max_jumps),
            Health::new(config.max_health),
            FighterStats::from(config),
        ),
        (
            CombatState::default(),
            Combo::default(),
            SpecialMeter::default(),
            DamageLedger::default(),
            ComboBreaker::default(),
        ),
        (ControlState::default(), InputHistory::default()),
        (
            SpriteAnimation::default(),
            Visual::default(),
            EffectCooldowns::default(),
        ),
    ));

    if let Some(profile) = ai {
        fighter.insert(AiController::new(profile));
    }

    let entity = fighter.id();
    info!(
        "Spawned {:?} fighter '{}' at ({}, {})",
        side, config.name, position.x, position.y
    );
    entity
}

/// Remove every fighter left over from a previous battle.
pub fn despawn_fighters(commands: &mut Commands, fighters: &Query<Entity, With<Fighter>>) {
    for entity in fighters.iter() {
        commands.entity(entity).despawn();
    }
}
