//! Intents and held-control state.

use bevy::prelude::*;

use crate::entities::Side;

/// Abstract player or AI action. Gesture and key translation happen outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Crouch,
    Jump,
    Punch,
    Kick,
    Uppercut,
    Special,
    Block,
    Throw,
    Counter,
}

impl Intent {
    /// Intents that stay in effect until released.
    pub fn is_held(&self) -> bool {
        matches!(
            self,
            Intent::MoveLeft | Intent::MoveRight | Intent::Crouch | Intent::Block
        )
    }
}

/// A press or release of one intent for one fighter.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct IntentEvent {
    pub fighter: Side,
    pub intent: Intent,
    pub pressed: bool,
    /// Time of the press, used by the input history for combo timing
    pub timestamp_ms: f64,
}

impl IntentEvent {
    pub fn press(fighter: Side, intent: Intent, timestamp_ms: f64) -> Self {
        Self {
            fighter,
            intent,
            pressed: true,
            timestamp_ms,
        }
    }

    pub fn release(fighter: Side, intent: Intent, timestamp_ms: f64) -> Self {
        Self {
            fighter,
            intent,
            pressed: false,
            timestamp_ms,
        }
    }
}

/// Which held intents are currently down.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct ControlState {
    pub left: bool,
    pub right: bool,
    pub crouch: bool,
    pub block: bool,
}

impl ControlState {
    pub fn set(&mut self, intent: Intent, pressed: bool) {
        match intent {
            Intent::MoveLeft => self.left = pressed,
            Intent::MoveRight => self.right = pressed,
            Intent::Crouch => self.crouch = pressed,
            Intent::Block => self.block = pressed,
            _ => {}
        }
    }

    /// `-1`, `0` or `+1` in world space.
    pub fn horizontal(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
