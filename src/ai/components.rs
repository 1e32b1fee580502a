//! AI controller state and decision making.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::combat::FighterState;
use crate::config::AiProfile;
use crate::core::CombatRng;
use crate::input::Intent;

/// Fighters closer than this are at close range.
pub const CLOSE_RANGE: f32 = 80.0;
pub const MID_RANGE: f32 = 150.0;

/// Distance the AI tries to keep when it has nothing better to do.
pub const PREFERRED_DISTANCE: f32 = 120.0;
pub const DISTANCE_TOLERANCE: f32 = 20.0;

/// Delay between two steps of an attack string.
pub const COMBO_STEP_MS: f64 = 200.0;

/// Opponent states remembered for pattern reading.
const OPPONENT_MEMORY: usize = 10;

/// Attack strings, truncated to the difficulty's combo length.
const COMBO_STRINGS: [&[Intent]; 4] = [
    &[Intent::Punch, Intent::Punch, Intent::Uppercut],
    &[Intent::Punch, Intent::Kick, Intent::Kick],
    &[Intent::Kick, Intent::Kick, Intent::Punch, Intent::Uppercut],
    &[
        Intent::Punch,
        Intent::Punch,
        Intent::Kick,
        Intent::Punch,
        Intent::Kick,
        Intent::Kick,
        Intent::Uppercut,
    ],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Range {
    Close,
    Mid,
    Far,
}

impl Range {
    pub fn classify(distance: f32) -> Range {
        if distance < CLOSE_RANGE {
            Range::Close
        } else if distance < MID_RANGE {
            Range::Mid
        } else {
            Range::Far
        }
    }
}

/// What the AI is currently busy with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiMode {
    #[default]
    Idle,
    Approaching,
    Retreating,
    Attacking,
    Defending,
}

/// Everything the AI may look at when deciding.
#[derive(Debug, Clone)]
pub struct Situation {
    pub own_x: f32,
    pub own_state: FighterState,
    pub health_fraction: f32,
    pub meter_full: bool,
    pub opponent_x: f32,
    pub opponent_state: FighterState,
}

impl Situation {
    pub fn distance(&self) -> f32 {
        (self.opponent_x - self.own_x).abs()
    }

    fn toward(&self) -> Intent {
        if self.opponent_x >= self.own_x {
            Intent::MoveRight
        } else {
            Intent::MoveLeft
        }
    }

    fn away(&self) -> Intent {
        if self.toward() == Intent::MoveRight {
            Intent::MoveLeft
        } else {
            Intent::MoveRight
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiCommand {
    Press(Intent),
    Release(Intent),
}

/// Drives a fighter by producing intents. All randomness comes from `CombatRng`.
#[derive(Component, Debug, Clone)]
pub struct AiController {
    pub profile: AiProfile,
    pub mode: AiMode,
    pub decision_cooldown_ms: f64,
    combo: Vec<Intent>,
    combo_step: usize,
    combo_timer_ms: f64,
    /// Held intents and how long they stay down
    held: Vec<(Intent, f64)>,
    recent_opponent_states: VecDeque<FighterState>,
}

impl AiController {
    pub fn new(profile: AiProfile) -> Self {
        Self {
            profile,
            mode: AiMode::Idle,
            decision_cooldown_ms: profile.difficulty.reaction_ms(),
            combo: Vec::new(),
            combo_step: 0,
            combo_timer_ms: 0.0,
            held: Vec::new(),
            recent_opponent_states: VecDeque::with_capacity(OPPONENT_MEMORY),
        }
    }

    pub fn is_holding(&self, intent: Intent) -> bool {
        self.held.iter().any(|(held, _)| *held == intent)
    }

    pub fn in_combo(&self) -> bool {
        self.combo_step < self.combo.len()
    }

    /// Advance the controller by one tick.
    pub fn update(
        &mut self,
        situation: &Situation,
        step_ms: f64,
        rng: &mut CombatRng,
    ) -> Vec<AiCommand> {
        let mut commands = Vec::new();
        self.tick_held(step_ms, &mut commands);

        if situation.own_state.is_final() || situation.opponent_state.is_final() {
            self.release_all(&mut commands);
            self.combo.clear();
            self.combo_step = 0;
            return commands;
        }

        self.remember(situation.opponent_state);

        if self.in_combo() {
            self.combo_timer_ms -= step_ms;
            if self.combo_timer_ms <= 0.0 {
                commands.push(AiCommand::Press(self.combo[self.combo_step]));
                self.combo_step += 1;
                self.combo_timer_ms = COMBO_STEP_MS;
            }
            if !self.in_combo() {
                self.combo.clear();
                self.combo_step = 0;
                self.mode = AiMode::Idle;
            }
            return commands;
        }

        self.decision_cooldown_ms -= step_ms;
        if self.decision_cooldown_ms > 0.0 {
            return commands;
        }
        self.decision_cooldown_ms = self.profile.difficulty.reaction_ms();

        let free = situation.own_state.can_act() || situation.own_state == FighterState::Blocking;
        if !free {
            return commands;
        }

        if !self.react(situation, rng, &mut commands) {
            self.decide(situation, rng, &mut commands);
        }
        commands
    }

    fn remember(&mut self, state: FighterState) {
        if self.recent_opponent_states.len() == OPPONENT_MEMORY {
            self.recent_opponent_states.pop_front();
        }
        self.recent_opponent_states.push_back(state);
    }

    fn frequency(&self, matches: impl Fn(FighterState) -> bool) -> f32 {
        if self.recent_opponent_states.is_empty() {
            return 0.0;
        }
        let count = self
            .recent_opponent_states
            .iter()
            .filter(|state| matches(**state))
            .count();
        count as f32 / self.recent_opponent_states.len() as f32
    }

    /// Answer what the opponent is doing right now. Returns whether it acted.
    fn react(
        &mut self,
        situation: &Situation,
        rng: &mut CombatRng,
        commands: &mut Vec<AiCommand>,
    ) -> bool {
        let range = Range::classify(situation.distance());
        let mistake = self.profile.difficulty.mistake_chance();

        match situation.opponent_state {
            state if state.is_attacking() && range == Range::Close => {
                if rng.roll() <= mistake {
                    return false;
                }
                if rng.chance(0.7) {
                    self.mode = AiMode::Defending;
                    self.hold(Intent::Block, 300.0, commands);
                } else {
                    self.mode = AiMode::Attacking;
                    self.release_all(commands);
                    commands.push(AiCommand::Press(Intent::Uppercut));
                }
                true
            }
            FighterState::Jumping if range == Range::Mid => {
                if rng.roll() <= mistake * 2.0 {
                    return false;
                }
                self.mode = AiMode::Attacking;
                self.release_all(commands);
                commands.push(AiCommand::Press(Intent::Uppercut));
                true
            }
            FighterState::Blocking => {
                self.mode = AiMode::Attacking;
                self.release_all(commands);
                if range == Range::Close {
                    commands.push(AiCommand::Press(Intent::Throw));
                } else {
                    self.start_combo(rng, commands);
                }
                true
            }
            _ => false,
        }
    }

    /// `(attack, defend, movement)` weights for the current situation.
    pub fn decision_weights(&self, situation: &Situation) -> (f32, f32, f32) {
        let (mut attack, mut defend, mut movement) = self.profile.style.weights();
        match Range::classify(situation.distance()) {
            Range::Close => {
                attack *= 1.5;
                defend *= 1.2;
            }
            Range::Far => {
                movement *= 2.0;
                attack *= 0.5;
            }
            Range::Mid => {}
        }
        if situation.health_fraction < 0.3 {
            attack *= 1.5;
            defend *= 0.5;
        }
        if self.frequency(|s| s.is_attacking()) > 0.6 {
            defend *= 1.5;
        }
        if self.frequency(|s| s == FighterState::Blocking) > 0.4 {
            movement *= 1.3;
        }
        (attack, defend, movement)
    }

    fn decide(&mut self, situation: &Situation, rng: &mut CombatRng, commands: &mut Vec<AiCommand>) {
        let (attack, defend, movement) = self.decision_weights(situation);
        let total = attack + defend + movement;
        let pick = rng.roll() * total;

        if pick < attack {
            self.attack(situation, rng, commands);
        } else if pick < attack + defend {
            self.mode = AiMode::Defending;
            self.hold(Intent::Block, 500.0, commands);
        } else {
            self.movement(situation, rng, commands);
        }
    }

    fn attack(&mut self, situation: &Situation, rng: &mut CombatRng, commands: &mut Vec<AiCommand>) {
        self.release_all(commands);
        match Range::classify(situation.distance()) {
            Range::Close => {
                self.mode = AiMode::Attacking;
                match [Intent::Punch, Intent::Kick, Intent::Throw][rng.index(3)] {
                    Intent::Throw => commands.push(AiCommand::Press(Intent::Throw)),
                    _ => self.start_combo(rng, commands),
                }
            }
            Range::Mid => {
                self.mode = AiMode::Attacking;
                let intent = match [Intent::Punch, Intent::Kick, Intent::Special][rng.index(3)] {
                    Intent::Special if !situation.meter_full => Intent::Punch,
                    other => other,
                };
                commands.push(AiCommand::Press(intent));
            }
            Range::Far => self.movement(situation, rng, commands),
        }
    }

    fn movement(&mut self, situation: &Situation, rng: &mut CombatRng, commands: &mut Vec<AiCommand>) {
        let distance = situation.distance();
        if distance > PREFERRED_DISTANCE + DISTANCE_TOLERANCE {
            self.mode = AiMode::Approaching;
            self.hold(situation.toward(), 300.0, commands);
        } else if distance < PREFERRED_DISTANCE - DISTANCE_TOLERANCE {
            self.mode = AiMode::Retreating;
            self.hold(situation.away(), 200.0, commands);
        } else {
            self.mode = AiMode::Idle;
            let step = if rng.chance(0.5) {
                Intent::MoveLeft
            } else {
                Intent::MoveRight
            };
            self.hold(step, 150.0, commands);
        }
    }

    fn start_combo(&mut self, rng: &mut CombatRng, commands: &mut Vec<AiCommand>) {
        let string = COMBO_STRINGS[rng.index(COMBO_STRINGS.len())];
        let length = string.len().min(self.profile.difficulty.combo_length());
        self.combo = string[..length].to_vec();
        self.combo_step = 0;
        self.combo_timer_ms = 0.0;
        self.mode = AiMode::Attacking;
        if let Some(&first) = self.combo.first() {
            commands.push(AiCommand::Press(first));
            self.combo_step = 1;
            self.combo_timer_ms = COMBO_STEP_MS;
        }
    }

    /// Press `intent` and keep it down for `duration_ms`.
    fn hold(&mut self, intent: Intent, duration_ms: f64, commands: &mut Vec<AiCommand>) {
        let opposite = match intent {
            Intent::MoveLeft => Some(Intent::MoveRight),
            Intent::MoveRight => Some(Intent::MoveLeft),
            _ => None,
        };
        if let Some(opposite) = opposite {
            self.release(opposite, commands);
        }
        if intent != Intent::Block {
            self.release(Intent::Block, commands);
        }

        if let Some(entry) = self.held.iter_mut().find(|(held, _)| *held == intent) {
            entry.1 = entry.1.max(duration_ms);
        } else {
            self.held.push((intent, duration_ms));
            commands.push(AiCommand::Press(intent));
        }
    }

    fn release(&mut self, intent: Intent, commands: &mut Vec<AiCommand>) {
        if let Some(index) = self.held.iter().position(|(held, _)| *held == intent) {
            self.held.remove(index);
            commands.push(AiCommand::Release(intent));
        }
    }

    fn release_all(&mut self, commands: &mut Vec<AiCommand>) {
        for (intent, _) in self.held.drain(..) {
            commands.push(AiCommand::Release(intent));
        }
    }

    fn tick_held(&mut self, step_ms: f64, commands: &mut Vec<AiCommand>) {
        self.held.retain_mut(|(intent, remaining)| {
            *remaining -= step_ms;
            if *remaining <= 0.0 {
                commands.push(AiCommand::Release(*intent));
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AiStyle, Difficulty};

    fn situation(distance: f32, opponent_state: FighterState) -> Situation {
        Situation {
            own_x: 400.0,
            own_state: FighterState::Idle,
            health_fraction: 1.0,
            meter_full: false,
            opponent_x: 400.0 - distance,
            opponent_state,
        }
    }

    fn profile(difficulty: Difficulty, style: AiStyle) -> AiProfile {
        AiProfile { difficulty, style }
    }

    #[test]
    fn ranges() {
        assert_eq!(Range::classify(79.0), Range::Close);
        assert_eq!(Range::classify(80.0), Range::Mid);
        assert_eq!(Range::classify(149.0), Range::Mid);
        assert_eq!(Range::classify(150.0), Range::Far);
    }

    #[test]
    fn weights_shift_with_range_and_health() {
        let ai = AiController::new(profile(Difficulty::Normal, AiStyle::Balanced));
        let (attack, defend, movement) = ai.decision_weights(&situation(50.0, FighterState::Idle));
        assert!((attack - 0.75).abs() < 1e-6);
        assert!((defend - 0.36).abs() < 1e-6);
        assert!((movement - 0.2).abs() < 1e-6);

        let mut low = situation(300.0, FighterState::Idle);
        low.health_fraction = 0.2;
        let (attack, defend, movement) = ai.decision_weights(&low);
        assert!((attack - 0.375).abs() < 1e-6);
        assert!((defend - 0.15).abs() < 1e-6);
        assert!((movement - 0.4).abs() < 1e-6);
    }

    #[test]
    fn waits_for_reaction_time() {
        let mut ai = AiController::new(profile(Difficulty::Easy, AiStyle::Aggressive));
        let mut rng = CombatRng::seeded(1);
        let far = situation(400.0, FighterState::Idle);
        // 500 ms reaction at 60 Hz is 30 ticks
        for _ in 0..29 {
            assert!(ai.update(&far, 1000.0 / 60.0, &mut rng).is_empty());
        }
        let decided: Vec<AiCommand> = (0..2)
            .flat_map(|_| ai.update(&far, 1000.0 / 60.0, &mut rng))
            .collect();
        assert!(!decided.is_empty());
    }

    #[test]
    fn blocking_opponent_at_close_range_gets_thrown() {
        let mut ai = AiController::new(profile(Difficulty::Expert, AiStyle::Balanced));
        ai.decision_cooldown_ms = 0.0;
        let mut rng = CombatRng::seeded(3);
        let commands = ai.update(&situation(40.0, FighterState::Blocking), 1000.0 / 60.0, &mut rng);
        assert_eq!(commands, vec![AiCommand::Press(Intent::Throw)]);
    }

    #[test]
    fn held_intents_are_released() {
        let mut ai = AiController::new(profile(Difficulty::Normal, AiStyle::Balanced));
        let mut commands = Vec::new();
        ai.hold(Intent::Block, 50.0, &mut commands);
        assert_eq!(commands, vec![AiCommand::Press(Intent::Block)]);
        assert!(ai.is_holding(Intent::Block));

        let mut released = Vec::new();
        for _ in 0..4 {
            ai.tick_held(1000.0 / 60.0, &mut released);
        }
        assert_eq!(released, vec![AiCommand::Release(Intent::Block)]);
        assert!(!ai.is_holding(Intent::Block));
    }

    #[test]
    fn combos_respect_difficulty_length() {
        let mut ai = AiController::new(profile(Difficulty::Easy, AiStyle::Aggressive));
        let mut rng = CombatRng::seeded(9);
        let mut commands = Vec::new();
        ai.start_combo(&mut rng, &mut commands);
        assert_eq!(commands.len(), 1);
        assert!(ai.in_combo());

        let close = situation(40.0, FighterState::Idle);
        let mut presses = 1;
        for _ in 0..60 {
            presses += ai
                .update(&close, 1000.0 / 60.0, &mut rng)
                .iter()
                .filter(|c| matches!(c, AiCommand::Press(_)))
                .count();
            if !ai.in_combo() {
                break;
            }
        }
        assert_eq!(presses, 2);
    }

    #[test]
    fn same_seed_same_decisions() {
        let run = || {
            let mut ai = AiController::new(profile(Difficulty::Hard, AiStyle::Balanced));
            let mut rng = CombatRng::seeded(77);
            let mut log = Vec::new();
            for tick in 0..600 {
                let distance = 60.0 + (tick % 200) as f32;
                log.extend(ai.update(&situation(distance, FighterState::Idle), 1000.0 / 60.0, &mut rng));
            }
            log
        };
        assert_eq!(run(), run());
    }
}
