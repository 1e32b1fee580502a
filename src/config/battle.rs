//! Battle configuration: the two fighters, the arena and the round rules.

use bevy::prelude::*;
use serde::Deserialize;

use super::error::ConfigError;

/// How quickly and how reliably an AI controller reacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    /// Milliseconds between two decisions.
    pub fn reaction_ms(&self) -> f64 {
        match self {
            Difficulty::Easy => 500.0,
            Difficulty::Normal => 300.0,
            Difficulty::Hard => 150.0,
            Difficulty::Expert => 100.0,
        }
    }

    /// Probability of missing a reaction to the opponent.
    pub fn mistake_chance(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Normal => 0.2,
            Difficulty::Hard => 0.1,
            Difficulty::Expert => 0.05,
        }
    }

    /// Longest attack string the AI strings together.
    pub fn combo_length(&self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Normal => 3,
            Difficulty::Hard => 5,
            Difficulty::Expert => 7,
        }
    }
}

/// Baseline weighting between attacking, defending and moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum AiStyle {
    Aggressive,
    #[default]
    Balanced,
    Defensive,
}

impl AiStyle {
    /// `(attack, defend, movement)` weights.
    pub fn weights(&self) -> (f32, f32, f32) {
        match self {
            AiStyle::Aggressive => (0.7, 0.2, 0.1),
            AiStyle::Balanced => (0.5, 0.3, 0.2),
            AiStyle::Defensive => (0.3, 0.5, 0.2),
        }
    }
}

/// Settings for an AI-controlled fighter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct AiProfile {
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub style: AiStyle,
}

fn default_archetype() -> String {
    "warrior".to_string()
}

fn default_crit_chance() -> f32 {
    0.05
}

fn default_size() -> (f32, f32) {
    (64.0, 96.0)
}

fn default_max_jumps() -> u32 {
    1
}

/// Stats and body of one fighter.
#[derive(Debug, Clone, Deserialize)]
pub struct FighterConfig {
    pub name: String,
    /// Entity type used for animation catalog lookups
    #[serde(default = "default_archetype")]
    pub archetype: String,
    pub max_health: f32,
    pub strength: f32,
    pub defense: f32,
    /// Walk speed in px/s
    pub speed: f32,
    #[serde(default = "default_crit_chance")]
    pub crit_chance: f32,
    /// Armored fighters take damage without flinching
    #[serde(default)]
    pub armored: bool,
    /// Body box `(width, height)`, anchored at the feet
    #[serde(default = "default_size")]
    pub size: (f32, f32),
    #[serde(default = "default_max_jumps")]
    pub max_jumps: u32,
}

/// Training totals a player carries into battle.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TrainingProgress {
    pub health: f32,
    pub strength: f32,
    pub endurance: f32,
    pub stamina: f32,
}

impl FighterConfig {
    /// Baseline player with no training applied.
    pub fn player(name: impl Into<String>) -> Self {
        Self::from_progress(name, &TrainingProgress::default())
    }

    /// Player stats derived from training progress.
    pub fn from_progress(name: impl Into<String>, progress: &TrainingProgress) -> Self {
        Self {
            name: name.into(),
            archetype: "player".to_string(),
            max_health: 100.0 + progress.health,
            strength: 10.0 + progress.strength * 0.1,
            defense: 5.0 + progress.endurance * 0.05,
            speed: 300.0 + progress.stamina * 2.0,
            crit_chance: default_crit_chance(),
            armored: false,
            size: default_size(),
            max_jumps: default_max_jumps(),
        }
    }

    /// Stock boss used when no boss data is supplied.
    pub fn boss(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            archetype: "boss".to_string(),
            max_health: 100.0,
            strength: 15.0,
            defense: 5.0,
            speed: 250.0,
            crit_chance: default_crit_chance(),
            armored: false,
            size: default_size(),
            max_jumps: default_max_jumps(),
        }
    }

    fn validate(&self, role: &str) -> Result<(), ConfigError> {
        if !(self.max_health > 0.0) {
            return Err(invalid(role, "max_health", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.crit_chance) {
            return Err(invalid(role, "crit_chance", "must lie in [0, 1]"));
        }
        if !(self.size.0 > 0.0 && self.size.1 > 0.0) {
            return Err(invalid(role, "size", "width and height must be positive"));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(invalid(role, "speed", "must be finite and non-negative"));
        }
        Ok(())
    }
}

fn invalid(role: &str, field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: format!("{role}.{field}"),
        reason: reason.to_string(),
    }
}

/// Arena geometry. `y` grows downwards; the ceiling is at `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    pub floor_y: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            floor_y: 300.0,
        }
    }
}

fn default_round_time() -> f32 {
    99.0
}

/// Everything needed to start a battle.
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct BattleConfig {
    pub player: FighterConfig,
    pub boss: FighterConfig,
    #[serde(default)]
    pub boss_ai: AiProfile,
    /// When set the player side is driven by an AI controller too
    #[serde(default)]
    pub player_ai: Option<AiProfile>,
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default = "default_round_time")]
    pub round_time_secs: f32,
    #[serde(default)]
    pub seed: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            player: FighterConfig::player("Player"),
            boss: FighterConfig::boss("Boss"),
            boss_ai: AiProfile::default(),
            player_ai: None,
            arena: ArenaConfig::default(),
            round_time_secs: default_round_time(),
            seed: 0,
        }
    }
}

impl BattleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player.validate("player")?;
        self.boss.validate("boss")?;
        if !(self.arena.width > 0.0 && self.arena.floor_y > 0.0) {
            return Err(invalid("arena", "size", "width and floor_y must be positive"));
        }
        if !(self.round_time_secs > 0.0) {
            return Err(invalid("battle", "round_time_secs", "must be positive"));
        }
        Ok(())
    }

    /// Spawn point of the player: 100 px from the left wall, on the floor.
    pub fn player_spawn(&self) -> Vec2 {
        Vec2::new(100.0, self.arena.floor_y)
    }

    /// Spawn point of the boss: 100 px from the right wall, on the floor.
    pub fn boss_spawn(&self) -> Vec2 {
        Vec2::new(self.arena.width - 100.0, self.arena.floor_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_scales_player_stats() {
        let progress = TrainingProgress {
            health: 20.0,
            strength: 100.0,
            endurance: 40.0,
            stamina: 10.0,
        };
        let fighter = FighterConfig::from_progress("Hero", &progress);
        assert_eq!(fighter.max_health, 120.0);
        assert_eq!(fighter.strength, 20.0);
        assert_eq!(fighter.defense, 7.0);
        assert_eq!(fighter.speed, 320.0);
    }

    #[test]
    fn default_config_is_valid() {
        let config = BattleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.player_spawn(), Vec2::new(100.0, 300.0));
        assert_eq!(config.boss_spawn(), Vec2::new(700.0, 300.0));
    }

    #[test]
    fn rejects_out_of_range_crit_chance() {
        let mut config = BattleConfig::default();
        config.boss.crit_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "boss.crit_chance"
        ));
    }
}
