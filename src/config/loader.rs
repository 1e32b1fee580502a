//! RON loading for battle and move data.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::de::DeserializeOwned;

use super::battle::BattleConfig;
use super::error::ConfigError;
use super::moves::MoveLibrary;

/// Directory holding `battle.ron`, `moves.ron` and `animations.ron`.
///
/// Only present when the app was configured with a data directory; without
/// it every resource keeps its built-in defaults.
#[derive(Resource, Debug, Clone)]
pub struct DataDir(pub PathBuf);

impl DataDir {
    pub fn file(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

/// Read and parse a RON file.
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(ConfigError::FileNotFound(display));
    }
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    parse_ron(&contents, &display)
}

/// Parse RON text; `origin` names the source in error messages.
pub fn parse_ron<T: DeserializeOwned>(contents: &str, origin: &str) -> Result<T, ConfigError> {
    ron::from_str(contents).map_err(|e| ConfigError::ParseError {
        path: origin.to_string(),
        details: e.to_string(),
    })
}

impl BattleConfig {
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig = parse_ron(contents, "<inline>")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: BattleConfig = read_ron(path)?;
        config.validate()?;
        Ok(config)
    }
}

impl MoveLibrary {
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        let mut library: MoveLibrary = parse_ron(contents, "<inline>")?;
        library.ensure_fallback();
        Ok(library)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut library: MoveLibrary = read_ron(path)?;
        library.ensure_fallback();
        Ok(library)
    }
}

/// Load battle and move data from the data directory, keeping the built-in
/// defaults for anything that is missing or malformed.
pub fn load_battle_data(mut commands: Commands, data_dir: Option<Res<DataDir>>) {
    let Some(data_dir) = data_dir else {
        return;
    };

    match MoveLibrary::load(&data_dir.file("moves.ron")) {
        Ok(library) => {
            info!("Loaded {} moves", library.moves.len());
            commands.insert_resource(library);
        }
        Err(e) => warn!("{}, using built-in move data", e),
    }

    match BattleConfig::load(&data_dir.file("battle.ron")) {
        Ok(config) => {
            info!(
                "Loaded battle config: {} vs {}",
                config.player.name, config.boss.name
            );
            commands.insert_resource(config);
        }
        Err(e) => warn!("{}, using default battle config", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_battle_config_parses() {
        let config = BattleConfig::from_ron_str(include_str!("../../assets/data/battle.ron"))
            .expect("battle.ron should parse");
        assert_eq!(config.arena.width, 800.0);
        assert!(config.player_ai.is_some());
    }

    #[test]
    fn shipped_move_data_parses() {
        let library = MoveLibrary::from_ron_str(include_str!("../../assets/data/moves.ron"))
            .expect("moves.ron should parse");
        for name in ["punch", "kick", "uppercut", "special", "hadouken", "throw", "counter"] {
            assert!(library.get(name).is_some(), "missing {name}");
        }
        assert!(library.get("hadouken").unwrap().projectile.is_some());
        let sweep = library.get("sweep").unwrap().knockdown.unwrap();
        assert!(!sweep.hard);
        assert_eq!(sweep.frames, 24);
    }

    #[test]
    fn missing_file_is_reported() {
        let result = BattleConfig::load(Path::new("definitely/not/here.ron"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let result = BattleConfig::from_ron_str("(player: 5)");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let source = r#"(
            player: (name: "A", max_health: 100.0, strength: 10.0, defense: 5.0, speed: 300.0),
            boss: (name: "B", max_health: 150.0, strength: 15.0, defense: 5.0, speed: 250.0),
        )"#;
        let config = BattleConfig::from_ron_str(source).unwrap();
        assert_eq!(config.round_time_secs, 99.0);
        assert_eq!(config.boss.crit_chance, 0.05);
        assert_eq!(config.arena.floor_y, 300.0);
    }
}
