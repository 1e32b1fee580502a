use std::path::Path;

use bevy::prelude::*;

use brawl_core::animation::{AnimationCatalog, Clip};
use brawl_core::config::{BattleConfig, ConfigError, MoveLibrary, FALLBACK_MOVE};
use brawl_core::BrawlCorePlugin;

#[test]
fn shipped_data_loads_at_startup() {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        BrawlCorePlugin {
            data_dir: Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/data")),
        },
    ));
    app.update();

    let config = app.world().resource::<BattleConfig>();
    assert!(config.player_ai.is_some());
    assert!(config.validate().is_ok());

    let library = app.world().resource::<MoveLibrary>();
    assert!(library.get("hadouken").is_some());
    assert!(library.get(FALLBACK_MOVE).is_some());

    let catalog = app.world().resource::<AnimationCatalog>();
    assert!(!catalog.drawable("boss", Clip::Idle, 0).is_placeholder());
}

#[test]
fn missing_data_dir_keeps_defaults() {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        BrawlCorePlugin {
            data_dir: Some("does/not/exist".into()),
        },
    ));
    app.update();

    let config = app.world().resource::<BattleConfig>();
    assert_eq!(config.player.name, "Player");
    assert!(app.world().resource::<MoveLibrary>().get("punch").is_some());
}

#[test]
fn missing_file_is_reported() {
    let result = BattleConfig::load(Path::new("does/not/exist/battle.ron"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn malformed_file_is_reported() {
    let result = MoveLibrary::from_ron_str("(moves: {\"punch\": (duration: ");
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}
