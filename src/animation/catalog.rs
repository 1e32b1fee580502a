//! Sprite catalog: maps `(entity type, clip, frame)` to a drawable.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use bevy::prelude::*;
use serde::Deserialize;

use super::components::{Clip, ClipData};
use crate::config::{parse_ron, read_ron, ConfigError, DataDir};

pub const PLACEHOLDER_ATLAS: &str = "placeholder";

/// Where to find one frame: an atlas name and a pixel rect `[x, y, w, h]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DrawableRef {
    pub atlas: String,
    pub rect: [f32; 4],
}

impl Default for DrawableRef {
    fn default() -> Self {
        Self {
            atlas: PLACEHOLDER_ATLAS.to_string(),
            rect: [0.0, 0.0, 64.0, 96.0],
        }
    }
}

impl DrawableRef {
    pub fn is_placeholder(&self) -> bool {
        self.atlas == PLACEHOLDER_ATLAS
    }
}

/// One sprite sheet: a row per clip, a column per frame.
#[derive(Debug, Clone, Deserialize)]
pub struct SpriteSheet {
    pub atlas: String,
    pub frame_size: (f32, f32),
    pub rows: HashMap<String, u32>,
}

impl SpriteSheet {
    /// Sheet with one row per clip in declaration order.
    pub fn standard(atlas: impl Into<String>, frame_size: (f32, f32)) -> Self {
        Self {
            atlas: atlas.into(),
            frame_size,
            rows: Clip::ALL
                .iter()
                .enumerate()
                .map(|(row, clip)| (clip.name().to_string(), row as u32))
                .collect(),
        }
    }
}

/// Clip timings and sprite sheets per entity type.
#[derive(Resource, Debug, Deserialize)]
pub struct AnimationCatalog {
    #[serde(default)]
    pub clips: HashMap<String, ClipData>,
    #[serde(default)]
    pub sheets: HashMap<String, SpriteSheet>,
    /// Missing keys already reported
    #[serde(skip)]
    warned: Mutex<HashSet<String>>,
}

impl Default for AnimationCatalog {
    fn default() -> Self {
        let clips = Clip::ALL
            .iter()
            .map(|clip| (clip.name().to_string(), clip.default_data()))
            .collect();
        let sheets = ["warrior", "player", "boss"]
            .into_iter()
            .map(|kind| {
                (
                    kind.to_string(),
                    SpriteSheet::standard(format!("sprites/{kind}.png"), (64.0, 96.0)),
                )
            })
            .collect();
        Self {
            clips,
            sheets,
            warned: Mutex::new(HashSet::new()),
        }
    }
}

impl AnimationCatalog {
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        parse_ron(contents, "<inline>")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_ron(path)
    }

    /// Timing of `clip`, from the catalog or built in.
    pub fn timing(&self, clip: Clip) -> ClipData {
        self.clips
            .get(clip.name())
            .copied()
            .unwrap_or_else(|| clip.default_data())
    }

    /// Frame to draw. Unknown clips fall back to the idle row and unknown
    /// entity types to the placeholder; each miss is logged once.
    pub fn drawable(&self, entity_type: &str, clip: Clip, frame: u32) -> DrawableRef {
        let Some(sheet) = self.sheets.get(entity_type) else {
            self.warn_once(format!("entity type '{entity_type}'"));
            return DrawableRef::default();
        };

        let row = match sheet.rows.get(clip.name()) {
            Some(row) => *row,
            None => {
                self.warn_once(format!("clip '{}' for '{}'", clip.name(), entity_type));
                match sheet.rows.get(Clip::Idle.name()) {
                    Some(row) => *row,
                    None => return DrawableRef::default(),
                }
            }
        };

        let (width, height) = sheet.frame_size;
        DrawableRef {
            atlas: sheet.atlas.clone(),
            rect: [frame as f32 * width, row as f32 * height, width, height],
        }
    }

    fn warn_once(&self, key: String) {
        if let Ok(mut warned) = self.warned.lock() {
            if warned.insert(key.clone()) {
                warn!("No animation for {}, using fallback", key);
            }
        }
    }
}

/// Replace the built-in catalog with `animations.ron` when a data directory is set.
pub fn load_animation_catalog(mut commands: Commands, data_dir: Option<Res<DataDir>>) {
    let Some(data_dir) = data_dir else {
        return;
    };
    match AnimationCatalog::load(&data_dir.file("animations.ron")) {
        Ok(catalog) => {
            info!("Loaded {} sprite sheets", catalog.sheets.len());
            commands.insert_resource(catalog);
        }
        Err(e) => warn!("{}, using built-in animation catalog", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_frames_index_into_the_sheet() {
        let catalog = AnimationCatalog::default();
        let drawable = catalog.drawable("boss", Clip::Walking, 2);
        assert_eq!(drawable.atlas, "sprites/boss.png");
        assert_eq!(drawable.rect, [128.0, 96.0, 64.0, 96.0]);
    }

    #[test]
    fn misses_fall_back_without_panicking() {
        let mut catalog = AnimationCatalog::default();
        assert!(catalog.drawable("dragon", Clip::Idle, 0).is_placeholder());

        if let Some(sheet) = catalog.sheets.get_mut("player") {
            sheet.rows.remove("kick");
        }
        let drawable = catalog.drawable("player", Clip::Kick, 1);
        assert_eq!(drawable.rect[1], 0.0);
        assert!(!drawable.is_placeholder());
    }

    #[test]
    fn shipped_catalog_parses() {
        let catalog = AnimationCatalog::from_ron_str(include_str!("../../assets/data/animations.ron"))
            .expect("animations.ron should parse");
        assert_eq!(catalog.timing(Clip::Walking).frames, 6);
        assert!(catalog.sheets.contains_key("boss"));
    }
}
