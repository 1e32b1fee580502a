//! Animation state and visual modifiers of a fighter.

use bevy::prelude::*;
use serde::Deserialize;

use crate::combat::{CombatState, FighterState};
use crate::entities::Body;

/// Linear RGBA colour, each channel in `[0, 1]`.
pub type Rgba = [f32; 4];

pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

/// Tint flashed while a fighter is in hitstun.
pub const HIT_RED: Rgba = [1.0, 0.3, 0.3, 1.0];

/// Horizontal speed above which a grounded fighter shows the walk cycle.
pub const WALK_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Clip {
    #[default]
    Idle,
    Walking,
    Jumping,
    Punch,
    Kick,
    Uppercut,
    Hurt,
    Blocking,
    Special,
    Victory,
    Defeat,
}

impl Clip {
    pub const ALL: [Clip; 11] = [
        Clip::Idle,
        Clip::Walking,
        Clip::Jumping,
        Clip::Punch,
        Clip::Kick,
        Clip::Uppercut,
        Clip::Hurt,
        Clip::Blocking,
        Clip::Special,
        Clip::Victory,
        Clip::Defeat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Clip::Idle => "idle",
            Clip::Walking => "walking",
            Clip::Jumping => "jumping",
            Clip::Punch => "punch",
            Clip::Kick => "kick",
            Clip::Uppercut => "uppercut",
            Clip::Hurt => "hurt",
            Clip::Blocking => "blocking",
            Clip::Special => "special",
            Clip::Victory => "victory",
            Clip::Defeat => "defeat",
        }
    }

    /// Sub-clip for an attack; anything without its own clip uses the punch.
    pub fn for_attack(name: Option<&str>) -> Clip {
        match name {
            Some("kick") => Clip::Kick,
            Some("uppercut") => Clip::Uppercut,
            _ => Clip::Punch,
        }
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, Clip::Punch | Clip::Kick | Clip::Uppercut)
    }

    /// Built-in timing, used when the catalog has none.
    pub fn default_data(&self) -> ClipData {
        let (frames, ticks_per_frame, looping) = match self {
            Clip::Idle => (4, 8, true),
            Clip::Walking => (6, 6, true),
            Clip::Jumping => (3, 10, false),
            Clip::Punch => (3, 5, false),
            Clip::Kick => (4, 5, false),
            Clip::Uppercut => (5, 4, false),
            Clip::Hurt => (2, 15, false),
            Clip::Blocking => (1, 1, false),
            Clip::Special => (6, 5, false),
            Clip::Victory => (4, 10, true),
            Clip::Defeat => (2, 20, false),
        };
        ClipData {
            frames,
            ticks_per_frame,
            looping,
        }
    }

    /// Pick the clip for a fighter, highest priority first.
    pub fn select(combat: &CombatState, body: &Body) -> Clip {
        match combat.state {
            FighterState::Victory => Clip::Victory,
            FighterState::Defeat => Clip::Defeat,
            FighterState::Special => Clip::Special,
            FighterState::Hurt if combat.hitstun_ms > 0.0 => Clip::Hurt,
            FighterState::KnockedDown => Clip::Hurt,
            FighterState::Blocking | FighterState::Counter => Clip::Blocking,
            FighterState::Attacking => Clip::for_attack(combat.current_attack.as_deref()),
            _ if !body.grounded => Clip::Jumping,
            _ if body.velocity.x.abs() > WALK_THRESHOLD => Clip::Walking,
            _ => Clip::Idle,
        }
    }
}

/// Frame count and speed of one clip, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ClipData {
    pub frames: u32,
    pub ticks_per_frame: u32,
    #[serde(default)]
    pub looping: bool,
}

/// Tick-driven sprite animation.
#[derive(Component, Debug, Clone, Default)]
pub struct SpriteAnimation {
    pub current: Clip,
    pub frame: u32,
    pub frame_timer: u32,
    pub finished: bool,
    /// Impact marker already sent for this clip instance
    pub impact_sent: bool,
}

impl SpriteAnimation {
    /// Switch clips. Returns whether the clip actually changed.
    pub fn play(&mut self, clip: Clip) -> bool {
        if self.current == clip {
            return false;
        }
        self.current = clip;
        self.frame = 0;
        self.frame_timer = 0;
        self.finished = false;
        self.impact_sent = false;
        true
    }

    /// Advance one tick through `data`.
    pub fn advance(&mut self, data: &ClipData) {
        let frames = data.frames.max(1);
        self.frame_timer += 1;
        if self.frame_timer < data.ticks_per_frame.max(1) {
            return;
        }
        self.frame_timer = 0;
        self.frame += 1;
        if self.frame >= frames {
            if data.looping {
                self.frame = 0;
            } else {
                self.frame = frames - 1;
                self.finished = true;
            }
        }
    }
}

/// How a fighter should be drawn this tick.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Visual {
    pub scale: f32,
    pub alpha: f32,
    pub tint: Rgba,
    pub flip_x: bool,
    pub rotation: f32,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            scale: 1.0,
            alpha: 1.0,
            tint: WHITE,
            flip_x: false,
            rotation: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// An attack clip reached its middle frame
    AttackImpact,
    /// A special clip started
    AuraActive,
}

/// Once-per-clip-instance cue for sound and effect layers.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AnimationMarker {
    pub entity: Entity,
    pub clip: Clip,
    pub kind: MarkerKind,
}
