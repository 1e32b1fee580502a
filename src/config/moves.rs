//! Move frame data and hurtbox shapes.
//!
//! Frames are logic ticks. Active windows are inclusive `[start, end]`
//! ranges of the attacker's `attack_frame`.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::Deserialize;

/// Move used whenever a requested move is missing from the library.
pub const FALLBACK_MOVE: &str = "punch";

/// Collision class of a hitbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum HitboxKind {
    #[default]
    Strike,
    Projectile,
    /// Unblockable
    Throw,
    Counter,
}

/// Normal moves can be cancelled into specials; special moves deal chip damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum MoveTier {
    #[default]
    Normal,
    Special,
}

fn default_priority() -> u8 {
    2
}

/// One hitbox of a move, relative to the owner's feet when facing right.
#[derive(Debug, Clone, Deserialize)]
pub struct HitboxTemplate {
    #[serde(default)]
    pub kind: HitboxKind,
    /// 1 (low) to 4 (super)
    #[serde(default = "default_priority")]
    pub priority: u8,
    pub offset: (f32, f32),
    pub size: (f32, f32),
    pub damage: f32,
    pub hitstun_ms: f32,
    pub blockstun_ms: f32,
    pub knockback: (f32, f32),
    pub active_frames: Vec<(u32, u32)>,
}

impl HitboxTemplate {
    /// Index of the active range containing `frame`, if any.
    pub fn active_range(&self, frame: u32) -> Option<usize> {
        self.active_frames
            .iter()
            .position(|&(start, end)| frame >= start && frame <= end)
    }
}

/// A projectile spawned by a move.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectileSpec {
    /// Attack frame on which the projectile leaves the hand
    pub spawn_frame: u32,
    /// Horizontal speed in px/s, signed by facing at launch
    pub speed: f32,
    pub lifetime_secs: f32,
    pub offset: (f32, f32),
    pub size: (f32, f32),
    pub damage: f32,
    pub hitstun_ms: f32,
    pub blockstun_ms: f32,
    pub knockback: (f32, f32),
    #[serde(default = "default_priority")]
    pub priority: u8,
}

/// Impact class of a hit, which decides how long both fighters freeze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum HitStrength {
    Light,
    Medium,
    Heavy,
    Special,
    Super,
}

impl HitStrength {
    /// Hitstop length in ticks.
    pub fn hitstop_frames(&self) -> u32 {
        match self {
            HitStrength::Light => 8,
            HitStrength::Medium => 11,
            HitStrength::Heavy => 14,
            HitStrength::Special => 16,
            HitStrength::Super => 20,
        }
    }
}

/// Knockdown applied by a clean hit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Knockdown {
    /// Hard knockdowns cannot be cut short by a quick rise
    #[serde(default)]
    pub hard: bool,
    /// Ticks spent on the ground before waking up
    pub frames: u32,
}

fn default_recovery() -> u32 {
    10
}

/// Frame data of a single move.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveData {
    /// Total attack frames before recovery starts
    pub duration: u32,
    #[serde(default = "default_recovery")]
    pub recovery_frames: u32,
    #[serde(default)]
    pub tier: MoveTier,
    #[serde(default)]
    pub meter_cost: f32,
    /// Invincibility ticks granted when the move starts
    #[serde(default)]
    pub invincibility_frames: u32,
    /// Attack frames during which the user cannot be hit
    #[serde(default)]
    pub invulnerable_frames: Option<(u32, u32)>,
    /// The move is a counter stance rather than an attack
    #[serde(default)]
    pub counter_stance: bool,
    #[serde(default)]
    pub projectile: Option<ProjectileSpec>,
    #[serde(default)]
    pub hitboxes: Vec<HitboxTemplate>,
    /// Overrides the strength derived from tier, cost and damage
    #[serde(default)]
    pub strength: Option<HitStrength>,
    #[serde(default)]
    pub knockdown: Option<Knockdown>,
}

impl MoveData {
    pub fn is_invulnerable_at(&self, frame: u32) -> bool {
        self.invulnerable_frames
            .is_some_and(|(start, end)| frame >= start && frame <= end)
    }

    /// Strength of a hit from this move dealing `damage`.
    pub fn hit_strength(&self, damage: f32) -> HitStrength {
        if let Some(strength) = self.strength {
            return strength;
        }
        if self.meter_cost >= 100.0 {
            HitStrength::Super
        } else if self.tier == MoveTier::Special {
            HitStrength::Special
        } else if damage >= 20.0 {
            HitStrength::Heavy
        } else if damage >= 12.0 {
            HitStrength::Medium
        } else {
            HitStrength::Light
        }
    }
}

/// A hurtbox relative to the owner's feet. Not mirrored by facing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HurtboxShape {
    pub offset: (f32, f32),
    pub size: (f32, f32),
    #[serde(default = "default_multiplier")]
    pub damage_multiplier: f32,
}

fn default_multiplier() -> f32 {
    1.0
}

/// Hurtbox variant per body posture.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HurtboxSet {
    pub standing: HurtboxShape,
    pub crouching: HurtboxShape,
    pub airborne: HurtboxShape,
    pub dashing: HurtboxShape,
}

impl Default for HurtboxSet {
    fn default() -> Self {
        Self {
            standing: HurtboxShape {
                offset: (0.0, -45.0),
                size: (50.0, 90.0),
                damage_multiplier: 1.0,
            },
            crouching: HurtboxShape {
                offset: (0.0, -30.0),
                size: (50.0, 60.0),
                damage_multiplier: 1.0,
            },
            airborne: HurtboxShape {
                offset: (0.0, -45.0),
                size: (45.0, 85.0),
                damage_multiplier: 1.1,
            },
            dashing: HurtboxShape {
                offset: (0.0, -40.0),
                size: (60.0, 80.0),
                damage_multiplier: 1.0,
            },
        }
    }
}

/// All moves known to the simulation, keyed by name.
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct MoveLibrary {
    pub moves: HashMap<String, MoveData>,
    #[serde(default)]
    pub hurtboxes: HurtboxSet,
}

impl Default for MoveLibrary {
    fn default() -> Self {
        let moves = [
            ("punch", strike(15, 10, 2, (40.0, -30.0), (40.0, 30.0), 10.0, 300.0, 150.0, (150.0, -50.0), vec![(3, 5)])),
            (
                "sweep",
                MoveData {
                    knockdown: Some(Knockdown {
                        hard: false,
                        frames: 24,
                    }),
                    ..strike(22, 16, 2, (45.0, -10.0), (60.0, 20.0), 14.0, 400.0, 200.0, (150.0, 0.0), vec![(5, 8)])
                },
            ),
            ("kick", strike(20, 12, 2, (45.0, -15.0), (50.0, 40.0), 15.0, 400.0, 200.0, (200.0, -75.0), vec![(4, 7)])),
            ("heavy_punch", strike(22, 14, 3, (50.0, -30.0), (50.0, 40.0), 20.0, 500.0, 300.0, (300.0, -100.0), vec![(5, 8)])),
            ("double_punch", strike(20, 10, 2, (40.0, -30.0), (40.0, 30.0), 10.0, 250.0, 120.0, (100.0, -30.0), vec![(3, 5), (9, 11)])),
            (
                "uppercut",
                MoveData {
                    invulnerable_frames: Some((1, 5)),
                    knockdown: Some(Knockdown {
                        hard: true,
                        frames: 32,
                    }),
                    ..strike(24, 16, 3, (30.0, -50.0), (40.0, 60.0), 25.0, 600.0, 300.0, (100.0, -400.0), vec![(3, 6)])
                },
            ),
            (
                "special",
                MoveData {
                    tier: MoveTier::Special,
                    meter_cost: 100.0,
                    invincibility_frames: 10,
                    knockdown: Some(Knockdown {
                        hard: true,
                        frames: 35,
                    }),
                    ..strike(30, 15, 4, (50.0, -45.0), (80.0, 70.0), 30.0, 700.0, 350.0, (400.0, -200.0), vec![(8, 14)])
                },
            ),
            (
                "hurricane_kick",
                MoveData {
                    tier: MoveTier::Special,
                    ..strike(24, 14, 2, (35.0, -40.0), (60.0, 30.0), 8.0, 250.0, 150.0, (100.0, -50.0), vec![(4, 6), (10, 12), (16, 18)])
                },
            ),
            (
                "throw",
                MoveData {
                    hitboxes: vec![HitboxTemplate {
                        kind: HitboxKind::Throw,
                        priority: 2,
                        offset: (30.0, -45.0),
                        size: (30.0, 60.0),
                        damage: 18.0,
                        hitstun_ms: 500.0,
                        blockstun_ms: 0.0,
                        knockback: (250.0, -150.0),
                        active_frames: vec![(2, 3)],
                    }],
                    ..stance(18, 12)
                },
            ),
            (
                "counter",
                MoveData {
                    counter_stance: true,
                    ..stance(20, 10)
                },
            ),
            (
                "hadouken",
                MoveData {
                    tier: MoveTier::Special,
                    projectile: Some(ProjectileSpec {
                        spawn_frame: 6,
                        speed: 400.0,
                        lifetime_secs: 2.0,
                        offset: (40.0, -50.0),
                        size: (30.0, 30.0),
                        damage: 15.0,
                        hitstun_ms: 400.0,
                        blockstun_ms: 200.0,
                        knockback: (150.0, -50.0),
                        priority: 2,
                    }),
                    ..stance(20, 12)
                },
            ),
        ];

        Self {
            moves: moves
                .into_iter()
                .map(|(name, data)| (name.to_string(), data))
                .collect(),
            hurtboxes: HurtboxSet::default(),
        }
    }
}

impl MoveLibrary {
    pub fn get(&self, name: &str) -> Option<&MoveData> {
        self.moves.get(name)
    }

    /// Name under which `requested` should be executed: itself when known,
    /// else the fallback punch.
    pub fn resolve_name<'a>(&self, requested: &'a str) -> &'a str {
        if self.moves.contains_key(requested) {
            requested
        } else {
            warn!("Unknown move '{}', falling back to {}", requested, FALLBACK_MOVE);
            FALLBACK_MOVE
        }
    }

    /// Make sure the fallback move exists, whatever a data file said.
    pub fn ensure_fallback(&mut self) {
        if !self.moves.contains_key(FALLBACK_MOVE) {
            if let Some(punch) = MoveLibrary::default().moves.remove(FALLBACK_MOVE) {
                warn!("Move data has no '{}', using the built-in one", FALLBACK_MOVE);
                self.moves.insert(FALLBACK_MOVE.to_string(), punch);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn strike(
    duration: u32,
    recovery_frames: u32,
    priority: u8,
    offset: (f32, f32),
    size: (f32, f32),
    damage: f32,
    hitstun_ms: f32,
    blockstun_ms: f32,
    knockback: (f32, f32),
    active_frames: Vec<(u32, u32)>,
) -> MoveData {
    MoveData {
        duration,
        recovery_frames,
        tier: MoveTier::Normal,
        meter_cost: 0.0,
        invincibility_frames: 0,
        invulnerable_frames: None,
        counter_stance: false,
        projectile: None,
        strength: None,
        knockdown: None,
        hitboxes: vec![HitboxTemplate {
            kind: HitboxKind::Strike,
            priority,
            offset,
            size,
            damage,
            hitstun_ms,
            blockstun_ms,
            knockback,
            active_frames,
        }],
    }
}

fn stance(duration: u32, recovery_frames: u32) -> MoveData {
    MoveData {
        duration,
        recovery_frames,
        tier: MoveTier::Normal,
        meter_cost: 0.0,
        invincibility_frames: 0,
        invulnerable_frames: None,
        counter_stance: false,
        projectile: None,
        hitboxes: Vec::new(),
        strength: None,
        knockdown: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_ranges_are_inclusive() {
        let library = MoveLibrary::default();
        let punch = &library.get("punch").unwrap().hitboxes[0];
        assert_eq!(punch.active_range(2), None);
        assert_eq!(punch.active_range(3), Some(0));
        assert_eq!(punch.active_range(5), Some(0));
        assert_eq!(punch.active_range(6), None);

        let hurricane = &library.get("hurricane_kick").unwrap().hitboxes[0];
        assert_eq!(hurricane.active_range(11), Some(1));
        assert_eq!(hurricane.active_range(16), Some(2));
    }

    #[test]
    fn unknown_moves_resolve_to_punch() {
        let library = MoveLibrary::default();
        assert_eq!(library.resolve_name("kick"), "kick");
        assert_eq!(library.resolve_name("flying_knee"), FALLBACK_MOVE);
    }

    #[test]
    fn uppercut_is_invulnerable_during_startup() {
        let library = MoveLibrary::default();
        let uppercut = library.get("uppercut").unwrap();
        assert!(!uppercut.is_invulnerable_at(0));
        assert!(uppercut.is_invulnerable_at(1));
        assert!(uppercut.is_invulnerable_at(5));
        assert!(!uppercut.is_invulnerable_at(6));
    }

    #[test]
    fn hitstop_follows_hit_strength() {
        let library = MoveLibrary::default();
        let strength = |name: &str, damage: f32| library.get(name).unwrap().hit_strength(damage);
        assert_eq!(strength("punch", 10.0).hitstop_frames(), 8);
        assert_eq!(strength("kick", 15.0).hitstop_frames(), 11);
        assert_eq!(strength("heavy_punch", 20.0).hitstop_frames(), 14);
        assert_eq!(strength("hadouken", 15.0).hitstop_frames(), 16);
        assert_eq!(strength("special", 30.0).hitstop_frames(), 20);
    }

    #[test]
    fn launchers_knock_down() {
        let library = MoveLibrary::default();
        let uppercut = library.get("uppercut").unwrap().knockdown.unwrap();
        assert!(uppercut.hard);
        assert_eq!(uppercut.frames, 32);
        let sweep = library.get("sweep").unwrap().knockdown.unwrap();
        assert!(!sweep.hard);
        assert!(library.get("punch").unwrap().knockdown.is_none());
    }

    #[test]
    fn fallback_is_restored() {
        let mut library = MoveLibrary {
            moves: HashMap::new(),
            hurtboxes: HurtboxSet::default(),
        };
        library.ensure_fallback();
        assert!(library.get(FALLBACK_MOVE).is_some());
    }
}
