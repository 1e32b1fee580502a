//! Combat-related components.

use bevy::prelude::*;

use crate::config::{Knockdown, MoveData, MoveTier};

/// Combo counts reset after this long without a landed hit.
pub const COMBO_WINDOW_MS: f64 = 2000.0;

/// Normal moves can be cancelled into a special up to this attack frame.
pub const CANCEL_WINDOW_FRAMES: u32 = 6;

pub const METER_MAX: f32 = 100.0;

/// Ticks after a clean hit during which the defender may break the combo.
pub const BREAKER_WINDOW_FRAMES: u32 = 8;

pub const BREAKER_COOLDOWN_MS: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FighterState {
    #[default]
    Idle,
    Walking,
    Jumping,
    Attacking,
    Recovery,
    Hurt,
    /// On the ground after a knockdown, waiting to wake up
    KnockedDown,
    Blocking,
    Special,
    Counter,
    Victory,
    Defeat,
}

impl FighterState {
    pub fn name(&self) -> &'static str {
        match self {
            FighterState::Idle => "idle",
            FighterState::Walking => "walking",
            FighterState::Jumping => "jumping",
            FighterState::Attacking => "attacking",
            FighterState::Recovery => "recovery",
            FighterState::Hurt => "hurt",
            FighterState::KnockedDown => "knocked_down",
            FighterState::Blocking => "blocking",
            FighterState::Special => "special",
            FighterState::Counter => "counter",
            FighterState::Victory => "victory",
            FighterState::Defeat => "defeat",
        }
    }

    /// Free to start a move, walk or jump.
    pub fn can_act(&self) -> bool {
        matches!(
            self,
            FighterState::Idle | FighterState::Walking | FighterState::Jumping
        )
    }

    /// A move with hitboxes is running.
    pub fn is_attacking(&self) -> bool {
        matches!(self, FighterState::Attacking | FighterState::Special)
    }

    pub fn is_final(&self) -> bool {
        matches!(self, FighterState::Victory | FighterState::Defeat)
    }
}

/// Per-fighter combat state machine.
#[derive(Component, Debug, Clone, Default)]
pub struct CombatState {
    pub state: FighterState,
    pub current_attack: Option<String>,
    pub current_tier: MoveTier,
    /// Ticks since the current move started
    pub attack_frame: u32,
    pub attack_duration: u32,
    /// Recovery ticks left once the move has finished
    pub recovery_frames: u32,
    pub hitstun_ms: f32,
    pub blockstun_ms: f32,
    pub invincible: bool,
    pub invincibility_frames: u32,
    /// Bit `i` set once active range `i` of the current move has connected
    pub connected_ranges: u32,
    /// Ticks left frozen by hitstop
    pub hitstop_frames: u32,
    /// Ticks left on the ground
    pub knockdown_frames: u32,
    pub can_quick_rise: bool,
}

impl CombatState {
    /// Begin `name`. Counter stances and special-tier moves get their own state.
    pub fn start_move(&mut self, name: &str, data: &MoveData) {
        self.state = if data.counter_stance {
            FighterState::Counter
        } else if data.tier == MoveTier::Special {
            FighterState::Special
        } else {
            FighterState::Attacking
        };
        self.current_attack = Some(name.to_string());
        self.current_tier = data.tier;
        self.attack_frame = 0;
        self.attack_duration = data.duration;
        self.recovery_frames = data.recovery_frames;
        self.connected_ranges = 0;
        if data.invincibility_frames > 0 {
            self.invincibility_frames = self.invincibility_frames.max(data.invincibility_frames);
            self.invincible = true;
        }
    }

    pub fn cancel_attack(&mut self) {
        self.current_attack = None;
        self.current_tier = MoveTier::Normal;
        self.attack_frame = 0;
        self.attack_duration = 0;
        self.recovery_frames = 0;
        self.connected_ranges = 0;
    }

    /// Knocked into hitstun; any running move is dropped.
    pub fn enter_hurt(&mut self, hitstun_ms: f32) {
        self.cancel_attack();
        self.state = FighterState::Hurt;
        self.hitstun_ms = hitstun_ms;
    }

    /// Knocked off the feet; hitstun is replaced by the knockdown timer.
    pub fn enter_knockdown(&mut self, knockdown: Knockdown) {
        self.cancel_attack();
        self.state = FighterState::KnockedDown;
        self.hitstun_ms = 0.0;
        self.knockdown_frames = knockdown.frames;
        self.can_quick_rise = !knockdown.hard;
    }

    /// Leave a knockdown early. Only soft knockdowns allow it.
    pub fn quick_rise(&mut self) -> bool {
        if self.state != FighterState::KnockedDown || !self.can_quick_rise {
            return false;
        }
        self.knockdown_frames = 0;
        self.state = FighterState::Idle;
        true
    }

    pub fn freeze(&mut self, frames: u32) {
        self.hitstop_frames = self.hitstop_frames.max(frames);
    }

    pub fn enter_blockstun(&mut self, blockstun_ms: f32) {
        self.state = FighterState::Blocking;
        self.blockstun_ms = blockstun_ms;
    }

    /// A normal move still early enough to be cancelled into a special.
    pub fn can_cancel(&self) -> bool {
        self.state == FighterState::Attacking
            && self.current_tier == MoveTier::Normal
            && self.attack_frame <= CANCEL_WINDOW_FRAMES
    }

    pub fn has_connected(&self, range: u8) -> bool {
        range < 32 && self.connected_ranges & (1 << range) != 0
    }

    pub fn mark_connected(&mut self, range: u8) {
        if range < 32 {
            self.connected_ranges |= 1 << range;
        }
    }

    pub fn grant_invincibility(&mut self, frames: u32) {
        self.invincibility_frames = self.invincibility_frames.max(frames);
        self.invincible = true;
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct Combo {
    pub count: u32,
    pub max: u32,
    pub last_time_ms: f64,
}

impl Combo {
    /// Count before this hit, for damage scaling.
    pub fn register_hit(&mut self, now_ms: f64) -> u32 {
        let before = self.count;
        self.count += 1;
        self.max = self.max.max(self.count);
        self.last_time_ms = now_ms;
        before
    }

    pub fn expire(&mut self, now_ms: f64) {
        if self.count > 0 && now_ms - self.last_time_ms > COMBO_WINDOW_MS {
            self.count = 0;
        }
    }
}

/// Escape from an opponent's combo, usable once per cooldown.
#[derive(Component, Debug, Clone, Default)]
pub struct ComboBreaker {
    /// Ticks left to input the breaker after the last hit taken
    pub window_frames: u32,
    pub ready_at_ms: f64,
}

impl ComboBreaker {
    pub fn open_window(&mut self) {
        self.window_frames = BREAKER_WINDOW_FRAMES;
    }

    pub fn is_available(&self, now_ms: f64) -> bool {
        self.window_frames > 0 && now_ms >= self.ready_at_ms
    }

    /// Spend the breaker if it is available.
    pub fn try_break(&mut self, now_ms: f64) -> bool {
        if !self.is_available(now_ms) {
            return false;
        }
        self.window_frames = 0;
        self.ready_at_ms = now_ms + BREAKER_COOLDOWN_MS;
        true
    }
}

/// Special meter in `[0, 100]`.
#[derive(Component, Debug, Clone, Default)]
pub struct SpecialMeter(f32);

impl SpecialMeter {
    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn add(&mut self, amount: f32) {
        self.0 = (self.0 + amount).clamp(0.0, METER_MAX);
    }

    /// Spend `cost` if the meter holds that much.
    pub fn spend(&mut self, cost: f32) -> bool {
        if self.0 + f32::EPSILON < cost {
            return false;
        }
        self.0 = (self.0 - cost).clamp(0.0, METER_MAX);
        true
    }

    pub fn is_full(&self) -> bool {
        self.0 >= METER_MAX
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct DamageLedger {
    pub dealt: f32,
    pub taken: f32,
}

/// Round countdown, in simulation milliseconds.
#[derive(Resource, Debug, Clone)]
pub struct RoundTimer {
    pub duration_ms: f64,
    pub remaining_ms: f64,
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::from_secs(99.0)
    }
}

impl RoundTimer {
    pub fn from_secs(secs: f32) -> Self {
        let duration_ms = secs as f64 * 1000.0;
        Self {
            duration_ms,
            remaining_ms: duration_ms,
        }
    }

    pub fn tick(&mut self, elapsed_ms: f64) {
        self.remaining_ms = (self.remaining_ms - elapsed_ms).max(0.0);
    }

    pub fn expired(&self) -> bool {
        self.remaining_ms <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MoveLibrary;

    #[test]
    fn meter_is_clamped() {
        let mut meter = SpecialMeter::default();
        meter.add(250.0);
        assert_eq!(meter.value(), 100.0);
        assert!(meter.is_full());
        assert!(meter.spend(100.0));
        assert!(!meter.spend(1.0));
        meter.add(-10.0);
        assert_eq!(meter.value(), 0.0);
    }

    #[test]
    fn combo_expires_after_window() {
        let mut combo = Combo::default();
        assert_eq!(combo.register_hit(0.0), 0);
        assert_eq!(combo.register_hit(1500.0), 1);
        combo.expire(3400.0);
        assert_eq!(combo.count, 2);
        combo.expire(3600.0);
        assert_eq!(combo.count, 0);
        assert_eq!(combo.max, 2);
    }

    #[test]
    fn breaker_needs_an_open_window_and_cooldown() {
        let mut breaker = ComboBreaker::default();
        assert!(!breaker.try_break(0.0));

        breaker.open_window();
        assert!(breaker.try_break(100.0));
        assert_eq!(breaker.window_frames, 0);

        breaker.open_window();
        assert!(!breaker.try_break(4000.0));
        assert!(breaker.try_break(5100.0));
    }

    #[test]
    fn only_soft_knockdowns_allow_a_quick_rise() {
        let mut combat = CombatState::default();
        combat.enter_knockdown(Knockdown {
            hard: true,
            frames: 30,
        });
        assert_eq!(combat.state, FighterState::KnockedDown);
        assert!(!combat.quick_rise());

        combat.enter_knockdown(Knockdown {
            hard: false,
            frames: 20,
        });
        assert!(combat.quick_rise());
        assert_eq!(combat.state, FighterState::Idle);
        assert_eq!(combat.knockdown_frames, 0);
    }

    #[test]
    fn special_tier_moves_enter_special_state() {
        let library = MoveLibrary::default();
        let mut combat = CombatState::default();
        combat.start_move("special", library.get("special").unwrap());
        assert_eq!(combat.state, FighterState::Special);
        assert!(combat.invincible);
        assert_eq!(combat.invincibility_frames, 10);

        combat.start_move("counter", library.get("counter").unwrap());
        assert_eq!(combat.state, FighterState::Counter);
    }

    #[test]
    fn connected_ranges_are_tracked_per_instance() {
        let library = MoveLibrary::default();
        let mut combat = CombatState::default();
        combat.start_move("double_punch", library.get("double_punch").unwrap());
        combat.mark_connected(0);
        assert!(combat.has_connected(0));
        assert!(!combat.has_connected(1));
        combat.start_move("punch", library.get("punch").unwrap());
        assert!(!combat.has_connected(0));
    }

    #[test]
    fn only_early_normals_cancel() {
        let library = MoveLibrary::default();
        let mut combat = CombatState::default();
        combat.start_move("punch", library.get("punch").unwrap());
        combat.attack_frame = 6;
        assert!(combat.can_cancel());
        combat.attack_frame = 7;
        assert!(!combat.can_cancel());
    }
}
