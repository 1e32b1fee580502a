//! Input history and motion/combo pattern detection.
//!
//! Directions are stored relative to the fighter's facing, so the same
//! motion works from both sides of the arena.

use std::collections::VecDeque;

use bevy::prelude::*;

use super::components::ControlState;
use crate::entities::{Facing, Side};

/// Inputs older than this are forgotten.
pub const HISTORY_WINDOW_MS: f64 = 500.0;

/// Largest gap allowed between two consecutive inputs of a pattern.
pub const SEQUENCE_GAP_MS: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    Down,
    DownForward,
    Forward,
    DownBack,
    Back,
    Punch,
    Kick,
}

impl Notation {
    /// Direction notation for the current held controls, if any direction is held.
    pub fn from_controls(controls: &ControlState, facing: Facing) -> Option<Notation> {
        let horizontal = controls.horizontal() * facing.sign();
        match (controls.crouch, horizontal) {
            (true, h) if h > 0.0 => Some(Notation::DownForward),
            (true, h) if h < 0.0 => Some(Notation::DownBack),
            (true, _) => Some(Notation::Down),
            (false, h) if h > 0.0 => Some(Notation::Forward),
            (false, h) if h < 0.0 => Some(Notation::Back),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboPattern {
    Hadouken,
    Shoryuken,
    Tatsumaki,
    ForwardDash,
    BackDash,
    DoublePunch,
    PunchKick,
}

impl ComboPattern {
    /// Match order. Motion inputs come before the short button strings they end with.
    pub const ALL: [ComboPattern; 7] = [
        ComboPattern::Hadouken,
        ComboPattern::Shoryuken,
        ComboPattern::Tatsumaki,
        ComboPattern::ForwardDash,
        ComboPattern::BackDash,
        ComboPattern::DoublePunch,
        ComboPattern::PunchKick,
    ];

    pub fn sequences(&self) -> &'static [&'static [Notation]] {
        use Notation::*;
        match self {
            ComboPattern::Hadouken => &[&[Down, DownForward, Forward, Punch], &[Down, Forward, Punch]],
            ComboPattern::Shoryuken => &[
                &[Forward, Down, DownForward, Punch],
                &[Forward, Down, Forward, Punch],
            ],
            ComboPattern::Tatsumaki => &[&[Down, DownBack, Back, Kick]],
            ComboPattern::ForwardDash => &[&[Forward, Forward]],
            ComboPattern::BackDash => &[&[Back, Back]],
            ComboPattern::DoublePunch => &[&[Punch, Punch]],
            ComboPattern::PunchKick => &[&[Punch, Kick]],
        }
    }

    /// Move executed by the pattern, if it is an attack.
    pub fn move_name(&self) -> Option<&'static str> {
        match self {
            ComboPattern::Hadouken => Some("hadouken"),
            ComboPattern::Shoryuken => Some("uppercut"),
            ComboPattern::Tatsumaki => Some("hurricane_kick"),
            ComboPattern::DoublePunch => Some("double_punch"),
            ComboPattern::PunchKick => Some("heavy_punch"),
            ComboPattern::ForwardDash | ComboPattern::BackDash => None,
        }
    }
}

/// Sent whenever a fighter's input history completes a pattern.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PatternDetected {
    pub fighter: Entity,
    pub side: Side,
    pub pattern: ComboPattern,
}

/// Recent inputs of one fighter, oldest first.
#[derive(Component, Debug, Clone, Default)]
pub struct InputHistory {
    entries: VecDeque<(Notation, f64)>,
}

impl InputHistory {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Record an input and return the pattern it completes, if any.
    /// The history is cleared after a match.
    pub fn push(&mut self, notation: Notation, timestamp_ms: f64) -> Option<ComboPattern> {
        while self
            .entries
            .front()
            .is_some_and(|&(_, t)| timestamp_ms - t > HISTORY_WINDOW_MS)
        {
            self.entries.pop_front();
        }
        self.entries.push_back((notation, timestamp_ms));

        let pattern = self.detect();
        if pattern.is_some() {
            self.entries.clear();
        }
        pattern
    }

    fn detect(&self) -> Option<ComboPattern> {
        ComboPattern::ALL.into_iter().find(|pattern| {
            pattern
                .sequences()
                .iter()
                .any(|sequence| self.ends_with(sequence))
        })
    }

    fn ends_with(&self, sequence: &[Notation]) -> bool {
        if sequence.len() > self.entries.len() {
            return false;
        }
        let tail = self.entries.range(self.entries.len() - sequence.len()..);
        let mut previous: Option<f64> = None;
        for (&(notation, t), expected) in tail.zip(sequence) {
            if notation != *expected {
                return false;
            }
            if previous.is_some_and(|p| t - p > SEQUENCE_GAP_MS) {
                return false;
            }
            previous = Some(t);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_circle_punch_is_a_hadouken() {
        let mut history = InputHistory::default();
        assert_eq!(history.push(Notation::Down, 0.0), None);
        assert_eq!(history.push(Notation::DownForward, 50.0), None);
        assert_eq!(history.push(Notation::Forward, 100.0), None);
        assert_eq!(history.push(Notation::Punch, 150.0), Some(ComboPattern::Hadouken));
        assert!(history.is_empty());
    }

    #[test]
    fn slow_inputs_do_not_combine() {
        let mut history = InputHistory::default();
        history.push(Notation::Punch, 0.0);
        assert_eq!(history.push(Notation::Punch, 350.0), None);
        // stale entries fall out of the window
        history.push(Notation::Forward, 1000.0);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn double_tap_dashes() {
        let mut history = InputHistory::default();
        history.push(Notation::Back, 0.0);
        assert_eq!(history.push(Notation::Back, 120.0), Some(ComboPattern::BackDash));
        history.push(Notation::Forward, 500.0);
        assert_eq!(history.push(Notation::Forward, 600.0), Some(ComboPattern::ForwardDash));
    }

    #[test]
    fn dragon_punch_wins_over_fireball() {
        let mut history = InputHistory::default();
        history.push(Notation::Forward, 0.0);
        history.push(Notation::Down, 40.0);
        history.push(Notation::DownForward, 80.0);
        assert_eq!(history.push(Notation::Punch, 120.0), Some(ComboPattern::Shoryuken));
    }

    #[test]
    fn directions_are_facing_relative() {
        let controls = ControlState {
            left: true,
            crouch: true,
            ..default()
        };
        assert_eq!(
            Notation::from_controls(&controls, Facing::Left),
            Some(Notation::DownForward)
        );
        assert_eq!(
            Notation::from_controls(&controls, Facing::Right),
            Some(Notation::DownBack)
        );
        assert_eq!(Notation::from_controls(&ControlState::default(), Facing::Right), None);
    }
}
