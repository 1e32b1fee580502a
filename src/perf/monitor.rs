//! Frame timing history and adaptive quality tiers.

use std::collections::VecDeque;

use bevy::prelude::*;

/// Rolling window of frame samples.
pub const SAMPLE_COUNT: usize = 60;

pub const TARGET_FRAME_MS: f64 = 1000.0 / 60.0;

/// Frames slower than this multiple of the target count as dropped.
pub const DROPPED_FRAME_FACTOR: f64 = 1.5;

/// Minimum time between two tier changes.
pub const TIER_COOLDOWN_MS: f64 = 5000.0;

pub const DOWNGRADE_FPS: f64 = 50.0;
pub const UPGRADE_AVG_FPS: f64 = 55.0;
pub const UPGRADE_MIN_FPS: f64 = 50.0;

pub const MEMORY_WARNING_MB: f32 = 100.0;
pub const MEMORY_CRITICAL_MB: f32 = 150.0;

/// More than this many dropped frames raises a warning.
pub const DROPPED_FRAME_WARNING: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum QualityTier {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityTier {
    pub fn lower(&self) -> Option<QualityTier> {
        match self {
            QualityTier::Low => None,
            QualityTier::Medium => Some(QualityTier::Low),
            QualityTier::High => Some(QualityTier::Medium),
        }
    }

    pub fn higher(&self) -> Option<QualityTier> {
        match self {
            QualityTier::Low => Some(QualityTier::Medium),
            QualityTier::Medium => Some(QualityTier::High),
            QualityTier::High => None,
        }
    }

    pub fn preset(&self) -> QualityPreset {
        match self {
            QualityTier::Low => QualityPreset {
                particle_limit: 20,
                max_effects: 5,
                growth_ceiling: 0.5,
                damage_numbers: false,
            },
            QualityTier::Medium => QualityPreset {
                particle_limit: 50,
                max_effects: 10,
                growth_ceiling: 0.75,
                damage_numbers: true,
            },
            QualityTier::High => QualityPreset {
                particle_limit: 100,
                max_effects: 20,
                growth_ceiling: 1.0,
                damage_numbers: true,
            },
        }
    }
}

/// Limits that follow from a quality tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityPreset {
    pub particle_limit: usize,
    pub max_effects: usize,
    /// Fraction of each pool's max size it may grow to
    pub growth_ceiling: f32,
    pub damage_numbers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfWarning {
    LowFps,
    HighMemory,
    DroppedFrames,
}

/// Aggregates over the sample window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub avg_fps: f64,
    pub min_fps: f64,
    pub max_fps: f64,
    pub avg_frame_ms: f64,
}

/// Sent whenever the monitor switches quality tier.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct QualityChanged {
    pub from: QualityTier,
    pub to: QualityTier,
}

/// Samples real frame times and picks a quality tier.
#[derive(Resource, Debug, Clone)]
pub struct PerformanceMonitor {
    fps_samples: VecDeque<f64>,
    frame_samples: VecDeque<f64>,
    dropped_frames: u32,
    tier: QualityTier,
    last_change_ms: f64,
    memory_mb: f32,
    warnings: Vec<PerfWarning>,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self {
            fps_samples: VecDeque::with_capacity(SAMPLE_COUNT),
            frame_samples: VecDeque::with_capacity(SAMPLE_COUNT),
            dropped_frames: 0,
            tier: QualityTier::default(),
            last_change_ms: 0.0,
            memory_mb: 0.0,
            warnings: Vec::new(),
        }
    }
}

impl PerformanceMonitor {
    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn preset(&self) -> QualityPreset {
        self.tier.preset()
    }

    pub fn dropped_frames(&self) -> u32 {
        self.dropped_frames
    }

    pub fn warnings(&self) -> &[PerfWarning] {
        &self.warnings
    }

    pub fn memory_mb(&self) -> f32 {
        self.memory_mb
    }

    pub fn stats(&self) -> FrameStats {
        if self.fps_samples.is_empty() {
            return FrameStats::default();
        }
        let count = self.fps_samples.len() as f64;
        FrameStats {
            avg_fps: self.fps_samples.iter().sum::<f64>() / count,
            min_fps: self.fps_samples.iter().copied().fold(f64::INFINITY, f64::min),
            max_fps: self.fps_samples.iter().copied().fold(0.0, f64::max),
            avg_frame_ms: self.frame_samples.iter().sum::<f64>() / self.frame_samples.len() as f64,
        }
    }

    /// Record one real frame. `frame_ms` is the time spent simulating,
    /// `delta_ms` the time since the previous frame.
    /// Returns the new tier when it changed.
    pub fn record_frame(&mut self, frame_ms: f64, delta_ms: f64, now_ms: f64) -> Option<QualityTier> {
        if delta_ms <= 0.0 || !delta_ms.is_finite() || !frame_ms.is_finite() {
            return None;
        }
        if self.fps_samples.len() == SAMPLE_COUNT {
            self.fps_samples.pop_front();
            self.frame_samples.pop_front();
        }
        self.fps_samples.push_back(1000.0 / delta_ms);
        self.frame_samples.push_back(frame_ms);

        if frame_ms > TARGET_FRAME_MS * DROPPED_FRAME_FACTOR {
            self.dropped_frames += 1;
        }

        let stats = self.stats();
        self.refresh_warnings(&stats);

        if now_ms - self.last_change_ms < TIER_COOLDOWN_MS {
            return None;
        }
        let next = if stats.avg_fps < DOWNGRADE_FPS {
            self.tier.lower()
        } else if stats.avg_fps >= UPGRADE_AVG_FPS && stats.min_fps >= UPGRADE_MIN_FPS {
            self.tier.higher()
        } else {
            None
        };
        next.map(|tier| self.switch(tier, now_ms))
    }

    /// Record a memory estimate. Critical usage forces the low tier once the
    /// tier cooldown has passed.
    pub fn track_memory(&mut self, memory_mb: f32, now_ms: f64) -> Option<QualityTier> {
        self.memory_mb = memory_mb;
        let stats = self.stats();
        self.refresh_warnings(&stats);

        if memory_mb > MEMORY_CRITICAL_MB
            && self.tier != QualityTier::Low
            && now_ms - self.last_change_ms >= TIER_COOLDOWN_MS
        {
            warn!("Memory at {:.1} MB, forcing low quality", memory_mb);
            return Some(self.switch(QualityTier::Low, now_ms));
        }
        None
    }

    pub fn reset_samples(&mut self) {
        self.fps_samples.clear();
        self.frame_samples.clear();
        self.dropped_frames = 0;
        self.warnings.clear();
    }

    fn switch(&mut self, tier: QualityTier, now_ms: f64) -> QualityTier {
        info!("Quality tier {:?} -> {:?}", self.tier, tier);
        self.tier = tier;
        self.last_change_ms = now_ms;
        tier
    }

    fn refresh_warnings(&mut self, stats: &FrameStats) {
        self.warnings.clear();
        if !self.fps_samples.is_empty() && stats.avg_fps < DOWNGRADE_FPS {
            self.warnings.push(PerfWarning::LowFps);
        }
        if self.memory_mb > MEMORY_WARNING_MB {
            self.warnings.push(PerfWarning::HighMemory);
        }
        if self.dropped_frames > DROPPED_FRAME_WARNING {
            self.warnings.push(PerfWarning::DroppedFrames);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(monitor: &mut PerformanceMonitor, delta_ms: f64, from_ms: f64, frames: usize) -> Vec<QualityTier> {
        (0..frames)
            .filter_map(|i| monitor.record_frame(5.0, delta_ms, from_ms + i as f64 * delta_ms))
            .collect()
    }

    #[test]
    fn slow_frames_downgrade_after_cooldown() {
        let mut monitor = PerformanceMonitor::default();
        // 25 fps from t=0: nothing may change before 5 s
        let changes = feed(&mut monitor, 40.0, 0.0, 130);
        assert_eq!(changes, vec![QualityTier::Medium]);
        assert_eq!(monitor.tier(), QualityTier::Medium);
        assert!(monitor.warnings().contains(&PerfWarning::LowFps));

        // still slow, but the next step waits another 5 s
        let changes = feed(&mut monitor, 40.0, 4800.0, 5);
        assert!(changes.is_empty());
        let changes = feed(&mut monitor, 40.0, 10_000.0, 1);
        assert_eq!(changes, vec![QualityTier::Low]);
        assert!(feed(&mut monitor, 40.0, 20_000.0, 1).is_empty());
    }

    #[test]
    fn upgrade_needs_a_steady_minimum() {
        let mut monitor = PerformanceMonitor::default();
        monitor.track_memory(200.0, 5000.0);
        assert_eq!(monitor.tier(), QualityTier::Low);
        monitor.track_memory(10.0, 5000.0);

        // fast on average but one hitch below 50 fps blocks the upgrade
        monitor.record_frame(5.0, 25.0, 10_000.0);
        assert!(feed(&mut monitor, 10.0, 10_000.0, 30).is_empty());

        monitor.reset_samples();
        assert_eq!(feed(&mut monitor, 16.0, 10_000.0, 1), vec![QualityTier::Medium]);
    }

    #[test]
    fn dropped_frames_are_counted() {
        let mut monitor = PerformanceMonitor::default();
        for _ in 0..11 {
            monitor.record_frame(30.0, 16.0, 100.0);
        }
        monitor.record_frame(20.0, 16.0, 100.0);
        assert_eq!(monitor.dropped_frames(), 11);
        assert!(monitor.warnings().contains(&PerfWarning::DroppedFrames));
    }

    #[test]
    fn high_memory_warns_before_forcing_low() {
        let mut monitor = PerformanceMonitor::default();
        assert_eq!(monitor.track_memory(120.0, 0.0), None);
        assert_eq!(monitor.warnings(), &[PerfWarning::HighMemory]);
        assert_eq!(monitor.track_memory(151.0, 5000.0), Some(QualityTier::Low));
    }

    #[test]
    fn memory_pressure_waits_for_the_tier_cooldown() {
        let mut monitor = PerformanceMonitor::default();
        assert_eq!(monitor.track_memory(200.0, 0.0), None);

        let changes = feed(&mut monitor, 40.0, 0.0, 126);
        assert_eq!(changes, vec![QualityTier::Medium]);

        assert_eq!(monitor.track_memory(200.0, 5100.0), None);
        assert_eq!(monitor.tier(), QualityTier::Medium);
        assert_eq!(monitor.track_memory(200.0, 10_000.0), Some(QualityTier::Low));
    }
}
