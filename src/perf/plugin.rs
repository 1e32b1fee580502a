//! Performance plugin - frame sampling and quality tiers.

use bevy::prelude::*;

use super::monitor::{PerformanceMonitor, QualityChanged};

pub struct PerfPlugin;

impl Plugin for PerfPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PerformanceMonitor>()
            .add_event::<QualityChanged>();
    }
}
