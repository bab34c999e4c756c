use std::collections::{HashMap, VecDeque};

use super::event::TelemetryEvent;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub exception_stats: ExceptionStats,
    pub screen_stats: ScreenStats,
    pub action_stats: ActionStats,
}

#[derive(Debug, Clone, Default)]
pub struct ExceptionStats {
    pub total: u64,
    pub fatal: u64,
    pub non_fatal: u64,
    pub last_description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScreenStats {
    pub views: u64,
    pub by_name: HashMap<String, u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ActionStats {
    pub total: u64,
    pub by_category: HashMap<String, u64>,
    pub value_sum: i64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::Exception { description, fatal, .. } => {
                snap.exception_stats.total += 1;
                if *fatal {
                    snap.exception_stats.fatal += 1;
                } else {
                    snap.exception_stats.non_fatal += 1;
                }
                snap.exception_stats.last_description = Some(description.clone());
            }
            TelemetryEvent::Screenview { name, .. } => {
                snap.screen_stats.views += 1;
                *snap.screen_stats.by_name.entry(name.clone()).or_default() += 1;
            }
            TelemetryEvent::ActionEvent { category, value, .. } => {
                snap.action_stats.total += 1;
                *snap.action_stats.by_category.entry(category.clone()).or_default() += 1;
                snap.action_stats.value_sum += value;
            }
        }
    }

    snap
}
