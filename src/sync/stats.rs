use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::sync::target::SyncTarget;

/// Per-target outcome counters for one orchestration run. Skipped
/// attempts (target not configured, type not applicable) count in
/// neither bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncStats {
    pub synced: u32,
    pub failed: u32,
    pub errors: Vec<String>,
}

impl SyncStats {
    pub fn record_synced(&mut self) {
        self.synced += 1;
    }

    pub fn record_failure(&mut self, node_id: Uuid, message: impl std::fmt::Display) {
        self.failed += 1;
        self.errors.push(format!("{}: {}", node_id, message));
    }
}

/// The sole output of a full-hierarchy sync: accumulated stats per
/// target. Not persisted; a run is stateless and re-derivable by
/// re-running.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HierarchySyncResult {
    pub targets: BTreeMap<SyncTarget, SyncStats>,
}

impl HierarchySyncResult {
    /// Pre-seed zeroed stats so every participating target appears in
    /// the report even when no node applied to it.
    pub fn for_targets(targets: impl IntoIterator<Item = SyncTarget>) -> Self {
        Self {
            targets: targets
                .into_iter()
                .map(|t| (t, SyncStats::default()))
                .collect(),
        }
    }

    pub fn stats(&self, target: SyncTarget) -> Option<&SyncStats> {
        self.targets.get(&target)
    }

    pub(crate) fn stats_mut(&mut self, target: SyncTarget) -> &mut SyncStats {
        self.targets.entry(target).or_default()
    }

    pub fn total_synced(&self) -> u32 {
        self.targets.values().map(|s| s.synced).sum()
    }

    pub fn total_failed(&self) -> u32 {
        self.targets.values().map(|s| s.failed).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total_failed() == 0
    }
}
