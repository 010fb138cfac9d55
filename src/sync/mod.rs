pub mod adapter;
pub mod identity;
pub mod orchestrator;
pub mod rest;
pub mod stats;
pub mod target;

pub use adapter::{SkipReason, SyncAdapter, SyncError, UpsertOutcome};
pub use identity::IdentityAdapter;
pub use orchestrator::SyncOrchestrator;
pub use rest::RestAdapter;
pub use stats::{HierarchySyncResult, SyncStats};
pub use target::SyncTarget;

use std::sync::Arc;

use crate::config::SyncConfig;

/// Assemble the adapter set for a run. Order matters: it is the upsert
/// order per node and the attempt order for best-effort deletions.
pub fn build_adapters(config: &SyncConfig) -> Vec<Arc<dyn SyncAdapter>> {
    vec![
        Arc::new(RestAdapter::content(config.content.clone())),
        Arc::new(RestAdapter::erp(config.erp.clone())),
        Arc::new(RestAdapter::fleet(config.fleet.clone())),
        Arc::new(IdentityAdapter::new(config.identity.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn adapters_cover_all_targets_in_run_order() {
        let config = AppConfig::from_env();
        let adapters = build_adapters(&config.sync);
        let targets: Vec<SyncTarget> = adapters.iter().map(|a| a.target()).collect();
        assert_eq!(targets, SyncTarget::ALL);
    }
}
