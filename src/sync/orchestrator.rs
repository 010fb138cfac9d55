use std::sync::Arc;

use tokio::time::timeout;
use uuid::Uuid;

use crate::database::repository::NodeRepository;
use crate::hierarchy::node::Node;
use crate::hierarchy::service::HierarchyService;
use crate::sync::adapter::{SyncAdapter, SyncError, UpsertOutcome};
use crate::sync::stats::HierarchySyncResult;
use crate::sync::target::SyncTarget;

/// Walks a tenant's tree in depth order and propagates every node to
/// every adapter, isolating per-(node, target) outcomes. The
/// orchestrator holds no state of its own; each run is re-derivable
/// because adapter upserts are idempotent.
pub struct SyncOrchestrator<R> {
    hierarchy: HierarchyService<R>,
    adapters: Vec<Arc<dyn SyncAdapter>>,
}

impl<R: NodeRepository> SyncOrchestrator<R> {
    pub fn new(hierarchy: HierarchyService<R>, adapters: Vec<Arc<dyn SyncAdapter>>) -> Self {
        Self {
            hierarchy,
            adapters,
        }
    }

    /// One adapter call under its own deadline; a hung remote counts
    /// the same as a thrown error.
    async fn attempt_upsert(
        &self,
        adapter: &dyn SyncAdapter,
        node: &Node,
    ) -> Result<UpsertOutcome, SyncError> {
        match timeout(adapter.timeout(), adapter.upsert(node)).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::Timeout(adapter.timeout())),
        }
    }

    /// Propagate a tenant's entire tree. Never aborts: one target's
    /// failure skips neither the remaining targets for that node nor
    /// the remaining nodes.
    pub async fn sync_full_hierarchy(&self, tenant_id: Uuid) -> HierarchySyncResult {
        let mut result =
            HierarchySyncResult::for_targets(self.adapters.iter().map(|a| a.target()));

        let mut nodes = match self.hierarchy.list_nodes_by_tenant(tenant_id).await {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::error!(%tenant_id, error = %e, "Could not load tenant nodes; nothing to sync");
                return result;
            }
        };

        // Parents before children: several targets model the parent
        // linkage on their side (an ERP Department needs its Company),
        // so depth order is a correctness requirement.
        nodes.sort_by_key(|n| n.depth);

        tracing::info!(%tenant_id, count = nodes.len(), "Starting full hierarchy sync");

        for node in &nodes {
            for adapter in &self.adapters {
                let target = adapter.target();
                match self.attempt_upsert(adapter.as_ref(), node).await {
                    Ok(UpsertOutcome::Synced { .. }) => {
                        result.stats_mut(target).record_synced();
                    }
                    Ok(UpsertOutcome::Skipped(reason)) => {
                        tracing::debug!(sync_target = %target, node_id = %node.id, ?reason, "Skipped node for target");
                    }
                    Err(e) => {
                        tracing::warn!(sync_target = %target, node_id = %node.id, error = %e, "Upsert failed; continuing");
                        result.stats_mut(target).record_failure(node.id, e);
                    }
                }
            }
        }

        tracing::info!(
            %tenant_id,
            synced = result.total_synced(),
            failed = result.total_failed(),
            "Full hierarchy sync finished"
        );
        result
    }

    /// Propagate one node to every target. Returns the targets that
    /// accepted the node's state (skips included); an unknown id is
    /// logged and returns empty with no side effects.
    pub async fn sync_single_node(&self, node_id: Uuid) -> Vec<SyncTarget> {
        let node = match self.hierarchy.get_node(node_id).await {
            Ok(Some(node)) => node,
            Ok(None) => {
                tracing::info!(%node_id, "Node not found; nothing to sync");
                return Vec::new();
            }
            Err(e) => {
                tracing::error!(%node_id, error = %e, "Could not load node; nothing to sync");
                return Vec::new();
            }
        };

        let mut succeeded = Vec::new();
        for adapter in &self.adapters {
            let target = adapter.target();
            match self.attempt_upsert(adapter.as_ref(), &node).await {
                Ok(_) => succeeded.push(target),
                Err(e) => {
                    tracing::warn!(sync_target = %target, %node_id, error = %e, "Upsert failed");
                }
            }
        }
        succeeded
    }

    /// Best-effort removal from the external systems after a node left
    /// the directory. Every target is attempted independently; Identity
    /// is never attempted because issuance has no revocation
    /// counterpart.
    pub async fn delete_node_from_systems(&self, node_id: Uuid) {
        for adapter in &self.adapters {
            let target = adapter.target();
            if target == SyncTarget::Identity {
                continue;
            }

            match timeout(adapter.timeout(), adapter.delete(node_id)).await {
                Ok(Ok(())) => {
                    tracing::debug!(sync_target = %target, %node_id, "Removed node from external system");
                }
                Ok(Err(e)) => {
                    tracing::warn!(sync_target = %target, %node_id, error = %e, "External deletion failed; continuing");
                }
                Err(_) => {
                    tracing::warn!(sync_target = %target, %node_id, "External deletion timed out; continuing");
                }
            }
        }
    }
}
