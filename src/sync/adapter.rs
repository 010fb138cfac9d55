use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

use crate::hierarchy::node::Node;
use crate::sync::target::SyncTarget;

/// Outcome of an idempotent upsert against one external system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The node exists on the target after this call (created or updated).
    Synced { external_id: Option<String> },
    /// Nothing was attempted; this is a no-op success, not a failure.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Endpoint or credential missing - sync deliberately disabled.
    NotConfigured,
    /// The target has no resource kind for this node type.
    NotApplicable,
}

/// A failure scoped to one target. Only these count toward
/// `SyncStats.failed`; skips never do.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{target} returned HTTP {status}: {detail}")]
    Remote {
        target: SyncTarget,
        status: u16,
        detail: String,
    },

    #[error("unexpected {target} response: {detail}")]
    BadResponse { target: SyncTarget, detail: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// One external system. Implementations translate a node into the
/// target's resource shape and converge repeated upserts onto a single
/// external resource via a correlation-field search. An adapter must
/// never raise on behalf of another target or touch shared state
/// beyond its own external system.
#[async_trait]
pub trait SyncAdapter: Send + Sync {
    fn target(&self) -> SyncTarget;

    /// Budget for a single remote call; the orchestrator treats an
    /// elapsed timeout as a recorded failure for that (node, target).
    fn timeout(&self) -> Duration {
        Duration::from_secs(10)
    }

    /// Idempotent create-or-update keyed off the correlation field.
    async fn upsert(&self, node: &Node) -> Result<UpsertOutcome, SyncError>;

    /// Correlation-field search then removal; a missing resource is a
    /// silent no-op.
    async fn delete(&self, node_id: Uuid) -> Result<(), SyncError>;
}
