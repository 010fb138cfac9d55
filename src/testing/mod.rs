use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::config::TargetSettings;
use crate::database::MemoryNodeRepository;
use crate::hierarchy::node::{Breadcrumb, CreateNode, Node};
use crate::hierarchy::types::NodeType;
use crate::hierarchy::HierarchyService;
use crate::sync::{SkipReason, SyncAdapter, SyncError, SyncTarget, UpsertOutcome};

/// Hierarchy service over a fresh in-memory repository.
pub fn memory_service() -> HierarchyService<MemoryNodeRepository> {
    HierarchyService::new(MemoryNodeRepository::new())
}

pub fn root_city(tenant_id: Uuid, name: &str, slug: &str) -> CreateNode {
    CreateNode {
        tenant_id,
        name: name.into(),
        slug: slug.into(),
        code: None,
        node_type: "CITY".into(),
        parent_id: None,
        location: None,
        status: None,
        metadata: None,
    }
}

pub fn child_of(
    tenant_id: Uuid,
    node_type: &str,
    name: &str,
    slug: &str,
    parent_id: Option<Uuid>,
) -> CreateNode {
    CreateNode {
        tenant_id,
        name: name.into(),
        slug: slug.into(),
        code: None,
        node_type: node_type.into(),
        parent_id,
        location: None,
        status: None,
        metadata: None,
    }
}

/// A standalone node value for adapter-level tests that never touch a
/// repository.
pub fn node_of_type(node_type: NodeType) -> Node {
    let now = Utc::now();
    let mut node = Node {
        id: Uuid::new_v4(),
        tenant_id: Uuid::new_v4(),
        name: "Test Node".into(),
        slug: "test-node".into(),
        code: None,
        node_type,
        depth: node_type.depth(),
        parent_id: None,
        breadcrumbs: Vec::new(),
        location: None,
        status: None,
        metadata: None,
        created_at: now,
        updated_at: now,
    };
    node.breadcrumbs = vec![Breadcrumb::of(&node)];
    node
}

/// Target settings with no endpoint or credential: the "sync disabled"
/// state.
pub fn unconfigured() -> TargetSettings {
    TargetSettings {
        endpoint: None,
        api_key: None,
        timeout_secs: 5,
    }
}

#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Find-then-upsert against the in-memory store.
    Succeed,
    NotConfigured,
    NotApplicable,
    /// Fail for one specific node, succeed for the rest.
    FailFor(Uuid),
    FailAll,
    /// Never return; exercises the orchestrator's deadline.
    Hang,
}

/// Scripted adapter recording every call. The `store` maps node id to
/// external id, so repeated upserts for the same node converge on one
/// entry exactly like the real search-then-upsert sequence.
pub struct StubAdapter {
    target: SyncTarget,
    behavior: StubBehavior,
    timeout: Duration,
    pub calls: Arc<Mutex<Vec<Uuid>>>,
    pub deletes: Arc<Mutex<Vec<Uuid>>>,
    pub store: Arc<Mutex<HashMap<Uuid, String>>>,
}

impl StubAdapter {
    pub fn new(target: SyncTarget, behavior: StubBehavior) -> Self {
        Self {
            target,
            behavior,
            timeout: Duration::from_secs(5),
            calls: Arc::new(Mutex::new(Vec::new())),
            deletes: Arc::new(Mutex::new(Vec::new())),
            store: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn remote_failure(&self) -> SyncError {
        SyncError::Remote {
            target: self.target,
            status: 502,
            detail: "stub remote failure".into(),
        }
    }
}

#[async_trait]
impl SyncAdapter for StubAdapter {
    fn target(&self) -> SyncTarget {
        self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn upsert(&self, node: &Node) -> Result<UpsertOutcome, SyncError> {
        self.calls.lock().unwrap().push(node.id);

        match &self.behavior {
            StubBehavior::NotConfigured => Ok(UpsertOutcome::Skipped(SkipReason::NotConfigured)),
            StubBehavior::NotApplicable => Ok(UpsertOutcome::Skipped(SkipReason::NotApplicable)),
            StubBehavior::FailAll => Err(self.remote_failure()),
            StubBehavior::FailFor(id) if *id == node.id => Err(self.remote_failure()),
            StubBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(600)).await;
                Ok(UpsertOutcome::Synced { external_id: None })
            }
            _ => {
                let mut store = self.store.lock().unwrap();
                let next = format!("ext-{}", store.len() + 1);
                let external_id = store.entry(node.id).or_insert(next).clone();
                Ok(UpsertOutcome::Synced {
                    external_id: Some(external_id),
                })
            }
        }
    }

    async fn delete(&self, node_id: Uuid) -> Result<(), SyncError> {
        self.deletes.lock().unwrap().push(node_id);

        match self.behavior {
            StubBehavior::FailAll => Err(self.remote_failure()),
            _ => {
                self.store.lock().unwrap().remove(&node_id);
                Ok(())
            }
        }
    }
}
