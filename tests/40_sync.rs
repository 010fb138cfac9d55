// Orchestration over the public API: partial-failure isolation and the
// shape of the reported stats, using scripted adapters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use atlas_api_rust::database::MemoryNodeRepository;
use atlas_api_rust::hierarchy::{CreateNode, HierarchyService, Node};
use atlas_api_rust::sync::{
    SkipReason, SyncAdapter, SyncError, SyncOrchestrator, SyncTarget, UpsertOutcome,
};

struct ScriptedAdapter {
    target: SyncTarget,
    configured: bool,
    fail_for: Option<Uuid>,
    store: Arc<Mutex<HashMap<Uuid, String>>>,
}

impl ScriptedAdapter {
    fn new(target: SyncTarget) -> Self {
        Self {
            target,
            configured: true,
            fail_for: None,
            store: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn unconfigured(target: SyncTarget) -> Self {
        Self {
            configured: false,
            ..Self::new(target)
        }
    }

    fn failing_for(target: SyncTarget, node_id: Uuid) -> Self {
        Self {
            fail_for: Some(node_id),
            ..Self::new(target)
        }
    }
}

#[async_trait]
impl SyncAdapter for ScriptedAdapter {
    fn target(&self) -> SyncTarget {
        self.target
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn upsert(&self, node: &Node) -> Result<UpsertOutcome, SyncError> {
        if !self.configured {
            return Ok(UpsertOutcome::Skipped(SkipReason::NotConfigured));
        }
        if self.fail_for == Some(node.id) {
            return Err(SyncError::Remote {
                target: self.target,
                status: 502,
                detail: "upstream unavailable".into(),
            });
        }

        let mut store = self.store.lock().unwrap();
        let next = format!("ext-{}", store.len() + 1);
        let external_id = store.entry(node.id).or_insert(next).clone();
        Ok(UpsertOutcome::Synced {
            external_id: Some(external_id),
        })
    }

    async fn delete(&self, node_id: Uuid) -> Result<(), SyncError> {
        self.store.lock().unwrap().remove(&node_id);
        Ok(())
    }
}

fn create(tenant_id: Uuid, node_type: &str, name: &str, parent_id: Option<Uuid>) -> CreateNode {
    CreateNode {
        tenant_id,
        name: name.into(),
        slug: name.to_lowercase().replace(' ', "-"),
        code: None,
        node_type: node_type.into(),
        parent_id,
        location: None,
        status: None,
        metadata: None,
    }
}

#[tokio::test]
async fn full_sync_isolates_target_outcomes() -> anyhow::Result<()> {
    let service = HierarchyService::new(MemoryNodeRepository::new());
    let tenant = Uuid::new_v4();

    let city = service
        .create_node(create(tenant, "CITY", "Riyadh", None))
        .await?;
    let district = service
        .create_node(create(tenant, "DISTRICT", "District A", Some(city.id)))
        .await?;
    service
        .create_node(create(tenant, "ZONE", "Zone 1", Some(district.id)))
        .await?;

    let erp_store = {
        let erp = ScriptedAdapter::new(SyncTarget::Erp);
        let store = erp.store.clone();

        let orchestrator = SyncOrchestrator::new(
            service,
            vec![
                Arc::new(ScriptedAdapter::unconfigured(SyncTarget::Content)),
                Arc::new(erp),
                Arc::new(ScriptedAdapter::failing_for(SyncTarget::Fleet, district.id)),
                Arc::new(ScriptedAdapter::new(SyncTarget::Identity)),
            ],
        );

        let result = orchestrator.sync_full_hierarchy(tenant).await;

        let content = result.stats(SyncTarget::Content).unwrap();
        assert_eq!((content.synced, content.failed), (0, 0));

        let erp = result.stats(SyncTarget::Erp).unwrap();
        assert_eq!((erp.synced, erp.failed), (3, 0));

        let fleet = result.stats(SyncTarget::Fleet).unwrap();
        assert_eq!((fleet.synced, fleet.failed), (2, 1));
        assert!(fleet.errors[0].contains("upstream unavailable"));

        // Serialized report keys off target names
        let json = serde_json::to_value(&result)?;
        assert!(json["targets"]["erp"]["synced"].is_number());
        assert_eq!(json["targets"]["fleet"]["failed"], 1);

        store
    };

    // Despite the fleet failure every node reached the ERP exactly once
    assert_eq!(erp_store.lock().unwrap().len(), 3);

    Ok(())
}

#[tokio::test]
async fn rerunning_a_sync_converges_instead_of_duplicating() -> anyhow::Result<()> {
    let service = HierarchyService::new(MemoryNodeRepository::new());
    let tenant = Uuid::new_v4();
    service
        .create_node(create(tenant, "CITY", "Riyadh", None))
        .await?;

    let erp = ScriptedAdapter::new(SyncTarget::Erp);
    let store = erp.store.clone();
    let orchestrator = SyncOrchestrator::new(service, vec![Arc::new(erp)]);

    let first = orchestrator.sync_full_hierarchy(tenant).await;
    let second = orchestrator.sync_full_hierarchy(tenant).await;

    assert!(first.is_clean() && second.is_clean());
    assert_eq!(store.lock().unwrap().len(), 1);

    Ok(())
}
