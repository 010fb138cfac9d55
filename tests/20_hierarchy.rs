// End-to-end directory exercises over the public API with the
// in-memory repository: build a full five-level tree, read it back,
// rename, cascade delete.

use uuid::Uuid;

use atlas_api_rust::database::MemoryNodeRepository;
use atlas_api_rust::hierarchy::{CreateNode, HierarchyService, NodeType, NodeUpdate};

fn create(
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

#[tokio::test]
async fn full_tree_lifecycle() -> anyhow::Result<()> {
    let repo = MemoryNodeRepository::new();
    let service = HierarchyService::new(repo.clone());
    let tenant = Uuid::new_v4();

    // Build the complete chain, city down to asset
    let city = service
        .create_node(create(tenant, "CITY", "Riyadh", "riyadh", None))
        .await?;
    let district = service
        .create_node(create(tenant, "DISTRICT", "Al Olaya", "al-olaya", Some(city.id)))
        .await?;
    let zone = service
        .create_node(create(tenant, "ZONE", "North", "north", Some(district.id)))
        .await?;
    let facility = service
        .create_node(create(tenant, "FACILITY", "Hub 1", "hub-1", Some(zone.id)))
        .await?;
    let asset = service
        .create_node(create(tenant, "ASSET", "Unit 7", "unit-7", Some(facility.id)))
        .await?;

    // Depths were derived, never caller-supplied
    assert_eq!(
        vec![city.depth, district.depth, zone.depth, facility.depth, asset.depth],
        vec![0, 1, 2, 3, 4]
    );

    // The leaf's breadcrumb trail covers the whole chain, root first
    let crumbs = service.get_breadcrumbs(asset.id).await?;
    assert_eq!(crumbs.len(), 5);
    assert_eq!(crumbs[0].node_type, NodeType::City);
    assert_eq!(crumbs[4].id, asset.id);

    // Ancestors exclude the node itself; descendants cover the subtree
    let ancestors = service.get_ancestors(asset.id).await?;
    assert_eq!(ancestors.len(), 4);
    assert!(ancestors.iter().all(|n| n.id != asset.id));
    assert_eq!(service.get_descendants(city.id).await?.len(), 4);
    assert_eq!(service.get_descendants(district.id).await?.len(), 3);

    // Tenant listing is depth-ascending, the orchestrator's contract
    let listed = service.list_nodes_by_tenant(tenant).await?;
    let depths: Vec<i16> = listed.iter().map(|n| n.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 3, 4]);

    // Rename does not rewrite children's breadcrumb snapshots
    service
        .update_node(
            city.id,
            NodeUpdate {
                name: Some("Ar-Riyadh".into()),
                ..Default::default()
            },
        )
        .await?;
    let stored = service.get_node(asset.id).await?.expect("asset exists");
    assert_eq!(stored.breadcrumbs[0].name, "Riyadh");

    // Cascade delete takes the whole subtree, leaves first
    let removed = service.delete_node_cascade(city.id).await?;
    assert_eq!(removed.len(), 5);
    assert_eq!(removed[0].id, asset.id);
    assert!(repo.is_empty().await);

    Ok(())
}

#[tokio::test]
async fn placement_rules_are_enforced_end_to_end() -> anyhow::Result<()> {
    let service = HierarchyService::new(MemoryNodeRepository::new());
    let tenant = Uuid::new_v4();

    let city = service
        .create_node(create(tenant, "CITY", "Riyadh", "riyadh", None))
        .await?;

    // Skipping a level is rejected and names the expected parent type
    let err = service
        .create_node(create(tenant, "FACILITY", "Hub 1", "hub-1", Some(city.id)))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ZONE"));

    // A second tenant cannot attach under the first tenant's city
    let other_tenant = Uuid::new_v4();
    let err = service
        .create_node(create(other_tenant, "DISTRICT", "Al Olaya", "al-olaya", Some(city.id)))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("different tenant"));

    Ok(())
}
