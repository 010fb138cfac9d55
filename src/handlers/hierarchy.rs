use axum::{extract::Path, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::hierarchy::node::{CreateNode, NodeUpdate};

use super::{hierarchy_service, orchestrator};

/// POST /api/hierarchy/nodes - validated node creation
pub async fn node_create(Json(input): Json<CreateNode>) -> Result<impl IntoResponse, ApiError> {
    let service = hierarchy_service().await?;
    let node = service.create_node(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": node })),
    ))
}

/// GET /api/hierarchy/nodes/:id - show single node
pub async fn node_get(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let service = hierarchy_service().await?;
    let node = service
        .get_node(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Node not found: {}", id)))?;

    Ok(Json(json!({ "success": true, "data": node })))
}

/// GET /api/hierarchy/nodes/:id/children - immediate children
pub async fn node_children(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let service = hierarchy_service().await?;
    let children = service.get_children(id).await?;

    Ok(Json(json!({ "success": true, "data": children })))
}

/// GET /api/hierarchy/nodes/:id/ancestors - root to immediate parent
pub async fn node_ancestors(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let service = hierarchy_service().await?;
    let ancestors = service.get_ancestors(id).await?;

    Ok(Json(json!({ "success": true, "data": ancestors })))
}

/// GET /api/hierarchy/nodes/:id/descendants - full subtree, breadth-first
pub async fn node_descendants(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let service = hierarchy_service().await?;
    let descendants = service.get_descendants(id).await?;

    Ok(Json(json!({ "success": true, "data": descendants })))
}

/// GET /api/hierarchy/nodes/:id/breadcrumbs - root to self summaries
pub async fn node_breadcrumbs(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let service = hierarchy_service().await?;
    let breadcrumbs = service.get_breadcrumbs(id).await?;

    Ok(Json(json!({ "success": true, "data": breadcrumbs })))
}

/// PUT /api/hierarchy/nodes/:id - update mutable fields, then re-sync
/// the node best-effort
pub async fn node_update(
    Path(id): Path<Uuid>,
    Json(update): Json<NodeUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let service = hierarchy_service().await?;
    let node = service
        .update_node(id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Node not found: {}", id)))?;

    let synced_targets = orchestrator().await?.sync_single_node(id).await;

    Ok(Json(json!({
        "success": true,
        "data": node,
        "synced_targets": synced_targets
    })))
}

/// DELETE /api/hierarchy/nodes/:id - cascade delete the subtree, then
/// fire best-effort removals against the external systems
pub async fn node_delete(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let service = hierarchy_service().await?;
    let removed = service.delete_node_cascade(id).await?;
    if removed.is_empty() {
        return Err(ApiError::not_found(format!("Node not found: {}", id)));
    }

    // Directory deletion already happened; external cleanup is
    // independent and must not fail the request
    let sync = orchestrator().await?;
    for node in &removed {
        sync.delete_node_from_systems(node.id).await;
    }

    Ok(Json(json!({
        "success": true,
        "data": { "removed": removed.len() }
    })))
}
