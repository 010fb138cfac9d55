use axum::{extract::Path, response::IntoResponse, Json};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;

use super::orchestrator;

/// POST /api/sync/hierarchy/:tenant_id - propagate the tenant's whole
/// tree to every configured target; always returns per-target stats
pub async fn sync_hierarchy(Path(tenant_id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let result = orchestrator().await?.sync_full_hierarchy(tenant_id).await;

    Ok(Json(json!({ "success": true, "data": result })))
}

/// POST /api/sync/nodes/:id - propagate one node; returns the targets
/// that accepted it
pub async fn sync_node(Path(id): Path<Uuid>) -> Result<impl IntoResponse, ApiError> {
    let synced_targets = orchestrator().await?.sync_single_node(id).await;

    Ok(Json(json!({
        "success": true,
        "data": { "synced_targets": synced_targets }
    })))
}
