use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::hierarchy::types::NodeType;

/// Ancestor summary materialized on a node at creation time.
///
/// Breadcrumbs are a snapshot: renaming an ancestor later does not
/// rewrite the breadcrumbs of nodes created beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub depth: i16,
}

impl Breadcrumb {
    pub fn of(node: &Node) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
            slug: node.slug.clone(),
            node_type: node.node_type,
            depth: node.depth,
        }
    }
}

/// A directory entry in the five-level tree.
///
/// `location`, `status` and `metadata` are opaque payloads carried for
/// the storefront and the sync targets; the directory core does not
/// interpret them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub slug: String,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub depth: i16,
    pub parent_id: Option<Uuid>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub location: Option<Value>,
    pub status: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for node creation. The type arrives as text
/// and is validated at the service boundary; `depth` and `breadcrumbs`
/// are always derived, never accepted from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNode {
    pub tenant_id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Mutable fields for a node update. Type, tenant and placement are
/// immutable after creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub code: Option<String>,
    pub status: Option<String>,
    pub location: Option<Value>,
    pub metadata: Option<Value>,
}
