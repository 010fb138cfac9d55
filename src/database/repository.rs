use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::hierarchy::node::Node;

/// Persistence seam for directory nodes. The hierarchy service owns
/// the tree invariants; implementations own storage and nothing else.
#[async_trait]
pub trait NodeRepository: Send + Sync {
    async fn insert(&self, node: Node) -> Result<Node, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Node>, DatabaseError>;

    /// Immediate children only; transitive traversal belongs to the service.
    async fn list_children(&self, parent_id: Uuid) -> Result<Vec<Node>, DatabaseError>;

    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Node>, DatabaseError>;

    async fn update(&self, node: Node) -> Result<Node, DatabaseError>;

    async fn remove(&self, id: Uuid) -> Result<(), DatabaseError>;
}
