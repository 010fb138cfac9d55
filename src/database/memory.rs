use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::repository::NodeRepository;
use crate::hierarchy::node::Node;

/// In-memory node repository. Used by the test suite and for local
/// development without a database; ordering mirrors the Postgres
/// implementation (creation order within a parent, depth-then-creation
/// within a tenant).
#[derive(Clone, Default)]
pub struct MemoryNodeRepository {
    nodes: Arc<RwLock<HashMap<Uuid, Node>>>,
}

impl MemoryNodeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

fn by_creation(a: &Node, b: &Node) -> std::cmp::Ordering {
    a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
}

#[async_trait]
impl NodeRepository for MemoryNodeRepository {
    async fn insert(&self, node: Node) -> Result<Node, DatabaseError> {
        let mut nodes = self.nodes.write().await;
        nodes.insert(node.id, node.clone());
        Ok(node)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Node>, DatabaseError> {
        let nodes = self.nodes.read().await;
        Ok(nodes.get(&id).cloned())
    }

    async fn list_children(&self, parent_id: Uuid) -> Result<Vec<Node>, DatabaseError> {
        let nodes = self.nodes.read().await;
        let mut children: Vec<Node> = nodes
            .values()
            .filter(|n| n.parent_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(by_creation);
        Ok(children)
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Node>, DatabaseError> {
        let nodes = self.nodes.read().await;
        let mut result: Vec<Node> = nodes
            .values()
            .filter(|n| n.tenant_id == tenant_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.depth.cmp(&b.depth).then(by_creation(a, b)));
        Ok(result)
    }

    async fn update(&self, node: Node) -> Result<Node, DatabaseError> {
        let mut nodes = self.nodes.write().await;
        if !nodes.contains_key(&node.id) {
            return Err(DatabaseError::NotFound(format!("node {}", node.id)));
        }
        nodes.insert(node.id, node.clone());
        Ok(node)
    }

    async fn remove(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut nodes = self.nodes.write().await;
        nodes.remove(&id);
        Ok(())
    }
}
