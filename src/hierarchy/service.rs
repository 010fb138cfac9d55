use std::collections::VecDeque;

use chrono::Utc;
use uuid::Uuid;

use crate::database::repository::NodeRepository;
use crate::hierarchy::error::HierarchyError;
use crate::hierarchy::node::{Breadcrumb, CreateNode, Node, NodeUpdate};
use crate::hierarchy::types::{rule_for, NodeType};

/// Owns the tree invariants: parent/child type validation, node
/// creation with breadcrumb computation, ancestor walk, descendant
/// BFS, cascade deletion.
///
/// All reads degrade to empty results when an id does not resolve;
/// only creation raises validation errors.
pub struct HierarchyService<R> {
    repo: R,
}

impl<R: Clone> Clone for HierarchyService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: NodeRepository> HierarchyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// True iff the rule for `parent` declares `child` as its allowed
    /// child type.
    pub fn validate_parent_child(&self, parent: NodeType, child: NodeType) -> bool {
        rule_for(parent).allowed_child == Some(child)
    }

    /// Validated node creation. Depth is derived from the rule table
    /// and breadcrumbs are materialized root-to-self, regardless of
    /// what the caller supplied.
    pub async fn create_node(&self, input: CreateNode) -> Result<Node, HierarchyError> {
        let node_type = NodeType::parse(&input.node_type)
            .ok_or_else(|| HierarchyError::UnknownNodeType(input.node_type.clone()))?;
        let rule = rule_for(node_type);

        let parent = match (rule.allowed_parent, input.parent_id) {
            (Some(required), None) => {
                return Err(HierarchyError::MissingParent {
                    node_type,
                    required,
                })
            }
            (None, Some(_)) => return Err(HierarchyError::UnexpectedParent(node_type)),
            (None, None) => None,
            (Some(required), Some(parent_id)) => {
                let parent = self
                    .repo
                    .find_by_id(parent_id)
                    .await?
                    .ok_or(HierarchyError::ParentNotFound(parent_id))?;

                if !self.validate_parent_child(parent.node_type, node_type) {
                    return Err(HierarchyError::InvalidHierarchy {
                        parent: parent.node_type,
                        child: node_type,
                        expected: required,
                    });
                }

                if parent.tenant_id != input.tenant_id {
                    return Err(HierarchyError::CrossTenantParent { parent_id });
                }

                Some(parent)
            }
        };

        let now = Utc::now();
        let mut node = Node {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            name: input.name,
            slug: input.slug,
            code: input.code,
            node_type,
            depth: rule.depth,
            parent_id: input.parent_id,
            breadcrumbs: Vec::new(),
            location: input.location,
            status: input.status,
            metadata: input.metadata,
            created_at: now,
            updated_at: now,
        };

        // Breadcrumbs are the parent's trail plus ourselves, snapshotted
        // once here and never recomputed on ancestor renames.
        let mut breadcrumbs = match &parent {
            Some(p) => self.get_breadcrumbs(p.id).await?,
            None => Vec::new(),
        };
        breadcrumbs.push(Breadcrumb::of(&node));
        node.breadcrumbs = breadcrumbs;

        let persisted = self.repo.insert(node).await?;
        tracing::info!(
            node_id = %persisted.id,
            node_type = %persisted.node_type,
            depth = persisted.depth,
            "Created hierarchy node"
        );
        Ok(persisted)
    }

    pub async fn get_node(&self, id: Uuid) -> Result<Option<Node>, HierarchyError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    /// All nodes belonging to a tenant, depth-ascending. This is the
    /// orchestrator's node source.
    pub async fn list_nodes_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Node>, HierarchyError> {
        Ok(self.repo.list_by_tenant(tenant_id).await?)
    }

    pub async fn get_children(&self, id: Uuid) -> Result<Vec<Node>, HierarchyError> {
        Ok(self.repo.list_children(id).await?)
    }

    /// Walk up the parent chain. Ordered root -> immediate parent; the
    /// argument node itself is never included. Unresolved ids yield an
    /// empty list.
    pub async fn get_ancestors(&self, id: Uuid) -> Result<Vec<Node>, HierarchyError> {
        let Some(node) = self.repo.find_by_id(id).await? else {
            return Ok(Vec::new());
        };

        let mut ancestors = Vec::new();
        let mut cursor = node.parent_id;
        while let Some(parent_id) = cursor {
            let Some(parent) = self.repo.find_by_id(parent_id).await? else {
                break;
            };
            cursor = parent.parent_id;
            ancestors.push(parent);
        }

        ancestors.reverse();
        Ok(ancestors)
    }

    /// Every transitive child, collected breadth-first. No cycle guard:
    /// single-parent creation with strictly increasing depth makes
    /// cycles structurally impossible.
    pub async fn get_descendants(&self, id: Uuid) -> Result<Vec<Node>, HierarchyError> {
        let mut result = Vec::new();
        let mut queue = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            for child in self.repo.list_children(current).await? {
                queue.push_back(child.id);
                result.push(child);
            }
        }

        Ok(result)
    }

    /// Ancestors plus self as summaries, root -> self. Unresolved ids
    /// yield an empty list.
    pub async fn get_breadcrumbs(&self, id: Uuid) -> Result<Vec<Breadcrumb>, HierarchyError> {
        let Some(node) = self.repo.find_by_id(id).await? else {
            return Ok(Vec::new());
        };

        let mut crumbs: Vec<Breadcrumb> = self
            .get_ancestors(id)
            .await?
            .iter()
            .map(Breadcrumb::of)
            .collect();
        crumbs.push(Breadcrumb::of(&node));
        Ok(crumbs)
    }

    /// Apply mutable fields and persist. Returns None when the node
    /// does not exist.
    pub async fn update_node(
        &self,
        id: Uuid,
        update: NodeUpdate,
    ) -> Result<Option<Node>, HierarchyError> {
        let Some(mut node) = self.repo.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            node.name = name;
        }
        if let Some(slug) = update.slug {
            node.slug = slug;
        }
        if let Some(code) = update.code {
            node.code = Some(code);
        }
        if let Some(status) = update.status {
            node.status = Some(status);
        }
        if let Some(location) = update.location {
            node.location = Some(location);
        }
        if let Some(metadata) = update.metadata {
            node.metadata = Some(metadata);
        }
        node.updated_at = Utc::now();

        Ok(Some(self.repo.update(node).await?))
    }

    /// Remove a node and its whole subtree, leaves first. Returns the
    /// removed nodes so the caller can fire external-system deletions;
    /// an unresolved id removes nothing and returns an empty list.
    pub async fn delete_node_cascade(&self, id: Uuid) -> Result<Vec<Node>, HierarchyError> {
        let Some(node) = self.repo.find_by_id(id).await? else {
            return Ok(Vec::new());
        };

        let mut removed = self.get_descendants(id).await?;
        removed.push(node);
        removed.sort_by(|a, b| b.depth.cmp(&a.depth));

        for n in &removed {
            self.repo.remove(n.id).await?;
        }

        tracing::info!(node_id = %id, count = removed.len(), "Cascade-deleted hierarchy subtree");
        Ok(removed)
    }
}
