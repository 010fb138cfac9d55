use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::hierarchy::types::NodeType;

/// Errors raised by node creation. Each validation step has its own
/// variant; tree reads never raise for unresolved ids (they return
/// empty results instead), so only creation and infrastructure
/// failures appear here.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Node type {node_type} requires a parent of type {required}")]
    MissingParent {
        node_type: NodeType,
        required: NodeType,
    },

    #[error("Node type {0} is a root type and cannot have a parent")]
    UnexpectedParent(NodeType),

    #[error("Parent node not found: {0}")]
    ParentNotFound(Uuid),

    #[error("Invalid hierarchy: {child} cannot be placed under {parent}, expected parent type {expected}")]
    InvalidHierarchy {
        parent: NodeType,
        child: NodeType,
        expected: NodeType,
    },

    #[error("Parent node {parent_id} belongs to a different tenant")]
    CrossTenantParent { parent_id: Uuid },

    #[error(transparent)]
    Repository(#[from] DatabaseError),
}
