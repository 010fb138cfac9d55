pub mod error;
pub mod node;
pub mod service;
pub mod types;

pub use error::HierarchyError;
pub use node::{Breadcrumb, CreateNode, Node, NodeUpdate};
pub use service::HierarchyService;
pub use types::{rule_for, HierarchyRule, NodeType};
