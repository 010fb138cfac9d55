use serde::{Deserialize, Serialize};

/// The five directory levels, root to leaf. Depth and allowed
/// parent/child relationships are fixed per type (see [`rule_for`]),
/// never supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    City,
    District,
    Zone,
    Facility,
    Asset,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::City,
        NodeType::District,
        NodeType::Zone,
        NodeType::Facility,
        NodeType::Asset,
    ];

    /// Parse the wire representation ("CITY", "DISTRICT", ...).
    /// Unknown strings fail closed: no rule, no depth, no creation.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::City => "CITY",
            NodeType::District => "DISTRICT",
            NodeType::Zone => "ZONE",
            NodeType::Facility => "FACILITY",
            NodeType::Asset => "ASSET",
        }
    }

    /// Level in the tree, derived from the rule table (CITY=0 .. ASSET=4).
    pub fn depth(&self) -> i16 {
        rule_for(*self).depth
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static placement rule for one node type. The table forms a total
/// order CITY -> DISTRICT -> ZONE -> FACILITY -> ASSET: exactly one
/// allowed parent and child per level, not a general DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyRule {
    pub depth: i16,
    pub allowed_parent: Option<NodeType>,
    pub allowed_child: Option<NodeType>,
}

const RULES: [HierarchyRule; 5] = [
    HierarchyRule {
        depth: 0,
        allowed_parent: None,
        allowed_child: Some(NodeType::District),
    },
    HierarchyRule {
        depth: 1,
        allowed_parent: Some(NodeType::City),
        allowed_child: Some(NodeType::Zone),
    },
    HierarchyRule {
        depth: 2,
        allowed_parent: Some(NodeType::District),
        allowed_child: Some(NodeType::Facility),
    },
    HierarchyRule {
        depth: 3,
        allowed_parent: Some(NodeType::Zone),
        allowed_child: Some(NodeType::Asset),
    },
    HierarchyRule {
        depth: 4,
        allowed_parent: Some(NodeType::Facility),
        allowed_child: None,
    },
];

/// Look up the placement rule for a node type.
pub fn rule_for(node_type: NodeType) -> &'static HierarchyRule {
    match node_type {
        NodeType::City => &RULES[0],
        NodeType::District => &RULES[1],
        NodeType::Zone => &RULES[2],
        NodeType::Facility => &RULES[3],
        NodeType::Asset => &RULES[4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_is_fixed_per_type() {
        assert_eq!(NodeType::City.depth(), 0);
        assert_eq!(NodeType::District.depth(), 1);
        assert_eq!(NodeType::Zone.depth(), 2);
        assert_eq!(NodeType::Facility.depth(), 3);
        assert_eq!(NodeType::Asset.depth(), 4);
    }

    #[test]
    fn rule_table_is_a_total_order() {
        for t in NodeType::ALL {
            let rule = rule_for(t);
            // Each allowed child points back at us as its allowed parent
            if let Some(child) = rule.allowed_child {
                assert_eq!(rule_for(child).allowed_parent, Some(t));
                assert_eq!(rule_for(child).depth, rule.depth + 1);
            }
            if let Some(parent) = rule.allowed_parent {
                assert_eq!(rule_for(parent).allowed_child, Some(t));
            }
        }
        // Exactly one root and one leaf
        assert_eq!(rule_for(NodeType::City).allowed_parent, None);
        assert_eq!(rule_for(NodeType::Asset).allowed_child, None);
    }

    #[test]
    fn parse_round_trips_and_fails_closed() {
        for t in NodeType::ALL {
            assert_eq!(NodeType::parse(t.as_str()), Some(t));
        }
        assert_eq!(NodeType::parse("city"), Some(NodeType::City));
        assert_eq!(NodeType::parse("UNKNOWN"), None);
        assert_eq!(NodeType::parse(""), None);
    }
}
