use serde::{Deserialize, Serialize};

/// The external systems a node propagates to. Variant order is the
/// order adapters run in and the order best-effort deletions are
/// attempted in (Identity is never deleted from, see the orchestrator).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SyncTarget {
    Content,
    Erp,
    Fleet,
    Identity,
}

impl SyncTarget {
    pub const ALL: [SyncTarget; 4] = [
        SyncTarget::Content,
        SyncTarget::Erp,
        SyncTarget::Fleet,
        SyncTarget::Identity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncTarget::Content => "content",
            SyncTarget::Erp => "erp",
            SyncTarget::Fleet => "fleet",
            SyncTarget::Identity => "identity",
        }
    }
}

impl std::fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
