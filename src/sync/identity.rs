use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

use crate::config::TargetSettings;
use crate::hierarchy::node::Node;
use crate::sync::adapter::{SkipReason, SyncAdapter, SyncError, UpsertOutcome};
use crate::sync::target::SyncTarget;

/// Decentralized-identity adapter. Upsert is a two-step protocol:
/// issue a DID for the node, then issue a verifiable credential
/// binding that DID to the node's hierarchy position.
///
/// Credential issuance is deliberately fire-on-every-sync: the target
/// offers no credential lookup or revocation, so repeated syncs stack
/// credentials rather than converging on one. Deletion is likewise a
/// no-op for the same reason.
pub struct IdentityAdapter {
    settings: TargetSettings,
    client: Client,
}

impl IdentityAdapter {
    pub fn new(settings: TargetSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.settings.endpoint, &self.settings.api_key) {
            (Some(endpoint), Some(key)) => Some((endpoint.as_str(), key.as_str())),
            _ => None,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, SyncError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(SyncError::Remote {
                target: SyncTarget::Identity,
                status: status.as_u16(),
                detail: text.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }
}

/// The credential payload: the node's position in the tree, taken from
/// the breadcrumb snapshot (everything above the node itself).
fn credential_subject(node: &Node, did: &str) -> Value {
    let ancestors: Vec<Value> = node
        .breadcrumbs
        .iter()
        .filter(|crumb| crumb.id != node.id)
        .map(|crumb| {
            json!({
                "id": crumb.id,
                "name": crumb.name,
                "slug": crumb.slug,
                "type": crumb.node_type,
                "depth": crumb.depth,
            })
        })
        .collect();

    json!({
        "id": did,
        "node_id": node.id,
        "tenant_id": node.tenant_id,
        "type": node.node_type,
        "depth": node.depth,
        "ancestors": ancestors,
        "location": node.location,
    })
}

#[async_trait]
impl SyncAdapter for IdentityAdapter {
    fn target(&self) -> SyncTarget {
        SyncTarget::Identity
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }

    async fn upsert(&self, node: &Node) -> Result<UpsertOutcome, SyncError> {
        let Some((base, key)) = self.credentials() else {
            return Ok(UpsertOutcome::Skipped(SkipReason::NotConfigured));
        };
        let base = base.trim_end_matches('/');

        // Step 1: issue a DID for the node
        let request = self
            .client
            .post(format!("{}/did/create", base))
            .bearer_auth(key)
            .json(&json!({ "method": "key", "node_id": node.id }));
        let response = self.execute(request).await?;

        let did = response
            .get("did")
            .and_then(Value::as_str)
            .ok_or_else(|| SyncError::BadResponse {
                target: SyncTarget::Identity,
                detail: "missing did in issuance response".into(),
            })?
            .to_string();

        // Step 2: issue the credential binding the DID to the node's
        // hierarchy position
        let credential = json!({
            "type": ["VerifiableCredential", "HierarchyPositionCredential"],
            "credentialSubject": credential_subject(node, &did),
        });
        let request = self
            .client
            .post(format!("{}/credentials/issue", base))
            .bearer_auth(key)
            .json(&credential);
        self.execute(request).await?;

        tracing::debug!(node_id = %node.id, %did, "Issued identity credential for node");
        Ok(UpsertOutcome::Synced {
            external_id: Some(did),
        })
    }

    async fn delete(&self, node_id: Uuid) -> Result<(), SyncError> {
        // No revocation operation exists on the target; issued
        // credentials stay issued.
        tracing::debug!(%node_id, "Identity target has no deletion; skipping");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::node::Breadcrumb;
    use crate::hierarchy::types::NodeType;
    use crate::testing::{node_of_type, unconfigured};

    #[tokio::test]
    async fn unconfigured_identity_skips_without_network() {
        let adapter = IdentityAdapter::new(unconfigured());
        let node = node_of_type(NodeType::Zone);

        let outcome = adapter.upsert(&node).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Skipped(SkipReason::NotConfigured));
    }

    #[test]
    fn credential_subject_lists_ancestors_without_self() {
        let mut node = node_of_type(NodeType::District);
        let city_id = Uuid::new_v4();
        node.breadcrumbs = vec![
            Breadcrumb {
                id: city_id,
                name: "Riyadh".into(),
                slug: "riyadh".into(),
                node_type: NodeType::City,
                depth: 0,
            },
            Breadcrumb::of(&node),
        ];

        let subject = credential_subject(&node, "did:key:z6Mk");
        let ancestors = subject["ancestors"].as_array().unwrap();
        assert_eq!(ancestors.len(), 1);
        assert_eq!(ancestors[0]["id"], json!(city_id));
        assert_eq!(subject["type"], json!("DISTRICT"));
        assert_eq!(subject["id"], json!("did:key:z6Mk"));
    }
}
