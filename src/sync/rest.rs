use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

use async_trait::async_trait;

use crate::config::TargetSettings;
use crate::hierarchy::node::Node;
use crate::hierarchy::types::NodeType;
use crate::sync::adapter::{SkipReason, SyncAdapter, SyncError, UpsertOutcome};
use crate::sync::target::SyncTarget;

/// How a target expects its credential presented.
#[derive(Debug, Clone, Copy)]
pub enum AuthScheme {
    Bearer,
    Header(&'static str),
}

/// Fixed, per-target shape data: which resource collection each node
/// type lands in, which field carries the originating node id, and how
/// auth is presented. Base URL and credential live in [`TargetSettings`]
/// and come from the environment.
pub struct TargetProfile {
    pub target: SyncTarget,
    pub correlation_field: &'static str,
    pub auth: AuthScheme,
    kinds: &'static [(NodeType, &'static str)],
}

impl TargetProfile {
    pub fn kind_for(&self, node_type: NodeType) -> Option<&'static str> {
        self.kinds
            .iter()
            .find(|(t, _)| *t == node_type)
            .map(|(_, kind)| *kind)
    }

    /// Distinct resource collections in declaration order. Used by the
    /// delete sweep, which does not know which kind a removed node
    /// originally mapped to.
    pub fn distinct_kinds(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        for (_, kind) in self.kinds {
            if !out.contains(kind) {
                out.push(kind);
            }
        }
        out
    }
}

/// Content system: cities through facilities are published as content
/// collections; individual assets are not published at all.
pub static CONTENT_PROFILE: TargetProfile = TargetProfile {
    target: SyncTarget::Content,
    correlation_field: "node_id",
    auth: AuthScheme::Bearer,
    kinds: &[
        (NodeType::City, "cities"),
        (NodeType::District, "districts"),
        (NodeType::Zone, "zones"),
        (NodeType::Facility, "facilities"),
    ],
};

/// ERP system: CITY=Company, DISTRICT=Department, ZONE=CostCenter,
/// FACILITY=Warehouse, ASSET=Asset.
pub static ERP_PROFILE: TargetProfile = TargetProfile {
    target: SyncTarget::Erp,
    correlation_field: "external_ref",
    auth: AuthScheme::Header("X-Api-Key"),
    kinds: &[
        (NodeType::City, "companies"),
        (NodeType::District, "departments"),
        (NodeType::Zone, "cost-centers"),
        (NodeType::Facility, "warehouses"),
        (NodeType::Asset, "assets"),
    ],
};

/// Fleet system: cities and districts are both places, zones are zones,
/// facilities are fleets, assets are vehicles.
pub static FLEET_PROFILE: TargetProfile = TargetProfile {
    target: SyncTarget::Fleet,
    correlation_field: "external_id",
    auth: AuthScheme::Bearer,
    kinds: &[
        (NodeType::City, "places"),
        (NodeType::District, "places"),
        (NodeType::Zone, "zones"),
        (NodeType::Facility, "fleets"),
        (NodeType::Asset, "vehicles"),
    ],
};

/// Generic REST adapter covering every search-then-upsert target. One
/// implementation, parameterized per target; failure isolation stays
/// per-target because each instance owns its own settings and client.
pub struct RestAdapter {
    profile: &'static TargetProfile,
    settings: TargetSettings,
    client: Client,
}

impl RestAdapter {
    pub fn new(profile: &'static TargetProfile, settings: TargetSettings) -> Self {
        Self {
            profile,
            settings,
            client: Client::new(),
        }
    }

    pub fn content(settings: TargetSettings) -> Self {
        Self::new(&CONTENT_PROFILE, settings)
    }

    pub fn erp(settings: TargetSettings) -> Self {
        Self::new(&ERP_PROFILE, settings)
    }

    pub fn fleet(settings: TargetSettings) -> Self {
        Self::new(&FLEET_PROFILE, settings)
    }

    pub fn profile(&self) -> &'static TargetProfile {
        self.profile
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.settings.endpoint, &self.settings.api_key) {
            (Some(endpoint), Some(key)) => Some((endpoint.as_str(), key.as_str())),
            _ => None,
        }
    }

    fn apply_auth(&self, request: RequestBuilder, key: &str) -> RequestBuilder {
        match self.profile.auth {
            AuthScheme::Bearer => request.bearer_auth(key),
            AuthScheme::Header(name) => request.header(name, key),
        }
    }

    fn collection_url(base: &str, kind: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), kind)
    }

    /// Send a request, map non-success statuses to [`SyncError::Remote`]
    /// and parse the body leniently (empty or non-JSON success bodies
    /// become `Null`).
    async fn execute(&self, request: RequestBuilder) -> Result<Value, SyncError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(SyncError::Remote {
                target: self.profile.target,
                status: status.as_u16(),
                detail: truncate(&text, 200),
            });
        }

        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    /// The idempotency mechanism: search the collection for a resource
    /// carrying our node id in the correlation field.
    async fn find_existing(
        &self,
        base: &str,
        key: &str,
        kind: &str,
        node_id: Uuid,
    ) -> Result<Option<String>, SyncError> {
        let url = Self::collection_url(base, kind);
        let request = self
            .apply_auth(self.client.get(&url), key)
            .query(&[(self.profile.correlation_field, node_id.to_string())]);

        let body = self.execute(request).await?;
        Ok(first_resource_id(&body))
    }

    /// The target's resource shape for one node. The parent is carried
    /// via the same correlation convention, which is why parents must
    /// be synced before children.
    fn resource_body(&self, node: &Node, kind: &str) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(self.profile.correlation_field.into(), json!(node.id));
        body.insert("kind".into(), json!(kind));
        body.insert("tenant_id".into(), json!(node.tenant_id));
        body.insert("name".into(), json!(node.name));
        body.insert("slug".into(), json!(node.slug));
        body.insert("type".into(), json!(node.node_type));
        if let Some(code) = &node.code {
            body.insert("code".into(), json!(code));
        }
        if let Some(parent_id) = node.parent_id {
            body.insert(
                format!("parent_{}", self.profile.correlation_field),
                json!(parent_id),
            );
        }
        if let Some(location) = &node.location {
            body.insert("location".into(), location.clone());
        }
        if let Some(status) = &node.status {
            body.insert("status".into(), json!(status));
        }
        if let Some(metadata) = &node.metadata {
            body.insert("metadata".into(), metadata.clone());
        }
        Value::Object(body)
    }
}

#[async_trait]
impl SyncAdapter for RestAdapter {
    fn target(&self) -> SyncTarget {
        self.profile.target
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }

    async fn upsert(&self, node: &Node) -> Result<UpsertOutcome, SyncError> {
        let Some((base, key)) = self.credentials() else {
            return Ok(UpsertOutcome::Skipped(SkipReason::NotConfigured));
        };
        let Some(kind) = self.profile.kind_for(node.node_type) else {
            return Ok(UpsertOutcome::Skipped(SkipReason::NotApplicable));
        };

        let existing = self.find_existing(base, key, kind, node.id).await?;
        let body = self.resource_body(node, kind);

        let external_id = match existing {
            Some(id) => {
                let url = format!("{}/{}", Self::collection_url(base, kind), id);
                let request = self.apply_auth(self.client.put(&url), key).json(&body);
                self.execute(request).await?;
                Some(id)
            }
            None => {
                let url = Self::collection_url(base, kind);
                let request = self.apply_auth(self.client.post(&url), key).json(&body);
                let created = self.execute(request).await?;
                created_resource_id(&created)
            }
        };

        tracing::debug!(
            sync_target = %self.profile.target,
            node_id = %node.id,
            kind,
            "Upserted node to external system"
        );
        Ok(UpsertOutcome::Synced { external_id })
    }

    async fn delete(&self, node_id: Uuid) -> Result<(), SyncError> {
        let Some((base, key)) = self.credentials() else {
            return Ok(());
        };

        // The node is gone from the directory by now, so its original
        // kind is unknown; sweep the collections until one removal
        // succeeds. Nothing found anywhere is a silent no-op.
        let mut last_err = None;
        for kind in self.profile.distinct_kinds() {
            match self.find_existing(base, key, kind, node_id).await {
                Ok(Some(external_id)) => {
                    let url = format!("{}/{}", Self::collection_url(base, kind), external_id);
                    let request = self.apply_auth(self.client.delete(&url), key);
                    match self.execute(request).await {
                        Ok(_) => return Ok(()),
                        Err(e) => last_err = Some(e),
                    }
                }
                Ok(None) => {}
                Err(e) => last_err = Some(e),
            }
        }

        match last_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// First id out of a search response; accepts `{"data": [...]}` or a
/// bare array, with string or numeric ids.
fn first_resource_id(body: &Value) -> Option<String> {
    let items = body
        .get("data")
        .and_then(Value::as_array)
        .or_else(|| body.as_array())?;
    resource_id(items.first()?)
}

/// Id out of a create response; accepts `{"id": ...}` or `{"data": {"id": ...}}`.
fn created_resource_id(body: &Value) -> Option<String> {
    resource_id(body).or_else(|| body.get("data").and_then(resource_id))
}

fn resource_id(resource: &Value) -> Option<String> {
    match resource.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{node_of_type, unconfigured};

    #[test]
    fn erp_maps_every_level() {
        assert_eq!(ERP_PROFILE.kind_for(NodeType::City), Some("companies"));
        assert_eq!(ERP_PROFILE.kind_for(NodeType::District), Some("departments"));
        assert_eq!(ERP_PROFILE.kind_for(NodeType::Zone), Some("cost-centers"));
        assert_eq!(ERP_PROFILE.kind_for(NodeType::Facility), Some("warehouses"));
        assert_eq!(ERP_PROFILE.kind_for(NodeType::Asset), Some("assets"));
    }

    #[test]
    fn content_does_not_publish_assets() {
        assert_eq!(CONTENT_PROFILE.kind_for(NodeType::Asset), None);
        assert_eq!(CONTENT_PROFILE.kind_for(NodeType::City), Some("cities"));
    }

    #[test]
    fn fleet_delete_sweep_deduplicates_shared_collections() {
        assert_eq!(
            FLEET_PROFILE.distinct_kinds(),
            vec!["places", "zones", "fleets", "vehicles"]
        );
    }

    #[tokio::test]
    async fn unconfigured_adapter_skips_without_network() {
        let adapter = RestAdapter::erp(unconfigured());
        let node = node_of_type(NodeType::City);

        let outcome = adapter.upsert(&node).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Skipped(SkipReason::NotConfigured));

        // Delete is equally a no-op
        adapter.delete(node.id).await.unwrap();
    }

    #[tokio::test]
    async fn unmapped_type_skips_as_not_applicable() {
        let mut settings = unconfigured();
        settings.endpoint = Some("https://content.example.com".into());
        settings.api_key = Some("secret".into());

        let adapter = RestAdapter::content(settings);
        let node = node_of_type(NodeType::Asset);

        let outcome = adapter.upsert(&node).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Skipped(SkipReason::NotApplicable));
    }

    #[test]
    fn resource_body_carries_correlation_and_parent_linkage() {
        let adapter = RestAdapter::erp(unconfigured());
        let mut node = node_of_type(NodeType::District);
        let parent_id = Uuid::new_v4();
        node.parent_id = Some(parent_id);

        let body = adapter.resource_body(&node, "departments");
        assert_eq!(body["external_ref"], json!(node.id));
        assert_eq!(body["parent_external_ref"], json!(parent_id));
        assert_eq!(body["kind"], json!("departments"));
        assert_eq!(body["type"], json!("DISTRICT"));
    }

    #[test]
    fn search_responses_parse_in_both_shapes() {
        let wrapped = json!({"data": [{"id": "abc"}, {"id": "def"}]});
        assert_eq!(first_resource_id(&wrapped), Some("abc".into()));

        let bare = json!([{"id": 42}]);
        assert_eq!(first_resource_id(&bare), Some("42".into()));

        let empty = json!({"data": []});
        assert_eq!(first_resource_id(&empty), None);
        assert_eq!(first_resource_id(&Value::Null), None);
    }
}
