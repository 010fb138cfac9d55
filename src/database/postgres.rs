use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::repository::NodeRepository;
use crate::hierarchy::node::{Breadcrumb, Node};
use crate::hierarchy::types::NodeType;

/// PostgreSQL-backed node repository over the shared `nodes` table.
///
/// Queries are runtime-checked (`query_as` with string SQL) so the
/// crate builds without a live database.
#[derive(Clone)]
pub struct PgNodeRepository {
    pool: PgPool,
}

impl PgNodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a repository on the shared pool from DATABASE_URL
    pub async fn from_env() -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }
}

impl<'r> FromRow<'r, PgRow> for Node {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let type_text: String = row.try_get("node_type")?;
        let node_type =
            NodeType::parse(&type_text).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "node_type".into(),
                source: format!("unknown node type: {}", type_text).into(),
            })?;

        let Json(breadcrumbs): Json<Vec<Breadcrumb>> = row.try_get("breadcrumbs")?;

        Ok(Node {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            code: row.try_get("code")?,
            node_type,
            depth: row.try_get("depth")?,
            parent_id: row.try_get("parent_id")?,
            breadcrumbs,
            location: row.try_get("location")?,
            status: row.try_get("status")?,
            metadata: row.try_get("metadata")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

const NODE_COLUMNS: &str = "id, tenant_id, name, slug, code, node_type, depth, parent_id, \
     breadcrumbs, location, status, metadata, created_at, updated_at";

#[async_trait]
impl NodeRepository for PgNodeRepository {
    async fn insert(&self, node: Node) -> Result<Node, DatabaseError> {
        let sql = format!(
            "INSERT INTO nodes ({NODE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {NODE_COLUMNS}"
        );

        let inserted = sqlx::query_as::<_, Node>(&sql)
            .bind(node.id)
            .bind(node.tenant_id)
            .bind(&node.name)
            .bind(&node.slug)
            .bind(&node.code)
            .bind(node.node_type.as_str())
            .bind(node.depth)
            .bind(node.parent_id)
            .bind(Json(&node.breadcrumbs))
            .bind(&node.location)
            .bind(&node.status)
            .bind(&node.metadata)
            .bind(node.created_at)
            .bind(node.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(inserted)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Node>, DatabaseError> {
        let sql = format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = $1");

        let node = sqlx::query_as::<_, Node>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(node)
    }

    async fn list_children(&self, parent_id: Uuid) -> Result<Vec<Node>, DatabaseError> {
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM nodes WHERE parent_id = $1 ORDER BY created_at, id"
        );

        let nodes = sqlx::query_as::<_, Node>(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(nodes)
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Node>, DatabaseError> {
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM nodes WHERE tenant_id = $1 ORDER BY depth, created_at, id"
        );

        let nodes = sqlx::query_as::<_, Node>(&sql)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(nodes)
    }

    async fn update(&self, node: Node) -> Result<Node, DatabaseError> {
        let sql = format!(
            "UPDATE nodes \
             SET name = $2, slug = $3, code = $4, status = $5, location = $6, \
                 metadata = $7, updated_at = $8 \
             WHERE id = $1 \
             RETURNING {NODE_COLUMNS}"
        );

        let updated = sqlx::query_as::<_, Node>(&sql)
            .bind(node.id)
            .bind(&node.name)
            .bind(&node.slug)
            .bind(&node.code)
            .bind(&node.status)
            .bind(&node.location)
            .bind(&node.metadata)
            .bind(node.updated_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("node {}", node.id)))?;

        Ok(updated)
    }

    async fn remove(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM nodes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
