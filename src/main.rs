use axum::{routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use atlas_api_rust::config;
use atlas_api_rust::database::DatabaseManager;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ERP_API_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Atlas API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("ATLAS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Atlas API Rust server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Hierarchy directory
        .merge(hierarchy_routes())
        // External-system synchronization
        .merge(sync_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn hierarchy_routes() -> Router {
    use atlas_api_rust::handlers::hierarchy;

    Router::new()
        .route("/api/hierarchy/nodes", post(hierarchy::node_create))
        .route(
            "/api/hierarchy/nodes/:id",
            get(hierarchy::node_get)
                .put(hierarchy::node_update)
                .delete(hierarchy::node_delete),
        )
        .route(
            "/api/hierarchy/nodes/:id/children",
            get(hierarchy::node_children),
        )
        .route(
            "/api/hierarchy/nodes/:id/ancestors",
            get(hierarchy::node_ancestors),
        )
        .route(
            "/api/hierarchy/nodes/:id/descendants",
            get(hierarchy::node_descendants),
        )
        .route(
            "/api/hierarchy/nodes/:id/breadcrumbs",
            get(hierarchy::node_breadcrumbs),
        )
}

fn sync_routes() -> Router {
    use atlas_api_rust::handlers::sync;

    Router::new()
        .route("/api/sync/hierarchy/:tenant_id", post(sync::sync_hierarchy))
        .route("/api/sync/nodes/:id", post(sync::sync_node))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Atlas API (Rust)",
            "version": version,
            "description": "Geo/organizational hierarchy directory with multi-system sync",
            "endpoints": {
                "home": "/ (public)",
                "hierarchy": "/api/hierarchy/nodes[/:id[/children|ancestors|descendants|breadcrumbs]]",
                "sync": "/api/sync/hierarchy/:tenant_id, /api/sync/nodes/:id",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
