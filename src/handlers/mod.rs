use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::database::PgNodeRepository;
use crate::error::ApiError;
use crate::hierarchy::HierarchyService;
use crate::sync::{SyncAdapter, SyncOrchestrator};

pub mod hierarchy;
pub mod sync;

// Adapter set is immutable after construction; one set serves every request
static ADAPTERS: Lazy<Vec<Arc<dyn SyncAdapter>>> =
    Lazy::new(|| crate::sync::build_adapters(&crate::config::config().sync));

pub(crate) async fn hierarchy_service() -> Result<HierarchyService<PgNodeRepository>, ApiError> {
    let repo = PgNodeRepository::from_env().await?;
    Ok(HierarchyService::new(repo))
}

pub(crate) async fn orchestrator() -> Result<SyncOrchestrator<PgNodeRepository>, ApiError> {
    Ok(SyncOrchestrator::new(
        hierarchy_service().await?,
        ADAPTERS.clone(),
    ))
}
