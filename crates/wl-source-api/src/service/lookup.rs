//! Source existence check against the registry.

use crate::domain::entities::SourceId;
use crate::domain::outcome::LookupOutcome;
use crate::ports::outbound::SourceRegistry;
use std::sync::Arc;
use tracing::{debug, error};

/// Read-only registry client used by the request handler.
#[derive(Clone)]
pub struct SourceLookup {
    registry: Arc<dyn SourceRegistry>,
}

impl SourceLookup {
    pub fn new(registry: Arc<dyn SourceRegistry>) -> Self {
        Self { registry }
    }

    /// Single-key read. A missing record is `NotFound`, not a failure.
    pub async fn find_by_id(&self, id: &SourceId) -> LookupOutcome {
        match self.registry.get_by_id(id).await {
            Ok(Some(source)) => LookupOutcome::Found(source),
            Ok(None) => {
                debug!(source_id = %id, table = self.registry.table_name(), "Source not found");
                LookupOutcome::NotFound
            }
            Err(e) => {
                error!(
                    source_id = %id,
                    table = self.registry.table_name(),
                    error = %e,
                    "Source registry lookup failed"
                );
                LookupOutcome::Failed(e)
            }
        }
    }
}
