//! Request handler: one update request from header to terminal outcome.

use super::{AuthGate, SourceLookup, UpdateDispatcher};
use crate::domain::entities::SourceId;
use crate::domain::outcome::{AuthDecision, DispatchOutcome, LookupOutcome, UpdateOutcome};
use crate::metrics::HandlerMetrics;
use crate::ports::inbound::{SourceUpdateApi, UpdateRequest};
use crate::ports::outbound::{IdentityProvider, SourceRegistry, UpdateQueue};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// This endpoint only ever requests incremental updates.
const FORCE_UPDATE: bool = false;

/// Orchestrates authentication, lookup and dispatch.
///
/// The boundary clients are shared; the handler itself carries no
/// per-request state and is cloned into every router task.
#[derive(Clone)]
pub struct RequestHandler {
    auth: AuthGate,
    lookup: SourceLookup,
    dispatcher: UpdateDispatcher,
    metrics: Arc<HandlerMetrics>,
}

impl RequestHandler {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        registry: Arc<dyn SourceRegistry>,
        queue: Arc<dyn UpdateQueue>,
    ) -> Self {
        Self::with_metrics(identity, registry, queue, Arc::new(HandlerMetrics::new()))
    }

    pub fn with_metrics(
        identity: Arc<dyn IdentityProvider>,
        registry: Arc<dyn SourceRegistry>,
        queue: Arc<dyn UpdateQueue>,
        metrics: Arc<HandlerMetrics>,
    ) -> Self {
        Self {
            auth: AuthGate::new(identity),
            lookup: SourceLookup::new(registry),
            dispatcher: UpdateDispatcher::new(queue),
            metrics,
        }
    }

    pub fn metrics(&self) -> Arc<HandlerMetrics> {
        Arc::clone(&self.metrics)
    }

    async fn process(&self, request: UpdateRequest) -> UpdateOutcome {
        match self.auth.authenticate(request.authorization.as_deref()).await {
            AuthDecision::Authenticated(_) => {}
            AuthDecision::Rejected(reason) => {
                debug!(reason = ?reason, "Request not authenticated");
                return UpdateOutcome::Unauthorized;
            }
        }

        let Some(source_id) = SourceId::parse(request.source_id.as_deref()) else {
            debug!("Missing or blank source id");
            return UpdateOutcome::SourceNotFound;
        };
        tracing::Span::current().record("source_id", source_id.as_str());

        match self.lookup.find_by_id(&source_id).await {
            LookupOutcome::Found(_) => {}
            LookupOutcome::NotFound => return UpdateOutcome::SourceNotFound,
            LookupOutcome::Failed(_) => return UpdateOutcome::RegistryUnavailable,
        }

        match self.dispatcher.request_update(&source_id, FORCE_UPDATE).await {
            DispatchOutcome::Accepted { .. } => UpdateOutcome::UpdateRequested(source_id),
            DispatchOutcome::Failed => UpdateOutcome::DispatchFailed(source_id),
        }
    }
}

#[async_trait]
impl SourceUpdateApi for RequestHandler {
    async fn request_update(&self, request: UpdateRequest) -> UpdateOutcome {
        let started = Instant::now();
        let span = info_span!(
            "update_request",
            request_id = %Uuid::new_v4(),
            source_id = tracing::field::Empty,
        );

        let outcome = self.process(request).instrument(span.clone()).await;

        self.metrics.record(&outcome, started.elapsed());
        span.in_scope(|| {
            info!(
                outcome = outcome.label(),
                status = outcome.status_code(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Update request completed"
            );
        });

        outcome
    }
}
