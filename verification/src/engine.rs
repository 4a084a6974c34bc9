//! Both pipelines, wired to one lookup service.

use crate::lifecycle::environment::LookupService;
use crate::lifecycle::{LookupEnvironment, RequestLifecycleController};
use crate::types::{Pipeline, VerificationQuery};
use crate::{ControllerError, LookupView};
use isi_verify_core::environment::Clock;
use std::sync::Arc;
use std::time::Duration;

/// A manual and a scan controller sharing a lookup service but no state
pub struct VerificationEngine<S: LookupService + 'static> {
    /// Identifier lookups
    pub manual: RequestLifecycleController<S>,
    /// Image lookups
    pub scan: RequestLifecycleController<S>,
}

impl<S: LookupService + 'static> VerificationEngine<S> {
    /// Build both controllers
    #[must_use]
    pub fn new(service: Arc<S>, clock: Arc<dyn Clock>, lookup_timeout: Duration) -> Self {
        let environment = LookupEnvironment::new(service, clock, lookup_timeout);

        Self {
            manual: RequestLifecycleController::new(Pipeline::Manual, environment.clone()),
            scan: RequestLifecycleController::new(Pipeline::Scan, environment),
        }
    }

    /// Controller serving `pipeline`
    #[must_use]
    pub const fn controller(&self, pipeline: Pipeline) -> &RequestLifecycleController<S> {
        match pipeline {
            Pipeline::Manual => &self.manual,
            Pipeline::Scan => &self.scan,
        }
    }

    /// Route a query to its pipeline and wait for it to settle
    ///
    /// # Errors
    ///
    /// See [`RequestLifecycleController::submit_and_wait`].
    pub async fn verify(&self, query: VerificationQuery) -> Result<LookupView, ControllerError> {
        self.controller(query.pipeline()).submit_and_wait(query).await
    }

    /// Shut both pipelines down
    ///
    /// # Errors
    ///
    /// Returns the first shutdown failure.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), ControllerError> {
        self.manual.shutdown(timeout).await?;
        self.scan.shutdown(timeout).await
    }
}
