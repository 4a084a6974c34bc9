//! Request Lifecycle Controller.

use crate::error::ControllerError;
use crate::lifecycle::environment::LookupService;
use crate::lifecycle::{LookupAction, LookupEnvironment, LookupReducer, LookupState, LookupView, RequestId};
use crate::types::{Pipeline, VerificationQuery};
use isi_verify_runtime::{EffectHandle, Store, StoreError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Extra time `submit_and_wait` allows past the lookup timeout for the
/// settling action to be applied
const SETTLE_GRACE: Duration = Duration::from_secs(5);

/// Result of a [`RequestLifecycleController::submit`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The query was accepted and its lookup dispatched
    Dispatched(RequestId),
    /// Another lookup was in flight; the query was dropped
    AlreadyInFlight,
}

/// Owns one pipeline's single-flight slot.
///
/// `submit` returns as soon as the lookup is dispatched; the outcome shows up
/// later in [`current_view`](Self::current_view). The manual and scan
/// pipelines each get their own controller and share nothing.
pub struct RequestLifecycleController<S: LookupService + 'static> {
    pipeline: Pipeline,
    store: Store<LookupState, LookupAction, LookupEnvironment<S>, LookupReducer<S>>,
    next_request_id: AtomicU64,
    /// Serializes submit so the accept check reads this submission's decision
    submit_lock: Mutex<()>,
    lookup_timeout: Duration,
}

impl<S: LookupService + 'static> RequestLifecycleController<S> {
    /// Create an idle controller for `pipeline`
    #[must_use]
    pub fn new(pipeline: Pipeline, environment: LookupEnvironment<S>) -> Self {
        let lookup_timeout = environment.lookup_timeout;

        Self {
            pipeline,
            store: Store::new(LookupState::new(pipeline), LookupReducer::new(), environment),
            next_request_id: AtomicU64::new(1),
            submit_lock: Mutex::new(()),
            lookup_timeout,
        }
    }

    /// Pipeline this controller serves
    #[must_use]
    pub const fn pipeline(&self) -> Pipeline {
        self.pipeline
    }

    /// Submit a query
    ///
    /// Validation runs first; an invalid query never reaches the lookup
    /// service and leaves the state untouched. A valid query submitted while
    /// another lookup is in flight is dropped ([`SubmitOutcome::AlreadyInFlight`]).
    ///
    /// # Errors
    ///
    /// - [`ControllerError::PipelineMismatch`] if the query belongs to the other pipeline
    /// - [`ControllerError::Validation`] if the query is invalid
    /// - [`ControllerError::Store`] if the controller is shutting down
    pub async fn submit(&self, query: VerificationQuery) -> Result<SubmitOutcome, ControllerError> {
        Ok(match self.dispatch(query).await? {
            Some((request_id, _)) => SubmitOutcome::Dispatched(request_id),
            None => SubmitOutcome::AlreadyInFlight,
        })
    }

    /// Submit a query and wait until its own request settles
    ///
    /// # Errors
    ///
    /// - everything [`submit`](Self::submit) returns
    /// - [`ControllerError::AlreadyInFlight`] if another lookup was in flight
    /// - [`ControllerError::Store`] with [`StoreError::Timeout`] if nothing
    ///   settles within the lookup timeout plus a grace period
    pub async fn submit_and_wait(&self, query: VerificationQuery) -> Result<LookupView, ControllerError> {
        let Some((request_id, mut handle)) = self.dispatch(query).await? else {
            return Err(ControllerError::AlreadyInFlight(self.pipeline));
        };

        // The lookup effect bounds itself by the lookup timeout; once its
        // handle completes, the verdict or timeout has been reduced
        handle
            .wait_with_timeout(self.lookup_timeout.saturating_add(SETTLE_GRACE))
            .await?;
        tracing::debug!(pipeline = %self.pipeline, %request_id, "Lookup complete");

        Ok(self.current_view().await)
    }

    /// Loading flag and last result
    pub async fn current_view(&self) -> LookupView {
        self.store.state(LookupState::view).await
    }

    /// Snapshot of the full lifecycle state
    pub async fn state(&self) -> LookupState {
        self.store.state(Clone::clone).await
    }

    /// Stop accepting submissions and wait for in-flight work to drain
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when `timeout` expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), ControllerError> {
        Ok(self.store.shutdown(timeout).await?)
    }

    /// Validate and send a query; `None` when another lookup was in flight
    #[tracing::instrument(skip(self, query), fields(pipeline = %self.pipeline))]
    async fn dispatch(
        &self,
        query: VerificationQuery,
    ) -> Result<Option<(RequestId, EffectHandle)>, ControllerError> {
        if query.pipeline() != self.pipeline {
            return Err(ControllerError::PipelineMismatch {
                expected: self.pipeline,
                actual: query.pipeline(),
            });
        }

        if let Err(error) = query.validate() {
            tracing::info!(%error, "Submission rejected");
            self.record_submission("rejected");
            return Err(error.into());
        }

        let _guard = self.submit_lock.lock().await;

        let request_id = RequestId::new(self.next_request_id.fetch_add(1, Ordering::Relaxed));
        let handle = self
            .store
            .send(LookupAction::Submit { request_id, query })
            .await?;

        let accepted = self
            .store
            .state(|s| s.last_accepted() == Some(request_id))
            .await;

        if accepted {
            self.record_submission("dispatched");
            Ok(Some((request_id, handle)))
        } else {
            self.record_submission("ignored");
            Ok(None)
        }
    }

    fn record_submission(&self, outcome: &'static str) {
        metrics::counter!(
            "lookup.submissions",
            "pipeline" => self.pipeline.as_str(),
            "outcome" => outcome
        )
        .increment(1);
    }
}
