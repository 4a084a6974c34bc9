//! Reducer for the lookup lifecycle.

use crate::classifier::classify;
use crate::lifecycle::{LookupAction, LookupEnvironment, LookupPhase, LookupState, RequestId};
use crate::lifecycle::environment::LookupService;
use crate::types::{ExtractedFields, LicenseRecord, Pipeline, VerificationQuery, VerificationVerdict};
use isi_verify_client::LookupError;
use isi_verify_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::marker::PhantomData;
use std::sync::Arc;

/// Decides every transition of a pipeline's single-flight slot.
///
/// - `Submit` while idle or settled: moves to `Submitting` and dispatches
///   the lookup, bounded by the lookup timeout
/// - `Submit` while submitting: ignored
/// - `VerdictReceived` / `TimedOut` for the in-flight ticket: settles with
///   the classified verdict
/// - any other completion: stale, ignored
pub struct LookupReducer<S> {
    _service: PhantomData<fn() -> S>,
}

impl<S> LookupReducer<S> {
    /// Create a new lookup reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _service: PhantomData,
        }
    }
}

impl<S> Default for LookupReducer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for LookupReducer<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S: LookupService + 'static> LookupReducer<S> {
    fn settle(
        state: &mut LookupState,
        request_id: RequestId,
        verdict: &VerificationVerdict,
        env: &LookupEnvironment<S>,
    ) {
        let result = classify(verdict);

        tracing::info!(
            pipeline = %state.pipeline(),
            %request_id,
            severity = result.severity.as_str(),
            headline = result.headline.map(|h| h.as_str()),
            "Lookup settled"
        );
        metrics::counter!(
            "lookup.settled",
            "pipeline" => state.pipeline().as_str(),
            "severity" => result.severity.as_str()
        )
        .increment(1);

        state.phase = LookupPhase::Settled {
            request_id,
            result,
            settled_at: env.clock.now(),
        };
    }

    fn discard_stale(state: &mut LookupState, request_id: RequestId, kind: &'static str) {
        state.stale_completions += 1;
        tracing::debug!(pipeline = %state.pipeline(), %request_id, kind, "Discarded stale completion");
        metrics::counter!(
            "lookup.stale_completions",
            "pipeline" => state.pipeline().as_str(),
            "kind" => kind
        )
        .increment(1);
    }

    /// One effect per request: it yields either the verdict or the timeout,
    /// and a lookup that times out is dropped with it
    fn dispatch(
        pipeline: Pipeline,
        request_id: RequestId,
        query: VerificationQuery,
        env: &LookupEnvironment<S>,
    ) -> Effect<LookupAction> {
        let service = Arc::clone(&env.service);
        let lookup_timeout = env.lookup_timeout;

        Effect::future(async move {
            let lookup = async move {
                match query {
                    VerificationQuery::Manual(query) => {
                        service
                            .lookup_by_identifier(query.license_number().to_string())
                            .await
                    },
                    VerificationQuery::Scan(query) => service.lookup_by_image(query).await,
                }
            };

            match tokio::time::timeout(lookup_timeout, lookup).await {
                Ok(outcome) => Some(LookupAction::VerdictReceived {
                    request_id,
                    verdict: outcome.unwrap_or_else(|error| transport_verdict(pipeline, &error)),
                }),
                Err(_) => Some(LookupAction::TimedOut { request_id }),
            }
        })
    }
}

/// Convert a failed lookup into a verdict the classifier understands
///
/// A manual failure always reads as an unreachable backend. A failed scan
/// keeps the backend's own error text and whatever OCR output its error
/// body carried.
fn transport_verdict(pipeline: Pipeline, error: &LookupError) -> VerificationVerdict {
    tracing::warn!(pipeline = %pipeline, %error, "Lookup failed in transport");

    match pipeline {
        Pipeline::Manual => VerificationVerdict::transport_error(pipeline.unreachable_message()),
        Pipeline::Scan => {
            let mut verdict = VerificationVerdict::transport_error(
                error
                    .backend_message()
                    .unwrap_or_else(|| pipeline.unreachable_message()),
            );
            if let Some(body) = error.backend_body() {
                verdict.message.clone_from(&body.message);
                verdict.extracted = body.extracted.clone().map(ExtractedFields::from);
                verdict.record = body.data.clone().map(LicenseRecord::from);
                verdict.raw_text.clone_from(&body.raw_text);
            }
            verdict
        },
    }
}

impl<S: LookupService + 'static> Reducer for LookupReducer<S> {
    type State = LookupState;
    type Action = LookupAction;
    type Environment = LookupEnvironment<S>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let pipeline = state.pipeline();

        match action {
            LookupAction::Submit { request_id, query } => {
                if query.pipeline() != pipeline {
                    tracing::warn!(%pipeline, query = %query.pipeline(), "Rejected query for another pipeline");
                    return smallvec![Effect::None];
                }

                if let Err(error) = query.validate() {
                    tracing::warn!(%pipeline, %error, "Rejected invalid query");
                    return smallvec![Effect::None];
                }

                if let Some(in_flight) = state.in_flight() {
                    state.ignored_submissions += 1;
                    tracing::debug!(%pipeline, %request_id, %in_flight, "Ignored submission while in flight");
                    return smallvec![Effect::None];
                }

                tracing::info!(%pipeline, %request_id, "Lookup dispatched");
                state.phase = LookupPhase::Submitting {
                    request_id,
                    started_at: env.clock.now(),
                };
                state.last_accepted = Some(request_id);

                smallvec![Self::dispatch(pipeline, request_id, query, env)]
            },

            LookupAction::VerdictReceived {
                request_id,
                verdict,
            } => {
                if state.in_flight() == Some(request_id) {
                    Self::settle(state, request_id, &verdict, env);
                } else {
                    Self::discard_stale(state, request_id, "verdict");
                }
                smallvec![Effect::None]
            },

            LookupAction::TimedOut { request_id } => {
                if state.in_flight() == Some(request_id) {
                    tracing::warn!(%pipeline, %request_id, "Lookup timed out");
                    let verdict = VerificationVerdict::transport_error(format!(
                        "Request timed out after {} seconds",
                        env.lookup_timeout.as_secs()
                    ));
                    Self::settle(state, request_id, &verdict, env);
                } else {
                    Self::discard_stale(state, request_id, "timeout");
                }
                smallvec![Effect::None]
            },
        }
    }
}
