//! State types for the lookup lifecycle.

use crate::types::{ClassifiedResult, Pipeline};
use chrono::{DateTime, Utc};
use std::fmt;

/// Ticket identifying one submission within a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Create a request id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the single-flight slot is
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LookupPhase {
    /// Nothing submitted yet
    #[default]
    Idle,

    /// A lookup is in flight
    Submitting {
        /// Ticket of the in-flight request
        request_id: RequestId,
        /// When it was accepted
        started_at: DateTime<Utc>,
    },

    /// The last accepted request finished
    Settled {
        /// Ticket of the request that settled
        request_id: RequestId,
        /// What the user sees
        result: ClassifiedResult,
        /// When it settled
        settled_at: DateTime<Utc>,
    },
}

/// State of one pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupState {
    pipeline: Pipeline,
    pub(crate) phase: LookupPhase,
    pub(crate) last_accepted: Option<RequestId>,
    pub(crate) ignored_submissions: u64,
    pub(crate) stale_completions: u64,
}

impl LookupState {
    /// Fresh idle state for a pipeline
    #[must_use]
    pub const fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            phase: LookupPhase::Idle,
            last_accepted: None,
            ignored_submissions: 0,
            stale_completions: 0,
        }
    }

    /// Pipeline this state belongs to
    #[must_use]
    pub const fn pipeline(&self) -> Pipeline {
        self.pipeline
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> &LookupPhase {
        &self.phase
    }

    /// Ticket of the in-flight request, if any
    #[must_use]
    pub const fn in_flight(&self) -> Option<RequestId> {
        match &self.phase {
            LookupPhase::Submitting { request_id, .. } => Some(*request_id),
            LookupPhase::Idle | LookupPhase::Settled { .. } => None,
        }
    }

    /// True while a lookup is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight().is_some()
    }

    /// Result of the last settled request
    #[must_use]
    pub const fn result(&self) -> Option<&ClassifiedResult> {
        match &self.phase {
            LookupPhase::Settled { result, .. } => Some(result),
            LookupPhase::Idle | LookupPhase::Submitting { .. } => None,
        }
    }

    /// Ticket of the request that produced the current result
    #[must_use]
    pub const fn settled(&self) -> Option<RequestId> {
        match &self.phase {
            LookupPhase::Settled { request_id, .. } => Some(*request_id),
            LookupPhase::Idle | LookupPhase::Submitting { .. } => None,
        }
    }

    /// Ticket of the most recently accepted submission
    #[must_use]
    pub const fn last_accepted(&self) -> Option<RequestId> {
        self.last_accepted
    }

    /// Submissions dropped because a request was in flight
    #[must_use]
    pub const fn ignored_submissions(&self) -> u64 {
        self.ignored_submissions
    }

    /// Verdicts dropped because their request was no longer in flight
    #[must_use]
    pub const fn stale_completions(&self) -> u64 {
        self.stale_completions
    }

    /// What a front end renders
    #[must_use]
    pub fn view(&self) -> LookupView {
        LookupView {
            is_loading: self.is_loading(),
            result: self.result().cloned(),
        }
    }
}

/// Tri-state view: idle (`false`, `None`), in flight (`true`, `None`),
/// settled (`false`, `Some`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupView {
    /// A lookup is in flight
    pub is_loading: bool,
    /// Last settled result
    pub result: Option<ClassifiedResult>,
}
