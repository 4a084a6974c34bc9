//! Actions for the lookup lifecycle.

use crate::lifecycle::types::RequestId;
use crate::types::{VerificationQuery, VerificationVerdict};

/// Inputs to the [`LookupReducer`](crate::LookupReducer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupAction {
    /// User asked for a lookup.
    ///
    /// Ignored while another request is in flight.
    Submit {
        /// Ticket assigned by the controller
        request_id: RequestId,
        /// What to look up
        query: VerificationQuery,
    },

    /// The lookup service answered (or failed, already converted to a verdict)
    VerdictReceived {
        /// Ticket of the request that produced this verdict
        request_id: RequestId,
        /// The verdict
        verdict: VerificationVerdict,
    },

    /// The lookup outlived the lookup timeout and was abandoned
    TimedOut {
        /// Ticket of the timed request
        request_id: RequestId,
    },
}
