//! Environment for the lookup reducer.

use crate::types::{ScanQuery, VerificationVerdict};
use isi_verify_client::LookupError;
use isi_verify_core::environment::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The two backend lookups
///
/// Implementations report transport faults as [`LookupError`]; the reducer
/// turns them into verdicts.
pub trait LookupService: Send + Sync {
    /// Look up a license by its (trimmed) CM/L identifier
    fn lookup_by_identifier(
        &self,
        license_number: String,
    ) -> impl Future<Output = Result<VerificationVerdict, LookupError>> + Send;

    /// Recognize a label image and look up what it shows
    fn lookup_by_image(
        &self,
        image: ScanQuery,
    ) -> impl Future<Output = Result<VerificationVerdict, LookupError>> + Send;
}

/// Dependencies of the [`LookupReducer`](crate::LookupReducer)
pub struct LookupEnvironment<S> {
    /// Backend lookups
    pub service: Arc<S>,
    /// Timestamps for phase transitions
    pub clock: Arc<dyn Clock>,
    /// How long a request may stay in flight
    pub lookup_timeout: Duration,
}

impl<S> LookupEnvironment<S> {
    /// Create an environment
    #[must_use]
    pub fn new(service: Arc<S>, clock: Arc<dyn Clock>, lookup_timeout: Duration) -> Self {
        Self {
            service,
            clock,
            lookup_timeout,
        }
    }
}

impl<S> Clone for LookupEnvironment<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            clock: Arc::clone(&self.clock),
            lookup_timeout: self.lookup_timeout,
        }
    }
}
