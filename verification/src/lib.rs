//! # ISI Verify
//!
//! Verification engine for ISI compliance marks.
//!
//! A user confirms a license either by typing its CM/L identifier or by
//! uploading a photograph of the product label. Each way in is a separate
//! pipeline with its own [`RequestLifecycleController`]:
//!
//! ```text
//! VerificationQuery ─▶ Controller ─▶ LookupReducer ─▶ Effect::Future (LookupService, bounded by timeout)
//!                                        │
//!                                        ▼
//!                      VerdictReceived / TimedOut ─▶ classify() ─▶ Settled(ClassifiedResult)
//! ```
//!
//! The controller is single-flight: while a lookup is in flight, further
//! submissions are ignored. Transport faults never escape; they settle the
//! pipeline with a `transport_error` verdict that classifies as an error.
//!
//! ## Example
//!
//! ```ignore
//! use isi_verify::{HttpLookupService, VerificationEngine, VerificationQuery};
//!
//! let service = Arc::new(HttpLookupService::new(BackendClient::new(&config)?));
//! let engine = VerificationEngine::new(service, Arc::new(SystemClock), config.lookup_timeout());
//!
//! let view = engine.manual.submit_and_wait(VerificationQuery::manual("CM/L-1234567")).await?;
//! if let Some(result) = &view.result {
//!     println!("{}", ResultCard::new(result));
//! }
//! ```

pub mod card;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod service;
pub mod types;

pub use card::ResultCard;
pub use classifier::classify;
pub use engine::VerificationEngine;
pub use error::{ControllerError, ValidationError};
pub use lifecycle::{
    LookupAction, LookupEnvironment, LookupPhase, LookupReducer, LookupState, LookupView,
    RequestId, RequestLifecycleController, SubmitOutcome,
};
pub use service::{HttpLookupService, LookupCall, LookupService, MockLookupService};
pub use types::{
    ClassifiedResult, Evidence, ExtractedFields, Headline, LicenseRecord, ManualQuery, Pipeline,
    ScanQuery, Severity, VerdictStatus, VerificationQuery, VerificationVerdict,
};
