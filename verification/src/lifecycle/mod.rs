//! Request lifecycle of one lookup pipeline.
//!
//! Each pipeline owns a single-flight slot that moves through
//! `Idle → Submitting → Settled`. The [`LookupReducer`] decides every
//! transition; the [`RequestLifecycleController`] wraps it in a runtime
//! [`Store`](isi_verify_runtime::Store) and exposes the operations a front
//! end needs.
//!
//! # Request identity
//!
//! Every accepted submission carries a [`RequestId`]. Lookup completions and
//! timeout timers echo that id back, and only the one matching the
//! in-flight request may settle the slot. Anything else is stale and
//! dropped, so a slow response can never overwrite a newer result.

pub mod actions;
pub mod controller;
pub mod environment;
pub mod reducer;
pub mod types;

pub use actions::LookupAction;
pub use controller::{RequestLifecycleController, SubmitOutcome};
pub use environment::LookupEnvironment;
pub use reducer::LookupReducer;
pub use types::{LookupPhase, LookupState, LookupView, RequestId};
