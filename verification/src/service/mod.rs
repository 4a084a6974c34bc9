//! Lookup service implementations.
//!
//! - [`HttpLookupService`]: talks to the verification backend
//! - [`MockLookupService`]: scripted replies for tests and demos

pub mod http;
pub mod mock;

pub use crate::lifecycle::environment::LookupService;
pub use http::HttpLookupService;
pub use mock::{LookupCall, MockLookupService};
