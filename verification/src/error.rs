//! Error types for the verification engine

use crate::types::Pipeline;
use isi_verify_runtime::StoreError;
use thiserror::Error;

/// Input rejected before any lookup is dispatched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The identifier is empty after trimming
    #[error("Please enter a license number")]
    EmptyLicenseNumber,

    /// No image was selected
    #[error("Please choose an image")]
    MissingImage,

    /// The selected file is not an image
    #[error("Unsupported file type {0}, please choose an image")]
    UnsupportedMediaType(String),
}

/// Errors returned by a [`RequestLifecycleController`](crate::RequestLifecycleController)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Input failed validation; nothing was dispatched
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A query of one pipeline was sent to the other pipeline's controller
    #[error("{actual} query submitted to the {expected} pipeline")]
    PipelineMismatch {
        /// Pipeline of the controller
        expected: Pipeline,
        /// Pipeline of the query
        actual: Pipeline,
    },

    /// Another lookup is already in flight on this pipeline
    #[error("A {0} lookup is already in flight")]
    AlreadyInFlight(Pipeline),

    /// The underlying store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
