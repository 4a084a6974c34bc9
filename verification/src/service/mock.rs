//! Scripted lookup service for testing.

use crate::lifecycle::environment::LookupService;
use crate::types::{ScanQuery, VerificationVerdict};
use isi_verify_client::LookupError;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;

type Reply = Result<VerificationVerdict, LookupError>;

/// A lookup the mock was asked to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupCall {
    /// `lookup_by_identifier`
    Identifier(String),
    /// `lookup_by_image`
    Image {
        /// Size of the uploaded image
        bytes: usize,
        /// MIME type of the upload
        mime_type: String,
        /// File name of the upload
        file_name: String,
    },
}

enum Scripted {
    Ready(Reply),
    Delayed(Duration, Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Mock lookup service.
///
/// Replies are consumed in the order they were scripted, one per call,
/// whichever lookup is called. With nothing scripted, a call fails with
/// [`LookupError::RequestFailed`].
#[derive(Default)]
pub struct MockLookupService {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<LookupCall>>,
}

impl MockLookupService {
    /// Create a mock with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next call with `verdict`
    pub fn push_verdict(&self, verdict: VerificationVerdict) {
        self.push(Scripted::Ready(Ok(verdict)));
    }

    /// Fail the next call with `error`
    pub fn push_failure(&self, error: LookupError) {
        self.push(Scripted::Ready(Err(error)));
    }

    /// Answer the next call with `verdict` after `delay`
    pub fn push_delayed(&self, delay: Duration, verdict: VerificationVerdict) {
        self.push(Scripted::Delayed(delay, Ok(verdict)));
    }

    /// Hold the next call open until the returned sender is used
    ///
    /// Dropping the sender fails the call.
    #[must_use]
    pub fn push_gated(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Gated(rx));
        tx
    }

    /// Every call received so far
    #[must_use]
    pub fn calls(&self) -> Vec<LookupCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls received so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn push(&self, scripted: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(scripted);
    }

    /// Record the call and take its reply; no lock is held once this returns
    fn next(&self, call: LookupCall) -> Option<Scripted> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

async fn play(scripted: Option<Scripted>) -> Reply {
    match scripted {
        Some(Scripted::Ready(reply)) => reply,
        Some(Scripted::Delayed(delay, reply)) => {
            tokio::time::sleep(delay).await;
            reply
        },
        Some(Scripted::Gated(gate)) => gate
            .await
            .unwrap_or_else(|_| Err(LookupError::RequestFailed("gate dropped".to_string()))),
        None => Err(LookupError::RequestFailed("no scripted reply".to_string())),
    }
}

impl LookupService for MockLookupService {
    fn lookup_by_identifier(
        &self,
        license_number: String,
    ) -> impl Future<Output = Reply> + Send {
        let scripted = self.next(LookupCall::Identifier(license_number));
        play(scripted)
    }

    fn lookup_by_image(&self, image: ScanQuery) -> impl Future<Output = Reply> + Send {
        let scripted = self.next(LookupCall::Image {
            bytes: image.image.len(),
            mime_type: image.mime_type,
            file_name: image.file_name,
        });
        play(scripted)
    }
}
