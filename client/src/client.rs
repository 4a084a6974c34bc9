//! Verification backend client

use crate::{
    config::ClientConfig,
    error::{LookupError, Result},
    wire::{VerdictPayload, VerifyRequest},
};
use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};

/// Client for the `/verify` and `/scan` endpoints
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    config: ClientConfig,
}

impl BackendClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| LookupError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Base URL this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Look up a license by its CM/L identifier
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or unparsable bodies
    #[tracing::instrument(skip(self), fields(endpoint = "verify"))]
    pub async fn verify(&self, license_number: &str) -> Result<VerdictPayload> {
        let request = VerifyRequest {
            license_number: license_number.to_string(),
        };

        let response = self
            .client
            .post(self.config.endpoint("verify"))
            .json(&request)
            .send()
            .await
            .map_err(|e| LookupError::RequestFailed(e.to_string()))?;

        read_verdict(response).await
    }

    /// Upload a label image for recognition and lookup
    ///
    /// The image is sent as the `image` part of a multipart form.
    ///
    /// # Errors
    ///
    /// Returns errors for an invalid MIME type, network failures,
    /// non-success statuses, or unparsable bodies
    #[tracing::instrument(skip(self, image), fields(endpoint = "scan", bytes = image.len()))]
    pub async fn scan(
        &self,
        image: Vec<u8>,
        mime_type: &str,
        file_name: &str,
    ) -> Result<VerdictPayload> {
        let part = Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| LookupError::RequestFailed(e.to_string()))?;

        let response = self
            .client
            .post(self.config.endpoint("scan"))
            .multipart(Form::new().part("image", part))
            .send()
            .await
            .map_err(|e| LookupError::RequestFailed(e.to_string()))?;

        read_verdict(response).await
    }
}

async fn read_verdict(response: Response) -> Result<VerdictPayload> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| LookupError::RequestFailed(e.to_string()))?;

    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "Backend returned non-success status");
        let body = serde_json::from_str::<VerdictPayload>(&body).ok();
        return Err(LookupError::Status {
            status: status.as_u16(),
            message: body.as_ref().and_then(|b| b.error_text()).map(str::to_string),
            body: body.map(Box::new),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(error = %e, "Backend returned an unparsable verdict");
        LookupError::ResponseParseFailed(e.to_string())
    })
}
