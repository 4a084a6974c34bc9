//! # ISI Verify Client
//!
//! HTTP client for the verification backend.
//!
//! The backend exposes two endpoints:
//!
//! - `POST /verify` with a JSON body `{"licenseNumber": "..."}`
//! - `POST /scan` with a `multipart/form-data` body carrying one `image` part
//!
//! Both answer with a loosely-shaped JSON verdict, parsed here into
//! [`VerdictPayload`].
//!
//! ## Example
//!
//! ```ignore
//! use isi_verify_client::{BackendClient, ClientConfig};
//!
//! let client = BackendClient::new(&ClientConfig::from_env())?;
//! let verdict = client.verify("CM/L-1234567").await?;
//! println!("{:?}", verdict.status);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::BackendClient;
pub use config::ClientConfig;
pub use error::{LookupError, Result};
pub use wire::{ExtractedPayload, RecordPayload, VerdictPayload, VerifyRequest};
