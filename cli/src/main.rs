//! `isi-check`: verify an ISI mark license from the terminal.
//!
//! ```text
//! isi-check verify CM/L-1234567
//! isi-check scan label.jpg --show-ocr-text
//! ```
//!
//! Exit status: 0 for a valid license, 1 for any other outcome or failure,
//! 2 when the input is rejected before lookup.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use isi_verify::{
    ControllerError, HttpLookupService, ResultCard, Severity, VerificationEngine, VerificationQuery,
};
use isi_verify_client::BackendClient;
use isi_verify_core::environment::SystemClock;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "isi_check=info,isi_verify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.client_config();
    info!(
        backend_url = %config.base_url,
        lookup_timeout_secs = config.lookup_timeout_secs,
        "Configuration loaded"
    );

    let client = BackendClient::new(&config).context("building backend client")?;
    let engine = VerificationEngine::new(
        Arc::new(HttpLookupService::new(client)),
        Arc::new(SystemClock),
        config.lookup_timeout(),
    );

    let (query, show_ocr_text) = match cli.command {
        Command::Verify { license_number } => (VerificationQuery::manual(license_number), false),
        Command::Scan {
            image,
            show_ocr_text,
        } => (read_image(&image).await?, show_ocr_text),
    };

    eprintln!("{}", query.pipeline().progress_label());

    let view = match engine.verify(query).await {
        Ok(view) => view,
        Err(ControllerError::Validation(error)) => {
            eprintln!("{error}");
            return Ok(ExitCode::from(2));
        },
        Err(error) => return Err(error).context("lookup did not complete"),
    };

    let Some(result) = view.result else {
        anyhow::bail!("lookup finished without a result");
    };

    print!("{}", ResultCard::new(&result).show_raw_text(show_ocr_text));

    Ok(if result.severity == Severity::Positive {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn read_image(path: &Path) -> anyhow::Result<VerificationQuery> {
    let image = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());

    Ok(VerificationQuery::scan(image, mime_type, file_name))
}
