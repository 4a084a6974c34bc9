//! Command-line arguments.

use clap::{Parser, Subcommand};
use isi_verify_client::ClientConfig;
use std::path::PathBuf;

/// Verify ISI mark licenses against the verification backend
#[derive(Debug, Parser)]
#[command(name = "isi-check", version, about)]
pub struct Cli {
    /// Backend base URL (overrides `ISI_BACKEND_URL`)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Seconds a lookup may take (overrides `ISI_LOOKUP_TIMEOUT_SECS`)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to check
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a CM/L license number
    Verify {
        /// License number, e.g. CM/L-1234567
        license_number: String,
    },

    /// Read the license off a label photograph
    Scan {
        /// Image file of the product label
        image: PathBuf,

        /// Print the recognized text
        #[arg(long)]
        show_ocr_text: bool,
    },
}

impl Cli {
    /// Environment configuration with command-line overrides applied
    pub fn client_config(&self) -> ClientConfig {
        self.apply(ClientConfig::from_env())
    }

    fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.backend_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_lookup_timeout_secs(secs);
        }
        config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_verify_command() {
        let cli = Cli::try_parse_from(["isi-check", "verify", "CM/L-1234567"]).unwrap();
        match cli.command {
            Command::Verify { license_number } => assert_eq!(license_number, "CM/L-1234567"),
            Command::Scan { .. } => panic!("expected verify"),
        }
    }

    #[test]
    fn test_scan_command_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "isi-check",
            "scan",
            "label.jpg",
            "--show-ocr-text",
            "--backend-url",
            "http://10.0.0.2:4000/",
            "--timeout-secs",
            "5",
        ])
        .unwrap();

        let config = cli.apply(ClientConfig::default());
        assert_eq!(config.base_url, "http://10.0.0.2:4000");
        assert_eq!(config.lookup_timeout(), Duration::from_secs(5));
        match cli.command {
            Command::Scan {
                image,
                show_ocr_text,
            } => {
                assert_eq!(image, PathBuf::from("label.jpg"));
                assert!(show_ocr_text);
            },
            Command::Verify { .. } => panic!("expected scan"),
        }
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["isi-check"]).is_err());
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let cli = Cli::try_parse_from(["isi-check", "verify", "x"]).unwrap();
        assert_eq!(cli.apply(ClientConfig::default()), ClientConfig::default());
    }
}
