#![deny(clippy::all, clippy::pedantic)]

use photolog::application::error::ClientError;
use photolog::application::shell::Shell;
use photolog::config::{self, LoadError, Settings};
use photolog::infra::error::InfraError;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] LoadError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] InfraError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("passphrase is required (use --passphrase-file or PHOTOLOG_PASSPHRASE)")]
    MissingPassphrase,
    #[error("login required (continue at {0})")]
    LoginRequired(String),
    #[error("login failed: {0}")]
    LoginFailed(String),
    #[error("post {0} not found")]
    PostNotFound(i64),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Output(String),
}

/// Resolves settings from the command line, environment, and config files.
pub fn settings_from_cli(cli: &Cli) -> Result<Settings, CliError> {
    Ok(config::load(&cli.config)?)
}

pub fn build_shell(settings: &Settings) -> Result<Shell, CliError> {
    Ok(Shell::open(settings)?)
}

/// Navigates to `path`, failing when the guard bounces the visit to login.
pub fn enter(shell: &Shell, path: &str) -> Result<(), CliError> {
    let reached = shell.navigator().navigate(path);
    if reached == path {
        Ok(())
    } else {
        Err(CliError::LoginRequired(reached))
    }
}
