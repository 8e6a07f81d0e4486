#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use photolog::application::api::UploadFile;

use crate::client::CliError;

pub fn read_secret(file: Option<PathBuf>, env_value: Option<String>) -> Result<String, CliError> {
    let value = if let Some(path) = file {
        fs::read_to_string(&path).map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })?
    } else {
        env_value.ok_or(CliError::MissingPassphrase)?
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::MissingPassphrase);
    }
    Ok(trimmed.to_string())
}

pub async fn read_upload(path: &Path) -> Result<UploadFile, CliError> {
    Ok(UploadFile::from_path(path).await?)
}

/// Splits `LABEL=URL` at the first `=`.
pub fn parse_link(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((label, url)) if !label.is_empty() && !url.is_empty() => {
            Ok((label.to_string(), url.to_string()))
        }
        _ => Err(CliError::InvalidInput(format!(
            "link must look like LABEL=URL, got `{raw}`"
        ))),
    }
}
