//! Common utilities for sift-cmd

use anyhow::{Context, Result};
use sift_text_search::SearchConfig;
use std::fs;
use std::path::Path;

/// Checks if a file exists and is readable
pub fn validate_file_exists(path: &str) -> Result<()> {
    let file_path = Path::new(path);
    if !file_path.exists() {
        anyhow::bail!("File does not exist: {}", path);
    }
    if !file_path.is_file() {
        anyhow::bail!("Path is not a file: {}", path);
    }
    Ok(())
}

/// A text file loaded as one document.
pub struct Document {
    pub path: String,
    pub text: String,
}

/// Reads every file as UTF-8 text, replacing invalid sequences.
pub fn read_documents(files: &[String]) -> Result<Vec<Document>> {
    files
        .iter()
        .map(|path| {
            validate_file_exists(path)?;
            let bytes = fs::read(path).with_context(|| format!("Failed to read file: {path}"))?;
            log::debug!("read {} bytes from {path}", bytes.len());
            Ok(Document {
                path: path.clone(),
                text: String::from_utf8_lossy(&bytes).into_owned(),
            })
        })
        .collect()
}

/// Loads search settings from a JSON file, or the defaults when no file is
/// given.
pub fn load_config(path: Option<&str>) -> Result<SearchConfig> {
    let Some(path) = path else {
        return Ok(SearchConfig::default());
    };
    validate_file_exists(path)?;
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid config file: {path}"))
}
