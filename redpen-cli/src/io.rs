//! File I/O for native CLI

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use redpen_core::{service, Dialect, Review, Tone};

/// Read an HTML (or plain text) file
pub fn load_html(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Load a submitted text and the service reply to it as a Review.
///
/// `status` is the HTTP status the reply came back with, so that saved error
/// bodies are reported the way the service meant them.
pub fn load_review(
    original: &Path,
    response: &Path,
    status: u16,
    tone: Tone,
    dialect: Dialect,
) -> Result<Review> {
    let original_html = load_html(original)?;
    let body = fs::read_to_string(response)
        .with_context(|| format!("Failed to read response: {}", response.display()))?;

    let response = service::parse_response(status, &body)
        .with_context(|| format!("Correction service reply in {}", response.display()))?;

    Ok(Review::new(original_html, tone, dialect, response))
}

/// Get the export directory, creating it if needed
pub fn ensure_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(dir.to_path_buf())
}

/// Export review to <dir>/review.json
pub fn export_review(review: &Review, dir: &Path) -> Result<PathBuf> {
    let dir = ensure_dir(dir)?;
    let export_path = dir.join("review.json");

    let json = redpen_core::to_json(review)?;

    fs::write(&export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    log::info!("exported review {} to {}", review.id, export_path.display());
    Ok(export_path)
}
