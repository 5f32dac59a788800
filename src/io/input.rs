use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a complete transcript file for one-shot parsing.
pub fn read_transcript(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}

/// Read a complete transcript from stdin.
pub fn read_transcript_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read transcript from stdin")?;
    Ok(text)
}
