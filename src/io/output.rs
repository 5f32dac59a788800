use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Record;

/// Write a record as pretty-printed JSON.
pub fn write_json(record: &Record, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, record).context("Failed to write JSON")?;
    Ok(())
}

/// Render a record as human-readable text: a speaker header per turn,
/// followed by that turn's lines.
pub fn format_human(record: &Record) -> String {
    let mut output = String::new();
    let mut cursors: HashMap<&str, usize> = HashMap::new();

    for (speaker, count) in record.runs() {
        output.push_str(speaker);
        output.push_str(":\n");

        let cursor = cursors.entry(speaker).or_insert(0);
        if let Some(lines) = record.speaker.get(speaker) {
            for line in lines.iter().skip(*cursor).take(count) {
                output.push_str("  ");
                output.push_str(line);
                output.push('\n');
            }
        }
        *cursor += count;
        output.push('\n');
    }

    output
}

/// Write the human-readable rendering to a file.
pub fn write_human(record: &Record, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    write!(file, "{}", format_human(record))?;
    Ok(())
}
