use std::io::{self, Write};

use serde::Serialize;

use crate::error::Result;

#[derive(Clone, Copy, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Writes `value` as JSON or YAML. Returns `false` for [`OutputFormat::Text`],
/// which each command renders itself.
pub(crate) fn write_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    let rendered = match format {
        OutputFormat::Text => return Ok(false),
        OutputFormat::Json => serde_json::to_string_pretty(value)? + "\n",
        OutputFormat::Yaml => serde_yml::to_string(value)?,
    };
    io::stdout().write_all(rendered.as_bytes())?;
    Ok(true)
}
