//! Rendering of JSON documents returned by Trident

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;
use tridentctl_core::OutputFormat;

/// Write `docs` to `out` in the requested format
pub fn render<W: Write>(out: &mut W, docs: &[Value], format: Option<OutputFormat>) -> Result<()> {
    match format {
        Some(OutputFormat::Yaml) => {
            for doc in docs {
                let yaml = serde_yaml::to_string(doc).context("Failed to render YAML")?;
                write!(out, "{}", yaml)?;
            }
        }
        Some(OutputFormat::Name) => {
            for name in docs.iter().flat_map(names) {
                writeln!(out, "{}", name)?;
            }
        }
        Some(OutputFormat::Json) | Some(OutputFormat::Wide) | None => {
            for doc in docs {
                writeln!(out, "{}", serde_json::to_string_pretty(doc)?)?;
            }
        }
    }
    Ok(())
}

/// Names carried by a document: its own `name`, or the strings of a list response
fn names(doc: &Value) -> Vec<String> {
    if let Some(name) = doc.get("name").and_then(Value::as_str) {
        return vec![name.to_string()];
    }

    match doc {
        Value::Object(fields) => fields
            .values()
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => other.get("name").and_then(Value::as_str).map(str::to_string),
            })
            .collect(),
        _ => Vec::new(),
    }
}
