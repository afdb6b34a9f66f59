//! CLI command implementation (extracted for testability)
//!
//! Renders a [`Report`] as human text or machine JSON. All failures from
//! the parser pass through untouched; this layer never downgrades an error
//! into a warning or a partial listing.

use std::path::Path;

use crate::error::{Result, RevisarError};
use crate::report::{Report, TensorReport};


/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Which sections of the report to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Everything: file stats, metadata, tensors
    Full,
    /// Only the embedded metadata
    MetadataOnly,
    /// Only the tensor listing and its totals
    TensorsOnly,
}

/// Inspect a file and render the result.
///
/// # Errors
///
/// Any parse or I/O failure is returned as-is; the caller maps it to a
/// non-zero exit and a one-line stderr message.
pub fn run(path: &Path, format: OutputFormat, selection: Selection) -> Result<String> {
    let file_meta = std::fs::metadata(path)?;
    if !file_meta.is_file() {
        return Err(RevisarError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("'{}' is not a file", path.display()),
        )));
    }

    let report = Report::from_file(path)?;
    Ok(match format {
        OutputFormat::Text => render_text(&report, selection),
        OutputFormat::Json => render_json(&report, selection),
    })
}

/// Format file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Format a count with thousands separators (e.g. `1234567` -> `1,234,567`)
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn shape_string(shape: &[u64]) -> String {
    let dims: Vec<String> = shape.iter().map(u64::to_string).collect();
    format!("[{}]", dims.join("x"))
}

fn push_tensor_lines(lines: &mut Vec<String>, tensor: &TensorReport) {
    lines.push(format!("{}:", tensor.name));
    lines.push(format!("  Shape: {}", shape_string(&tensor.shape)));
    lines.push(format!("  Dtype: {}", tensor.dtype));
    lines.push(format!("  Parameters: {}", format_count(tensor.parameters)));
    lines.push(format!("  Size: {}", format_size(tensor.size_bytes)));
    lines.push(String::new());
}

/// Render the report as human-readable text
pub fn render_text(report: &Report, selection: Selection) -> String {
    let mut lines = Vec::new();

    if selection == Selection::Full {
        lines.push(format!("SafeTensors File: {}", report.file_path));
        lines.push(format!(
            "File Size: {} ({} bytes)",
            format_size(report.file_size),
            format_count(report.file_size)
        ));
        lines.push(format!("Tensor Count: {}", report.tensor_count));
        lines.push(format!(
            "Total Parameters: {}",
            format_count(report.total_parameters)
        ));
        lines.push(String::new());
    }

    if selection != Selection::TensorsOnly {
        lines.push("=== METADATA ===".to_string());
        match report.metadata.as_ref().filter(|m| !m.is_empty()) {
            Some(metadata) => {
                for (key, value) in metadata {
                    lines.push(format!("{key}: {value}"));
                }
            },
            None => lines.push("No metadata found".to_string()),
        }
        lines.push(String::new());
    }

    if selection != Selection::MetadataOnly && !report.tensors.is_empty() {
        lines.push("=== TENSORS ===".to_string());
        for tensor in &report.tensors {
            push_tensor_lines(&mut lines, tensor);
        }
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

/// Render the report as pretty-printed JSON.
///
/// The full view carries `file_size_human` and `total_parameters_human`
/// convenience fields next to the raw numbers.
pub fn render_json(report: &Report, selection: Selection) -> String {
    let full = serde_json::to_value(report).expect("report serialization is infallible");

    let value = match selection {
        Selection::Full => {
            let mut value = full;
            value["file_size_human"] =
                serde_json::Value::String(format_size(report.file_size));
            value["total_parameters_human"] =
                serde_json::Value::String(format_count(report.total_parameters));
            value
        },
        Selection::MetadataOnly => serde_json::json!({
            "file_path": full["file_path"],
            "metadata": full["metadata"],
        }),
        Selection::TensorsOnly => serde_json::json!({
            "file_path": full["file_path"],
            "tensors": full["tensors"],
            "tensor_count": full["tensor_count"],
            "total_parameters": full["total_parameters"],
        }),
    };

    serde_json::to_string_pretty(&value).expect("value serialization is infallible")
}
