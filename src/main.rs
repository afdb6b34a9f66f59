//! Revisar CLI - SafeTensors model inspector
//!
//! Reads a `.safetensors` file and prints every tensor's name, shape,
//! dtype, parameter count and byte size, plus any embedded metadata,
//! without loading tensor data.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use revisar::cli::{self, OutputFormat, Selection};

/// Revisar - SafeTensors model inspector
///
/// Examples:
///   revisar model.safetensors
///   revisar model.safetensors --format json
///   revisar model.safetensors --metadata-only
///   revisar model.safetensors --tensors-only --format json
#[derive(Parser)]
#[command(name = "revisar")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a .safetensors file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Show only metadata information
    #[arg(long, conflicts_with = "tensors_only")]
    metadata_only: bool,

    /// Show only tensor information
    #[arg(long)]
    tensors_only: bool,
}

impl Cli {
    fn selection(&self) -> Selection {
        if self.metadata_only {
            Selection::MetadataOnly
        } else if self.tensors_only {
            Selection::TensorsOnly
        } else {
            Selection::Full
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli::run(&cli.file, cli.format, cli.selection()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_defaults() {
        let cli = Cli::parse_from(["revisar", "model.safetensors"]);
        assert_eq!(cli.file, PathBuf::from("model.safetensors"));
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.selection(), Selection::Full);
    }

    #[test]
    fn test_cli_parsing_json_format() {
        let cli = Cli::parse_from(["revisar", "m.safetensors", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_parsing_metadata_only() {
        let cli = Cli::parse_from(["revisar", "m.safetensors", "--metadata-only"]);
        assert_eq!(cli.selection(), Selection::MetadataOnly);
    }

    #[test]
    fn test_cli_parsing_tensors_only() {
        let cli = Cli::parse_from(["revisar", "m.safetensors", "--tensors-only"]);
        assert_eq!(cli.selection(), Selection::TensorsOnly);
    }

    #[test]
    fn test_cli_rejects_conflicting_filters() {
        let result =
            Cli::try_parse_from(["revisar", "m.safetensors", "--metadata-only", "--tensors-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_file_argument() {
        let result = Cli::try_parse_from(["revisar"]);
        assert!(result.is_err());
    }
}
