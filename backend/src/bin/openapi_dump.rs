//! Print the OpenAPI document as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gameconnect::doc::ApiDoc;
use utoipa::OpenApi;

/// Dump the GameConnect OpenAPI document.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", version)]
struct Cli {
    /// Write to this file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Emit compact rather than pretty-printed JSON.
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let doc = ApiDoc::openapi();
    let rendered = if cli.compact {
        doc.to_json()
    } else {
        doc.to_pretty_json()
    };
    let json = match rendered {
        Ok(json) => json,
        Err(err) => {
            eprintln!("failed to serialise OpenAPI document: {err}");
            return ExitCode::FAILURE;
        }
    };
    match cli.output {
        Some(path) => {
            if let Err(err) = std::fs::write(&path, json) {
                eprintln!("failed to write {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        }
        None => println!("{json}"),
    }
    ExitCode::SUCCESS
}
