//! PQLens command line interface.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use walkdir::WalkDir;

use pqlens_report_processing::violations::write_violation_csv;
use pqlens_report_processing::{DocumentProcessor, ReportEmitter};
use pqlens_utils::{init_logging, AppConfig};

#[derive(Parser)]
#[command(
    name = "pqlens",
    version,
    about = "Harmonic distortion table extraction for power-quality PDF reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process each document into its own workbook and violation report
    Extract {
        /// PDF files or directories to scan for PDFs
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory for the generated files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Pack all documents' tables into a single batch workbook
    Batch {
        /// PDF files or directories to scan for PDFs
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Path of the batch workbook
        #[arg(short, long, default_value = "harmonics_batch.xlsx")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let config = AppConfig::load_or_default();
    init_logging(&config.logging)?;

    let cli = Cli::parse();
    let processor = DocumentProcessor::new(config);

    match cli.command {
        Command::Extract { inputs, output_dir } => extract(&processor, &inputs, &output_dir),
        Command::Batch { inputs, output } => batch(&processor, &inputs, &output),
    }
}

fn extract(processor: &DocumentProcessor, inputs: &[PathBuf], output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;
    let emitter = ReportEmitter::new(&processor.config().output);

    let mut failures = 0usize;
    for path in collect_pdfs(inputs) {
        if let Err(e) = extract_one(processor, &emitter, &path, output_dir) {
            tracing::error!(document = %path.display(), error = %e, "document failed");
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} document(s) failed");
    }
    Ok(())
}

fn extract_one(
    processor: &DocumentProcessor,
    emitter: &ReportEmitter,
    path: &Path,
    output_dir: &Path,
) -> Result<()> {
    let processed = processor.process_path(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    emitter.write_document_workbook(
        &output_dir.join(format!("{stem}_tables.xlsx")),
        &processed.splits(),
    )?;

    if !processed.violations.is_empty() {
        let csv_path = output_dir.join(format!("{stem}_violations.csv"));
        let file = File::create(&csv_path)
            .with_context(|| format!("creating {}", csv_path.display()))?;
        write_violation_csv(file, &processed.violations)?;
    }

    if let Some(weekly) = &processed.weekly {
        let json_path = output_dir.join(format!("{stem}_summary.json"));
        let file = File::create(&json_path)
            .with_context(|| format!("creating {}", json_path.display()))?;
        serde_json::to_writer_pretty(file, weekly)?;
    }

    Ok(())
}

fn batch(processor: &DocumentProcessor, inputs: &[PathBuf], output: &Path) -> Result<()> {
    let emitter = ReportEmitter::new(&processor.config().output);

    let mut documents = Vec::new();
    let mut failures = 0usize;
    for path in collect_pdfs(inputs) {
        match processor.process_path(&path) {
            Ok(processed) => {
                documents.push((processed.report.file_name.clone(), processed.tables));
            }
            Err(e) => {
                tracing::error!(document = %path.display(), error = %e, "document failed");
                failures += 1;
            }
        }
    }

    emitter.write_batch_workbook(output, &documents)?;

    if failures > 0 {
        anyhow::bail!("{failures} document(s) failed");
    }
    Ok(())
}

/// Expands the input arguments: files pass through, directories are walked
/// for `.pdf` files.
fn collect_pdfs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_file() && is_pdf(path) {
                    paths.push(path.to_path_buf());
                }
            }
        } else {
            paths.push(input.clone());
        }
    }
    paths.sort();
    paths
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
