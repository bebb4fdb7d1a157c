//! pdfbatch CLI - batch PDF extraction to JSON and a CSV report

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfbatch::{process_folder_with, BatchOptions};

#[derive(Parser)]
#[command(name = "pdfbatch")]
#[command(version)]
#[command(about = "Extract and process data from PDFs", long_about = None)]
struct Cli {
    /// Path to the folder containing PDFs
    #[arg(value_name = "FOLDER")]
    folder_path: PathBuf,

    /// Path to save the extracted data and report
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Filter PDFs by a keyword in the filename
    #[arg(long, value_name = "KEYWORD")]
    filter: Option<String>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli.folder_path, cli.output_dir, cli.filter) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(
    folder: &Path,
    output_dir: PathBuf,
    filter: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = BatchOptions::new(output_dir).with_optional_filter(filter);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let outcome = process_folder_with(folder, &options, |position, total, path| {
        pb.set_length(total as u64);
        pb.set_position(position as u64 - 1);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        pb.set_message(name);
    });

    match outcome {
        Ok(outcome) => {
            pb.finish_and_clear();
            println!(
                "Process completed. Report saved at {}",
                outcome.report_path.display()
            );
            println!(
                "  {} {} file(s) processed",
                "└─".dimmed(),
                outcome.results.len().to_string().green()
            );
            Ok(())
        }
        Err(e) => {
            pb.abandon();
            Err(e.into())
        }
    }
}
