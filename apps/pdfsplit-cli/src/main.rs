//! pdfsplit - split a PDF into several files from the command line

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use pdfsplit_core::{split_pdf_with_config, PdfSplitError, SplitConfig, SplitMode, SplitPlan};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "pdfsplit")]
#[command(version, about = "Split a PDF into several PDFs by page count, ranges or selection")]
struct Args {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Split mode: pages, range or extract
    #[arg(short, long)]
    mode: SplitMode,

    /// Pages per file ("3"), ranges ("1-3, 5") or pages to extract ("1, 4-6")
    #[arg(short, long)]
    spec: String,

    /// Directory for the output files
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Write uncompressed content streams
    #[arg(long)]
    no_compress: bool,

    /// Base name used when the input name has no usable stem
    #[arg(long, value_name = "NAME")]
    base_name: Option<String>,
}

impl Args {
    fn config(&self) -> SplitConfig {
        let config = SplitConfig::default().with_compression(!self.no_compress);
        match &self.base_name {
            Some(name) => config.with_fallback_base_name(name),
            None => config,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(log_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args) {
        Ok(written) => {
            tracing::info!(files = written.len(), "Split complete");
            for path in written {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<PdfSplitError>() {
                Some(split_err) => eprintln!("Error: {}", split_err.user_message()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn log_filter() -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Split `args.input` and write every result into `args.output_dir`.
fn run(args: &Args) -> anyhow::Result<Vec<PathBuf>> {
    let plan = SplitPlan::from_text(args.mode.as_str(), &args.spec)?;

    let bytes = fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let original_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::info!(
        input = %args.input.display(),
        mode = %args.mode,
        size = bytes.len(),
        "Splitting"
    );
    let results = split_pdf_with_config(&bytes, &original_name, &plan, &args.config())?;
    if results.is_empty() {
        tracing::warn!("No range falls inside the document; nothing written");
    }

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    results
        .iter()
        .map(|result| {
            let path = output_path(&args.output_dir, &result.filename);
            fs::write(&path, &result.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), pages = result.page_count, "Wrote file");
            Ok(path)
        })
        .collect()
}

fn output_path(dir: &Path, filename: &str) -> PathBuf {
    dir.join(filename)
}
