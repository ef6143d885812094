//! CLI binary for writings-corpus.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PipelineConfig` / `HubConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use writings_corpus::{
    assemble_corpus, convert_pdf_directory, update_dataset, ConversionProgressCallback,
    CorpusLayout, HubConfig, PipelineConfig, ProgressCallback, Publisher, UpdateOptions,
    VersionMetadata, VersionStore, VersionTag,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over all candidate documents, with a
/// log line for every document that was converted or skipped.
struct CliProgressCallback {
    bar: ProgressBar,
    existing: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_run_start` reports the candidate count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Listing documents…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            existing: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>5}/{len} documents  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total: usize) {
        self.activate_bar(total);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total} candidate documents"))
        ));
    }

    fn on_document_start(&self, name: &str, _index: usize, _total: usize) {
        self.bar.set_message(name.to_string());
    }

    fn on_document_converted(
        &self,
        name: &str,
        index: usize,
        total: usize,
        text_len: usize,
        failed_pages: usize,
        empty_pages: usize,
    ) {
        self.bar.println(format!(
            "  {} {:>5}/{:<5}  {}  {}",
            green("✓"),
            index,
            total,
            name,
            dim(&format!("{text_len} bytes")),
        ));
        if failed_pages > 0 {
            self.bar.println(format!(
                "  {} {:>11}  {}",
                red("⚠"),
                "",
                red(&format!("{failed_pages} page(s) failed to extract"))
            ));
        }
        if empty_pages > 0 {
            self.bar.println(format!(
                "  {} {:>11}  {}",
                cyan("⚠"),
                "",
                dim(&format!("{empty_pages} page(s) had no text"))
            ));
        }
        self.bar.inc(1);
    }

    fn on_document_existing(&self, _name: &str, _index: usize, _total: usize) {
        self.existing.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
    }

    fn on_document_skipped(&self, name: &str, index: usize, total: usize, reason: &str) {
        let msg = if reason.chars().count() > 80 {
            let cut: String = reason.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            reason.to_string()
        };
        self.bar.println(format!(
            "  {} {:>5}/{:<5}  {}  {}",
            red("✗"),
            index,
            total,
            name,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total: usize, processed: usize, skipped: usize) {
        self.bar.finish_and_clear();
        let existing = self.existing.load(Ordering::SeqCst);
        eprintln!(
            "{} {} converted, {} already processed, {} skipped  (of {})",
            if skipped == 0 { green("✔") } else { cyan("⚠") },
            bold(&processed.to_string()),
            existing,
            if skipped == 0 {
                skipped.to_string()
            } else {
                red(&skipped.to_string())
            },
            total
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert new PDFs under data/full into data/texts
  writings convert

  # Rebuild data/texts.csv from data/texts
  writings assemble --layout extended --metadata-dir data/meta

  # Snapshot the corpus as the next version
  writings version

  # Convert, assemble, snapshot and publish in one go
  writings update --convert --push

  # Re-publish every version into a freshly created repository
  writings publish --fresh

ENVIRONMENT VARIABLES:
  HF_TOKEN                Access token for the dataset hub
  WRITINGS_REPO_ID        Dataset repository (namespace/name)
  WRITINGS_HUB_ENDPOINT   Hub base URL
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  RUST_LOG                Overrides the log filter

SETUP:
  The converter loads pdfium at runtime. Place libpdfium in the working
  directory, install it system-wide, or point PDFIUM_LIB_PATH at it.
"#;

/// Build, version and publish the Turkish writings corpus.
#[derive(Parser, Debug)]
#[command(
    name = "writings",
    version,
    about = "Build, version and publish the Turkish writings corpus",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory of crawled PDF documents.
    #[arg(long, global = true, env = "WRITINGS_INPUT_DIR", default_value = "data/full")]
    input_dir: PathBuf,

    /// Directory of per-document text files.
    #[arg(long, global = true, env = "WRITINGS_TEXT_DIR", default_value = "data/texts")]
    text_dir: PathBuf,

    /// Path of the assembled corpus CSV.
    #[arg(long, global = true, env = "WRITINGS_CORPUS", default_value = "data/texts.csv")]
    corpus: PathBuf,

    /// Root directory of version snapshots.
    #[arg(long, global = true, env = "WRITINGS_VERSIONS_DIR", default_value = "versions")]
    versions_dir: PathBuf,

    /// Dataset name used in version descriptions and the dataset card.
    #[arg(long, global = true, env = "WRITINGS_DATASET_NAME",
          default_value = writings_corpus::config::DEFAULT_DATASET_NAME)]
    dataset_name: String,

    /// Corpus CSV columns.
    #[arg(long, global = true, value_enum, default_value = "minimal")]
    layout: LayoutArg,

    /// Directory of `<file name>.json` metadata sidecars (extended layout).
    #[arg(long, global = true, env = "WRITINGS_METADATA_DIR")]
    metadata_dir: Option<PathBuf>,

    /// Dataset repository, `namespace/name`.
    #[arg(long, global = true, env = "WRITINGS_REPO_ID",
          default_value = writings_corpus::config::DEFAULT_REPO_ID)]
    repo_id: String,

    /// Dataset hub base URL.
    #[arg(long, global = true, env = "WRITINGS_HUB_ENDPOINT",
          default_value = writings_corpus::config::DEFAULT_HUB_ENDPOINT)]
    hub_endpoint: String,

    /// Per-request hub timeout in seconds.
    #[arg(long, global = true, default_value_t = 300)]
    hub_timeout: u64,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, global = true, env = "WRITINGS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every new PDF in the input directory to a text file.
    Convert,
    /// Assemble all text files into the corpus CSV.
    Assemble,
    /// Snapshot the current corpus as a new version.
    Version {
        /// Version number. Default: one past the latest.
        #[arg(long)]
        number: Option<u32>,
    },
    /// Show the latest version.
    Latest,
    /// Upload versions to the dataset hub.
    Publish {
        /// Delete and recreate the repository first.
        #[arg(long)]
        fresh: bool,
        /// Upload only this version (e.g. v2) as default and named config.
        #[arg(long)]
        only: Option<String>,
    },
    /// Create a new version, optionally converting first and pushing after.
    Update {
        /// Version number. Default: one past the latest.
        #[arg(long)]
        version: Option<u32>,
        /// Push the new version to the dataset hub.
        #[arg(long)]
        push: bool,
        /// Convert PDFs and rebuild the corpus before versioning.
        #[arg(long)]
        convert: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Minimal,
    Extended,
}

impl From<LayoutArg> for CorpusLayout {
    fn from(v: LayoutArg) -> Self {
        match v {
            LayoutArg::Minimal => CorpusLayout::Minimal,
            LayoutArg::Extended => CorpusLayout::Extended,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs while a conversion is running.
    let converting = matches!(
        cli.command,
        Command::Convert | Command::Update { convert: true, .. }
    );
    let show_progress = converting && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    match &cli.command {
        Command::Convert => {
            let summary = convert_pdf_directory(config)
                .await
                .context("Conversion failed")?;
            if cli.json {
                print_json(&summary)?;
            } else if !cli.quiet && !show_progress {
                eprintln!(
                    "Converted {} documents ({} already processed, {} skipped) in {}ms",
                    summary.processed,
                    summary.already_processed,
                    summary.skipped,
                    summary.duration_ms
                );
            }
        }

        Command::Assemble => {
            let summary = assemble_corpus(&config).context("Corpus assembly failed")?;
            if cli.json {
                print_json(&summary)?;
            } else if !cli.quiet {
                eprintln!(
                    "{}  {} rows  →  {}",
                    green("✔"),
                    summary.rows,
                    bold(&summary.path.display().to_string())
                );
                if summary.decode_failures > 0 {
                    eprintln!("   {} files could not be decoded", summary.decode_failures);
                }
            }
        }

        Command::Version { number } => {
            let store = VersionStore::from_config(&config);
            store
                .initialize(&config.corpus_path)
                .context("Failed to initialize version store")?;
            let tag = match number {
                Some(n) => format!("v{n}").parse::<VersionTag>()?,
                None => store.next_tag()?,
            };
            let meta = store
                .create_version(tag, &config.corpus_path)
                .with_context(|| format!("Failed to create version {tag}"))?;
            print_version(&cli, &meta)?;
        }

        Command::Latest => {
            let store = VersionStore::from_config(&config);
            match store.latest().context("Failed to read versions")? {
                Some(meta) => print_version(&cli, &meta)?,
                None if cli.json => println!("null"),
                None => println!("No versions under {}", config.versions_dir.display()),
            }
        }

        Command::Publish { fresh, only } => {
            let store = VersionStore::from_config(&config);
            store
                .initialize(&config.corpus_path)
                .context("Failed to initialize version store")?;
            let publisher = Publisher::new(build_hub(&cli)?, store)?;
            let report = match only {
                Some(v) => {
                    let tag: VersionTag = v.parse()?;
                    publisher.publish_version(tag).await
                }
                None => publisher
                    .publish_all(*fresh)
                    .await
                    .context("Publishing failed")?,
            };
            if !cli.quiet {
                eprintln!("{}", bold("Upload summary:"));
                eprint!("{report}");
                if report.all_succeeded() && !report.uploads.is_empty() {
                    eprintln!(
                        "{} Dataset available at {}",
                        green("✔"),
                        publisher.client().dataset_url()
                    );
                } else {
                    eprintln!("{} Some uploads failed; see the log above.", cyan("⚠"));
                }
            }
        }

        Command::Update {
            version,
            push,
            convert,
        } => {
            let options = UpdateOptions {
                version: *version,
                push: *push,
                convert: *convert,
            };
            let report = update_dataset(&config, &build_hub(&cli)?, &options)
                .await
                .context("Dataset update failed")?;
            if cli.json {
                print_json(&report.created)?;
            } else if !cli.quiet {
                eprintln!(
                    "{}  {} created with {} entries",
                    green("✔"),
                    bold(&report.created.version),
                    report.entries
                );
                if let Some(publish) = report.publish {
                    eprint!("{publish}");
                }
            }
        }
    }

    Ok(())
}

/// Map CLI args to `PipelineConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder()
        .input_dir(&cli.input_dir)
        .text_dir(&cli.text_dir)
        .corpus_path(&cli.corpus)
        .versions_dir(&cli.versions_dir)
        .dataset_name(&cli.dataset_name)
        .layout(cli.layout.into());

    if let Some(ref dir) = cli.metadata_dir {
        builder = builder.metadata_dir(dir);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Map CLI args to `HubConfig`. The token comes from `HF_TOKEN`.
fn build_hub(cli: &Cli) -> Result<HubConfig> {
    HubConfig::builder()
        .endpoint(&cli.hub_endpoint)
        .repo_id(&cli.repo_id)
        .timeout_secs(cli.hub_timeout)
        .build()
        .context("Invalid hub configuration")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialise output")?
    );
    Ok(())
}

fn print_version(cli: &Cli, meta: &VersionMetadata) -> Result<()> {
    if cli.json {
        return print_json(meta);
    }
    println!("Version:      {}", meta.version);
    println!("Created:      {}", meta.date_created);
    match meta.num_entries {
        Some(n) => println!("Entries:      {n}"),
        None => println!("Entries:      unknown"),
    }
    if let Some(ref d) = meta.description {
        println!("Description:  {d}");
    }
    Ok(())
}
