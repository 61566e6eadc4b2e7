use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use patent_abstract_core::config_file::{self, ConfigFile};
use patent_abstract_core::{PdfBackend, TextBackend};
use patent_abstract_eval::{Corpus, EvalProgress};
use patent_abstract_mupdf::MupdfBackend;
use patent_abstract_parsing::{AbstractConfigBuilder, AbstractExtractor, Extraction};

mod output;

use output::{ColorMode, FileRecord};

/// Patent Abstract Extractor - Recover the abstract paragraph from patent PDFs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML config file (overrides PATENT_ABSTRACT_CONFIG and the default locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the abstract from one or more PDFs (or form-feed separated .txt files)
    Extract {
        /// Documents to process
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit a JSON array of {file, abstract, error} records
        #[arg(long)]
        json: bool,

        /// Show the layout decision and how every line after the heading was classified
        #[arg(long)]
        explain: bool,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Heading x-position (fraction of page width) above which page 1 is clipped to a column
        #[arg(long)]
        column_threshold: Option<f32>,

        /// Number of leading pages to scan
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Score extraction against a labelled TOML corpus
    Evaluate {
        /// Corpus file with [[cases]] entries of `path` and `abstract`
        corpus: PathBuf,

        /// Print expected and actual text for every case without an exact match
        #[arg(long)]
        show_failures: bool,

        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = load_file_config(cli.config.as_deref())?;

    match cli.command {
        Command::Extract {
            files,
            json,
            explain,
            output,
            no_color,
            column_threshold,
            max_pages,
        } => extract(
            &files,
            &file_config,
            json,
            explain,
            output,
            no_color,
            column_threshold,
            max_pages,
        ),
        Command::Evaluate {
            corpus,
            show_failures,
            json,
            output,
            no_color,
        } => evaluate(&corpus, &file_config, show_failures, json, output, no_color),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the config file: `--config` > `PATENT_ABSTRACT_CONFIG` > default locations.
fn load_file_config(explicit: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("PATENT_ABSTRACT_CONFIG").ok().map(PathBuf::from));

    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            config_file::load_from_path(&path)
                .ok_or_else(|| anyhow::anyhow!("Invalid config file: {}", path.display()))
        }
        None => Ok(config_file::load_config()),
    }
}

/// Backends by input kind: `.txt` is pre-extracted text, anything else goes to MuPDF.
struct Backends {
    text: TextBackend,
    mupdf: MupdfBackend,
}

impl Backends {
    fn new() -> Self {
        Self {
            text: TextBackend::new(),
            mupdf: MupdfBackend::new(),
        }
    }

    fn for_path(&self, path: &Path) -> &dyn PdfBackend {
        let is_text = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);
        if is_text { &self.text } else { &self.mupdf }
    }
}

fn open_writer(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    })
}

fn color_mode(no_color: bool, output: Option<&Path>, file_config: &ConfigFile) -> ColorMode {
    let configured = file_config
        .output
        .as_ref()
        .and_then(|o| o.color)
        .unwrap_or(true);
    ColorMode(!no_color && output.is_none() && configured)
}

fn wants_json(flag: bool, file_config: &ConfigFile) -> bool {
    flag || file_config
        .output
        .as_ref()
        .and_then(|o| o.json)
        .unwrap_or(false)
}

fn build_extractor(
    file_config: &ConfigFile,
    column_threshold: Option<f32>,
    max_pages: Option<usize>,
) -> anyhow::Result<AbstractExtractor> {
    // CLI flags > config file > defaults
    let mut builder = AbstractConfigBuilder::from_config_file(file_config);
    if let Some(threshold) = column_threshold {
        builder = builder.column_threshold(threshold);
    }
    if let Some(pages) = max_pages {
        builder = builder.max_pages(pages);
    }
    Ok(AbstractExtractor::with_config(builder.build()?))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[allow(clippy::too_many_arguments)]
fn extract(
    files: &[PathBuf],
    file_config: &ConfigFile,
    json: bool,
    explain: bool,
    output: Option<PathBuf>,
    no_color: bool,
    column_threshold: Option<f32>,
    max_pages: Option<usize>,
) -> anyhow::Result<()> {
    let extractor = build_extractor(file_config, column_threshold, max_pages)?;
    let backends = Backends::new();
    let json = wants_json(json, file_config);
    let color = color_mode(no_color, output.as_deref(), file_config);
    let mut writer = open_writer(output.as_deref())?;

    let mut records = Vec::with_capacity(files.len());
    let mut failed = 0usize;

    for path in files {
        let file_name = display_name(path);
        let backend = backends.for_path(path);

        let result = if explain && !json {
            explain_document(&extractor, path, backend, &file_name, &mut writer, color)
        } else {
            extractor.extract(path, backend).map_err(anyhow::Error::from)
        };

        match result {
            Ok(extraction) => {
                if json {
                    records.push(FileRecord::from_extraction(&file_name, &extraction));
                } else {
                    output::print_abstract(&mut writer, &file_name, &extraction, color)?;
                }
            }
            Err(e) => {
                failed += 1;
                tracing::debug!(path = %path.display(), error = %e, "could not open document");
                if json {
                    records.push(FileRecord::from_error(&file_name, &e));
                } else {
                    output::print_open_error(&mut writer, &file_name, &e, color)?;
                }
            }
        }
    }

    if json {
        serde_json::to_writer_pretty(&mut writer, &records)?;
        writeln!(writer)?;
    }
    writer.flush()?;

    if failed > 0 {
        anyhow::bail!("{} of {} documents could not be opened", failed, files.len());
    }
    Ok(())
}

/// Run the pipeline stage by stage, printing the classification trace before
/// the abstract itself.
fn explain_document(
    extractor: &AbstractExtractor,
    path: &Path,
    backend: &dyn PdfBackend,
    file_name: &str,
    writer: &mut Box<dyn Write>,
    color: ColorMode,
) -> anyhow::Result<Extraction> {
    let document = backend.open(path)?;
    let scanned = extractor.scan_document(document.as_ref());
    let records = extractor
        .find_abstract_section(&scanned.text)
        .map(|section| extractor.classify_lines(section));

    if color.enabled() {
        use owo_colors::OwoColorize;
        writeln!(writer, "{} {}", "EXPLAIN:".bold().cyan(), file_name.bold())?;
    } else {
        writeln!(writer, "EXPLAIN: {}", file_name)?;
    }
    output::print_explain(writer, &scanned.layout, records.as_deref(), color)?;
    writeln!(writer)?;

    Ok(extractor.extract_from_text(&scanned.text))
}

fn evaluate(
    corpus_path: &Path,
    file_config: &ConfigFile,
    show_failures: bool,
    json: bool,
    output: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    if !corpus_path.exists() {
        anyhow::bail!("Corpus not found: {}", corpus_path.display());
    }
    let corpus = Corpus::load(corpus_path)?;
    if corpus.is_empty() {
        tracing::warn!(path = %corpus_path.display(), "corpus has no cases");
    }

    let extractor = build_extractor(file_config, None, None)?;
    let backends = Backends::new();
    let json = wants_json(json, file_config);
    let color = color_mode(no_color, output.as_deref(), file_config);

    let bar = ProgressBar::new(corpus.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {msg} [{bar:40.green/dim}] {pos}/{len} (eta {eta})",
        )?
        .progress_chars("=> "),
    );
    bar.set_message("Evaluating");

    let parser = |path: &Path| match extractor.extract(path, backends.for_path(path)) {
        Ok(extraction) => extraction.into_text().unwrap_or_default(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "could not open corpus document");
            String::new()
        }
    };
    let report = patent_abstract_eval::evaluate_with_progress(&corpus, parser, |event| {
        if let EvalProgress::CaseFinished { .. } = event {
            bar.inc(1);
        }
    });
    bar.finish_and_clear();

    let mut writer = open_writer(output.as_deref())?;
    if json {
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
    } else {
        if show_failures {
            output::print_failures(&mut writer, &report, color)?;
        }
        output::print_evaluation_summary(&mut writer, &report, color)?;
    }
    writer.flush()?;
    Ok(())
}
