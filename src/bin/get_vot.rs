use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;
use vot_rs::{
    annotated_output_path, list_textgrids, read_document, run_batch, write_annotated,
    LoadedDocument, OutputFormat, ResultTable, VotConfig, VotExtractorBuilder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormatArg {
    Csv,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "get_vot")]
#[command(about = "Measure voice onset time and closure duration from annotated TextGrids")]
struct Args {
    /// Directory holding the annotated `.TextGrid` files.
    #[arg(long, env = "VOT_INPUT_DIR")]
    input_dir: PathBuf,
    /// JSON file with extraction parameters; command-line values win.
    #[arg(long, env = "VOT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "VOT_OUT", default_value = "vot_results.csv")]
    out: PathBuf,
    #[arg(
        long,
        env = "VOT_OUTPUT_FORMAT",
        value_enum,
        default_value_t = OutputFormatArg::Csv
    )]
    output_format: OutputFormatArg,
    #[arg(long, env = "VOT_WORD_TIER")]
    word_tier: Option<usize>,
    #[arg(long, env = "VOT_SEGMENT_TIER")]
    segment_tier: Option<usize>,
    #[arg(long, env = "VOT_PHONE_TIER")]
    phone_tier: Option<usize>,
    #[arg(long, env = "VOT_SOURCE_TIER")]
    source_tier: Option<usize>,
    #[arg(long, env = "VOT_PERCENT_VOICING")]
    percent_voicing: Option<f64>,
    /// Comma-separated Segment-tier labels to measure, e.g. `b,d,g,p,t,k`.
    #[arg(long, env = "VOT_SEGMENTS", value_delimiter = ',')]
    segments: Option<Vec<String>>,
    /// Append a `VOT` tier to an annotated copy of each TextGrid.
    #[arg(long, env = "VOT_VOT_TIER")]
    vot_tier: bool,
    /// Append a `CLO` tier to an annotated copy of each TextGrid.
    #[arg(long, env = "VOT_CLO_TIER")]
    clo_tier: bool,
    #[arg(long, env = "VOT_ANNOTATED_DIR")]
    annotated_dir: Option<PathBuf>,
    #[arg(long, env = "VOT_ANNOTATED_SUFFIX", default_value = "_vot")]
    annotated_suffix: String,
    /// Replace an existing result table without asking.
    #[arg(long, env = "VOT_OVERWRITE")]
    overwrite: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("get_vot: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let config = build_config(&args)?;
    let format = OutputFormat::from(args.output_format);

    let mut inputs = list_textgrids(&args.input_dir).map_err(|err| err.to_string())?;
    if args.annotated_dir.is_none() && !args.annotated_suffix.is_empty() {
        // Annotated copies from an earlier run live next to the inputs.
        inputs.retain(|path| !is_annotated_copy(path, &args.annotated_suffix));
    }
    if inputs.is_empty() {
        return Err(format!(
            "No TextGrid files found in '{}'.",
            args.input_dir.display()
        ));
    }

    if args.out.exists() && !args.overwrite && !confirm_overwrite(&args.out)? {
        return Err(format!(
            "Result table '{}' already exists; rerun with --overwrite to replace it.",
            args.out.display()
        ));
    }

    // The table is replaced before any document is read.
    ResultTable::default()
        .write(&args.out, format, &config)
        .map_err(|err| err.to_string())?;

    let annotate = config.vot_tier || config.clo_tier;
    let extractor = VotExtractorBuilder::new(config.clone())
        .build()
        .map_err(|err| err.to_string())?;

    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("starting...");

    let result = run_batch(
        &extractor,
        &inputs,
        |path: &PathBuf| {
            progress.set_message(path.display().to_string());
            read_document(path)
        },
        |path, loaded: &LoadedDocument, outcome, table| {
            if annotate {
                let out_path = annotated_output_path(
                    path,
                    args.annotated_dir.as_deref(),
                    &args.annotated_suffix,
                )?;
                write_annotated(loaded, &outcome.annotation_tiers, &out_path)?;
            }
            table.write(&args.out, format, &config)?;
            progress.inc(1);
            Ok(())
        },
    );
    progress.finish_and_clear();

    let summary = result.map_err(|err| {
        format!("{err}. Fix the annotation and rerun; later files were not processed.")
    })?;
    tracing::info!(
        documents = summary.table.documents,
        rows = summary.table.rows.len(),
        skipped_words = summary.skipped_words,
        out = %args.out.display(),
        "vot: batch complete"
    );
    Ok(())
}

fn build_config(args: &Args) -> Result<VotConfig, String> {
    let mut config = match args.config.as_ref() {
        Some(path) => VotConfig::load(path).map_err(|err| err.to_string())?,
        None => VotConfig::default(),
    };
    if let Some(word_tier) = args.word_tier {
        config.word_tier = word_tier;
    }
    if let Some(segment_tier) = args.segment_tier {
        config.segment_tier = segment_tier;
    }
    if let Some(phone_tier) = args.phone_tier {
        config.phone_tier = phone_tier;
    }
    if args.source_tier.is_some() {
        config.source_tier = args.source_tier;
    }
    if let Some(percent_voicing) = args.percent_voicing {
        config.percent_voicing = percent_voicing;
    }
    if let Some(segments) = args.segments.as_ref() {
        config = config.with_segments(segments.iter().cloned());
    }
    config.vot_tier |= args.vot_tier;
    config.clo_tier |= args.clo_tier;
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn is_annotated_copy(path: &Path, suffix: &str) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(suffix))
}

/// Asks on the terminal before replacing the result table. Without a terminal
/// the answer is no.
fn confirm_overwrite(path: &Path) -> Result<bool, String> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(false);
    }
    eprint!(
        "Result table '{}' already exists. Overwrite? [y/N] ",
        path.display()
    );
    io::stderr()
        .flush()
        .map_err(|err| format!("Failed to flush prompt: {err}"))?;
    let mut answer = String::new();
    stdin
        .lock()
        .read_line(&mut answer)
        .map_err(|err| format!("Failed to read answer: {err}"))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}
