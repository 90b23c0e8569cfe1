//! Invoice Eval CLI
//!
//! Scores invoice extraction predictions against labelled ground truth.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use invoice_eval::{
    FieldKind, Record, Value,
    config::Config,
    eval::{EvalDataset, Evaluator},
    extract::parse_prediction,
    standardise_value,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Invoice Eval - field-level accuracy scoring for invoice extraction models
#[derive(Parser)]
#[command(name = "invoice-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (per-field debug output)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a JSONL dataset of ground truth and model responses
    Score {
        /// Path to the dataset file (JSONL)
        dataset: PathBuf,

        /// JSONL file of {"id", "response"} rows to score instead of inline predictions
        #[arg(short, long)]
        predictions: Option<PathBuf>,

        /// Maximum number of items to evaluate
        #[arg(long)]
        max_items: Option<usize>,

        /// Save results to JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compare records as extracted, without standardisation
        #[arg(long)]
        raw: bool,
    },

    /// Print the canonical form of one raw value
    Standardise {
        /// Field kind (raw, integer, float, string, currency, date, address, bank-details, backend)
        kind: FieldKind,

        /// The raw value
        value: String,

        /// Parse the value as JSON instead of taking it as text
        #[arg(long)]
        json: bool,
    },

    /// Score one ground-truth document against one prediction
    Compare {
        /// Ground truth JSON file
        truth: PathBuf,

        /// Prediction file (JSON or a model response with a fenced JSON block)
        prediction: PathBuf,

        /// Compare records as extracted, without standardisation
        #[arg(long)]
        raw: bool,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Score {
            dataset,
            predictions,
            max_items,
            output,
            raw,
        } => cmd_score(dataset, predictions, max_items, output, raw),
        Commands::Standardise { kind, value, json } => cmd_standardise(kind, value, json),
        Commands::Compare {
            truth,
            prediction,
            raw,
        } => cmd_compare(truth, prediction, raw),
        Commands::Config => cmd_config(),
    }
}

fn load_config(raw: bool) -> Result<Config> {
    let mut config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    if raw {
        config.scoring.standardise = false;
    }
    Ok(config)
}

fn cmd_score(
    dataset_path: PathBuf,
    predictions: Option<PathBuf>,
    max_items: Option<usize>,
    output: Option<PathBuf>,
    raw: bool,
) -> Result<()> {
    let config = load_config(raw)?;

    let mut dataset = EvalDataset::load_jsonl(&dataset_path).context("Failed to load dataset")?;
    println!(
        "Loaded dataset: {} ({} items)",
        dataset.name,
        dataset.len()
    );

    if let Some(path) = predictions {
        let attached = dataset
            .attach_predictions(&path)
            .context("Failed to load predictions")?;
        println!("Attached {} predictions from {}", attached, path.display());
    }

    if dataset.is_empty() {
        bail!("Dataset {} has no items", dataset_path.display());
    }

    let results = Evaluator::new(config.scoring)
        .with_max_items(max_items)
        .run(&dataset);
    results.print_summary();

    if let Some(output_path) = output {
        results
            .save_json(&output_path)
            .context("Failed to save results")?;
        println!("Results saved to: {}", output_path.display());
    }

    Ok(())
}

fn cmd_standardise(kind: FieldKind, value: String, json: bool) -> Result<()> {
    let raw = if json {
        let parsed: serde_json::Value =
            serde_json::from_str(&value).context("Value is not valid JSON")?;
        Value::from(parsed)
    } else {
        Value::from(value)
    };

    let standardised = standardise_value(kind, &raw);
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::from(standardised))?
    );
    Ok(())
}

fn read_record(path: &Path) -> Result<Record> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;
    match Value::from(json) {
        Value::Record(record) => Ok(record),
        other => bail!(
            "Expected a JSON object in {}, found {}",
            path.display(),
            other.kind()
        ),
    }
}

fn cmd_compare(truth_path: PathBuf, prediction_path: PathBuf, raw: bool) -> Result<()> {
    let config = load_config(raw)?;

    let truth = read_record(&truth_path)?;
    let response = fs::read_to_string(&prediction_path)
        .with_context(|| format!("Failed to read {}", prediction_path.display()))?;
    let prediction = parse_prediction(&response);

    let accumulator = Evaluator::new(config.scoring).compare(truth, prediction);
    let report = accumulator.report();

    println!("Matched fields: {}/{}", report.true_positive, report.count);
    println!("Accuracy:       {:.2}%", report.accuracy * 100.0);
    for (path, tally) in &report.fields {
        let mark = if tally.true_positive == tally.count {
            "ok"
        } else {
            "MISS"
        };
        println!("  [{:>4}] {}", mark, path);
    }

    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match Config::config_file_path() {
        Some(path) if path.exists() => println!("# Config file: {}", path.display()),
        Some(path) => println!("# Config file: {} (not found, using defaults)", path.display()),
        None => println!("# Config file: unavailable on this platform"),
    }
    print!("{}", serde_yaml::to_string(&config)?);

    if let Err(e) = config.validate() {
        println!("# Warning: {}", e);
    }
    Ok(())
}
