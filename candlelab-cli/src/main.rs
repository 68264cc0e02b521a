//! CandleLab CLI: annotate candle files with indicator columns and buy/sell signals.
//!
//! Commands:
//! - `annotate`: run one strategy over one candle CSV
//! - `batch`: annotate every `*.csv` in a directory, in parallel
//! - `config`: print the effective strategy configuration as TOML
//! - `synth`: write deterministic synthetic candles

use anyhow::{bail, Context, Result};
use candlelab_core::config::{Preset, StrategyConfig};
use candlelab_core::data::{csv as candle_csv, json as candle_json, synthetic};
use candlelab_core::domain::{PairMetadata, Timeframe};
use candlelab_core::engine::{analyze, Analysis};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "candlelab",
    about = "CandleLab CLI: indicator and signal engine for candle strategies"
)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the strategy comes from. Shared by every command that analyzes.
#[derive(clap::Args, Clone)]
struct StrategyArgs {
    /// Built-in preset: rsi_bbands, sma_cross.
    #[arg(long, default_value = "rsi_bbands")]
    preset: Preset,

    /// TOML config; keys it omits fall back to the preset.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl StrategyArgs {
    fn resolve(&self) -> Result<StrategyConfig> {
        match &self.config {
            Some(path) => StrategyConfig::load_over(path, self.preset)
                .with_context(|| format!("loading config {}", path.display())),
            None => Ok(self.preset.config()),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate one candle CSV with indicator and signal columns.
    Annotate {
        /// Candle CSV (timestamp, open, high, low, close, volume).
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        strategy: StrategyArgs,

        /// Pair name. Defaults to the input file stem.
        #[arg(long)]
        pair: Option<String>,

        /// Candle timeframe (e.g. 30m, 1h). Defaults to the strategy timeframe.
        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Annotate every `*.csv` in a directory; one output file per pair.
    Batch {
        #[arg(long)]
        input_dir: PathBuf,

        #[arg(long)]
        output_dir: PathBuf,

        #[command(flatten)]
        strategy: StrategyArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Print the effective strategy configuration as TOML.
    Config {
        #[command(flatten)]
        strategy: StrategyArgs,
    },
    /// Write synthetic random-walk candles as CSV.
    Synth {
        #[arg(long, default_value_t = 500)]
        rows: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value = "30m")]
        timeframe: Timeframe,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Annotate {
            input,
            strategy,
            pair,
            timeframe,
            output,
            format,
        } => run_annotate(
            &input,
            &strategy.resolve()?,
            pair,
            timeframe,
            output.as_deref(),
            format,
        ),
        Commands::Batch {
            input_dir,
            output_dir,
            strategy,
            format,
        } => {
            let summary = run_batch(&input_dir, &output_dir, &strategy.resolve()?, format)?;
            if summary.failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Config { strategy } => {
            print!("{}", strategy.resolve()?.to_toml_string()?);
            Ok(())
        }
        Commands::Synth {
            rows,
            seed,
            timeframe,
            output,
        } => run_synth(rows, seed, timeframe, output.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_annotate(
    input: &Path,
    config: &StrategyConfig,
    pair: Option<String>,
    timeframe: Option<Timeframe>,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let pair = pair.unwrap_or_else(|| pair_from_path(input));
    let metadata = PairMetadata::new(pair, timeframe.unwrap_or(config.timeframe));
    let analysis = analyze_file(input, &metadata, config)?;

    match output {
        Some(path) => write_analysis(BufWriter::new(File::create(path)?), &analysis, format)?,
        None => write_analysis(std::io::stdout().lock(), &analysis, format)?,
    }

    PairSummary::new(&analysis, config).log(&config.name);
    Ok(())
}

fn analyze_file(
    input: &Path,
    metadata: &PairMetadata,
    config: &StrategyConfig,
) -> Result<Analysis> {
    let series = candle_csv::read_candles_path(input)
        .with_context(|| format!("reading candles from {}", input.display()))?;
    analyze(&series, metadata, config)
        .with_context(|| format!("analyzing {} ({})", metadata.pair, input.display()))
}

fn write_analysis<W: Write>(writer: W, analysis: &Analysis, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => candle_csv::write_augmented(writer, &analysis.augmented)?,
        OutputFormat::Json => candle_json::write_json(writer, analysis)?,
    }
    Ok(())
}

/// The per-pair figures that get logged. Batch runs keep only this once a
/// pair's output is written.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PairSummary {
    pair: String,
    candles: usize,
    trusted_from: usize,
    buys: usize,
    sells: usize,
    config_hash: String,
}

impl PairSummary {
    fn new(analysis: &Analysis, config: &StrategyConfig) -> Self {
        Self {
            pair: analysis.metadata.pair.clone(),
            candles: analysis.augmented.len(),
            trusted_from: analysis.first_trusted_index(config),
            buys: analysis.signals.buy_count(),
            sells: analysis.signals.sell_count(),
            config_hash: analysis.fingerprint.config_hash.short().to_string(),
        }
    }

    fn log(&self, strategy: &str) {
        info!(
            pair = %self.pair,
            strategy,
            candles = self.candles,
            trusted_from = self.trusted_from,
            buys = self.buys,
            sells = self.sells,
            config_hash = %self.config_hash,
            "annotated"
        );
    }
}

/// Pair name from a file stem: `BTC_USDT.csv` → `BTC_USDT`.
fn pair_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct BatchSummary {
    succeeded: usize,
    failed: usize,
    pairs: Vec<PairSummary>,
}

fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    config: &StrategyConfig,
    format: OutputFormat,
) -> Result<BatchSummary> {
    if !input_dir.is_dir() {
        bail!("input directory does not exist: {}", input_dir.display());
    }
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut inputs: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .collect();
    inputs.sort();

    if inputs.is_empty() {
        warn!(dir = %input_dir.display(), "no csv files found");
    }

    let results: Vec<(PathBuf, Result<PairSummary>)> = inputs
        .par_iter()
        .map(|input| {
            let pair = pair_from_path(input);
            let out = output_dir.join(format!("{pair}.{}", format.extension()));
            let metadata = PairMetadata::new(pair, config.timeframe);
            let result = analyze_file(input, &metadata, config).and_then(|analysis| {
                write_analysis(BufWriter::new(File::create(&out)?), &analysis, format)?;
                Ok(PairSummary::new(&analysis, config))
            });
            (input.clone(), result)
        })
        .collect();

    let mut summary = BatchSummary::default();
    for (input, result) in results {
        match result {
            Ok(pair) => {
                summary.succeeded += 1;
                pair.log(&config.name);
                summary.pairs.push(pair);
            }
            Err(e) => {
                summary.failed += 1;
                error!(file = %input.display(), "{e:#}");
            }
        }
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch complete"
    );
    Ok(summary)
}

fn run_synth(rows: usize, seed: u64, timeframe: Timeframe, output: Option<&Path>) -> Result<()> {
    let series = synthetic::generate(rows, seed, timeframe).context("--rows must be at least 1")?;
    match output {
        Some(path) => candle_csv::write_candles(BufWriter::new(File::create(path)?), &series)?,
        None => candle_csv::write_candles(std::io::stdout().lock(), &series)?,
    }
    info!(rows, seed, timeframe = %timeframe, "wrote synthetic candles");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn write_synth(path: &Path, rows: usize, timeframe: Timeframe) {
        run_synth(rows, 7, timeframe, Some(path)).unwrap();
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_annotate_arguments() {
        let cli = Cli::try_parse_from([
            "candlelab",
            "-v",
            "annotate",
            "--input",
            "BTC_USDT.csv",
            "--preset",
            "sma-cross",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Annotate {
                strategy, format, ..
            } => {
                assert_eq!(strategy.preset, Preset::SmaCross);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected annotate"),
        }
    }

    #[test]
    fn rejects_unknown_preset() {
        let res = Cli::try_parse_from(["candlelab", "config", "--preset", "macd"]);
        assert!(res.is_err());
    }

    #[test]
    fn annotate_writes_signal_columns() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ETH_USDT.csv");
        let output = dir.path().join("out.csv");
        write_synth(&input, 120, Timeframe::M30);

        let config = Preset::RsiBbands.config();
        run_annotate(&input, &config, None, None, Some(&output), OutputFormat::Csv).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("timestamp,open,high,low,close,volume,rsi,"));
        assert!(header.ends_with(",buy,sell"));
        assert_eq!(text.lines().count(), 121);
    }

    #[test]
    fn strategy_args_merge_config_over_preset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strategy.toml");
        std::fs::write(&path, "stoploss = -0.25\n").unwrap();

        let args = StrategyArgs {
            preset: Preset::SmaCross,
            config: Some(path),
        };
        let cfg = args.resolve().unwrap();
        assert_eq!(cfg.stoploss, -0.25);
        assert_eq!(cfg.indicators, Preset::SmaCross.config().indicators);
    }

    #[test]
    fn batch_counts_failures_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("in");
        let output_dir = dir.path().join("out");
        std::fs::create_dir_all(&input_dir).unwrap();

        write_synth(&input_dir.join("BTC_USDT.csv"), 80, Timeframe::M30);
        write_synth(&input_dir.join("ETH_USDT.csv"), 80, Timeframe::M30);
        // Too short for the 30-candle startup period.
        write_synth(&input_dir.join("SHORT.csv"), 10, Timeframe::M30);
        std::fs::write(input_dir.join("notes.txt"), "ignored").unwrap();

        let summary = run_batch(
            &input_dir,
            &output_dir,
            &Preset::RsiBbands.config(),
            OutputFormat::Json,
        )
        .unwrap();

        assert_eq!((summary.succeeded, summary.failed), (2, 1));
        let pairs: Vec<&str> = summary.pairs.iter().map(|p| p.pair.as_str()).collect();
        assert_eq!(pairs, ["BTC_USDT", "ETH_USDT"]);
        for pair in &summary.pairs {
            assert_eq!(pair.candles, 80);
            assert_eq!(pair.trusted_from, 30);
            assert_eq!(pair.config_hash.len(), 12);
        }
        assert!(output_dir.join("BTC_USDT.json").exists());
        assert!(output_dir.join("ETH_USDT.json").exists());
    }

    #[test]
    fn batch_rejects_missing_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_batch(
            &dir.path().join("nope"),
            &dir.path().join("out"),
            &Preset::RsiBbands.config(),
            OutputFormat::Csv,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn pair_summary_matches_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("SOL_USDT.csv");
        write_synth(&input, 90, Timeframe::M30);

        let config = Preset::RsiBbands.config();
        let metadata = PairMetadata::new("SOL/USDT", config.timeframe);
        let analysis = analyze_file(&input, &metadata, &config).unwrap();
        let summary = PairSummary::new(&analysis, &config);

        assert_eq!(summary.pair, "SOL/USDT");
        assert_eq!(summary.candles, 90);
        assert_eq!(summary.trusted_from, 30);
        assert_eq!(summary.buys, analysis.signals.buy_count());
        assert_eq!(summary.sells, analysis.signals.sell_count());
        assert_eq!(summary.config_hash, config.fingerprint().short());
    }

    #[test]
    fn pair_name_comes_from_file_stem() {
        assert_eq!(pair_from_path(Path::new("data/BTC_USDT.csv")), "BTC_USDT");
    }
}
