//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_price_adapter::CsvPriceAdapter;
use crate::adapters::csv_universe_adapter::CsvUniverseAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::markdown_report_adapter::MarkdownReportAdapter;
use crate::domain::analysis::{run_analysis, AnalysisConfig, RetryPolicy};
use crate::domain::calendar::{is_trading_day, latest_trading_day_on_or_before, MAX_WALKBACK_DAYS};
use crate::domain::classify::{classify, ClassifierRules};
use crate::domain::config_validation::validate_analysis_config;
use crate::domain::error::EtfRankError;
use crate::domain::instrument::select_universe;
use crate::domain::summary::{build_digest, render_digest};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::universe_port::UniversePort;

#[derive(Parser, Debug)]
#[command(name = "etfrank", about = "ETF period-return ranking and classification")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full analysis and write reports
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Reference date override (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the selected universe with AUM ranks
    ListInstruments {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Classify a fund name and print its labels
    Classify { name: String },
    /// Show trading-day status for a date and the reference an analysis
    /// run on that date would use
    CheckDate {
        #[arg(short, long)]
        config: PathBuf,
        /// Date to check (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            date,
            output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_analyze(&config, date.as_deref(), output.as_ref())
            }
        }
        Command::ListInstruments { config } => run_list_instruments(&config),
        Command::Classify { name } => run_classify(&name),
        Command::CheckDate { config, date } => run_check_date(&config, date.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = EtfRankError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_analysis_config(adapter: &dyn ConfigPort) -> Result<AnalysisConfig, EtfRankError> {
    let reference_date = match adapter.get_string("analysis", "reference_date") {
        Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
            EtfRankError::ConfigInvalid {
                section: "analysis".into(),
                key: "reference_date".into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }
        })?),
        None => None,
    };

    Ok(AnalysisConfig {
        top_n: adapter.get_int("analysis", "top_n", 100) as usize,
        max_concurrency: adapter.get_int("analysis", "max_concurrency", 8) as usize,
        reference_date,
        retry: RetryPolicy {
            max_retries: adapter.get_int("provider", "retry_max_attempts", 3) as u32,
            initial_delay: Duration::from_millis(
                adapter.get_int("provider", "retry_initial_delay_ms", 500) as u64,
            ),
            max_delay: Duration::from_millis(
                adapter.get_int("provider", "retry_max_delay_ms", 10_000) as u64,
            ),
            multiplier: adapter.get_double("provider", "retry_multiplier", 2.0),
        },
    })
}

fn parse_cli_date(raw: &str) -> Result<NaiveDate, ExitCode> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        eprintln!("error: invalid date {:?} (expected YYYY-MM-DD)", raw);
        ExitCode::from(2)
    })
}

fn build_runtime() -> Result<tokio::runtime::Runtime, ExitCode> {
    tokio::runtime::Runtime::new().map_err(|e| {
        eprintln!("error: failed to start async runtime: {e}");
        ExitCode::from(1)
    })
}

fn run_analyze(
    config_path: &PathBuf,
    date_override: Option<&str>,
    output_override: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let mut analysis_config = match build_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(raw) = date_override {
        match parse_cli_date(raw) {
            Ok(date) => analysis_config.reference_date = Some(date),
            Err(code) => return code,
        }
    }

    // Stage 2: Wire adapters
    let data_dir = match adapter.get_string("provider", "data_dir") {
        Some(d) => d,
        None => {
            eprintln!("error: provider.data_dir is required");
            return ExitCode::from(2);
        }
    };
    let universe_file = match adapter.get_string("universe", "file") {
        Some(f) => f,
        None => {
            eprintln!("error: universe.file is required");
            return ExitCode::from(2);
        }
    };
    let price_port = CsvPriceAdapter::new(PathBuf::from(data_dir));
    let universe_port = CsvUniverseAdapter::new(PathBuf::from(universe_file));
    let rules = ClassifierRules::standard();

    let output_dir = output_override
        .cloned()
        .or_else(|| adapter.get_string("report", "output_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("analysis_reports"));

    // Stage 3: Run the analysis
    let runtime = match build_runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };
    let today = chrono::Local::now().date_naive();
    let result = match runtime.block_on(run_analysis(
        &price_port,
        &universe_port,
        &rules,
        &analysis_config,
        today,
    )) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Write reports
    match JsonReportAdapter::new().write(&result, &output_dir) {
        Ok(path) => eprintln!("Snapshot written to: {}", path.display()),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }
    match MarkdownReportAdapter::new().write(&result, &output_dir) {
        Ok(path) => eprintln!("Report written to: {}", path.display()),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    // Stage 5: Digest to stdout
    print!("{}", render_digest(&build_digest(&result)));
    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let config = match build_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Config validated successfully");
    eprintln!("  top_n: {}", config.top_n);
    eprintln!("  max_concurrency: {}", config.max_concurrency);
    match config.reference_date {
        Some(date) => eprintln!("  reference_date: {}", date),
        None => eprintln!("  reference_date: (previous trading day)"),
    }
    eprintln!(
        "  retry: {} attempts from {}ms",
        config.retry.max_retries,
        config.retry.initial_delay.as_millis()
    );

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_list_instruments(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_analysis_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let config = match build_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let universe_file = match adapter.get_string("universe", "file") {
        Some(f) => f,
        None => {
            eprintln!("error: universe.file is required");
            return ExitCode::from(2);
        }
    };
    let universe_port = CsvUniverseAdapter::new(PathBuf::from(universe_file));

    let runtime = match build_runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };
    let entries = match runtime.block_on(universe_port.fetch_entries()) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let selection = match select_universe(entries, config.top_n) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for instrument in &selection.instruments {
        println!(
            "{:>4}  {}  {:<40}  {:.1}",
            instrument.aum_rank, instrument.code, instrument.name, instrument.aum
        );
    }
    eprintln!("{} instruments selected", selection.instruments.len());
    if !selection.skipped.is_empty() {
        eprintln!("{} entries skipped", selection.skipped.len());
    }
    ExitCode::SUCCESS
}

fn run_classify(name: &str) -> ExitCode {
    let labels = classify(name, &ClassifierRules::standard());
    println!("name:     {}", name);
    println!("sector:   {}", labels.sector);
    println!("scope:    {}", labels.scope);
    println!("leverage: {}", labels.leverage);
    println!("hedge:    {}", labels.hedge);
    println!("dividend: {}", labels.dividend);
    ExitCode::SUCCESS
}

fn run_check_date(config_path: &PathBuf, date_raw: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let data_dir = match adapter.get_string("provider", "data_dir") {
        Some(d) => d,
        None => {
            eprintln!("error: provider.data_dir is required");
            return ExitCode::from(2);
        }
    };
    let price_port = CsvPriceAdapter::new(PathBuf::from(data_dir));

    let date = match date_raw {
        Some(raw) => match parse_cli_date(raw) {
            Ok(d) => d,
            Err(code) => return code,
        },
        None => chrono::Local::now().date_naive(),
    };

    let runtime = match build_runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };
    runtime.block_on(async {
        match is_trading_day(&price_port, date).await {
            Ok(true) => println!("{} is a trading day", date),
            Ok(false) => println!("{} is not a trading day", date),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        }

        // An analysis run on `date` references the trading day before it.
        let probe = date.pred_opt().unwrap_or(date);
        match latest_trading_day_on_or_before(&price_port, probe).await {
            Ok(Some(reference)) => println!("analysis reference date: {}", reference),
            Ok(None) => println!(
                "no trading day within {} days before {}",
                MAX_WALKBACK_DAYS, date
            ),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        }
        ExitCode::SUCCESS
    })
}
