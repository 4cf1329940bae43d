//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::BacktestConfig;
use crate::domain::brick_size::BrickSizeSchedule;
use crate::domain::config_validation::{required_brick_size, slippage, validate_config};
use crate::domain::error::RangeTraderError;
use crate::domain::metrics::Summary;
use crate::domain::range_chart::RangeChart;
use crate::domain::strategy::{self, BacktestResult};
use crate::domain::tick::{Tick, TickFilter};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::tick_port::TickPort;

#[derive(Parser, Debug)]
#[command(name = "rangetrader", about = "Range bar builder and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build range bars from a tick file
    Bricks {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticks: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Drop consecutive bricks sharing the same upper line
        #[arg(long)]
        unique: bool,
    },
    /// Run the brick-following backtest over a tick file
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        ticks: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        slippage: Option<f64>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Bricks {
            config,
            ticks,
            output,
            unique,
        } => run_bricks(&config, ticks.as_deref(), output.as_deref(), unique),
        Command::Backtest {
            config,
            ticks,
            output,
            slippage,
        } => run_backtest(&config, ticks.as_deref(), output.as_deref(), slippage),
        Command::Validate { config } => run_validate(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, RangeTraderError> {
    info!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_config(&adapter)?;
    Ok(adapter)
}

pub fn build_backtest_config(
    config: &dyn ConfigPort,
    slippage_override: Option<f64>,
) -> Result<BacktestConfig, RangeTraderError> {
    let slippage = match slippage_override {
        Some(value) if !(value.is_finite() && value >= 0.0) => {
            return Err(RangeTraderError::InvalidSlippage { value });
        }
        Some(value) => value,
        None => slippage(config)?,
    };

    Ok(BacktestConfig {
        symbol: config
            .get_string("backtest", "symbol")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "UNKNOWN".to_string()),
        brick_size: required_brick_size(config)?,
        slippage,
        close_at_end: config.get_bool("backtest", "close_at_end", true),
    })
}

/// Command-line path if given, else the config value.
pub fn resolve_path(
    cli_override: Option<&Path>,
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Option<PathBuf> {
    cli_override.map(Path::to_path_buf).or_else(|| {
        config
            .get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    })
}

fn require_path(
    cli_override: Option<&Path>,
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<PathBuf, RangeTraderError> {
    resolve_path(cli_override, config, section, key).ok_or_else(|| {
        RangeTraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    })
}

/// Fetch ticks and drop the ones the aggregator must not see.
pub fn load_ticks(port: &dyn TickPort, source: &Path) -> Result<Vec<Tick>, RangeTraderError> {
    info!("Loading ticks from {}", source.display());
    let raw = port.fetch_ticks(source)?;
    let total = raw.len();

    let mut filter = TickFilter::new();
    let ticks = filter.filter_all(raw);
    if filter.rejected() > 0 {
        warn!(
            rejected = filter.rejected(),
            total, "skipped out-of-order or invalid ticks"
        );
    }
    Ok(ticks)
}

pub fn load_schedule(
    port: &dyn TickPort,
    config: &dyn ConfigPort,
) -> Result<Option<BrickSizeSchedule>, RangeTraderError> {
    match resolve_path(None, config, "range", "schedule") {
        Some(path) => {
            info!("Loading brick size schedule from {}", path.display());
            port.fetch_schedule(&path).map(Some)
        }
        None => Ok(None),
    }
}

/// Build bricks from `ticks_path` and write them. Returns the number written.
pub fn run_bricks_pipeline(
    tick_port: &dyn TickPort,
    report_port: &dyn ReportPort,
    config: &dyn ConfigPort,
    ticks_path: &Path,
    output_path: &Path,
    unique: bool,
) -> Result<usize, RangeTraderError> {
    let ticks = load_ticks(tick_port, ticks_path)?;
    let schedule = load_schedule(tick_port, config)?;

    let mut chart = RangeChart::new(required_brick_size(config)?)?;
    for tick in &ticks {
        let size = schedule.as_ref().and_then(|s| s.size_at(tick.time));
        chart.feed(tick.time, tick.price, tick.volume, size)?;
    }

    let bricks = if unique {
        chart.unique_bricks()
    } else {
        chart.bricks().to_vec()
    };
    info!(
        ticks = ticks.len(),
        bricks = bricks.len(),
        unique,
        "bricks built"
    );

    report_port.write_bricks(&bricks, output_path)?;
    info!("Bricks written to: {}", output_path.display());
    Ok(bricks.len())
}

pub fn run_backtest_pipeline(
    tick_port: &dyn TickPort,
    report_port: &dyn ReportPort,
    config: &dyn ConfigPort,
    bt_config: &BacktestConfig,
    ticks_path: &Path,
    output_path: &Path,
) -> Result<BacktestResult, RangeTraderError> {
    let ticks = load_ticks(tick_port, ticks_path)?;
    let schedule = load_schedule(tick_port, config)?;

    let result = strategy::run_backtest(&ticks, bt_config, schedule.as_ref())?;

    report_port.write_positions(&result.positions, output_path)?;
    info!("Positions written to: {}", output_path.display());
    Ok(result)
}

fn run_bricks(
    config_path: &Path,
    ticks: Option<&Path>,
    output: Option<&Path>,
    unique_flag: bool,
) -> Result<(), RangeTraderError> {
    let config = load_config(config_path)?;
    let ticks_path = require_path(ticks, &config, "backtest", "ticks")?;
    let output_path = resolve_path(output, &config, "report", "bricks_output")
        .unwrap_or_else(|| PathBuf::from("bricks.csv"));
    let unique = unique_flag || config.get_bool("report", "unique_bricks", false);

    run_bricks_pipeline(
        &CsvAdapter::new(),
        &CsvReportAdapter::new(),
        &config,
        &ticks_path,
        &output_path,
        unique,
    )?;
    Ok(())
}

fn run_backtest(
    config_path: &Path,
    ticks: Option<&Path>,
    output: Option<&Path>,
    slippage_override: Option<f64>,
) -> Result<(), RangeTraderError> {
    let config = load_config(config_path)?;
    let bt_config = build_backtest_config(&config, slippage_override)?;
    let ticks_path = require_path(ticks, &config, "backtest", "ticks")?;
    let output_path = resolve_path(output, &config, "report", "positions_output")
        .unwrap_or_else(|| PathBuf::from("positions.csv"));

    let result = run_backtest_pipeline(
        &CsvAdapter::new(),
        &CsvReportAdapter::new(),
        &config,
        &bt_config,
        &ticks_path,
        &output_path,
    )?;

    eprintln!("\n=== {} ===", bt_config.symbol);
    eprint!("{}", format_summary(&result.summary));
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), RangeTraderError> {
    let config = load_config(config_path)?;
    let bt_config = build_backtest_config(&config, None)?;

    eprintln!("\nConfiguration:");
    eprintln!("  symbol:       {}", bt_config.symbol);
    eprintln!("  brick_size:   {}", bt_config.brick_size);
    eprintln!("  slippage:     {}", bt_config.slippage);
    eprintln!("  close_at_end: {}", bt_config.close_at_end);
    if let Some(path) = resolve_path(None, &config, "range", "schedule") {
        eprintln!("  schedule:     {}", path.display());
    }
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Operations:       {}\n", summary.op_count));
    out.push_str(&format!(
        "Gain:             {:.2} ({} trades)\n",
        summary.gain, summary.gain_count
    ));
    out.push_str(&format!(
        "Loss:             {:.2} ({} trades)\n",
        summary.loss, summary.loss_count
    ));
    out.push_str(&format!("Win Rate:         {:.1}%\n", summary.win_rate * 100.0));
    out.push_str(&format!("Largest Win:      {:.2}\n", summary.largest_win));
    out.push_str(&format!("Largest Loss:     {:.2}\n", summary.largest_loss));
    out.push_str(&format!("Total Profit:     {:.2}\n", summary.total_profit));
    out
}
