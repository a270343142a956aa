//! CLI definition and dispatch.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_chart::{HtmlChartAdapter, DEFAULT_AXIS_LIMIT};
use crate::adapters::page_adapter::{build_page_content, PageFileAdapter, PageSettings};
use crate::domain::angle::clock_to_degrees;
use crate::domain::config_validation::{
    build_registry, validate_cycle_config, validate_output_config,
};
use crate::domain::cycle::{compute_cycle, CycleReport};
use crate::domain::deviation::DEFAULT_MA_PERIOD;
use crate::domain::error::CycleError;
use crate::domain::freshness::{ensure_fresh, DEFAULT_MAX_LAG_DAYS};
use crate::domain::instrument::InstrumentRegistry;
use crate::domain::phase::{Phase, PhaseLabels};
use crate::domain::trajectory::{
    TrajectoryParams, DEFAULT_INTERVAL_DAYS, DEFAULT_LOOKBACK_DAYS, DEFAULT_PRECISION,
};
use crate::domain::vector::{VectorParams, DEFAULT_SCALE};
use crate::ports::chart_port::{ChartContext, ChartPort};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::publish_port::PublishPort;

#[derive(Parser, Debug)]
#[command(name = "sectorclock", about = "Sector rotation clock")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the cycle and write the chart and page content
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Calendar date to check freshness against (defaults to today, UTC)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Compute and log the phase without writing any output
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the trajectory and phase as JSON
    Trajectory {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the instrument registry
    Instruments {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Settings for the quantitative part of a run.
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub prices_path: PathBuf,
    pub params: TrajectoryParams,
    pub max_lag_days: i64,
    pub registry: InstrumentRegistry,
    pub labels: PhaseLabels,
}

/// Where and how the results are written.
#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub chart_path: PathBuf,
    pub page_path: PathBuf,
    pub chart_url: String,
    pub title: String,
    pub date_format: String,
    pub template_path: Option<PathBuf>,
    pub axis_limit: f64,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            today,
            dry_run,
        } => {
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            finish(run_cycle(&config, today, dry_run))
        }
        Command::Trajectory { config } => finish(run_trajectory(&config)),
        Command::Validate { config } => finish(run_validate(&config)),
        Command::Instruments { config } => finish(run_instruments(config.as_deref())),
    }
}

fn finish(result: Result<(), CycleError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_no_update() => {
            info!("{e}; no update performed");
            (&e).into()
        }
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CycleError> {
    FileConfigAdapter::from_file(path).map_err(|e| CycleError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn build_cycle_settings(config: &dyn ConfigPort) -> Result<CycleSettings, CycleError> {
    validate_cycle_config(config)?;

    let prices_path = config
        .get_string("data", "prices_path")
        .map(PathBuf::from)
        .ok_or_else(|| CycleError::ConfigMissing {
            section: "data".into(),
            key: "prices_path".into(),
        })?;

    let params = TrajectoryParams {
        lookback_days: config.get_int("cycle", "lookback_days", DEFAULT_LOOKBACK_DAYS),
        interval_days: config.get_int("cycle", "interval_days", DEFAULT_INTERVAL_DAYS),
        precision: config.get_int("cycle", "precision", DEFAULT_PRECISION as i64) as u32,
        vector: VectorParams {
            ma_period: config.get_int("cycle", "ma_period", DEFAULT_MA_PERIOD as i64) as usize,
            scale: config.get_double("cycle", "scale", DEFAULT_SCALE),
        },
    };

    Ok(CycleSettings {
        prices_path,
        params,
        max_lag_days: config.get_int("cycle", "max_lag_days", DEFAULT_MAX_LAG_DAYS),
        registry: build_registry(config)?,
        labels: build_phase_labels(config),
    })
}

pub fn build_phase_labels(config: &dyn ConfigPort) -> PhaseLabels {
    let label = |phase: Phase| {
        config
            .get_string("phases", phase.key())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| phase.name().to_string())
    };
    PhaseLabels::new(
        &label(Phase::Recovery),
        &label(Phase::Expansion),
        &label(Phase::Slowdown),
        &label(Phase::Recession),
    )
}

pub fn build_output_settings(config: &dyn ConfigPort) -> Result<OutputSettings, CycleError> {
    validate_output_config(config)?;

    let required = |key: &str| {
        config
            .get_string("output", key)
            .ok_or_else(|| CycleError::ConfigMissing {
                section: "output".into(),
                key: key.into(),
            })
    };

    Ok(OutputSettings {
        chart_path: PathBuf::from(required("chart_path")?),
        page_path: PathBuf::from(required("page_path")?),
        chart_url: config
            .get_string("output", "chart_url")
            .unwrap_or_else(|| "index.html".to_string()),
        title: config
            .get_string("output", "title")
            .unwrap_or_else(|| "US Sector Rotation".to_string()),
        date_format: config
            .get_string("output", "date_format")
            .unwrap_or_else(|| "%Y-%m-%d".to_string()),
        template_path: config.get_string("output", "template_path").map(PathBuf::from),
        axis_limit: config.get_double("output", "axis_limit", DEFAULT_AXIS_LIMIT),
    })
}

/// Load prices, gate on freshness and compute the report.
///
/// Returns `CycleError::StaleData` when the newest row is too old; callers
/// treat that as "nothing to do".
pub fn compute_report(
    data_port: &dyn PriceDataPort,
    settings: &CycleSettings,
    today: NaiveDate,
) -> Result<CycleReport, CycleError> {
    let series = data_port.fetch_closes(&settings.registry.codes())?;
    let latest = series.latest_date().ok_or_else(|| CycleError::NoData {
        codes: settings.registry.codes().join(","),
    })?;

    let lag_days = ensure_fresh(latest, today, settings.max_lag_days)?;
    info!(%latest, %today, lag_days, "data is fresh");

    let report = compute_cycle(&series, &settings.registry, &settings.params)?;
    let current = report.trajectory.current_raw;
    info!(
        phase = %report.phase,
        x = format_args!("{:.2}", current.x),
        y = format_args!("{:.2}", current.y),
        samples = report.trajectory.points.len(),
        "cycle computed"
    );
    Ok(report)
}

/// Render the chart and publish the page for a computed report.
pub fn publish_report(
    report: &CycleReport,
    settings: &CycleSettings,
    output: &OutputSettings,
    chart_port: &dyn ChartPort,
    publish_port: &dyn PublishPort,
    generated_at: NaiveDateTime,
) -> Result<(), CycleError> {
    // Build the page before writing anything.
    let page_settings = PageSettings {
        title: &output.title,
        chart_url: &output.chart_url,
        date_format: &output.date_format,
        registry: &settings.registry,
        labels: &settings.labels,
        ma_period: settings.params.vector.ma_period,
    };
    let page = build_page_content(report, &page_settings, generated_at)?;

    let chart_ctx = ChartContext {
        title: &output.title,
        registry: &settings.registry,
        labels: &settings.labels,
        axis_limit: output.axis_limit,
    };
    chart_port.render(report, &chart_ctx)?;

    publish_port.publish(&page)
}

fn run_cycle(config_path: &Path, today: NaiveDate, dry_run: bool) -> Result<(), CycleError> {
    // Stage 1: Load and validate config
    info!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    let settings = build_cycle_settings(&adapter)?;
    let dry_run = dry_run || !adapter.get_bool("output", "enabled", true);
    let output = if dry_run {
        None
    } else {
        Some(build_output_settings(&adapter)?)
    };

    // Stage 2: Prices, freshness gate, trajectory, phase
    let data_port = CsvPriceAdapter::new(settings.prices_path.clone());
    let report = compute_report(&data_port, &settings, today)?;
    info!(
        "Market phase: {} as of {}",
        settings.labels.label(report.phase),
        report.as_of
    );

    // Stage 3: Chart and page content
    let Some(output) = output else {
        info!("dry run, no output written");
        return Ok(());
    };

    let mut chart = HtmlChartAdapter::new(output.chart_path.clone());
    if let Some(path) = &output.template_path {
        chart = chart.with_template(fs::read_to_string(path)?);
    }
    let page = PageFileAdapter::new(output.page_path.clone());

    publish_report(
        &report,
        &settings,
        &output,
        &chart,
        &page,
        Utc::now().naive_utc(),
    )
}

/// JSON summary of a report, as printed by the `trajectory` command.
pub fn report_json(report: &CycleReport, labels: &PhaseLabels) -> serde_json::Value {
    serde_json::json!({
        "as_of": report.as_of.format("%Y-%m-%d").to_string(),
        "phase": report.phase,
        "label": labels.label(report.phase),
        "trajectory": report.trajectory.vectors(),
        "current": report.trajectory.current.vector,
    })
}

fn run_trajectory(config_path: &Path) -> Result<(), CycleError> {
    let adapter = load_config(config_path)?;
    let settings = build_cycle_settings(&adapter)?;
    let data_port = CsvPriceAdapter::new(settings.prices_path.clone());

    let series = data_port.fetch_closes(&settings.registry.codes())?;
    let report = compute_cycle(&series, &settings.registry, &settings.params)?;

    let json = serde_json::to_string_pretty(&report_json(&report, &settings.labels)).map_err(
        |e| CycleError::Render {
            reason: e.to_string(),
        },
    )?;
    println!("{json}");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), CycleError> {
    let adapter = load_config(config_path)?;
    let settings = build_cycle_settings(&adapter)?;
    build_output_settings(&adapter)?;
    println!(
        "Config valid: {} instruments, {}-day average, {}-day lookback every {} days",
        settings.registry.len(),
        settings.params.vector.ma_period,
        settings.params.lookback_days,
        settings.params.interval_days,
    );
    Ok(())
}

fn run_instruments(config_path: Option<&Path>) -> Result<(), CycleError> {
    let registry = match config_path {
        Some(path) => build_registry(&load_config(path)?)?,
        None => InstrumentRegistry::us_sectors(),
    };

    println!("{:<6} {:>6} {:>8}  {:<4} NAME", "CODE", "CLOCK", "ANGLE", "AREA");
    for spec in registry.iter() {
        println!(
            "{:<6} {:>6.1} {:>8.1}  {:<4} {}",
            spec.code,
            spec.clock,
            clock_to_degrees(spec.clock),
            spec.area,
            spec.name
        );
    }
    Ok(())
}
