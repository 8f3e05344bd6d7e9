//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{self, CsvPriceSource, CsvTradeSource};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::config_validation::{parse_date, validate_simulation_config};
use crate::domain::error::SimError;
use crate::domain::generators::{
    AlternatingTradeSource, ConstantPriceSource, ScalpingTradeSource, SinePriceSource,
};
use crate::domain::scenario::{
    Preset, PriceSpec, SimulationConfig, TradeSpec, DEFAULT_INITIAL_BALANCE,
};
use crate::domain::simulator;
use crate::domain::step::{Column, StepRecord};
use crate::domain::summary::RunSummary;
use crate::ports::chart_port::ChartSink;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PriceSource;
use crate::ports::trade_port::TradeSource;

#[derive(Parser, Debug)]
#[command(name = "tradesim", about = "Single-account trading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation described by an INI file
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Write the step series as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the HTML chart page
        #[arg(long)]
        chart: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Run one of the built-in scenarios
    Demo {
        #[arg(long, value_enum, default_value = "t-plus-0")]
        preset: Preset,
        #[arg(long, default_value_t = DEFAULT_INITIAL_BALANCE, value_parser = parse_balance)]
        balance: f64,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Validate a simulation configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn parse_balance(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.trim().parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() {
        return Err("balance must be a finite number".to_string());
    }
    Ok(value)
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            output,
            chart,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_from_config(&config, output.as_deref(), chart.as_deref())
            }
        }
        Command::Demo {
            preset,
            balance,
            output,
            chart,
        } => {
            let config = preset.config(balance);
            run_simulation_pipeline(
                &config,
                output.as_deref(),
                chart.as_deref(),
                &SvgChartAdapter::new(),
            )
        }
        Command::Validate { config } => run_dry_run(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_from_config(config_path: &Path, output: Option<&Path>, chart: Option<&Path>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Command-line paths win over the [output] section
    let csv_path = output
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("output", "csv_path").map(PathBuf::from));
    let chart_path = chart
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_string("output", "chart_path").map(PathBuf::from));

    run_simulation_pipeline(
        &config,
        csv_path.as_deref(),
        chart_path.as_deref(),
        &SvgChartAdapter::new(),
    )
}

pub fn run_dry_run(config_path: &Path) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Config validated successfully");
    eprintln!("  Name:            {}", config.name);
    eprintln!("  Initial balance: {:.2}", config.initial_balance);
    eprintln!("  Price source:    {}", config.price.kind());
    eprintln!("  Trade source:    {}", config.trades.kind());
    ExitCode::SUCCESS
}

/// Validate and translate an INI config into a [`SimulationConfig`].
pub fn build_simulation_config(adapter: &dyn ConfigPort) -> Result<SimulationConfig, SimError> {
    validate_simulation_config(adapter)?;

    let name = adapter
        .get_string("simulation", "name")
        .unwrap_or_else(|| "Unnamed".to_string());
    let initial_balance =
        adapter.get_double("simulation", "initial_balance", DEFAULT_INITIAL_BALANCE);

    Ok(SimulationConfig {
        name,
        initial_balance,
        price: build_price_spec(adapter)?,
        trades: build_trade_spec(adapter),
    })
}

fn section_kind(adapter: &dyn ConfigPort, section: &str) -> String {
    adapter
        .get_string(section, "kind")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default()
}

fn build_price_spec(adapter: &dyn ConfigPort) -> Result<PriceSpec, SimError> {
    let defaults = SinePriceSource::basic();
    let spec = match section_kind(adapter, "price").as_str() {
        "constant" => PriceSpec::Constant(ConstantPriceSource::new(
            adapter.get_double("price", "value", 0.0),
            adapter.get_int("price", "duration", defaults.duration),
        )),
        "csv" => PriceSpec::Csv {
            path: PathBuf::from(adapter.get_string("price", "path").unwrap_or_default().trim()),
            column: adapter
                .get_string("price", "column")
                .filter(|s| !s.trim().is_empty()),
            start_date: parse_date(adapter, "start_date")?,
            end_date: parse_date(adapter, "end_date")?,
        },
        _ => PriceSpec::Sine(SinePriceSource {
            base: adapter.get_double("price", "base", defaults.base),
            amplitude: adapter.get_double("price", "amplitude", defaults.amplitude),
            period: adapter.get_double("price", "period", defaults.period),
            shock: adapter.get_double("price", "shock", defaults.shock),
            duration: adapter.get_int("price", "duration", defaults.duration),
        }),
    };
    Ok(spec)
}

fn build_trade_spec(adapter: &dyn ConfigPort) -> TradeSpec {
    match section_kind(adapter, "trades").as_str() {
        "scalping" => {
            let defaults = ScalpingTradeSource::t_plus_0();
            TradeSpec::Scalping(ScalpingTradeSource {
                opening_quantity: adapter.get_double(
                    "trades",
                    "opening_quantity",
                    defaults.opening_quantity,
                ),
                opening_steps: adapter
                    .get_int("trades", "opening_steps", defaults.opening_steps as i64)
                    as usize,
                swing: adapter.get_double("trades", "swing", defaults.swing),
            })
        }
        "csv" => TradeSpec::Csv {
            path: PathBuf::from(adapter.get_string("trades", "path").unwrap_or_default().trim()),
        },
        _ => {
            let defaults = AlternatingTradeSource::basic();
            TradeSpec::Alternating(AlternatingTradeSource::new(
                adapter.get_double("trades", "even", defaults.even),
                adapter.get_double("trades", "odd", defaults.odd),
            ))
        }
    }
}

pub fn build_price_source(spec: &PriceSpec) -> Result<Box<dyn PriceSource>, SimError> {
    let source: Box<dyn PriceSource> = match spec {
        PriceSpec::Sine(src) => Box::new(src.clone()),
        PriceSpec::Constant(src) => Box::new(src.clone()),
        PriceSpec::Csv {
            path,
            column,
            start_date,
            end_date,
        } => {
            eprintln!("Loading prices from {}", path.display());
            Box::new(CsvPriceSource::from_path(
                path,
                column.as_deref(),
                *start_date,
                *end_date,
            )?)
        }
    };
    Ok(source)
}

pub fn build_trade_source(spec: &TradeSpec) -> Result<Box<dyn TradeSource>, SimError> {
    let source: Box<dyn TradeSource> = match spec {
        TradeSpec::Alternating(src) => Box::new(src.clone()),
        TradeSpec::Scalping(src) => Box::new(src.clone()),
        TradeSpec::Csv { path } => {
            eprintln!("Loading trades from {}", path.display());
            Box::new(CsvTradeSource::from_path(path)?)
        }
    };
    Ok(source)
}

pub fn run_simulation_pipeline(
    config: &SimulationConfig,
    csv_path: Option<&Path>,
    chart_path: Option<&Path>,
    chart_sink: &dyn ChartSink,
) -> ExitCode {
    match execute(config, csv_path, chart_path, chart_sink) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn execute(
    config: &SimulationConfig,
    csv_path: Option<&Path>,
    chart_path: Option<&Path>,
    chart_sink: &dyn ChartSink,
) -> Result<(), SimError> {
    // Stage 1: Build sources
    let price_source = build_price_source(&config.price)?;
    let trade_source = build_trade_source(&config.trades)?;

    // Stage 2: Simulate
    eprintln!(
        "Simulating '{}': {} steps, initial balance {:.2}",
        config.name,
        price_source.duration().max(0),
        config.initial_balance
    );
    let steps = simulator::run(&*price_source, &*trade_source, config.initial_balance)?;

    // Stage 3: Summary
    let summary = RunSummary::compute(&steps, config.initial_balance);
    print_summary(&summary);

    // Stage 4: Outputs
    match csv_path {
        Some(path) => {
            csv_adapter::write_steps(path, &steps)?;
            eprintln!("Steps written to: {}", path.display());
        }
        None => print!("{}", format_steps_table(&steps)),
    }
    if let Some(path) = chart_path {
        chart_sink.render(&steps, &config.name, &path.to_string_lossy())?;
        eprintln!("Chart written to: {}", path.display());
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    eprintln!("\n=== Simulation Results ===");
    eprintln!("Steps:            {}", summary.steps);
    eprintln!("Final Price:      {:.2}", summary.final_price);
    eprintln!("Final Holdings:   {:.2}", summary.final_holdings);
    eprintln!("Final Balance:    {:.2}", summary.final_balance);
    eprintln!("Final Equity:     {:.2}", summary.final_equity);
    eprintln!("Profit:           {:.2}", summary.profit);
    eprintln!("Max Drawdown:     -{:.1}%", summary.max_drawdown * 100.0);
    eprintln!("Min Balance:      {:.2}", summary.min_balance);
    eprintln!(
        "Volume:           {:.0} bought, {:.0} sold",
        summary.total_bought, summary.total_sold
    );
    if summary.short_steps > 0 {
        eprintln!("Short Steps:      {}", summary.short_steps);
    }
}

/// Fixed-width table of every step, one row per index.
pub fn format_steps_table(steps: &[StepRecord]) -> String {
    let mut out = format!("{:>6}", "index");
    for column in Column::ALL {
        out.push_str(&format!(" {:>15}", column.name()));
    }
    out.push('\n');
    for step in steps {
        out.push_str(&format!("{:>6}", step.index));
        for column in Column::ALL {
            out.push_str(&format!(" {:>15.2}", step.value(column)));
        }
        out.push('\n');
    }
    out
}
