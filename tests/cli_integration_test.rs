//! CLI integration tests.
//!
//! Tests cover:
//! - Config parsing (build_simulation_config) with defaults and overrides
//! - Dry-run validation against INI files on disk
//! - Full pipeline with CSV inputs, CSV step output and the HTML chart
//! - Failure exit codes for bad data and failing sources

mod common;

use common::*;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tradesim::adapters::file_config_adapter::FileConfigAdapter;
use tradesim::cli;
use tradesim::domain::error::SimError;
use tradesim::domain::generators::{ScalpingTradeSource, SinePriceSource};
use tradesim::domain::scenario::{Preset, PriceSpec, TradeSpec};
use tradesim::domain::step::StepRecord;
use tradesim::ports::chart_port::ChartSink;

const VALID_INI: &str = r#"
[simulation]
name = T+0 scalping
initial_balance = 10000

[price]
kind = sine
duration = 50
base = 10
amplitude = 10
period = 6
shock = 1

[trades]
kind = scalping
opening_quantity = 500
opening_steps = 1
swing = 200
"#;

fn exit_report(code: ExitCode) -> String {
    format!("{code:?}")
}

/// Records what it was asked to render instead of writing a file.
struct RecordingChartSink {
    rendered: RefCell<Vec<(usize, String, String)>>,
}

impl RecordingChartSink {
    fn new() -> Self {
        Self {
            rendered: RefCell::new(Vec::new()),
        }
    }
}

impl ChartSink for RecordingChartSink {
    fn render(
        &self,
        steps: &[StepRecord],
        title: &str,
        output_path: &str,
    ) -> Result<(), SimError> {
        self.rendered
            .borrow_mut()
            .push((steps.len(), title.to_string(), output_path.to_string()));
        Ok(())
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn build_config_matches_t_plus_0_preset() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_simulation_config(&adapter).unwrap();
        let preset = Preset::TPlus0.config(10_000.0);

        assert_eq!(config.name, "T+0 scalping");
        assert_eq!(config.price, preset.price);
        assert_eq!(config.trades, preset.trades);
        assert!((config.initial_balance - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn build_config_uses_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[price]\nkind = sine\n[trades]\nkind = alternating\n")
                .unwrap();
        let config = cli::build_simulation_config(&adapter).unwrap();
        let preset = Preset::Basic.config(10_000.0);

        assert_eq!(config.name, "Unnamed");
        assert_eq!(config.price, preset.price);
        assert_eq!(config.trades, preset.trades);
        assert!((config.initial_balance - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn build_config_constant_and_csv() {
        let ini = r#"
[simulation]
initial_balance = 2500.5

[price]
kind = constant
value = 100
duration = 3

[trades]
kind = csv
path = trades.csv
"#;
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let config = cli::build_simulation_config(&adapter).unwrap();

        match config.price {
            PriceSpec::Constant(src) => {
                assert!((src.price - 100.0).abs() < f64::EPSILON);
                assert_eq!(src.duration, 3);
            }
            other => panic!("unexpected price spec {other:?}"),
        }
        assert_eq!(
            config.trades,
            TradeSpec::Csv {
                path: PathBuf::from("trades.csv")
            }
        );
        assert!((config.initial_balance - 2500.5).abs() < f64::EPSILON);
    }

    #[test]
    fn build_config_partial_sine_override() {
        let ini = "[price]\nkind = sine\namplitude = 2\n[trades]\nkind = scalping\nswing = 50\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let config = cli::build_simulation_config(&adapter).unwrap();

        assert_eq!(
            config.price,
            PriceSpec::Sine(SinePriceSource {
                amplitude: 2.0,
                ..SinePriceSource::basic()
            })
        );
        assert_eq!(
            config.trades,
            TradeSpec::Scalping(ScalpingTradeSource {
                swing: 50.0,
                ..ScalpingTradeSource::t_plus_0()
            })
        );
    }

    #[test]
    fn build_config_rejects_invalid() {
        let adapter =
            FileConfigAdapter::from_string("[price]\nkind = sine\n[trades]\nkind = random\n")
                .unwrap();
        let err = cli::build_simulation_config(&adapter).unwrap_err();
        assert!(matches!(err, SimError::ConfigInvalid { section, .. } if section == "trades"));
    }
}

mod dry_run {
    use super::*;

    #[test]
    fn dry_run_valid_config_succeeds() {
        let file = write_temp_file(VALID_INI);
        assert_eq!(exit_report(cli::run_dry_run(file.path())), exit_report(ExitCode::SUCCESS));
    }

    #[test]
    fn dry_run_missing_file_is_config_error() {
        let path = PathBuf::from("/nonexistent/path/sim.ini");
        assert_eq!(exit_report(cli::run_dry_run(&path)), exit_report(ExitCode::from(2)));
    }

    #[test]
    fn dry_run_invalid_config_fails() {
        let file = write_temp_file("[price]\nkind = sine\nperiod = -1\n[trades]\nkind = alternating\n");
        assert_eq!(exit_report(cli::run_dry_run(file.path())), exit_report(ExitCode::from(2)));
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn preset_pipeline_writes_csv_and_renders_chart() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = dir.path().join("out/steps.csv");
        let chart_path = dir.path().join("out/chart.html");
        let sink = RecordingChartSink::new();
        let config = Preset::TPlus0.config(10_000.0);

        let code = cli::run_simulation_pipeline(&config, Some(&csv_path), Some(&chart_path), &sink);
        assert_eq!(exit_report(code), exit_report(ExitCode::SUCCESS));

        let content = fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.lines().count(), 51);
        assert!(content.starts_with("index,price,trade,holdings"));

        let rendered = sink.rendered.borrow();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0, 50);
        assert_eq!(rendered[0].1, "T+0 scalping");
        assert!(rendered[0].2.ends_with("chart.html"));
    }

    #[test]
    fn csv_inputs_drive_the_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let prices = dir.path().join("prices.csv");
        let trades = dir.path().join("trades.csv");
        fs::write(&prices, "date,close\n2024-01-03,100\n2024-01-01,100\n2024-01-02,100\n").unwrap();
        fs::write(&trades, "index,quantity\n1,200\n2,-200\n").unwrap();

        let ini = format!(
            "[simulation]\nname = csv run\ninitial_balance = 10000\n\
             [price]\nkind = csv\npath = {}\n\
             [trades]\nkind = csv\npath = {}\n",
            prices.display(),
            trades.display()
        );
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let config = cli::build_simulation_config(&adapter).unwrap();

        let csv_out = dir.path().join("steps.csv");
        let sink = RecordingChartSink::new();
        let code = cli::run_simulation_pipeline(&config, Some(&csv_out), None, &sink);
        assert_eq!(exit_report(code), exit_report(ExitCode::SUCCESS));
        assert!(sink.rendered.borrow().is_empty());

        let content = fs::read_to_string(&csv_out).unwrap();
        let rows: Vec<&str> = content.lines().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2], "1,100,200,200,20000,-10000,10000,20000,100,0");
        assert_eq!(rows[3], "2,100,-200,0,0,10000,10000,0,0,0");
    }

    #[test]
    fn missing_price_csv_is_data_error() {
        let config = tradesim::domain::scenario::SimulationConfig {
            name: "broken".into(),
            initial_balance: 0.0,
            price: PriceSpec::Csv {
                path: PathBuf::from("/nonexistent/prices.csv"),
                column: None,
                start_date: None,
                end_date: None,
            },
            trades: TradeSpec::Csv {
                path: PathBuf::from("/nonexistent/trades.csv"),
            },
        };
        let sink = RecordingChartSink::new();
        let code = cli::run_simulation_pipeline(&config, None, None, &sink);
        assert_eq!(exit_report(code), exit_report(ExitCode::from(4)));
    }

    #[test]
    fn trades_past_price_range_are_ignored() {
        // Only the price file decides the duration.
        let dir = tempfile::TempDir::new().unwrap();
        let prices = dir.path().join("prices.csv");
        let trades = dir.path().join("trades.csv");
        fs::write(&prices, "price\n1\n2\n").unwrap();
        fs::write(&trades, "index,quantity\n1,5\n9,5\n").unwrap();

        let config = tradesim::domain::scenario::SimulationConfig {
            name: "short".into(),
            initial_balance: 0.0,
            price: PriceSpec::Csv {
                path: prices,
                column: None,
                start_date: None,
                end_date: None,
            },
            trades: TradeSpec::Csv { path: trades },
        };
        let csv_out = dir.path().join("steps.csv");
        let sink = RecordingChartSink::new();
        let code = cli::run_simulation_pipeline(&config, Some(&csv_out), None, &sink);
        assert_eq!(exit_report(code), exit_report(ExitCode::SUCCESS));
        assert_eq!(fs::read_to_string(&csv_out).unwrap().lines().count(), 3);
    }

    #[test]
    fn html_chart_adapter_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let chart_path = dir.path().join("chart.html");
        let csv_path = dir.path().join("steps.csv");
        let config = Preset::Basic.config(10_000.0);

        let code = cli::run_simulation_pipeline(
            &config,
            Some(&csv_path),
            Some(&chart_path),
            &tradesim::adapters::svg_chart_adapter::SvgChartAdapter::new(),
        );
        assert_eq!(exit_report(code), exit_report(ExitCode::SUCCESS));

        let html = fs::read_to_string(&chart_path).unwrap();
        assert!(html.contains("Basic alternating"));
        assert_eq!(html.matches("<svg").count(), 5);
    }
}
