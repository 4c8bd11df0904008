//! # traffic-forecast
//!
//! Command-line front end: reads a traffic CSV, runs the forecast and
//! writes the combined table.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use traffic_forecast::config::ForecastParameters;
use traffic_forecast::core::MissingValuePolicy;
use traffic_forecast::ingest::{self, CsvColumns};
use traffic_forecast::output::{self, ExportFormat};
use traffic_forecast::pipeline;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "traffic-forecast")]
#[command(version, about = "Traffic forecast with customer adjustment", long_about = None)]
struct Cli {
    /// Input CSV with a timestamp column and a traffic column
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the combined history + forecast table
    #[arg(short, long, default_value = "traffic_forecast_adjusted.csv")]
    output: PathBuf,

    /// Output format (default: from the output extension, else csv)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// TOML file with forecast parameters; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seasonal periods (e.g. 30 for a monthly cycle in daily data)
    #[arg(short, long)]
    seasonal_periods: Option<usize>,

    /// Forecast horizon in days
    #[arg(long)]
    horizon: Option<usize>,

    /// Historical customer change used for scaling (+ for increase, - for drop)
    #[arg(long, allow_negative_numbers = true)]
    historical_change: Option<f64>,

    /// Expected customer change during the forecast (+ for increase, - for drop)
    #[arg(long, allow_negative_numbers = true)]
    forecast_change: Option<f64>,

    /// Handling of blank traffic values before the model fit
    #[arg(long, value_enum)]
    missing: Option<MissingArg>,

    /// Name of the timestamp column
    #[arg(long, default_value = "time_sec")]
    time_column: String,

    /// Name of the traffic column
    #[arg(long, default_value = "AVG_Total_Traffic")]
    value_column: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Csv,
    Json,
    Xlsx,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MissingArg {
    Drop,
    Ffill,
    Error,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Xlsx => ExportFormat::Xlsx,
        }
    }
}

impl From<MissingArg> for MissingValuePolicy {
    fn from(arg: MissingArg) -> Self {
        match arg {
            MissingArg::Drop => MissingValuePolicy::Drop,
            MissingArg::Ffill => MissingValuePolicy::ForwardFill,
            MissingArg::Error => MissingValuePolicy::Error,
        }
    }
}

impl Cli {
    /// Parameters from the config file (or defaults) with flag overrides.
    fn parameters(&self) -> anyhow::Result<ForecastParameters> {
        let mut params = match &self.config {
            Some(path) => ForecastParameters::load(path)
                .with_context(|| format!("loading parameters from {}", path.display()))?,
            None => ForecastParameters::default(),
        };

        if let Some(v) = self.seasonal_periods {
            params.seasonal_periods = v;
        }
        if let Some(v) = self.horizon {
            params.forecast_horizon_days = v;
        }
        if let Some(v) = self.historical_change {
            params.historical_customer_change = v;
        }
        if let Some(v) = self.forecast_change {
            params.forecast_customer_change = v;
        }
        if let Some(v) = self.missing {
            params.missing_values = v.into();
        }

        params.validate()?;
        Ok(params)
    }

    fn export_format(&self) -> ExportFormat {
        self.format
            .map(ExportFormat::from)
            .or_else(|| ExportFormat::from_path(&self.output))
            .unwrap_or_default()
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "traffic_forecast=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let params = cli.parameters()?;
    let columns = CsvColumns {
        time: cli.time_column.clone(),
        value: cli.value_column.clone(),
    };

    let series = ingest::read_series_from_path(&cli.input, &columns)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    let report = pipeline::run(&series, &params).context("forecast failed")?;

    output::write_table(&report.table, cli.export_format(), &cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    print!("{}", report.summary());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli::parse_from([
            "traffic-forecast",
            "--input",
            "traffic.csv",
            "--seasonal-periods",
            "7",
            "--historical-change",
            "-1000",
            "--missing",
            "ffill",
        ]);

        let params = cli.parameters().unwrap();
        assert_eq!(params.seasonal_periods, 7);
        assert_eq!(params.historical_customer_change, -1000.0);
        assert_eq!(params.missing_values, MissingValuePolicy::ForwardFill);
        assert_eq!(params.forecast_horizon_days, 120);
    }

    #[test]
    fn export_format_follows_extension() {
        let cli = Cli::parse_from(["traffic-forecast", "-i", "a.csv", "-o", "out.json"]);
        assert_eq!(cli.export_format(), ExportFormat::Json);

        let cli = Cli::parse_from(["traffic-forecast", "-i", "a.csv", "-o", "out.json", "-f", "csv"]);
        assert_eq!(cli.export_format(), ExportFormat::Csv);

        let cli = Cli::parse_from(["traffic-forecast", "-i", "a.csv"]);
        assert_eq!(cli.export_format(), ExportFormat::Csv);

        let cli = Cli::parse_from(["traffic-forecast", "-i", "a.csv", "-o", "out.xlsx"]);
        assert_eq!(cli.export_format(), ExportFormat::Xlsx);
    }

    #[test]
    fn invalid_flag_values_are_rejected() {
        let cli = Cli::parse_from(["traffic-forecast", "-i", "a.csv", "--horizon", "0"]);
        assert!(cli.parameters().is_err());
    }
}
