use std::error::Error;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use pv_cashflow::cli::{Args, load_parameters};
use pv_cashflow::report::{
    AnnualBreakdown, EnergySummary, breakdown_table, ledger_table, plot_cashflow,
    plot_energy_flow, summary_table,
};
use pv_cashflow::{Assumptions, run_simulation_with};
use pv_model::{InputParameters, ParameterConfig, YearlyRecord};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type PlotFn = fn(&[YearlyRecord], &Path) -> std::result::Result<(), Box<dyn Error>>;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let assumptions = match &args.assumptions {
        Some(path) => Assumptions::from_toml_file(path)?,
        None => Assumptions::default(),
    };

    let params = match &args.params {
        Some(path) => load_parameters(path)?,
        None => InputParameters::default(),
    };
    let mut params = args.overrides.apply(params);
    if args.estimate_consumption {
        params = params.with_estimated_consumption();
        info!(consumption = params.annual_consumption, "Estimated annual consumption");
    }

    let config = ParameterConfig::default();
    for finding in config.out_of_range(&params) {
        warn!(field = finding.field(), "{}", config.describe(&finding));
    }

    let result = run_simulation_with(&params, &assumptions).context("Simulation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let energy = EnergySummary::from_records(&result.yearly_data, params.enable_feed_in_tariff);
        println!("{}", summary_table(&result, &energy));
        println!("{}", ledger_table(&result.yearly_data, args.all_years));

        if let Some(year) = args.breakdown {
            let record = result.year(year).with_context(|| {
                format!("Year {year} is outside the {}-year horizon", result.horizon())
            })?;
            println!("{}", breakdown_table(&AnnualBreakdown::for_record(record)));
        }
    }

    if let Some(dir) = &args.plot_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create plot directory: {}", dir.display()))?;
        for (name, plot) in [
            ("cashflow.png", plot_cashflow as PlotFn),
            ("energy_flow.png", plot_energy_flow as PlotFn),
        ] {
            let path = dir.join(name);
            plot(&result.yearly_data, &path)
                .map_err(|e| anyhow::anyhow!("{e}"))
                .with_context(|| format!("Failed to write plot: {}", path.display()))?;
            info!(path = %path.display(), "Plot saved");
        }
    }

    Ok(())
}
