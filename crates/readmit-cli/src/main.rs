use anyhow::Result;
use clap::parser::ValueSource;
use clap::ArgMatches;
use log::LevelFilter;
use std::path::PathBuf;

use readmit_cli::benchmark::input::BenchmarkRunConfig;
use readmit_cli::benchmark::run::run_benchmark_command;
use readmit_cli::cli::build_cli;
use readmit_cli::holdout::input::HoldoutRunConfig;
use readmit_cli::holdout::run::run_holdout_command;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("READMIT_LOG", "error,readmit=info"))
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("benchmark", sub_m)) => handle_benchmark(sub_m),
        Some(("holdout", sub_m)) => handle_holdout(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

/// Without a config file or `--data` there is nothing to run: print the
/// default configuration so it can be saved and edited.
fn print_template<T: serde::Serialize>(matches: &ArgMatches, template: &T) -> Result<bool> {
    if matches.get_one::<PathBuf>("config").is_some() || matches.get_one::<String>("data").is_some() {
        return Ok(false);
    }
    println!("{}", serde_json::to_string_pretty(template)?);
    eprintln!("[readmit] No config file provided; printed the default configuration template.");

    let ignored: Vec<&str> = matches
        .ids()
        .map(|id| id.as_str())
        .filter(|id| matches.value_source(id) == Some(ValueSource::CommandLine))
        .collect();
    if !ignored.is_empty() {
        eprintln!(
            "[readmit] Options not applied without a config file or --data: {}",
            ignored.join(", ")
        );
    }
    Ok(true)
}

fn handle_benchmark(matches: &ArgMatches) -> Result<()> {
    if print_template(matches, &BenchmarkRunConfig::default())? {
        return Ok(());
    }

    let config_path: Option<&PathBuf> = matches.get_one("config");
    if let Some(path) = config_path {
        log::info!("[readmit::benchmark] Using config: {:?}", path);
    }

    let params = BenchmarkRunConfig::from_arguments(config_path, matches)?;

    match run_benchmark_command(&params) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Benchmark failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_holdout(matches: &ArgMatches) -> Result<()> {
    if print_template(matches, &HoldoutRunConfig::default())? {
        return Ok(());
    }

    let config_path: Option<&PathBuf> = matches.get_one("config");
    if let Some(path) = config_path {
        log::info!("[readmit::holdout] Using config: {:?}", path);
    }

    let params = HoldoutRunConfig::from_arguments(config_path, matches)?;

    match run_holdout_command(&params) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Holdout run failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1)
        }
    }
}
