use std::env;
use std::io;
use std::path::Path;
use std::process;

use chrono::Local;
use clap::{App, Arg, ArgMatches};
use log::{debug, info};

mod common;
mod config;
mod dates;
mod errors;
mod export;
mod leads;
mod report;

use config::Overrides;
use errors::ExportError;

fn command_usage<'a, 'b>() -> App<'a, 'b> {
    const DEFAULT_SECRET_CONFIG: &str = "config/secret.toml";

    App::new("avhdata-export")
    .version(env!("CARGO_PKG_VERSION"))
    .about("Pulls contact/fuel records from the leads API for a date range and writes them to a CSV file")
    .arg(
        Arg::with_name("startDate")
            .short("s")
            .long("startDate")
            .takes_value(true)
            .help("Start date for API query YYYY-MM-DD. Defaults to the first day of the current month.")
    )
    .arg(
        Arg::with_name("endDate")
            .short("e")
            .long("endDate")
            .takes_value(true)
            .help("End date for API query YYYY-MM-DD. Defaults to the last day of the current month.")
    )
    .arg(
        Arg::with_name("outputFile")
            .short("o")
            .long("outputFile")
            .takes_value(true)
            .help("File name for .csv output file. Default is contactData.csv")
    )
    .arg(
        Arg::with_name("verbose")
            .short("v")
            .long("verbose")
            .takes_value(true)
            .possible_values(&["0", "1"])
            .help("Turn script summary ON (1) or OFF (0). Default is 1.")
    )
    .arg(
        Arg::with_name("secret-config")
            .long("secret-config")
            .takes_value(true)
            .default_value(DEFAULT_SECRET_CONFIG)
            .help("Location of private configuration holding the API token under [leads]")
    )
    .arg(
        Arg::with_name("api-root")
            .long("api-root")
            .takes_value(true)
            .help("Base URL of the leads API. Overrides [leads] root in the secret config.")
    )
    .arg(
        Arg::with_name("http-connect-timeout")
            .long("http-connect-timeout")
            .takes_value(true)
            .help("HTTP connection timeout in milliseconds. No timeout unless given.")
    )
    .arg(
        Arg::with_name("http-receive-timeout")
            .long("http-receive-timeout")
            .takes_value(true)
            .help("HTTP receive timeout in milliseconds. No timeout unless given.")
    )
}

fn overrides_from(matches: &ArgMatches) -> Overrides {
    Overrides {
        start_date: matches.value_of("startDate").map(str::to_owned),
        end_date: matches.value_of("endDate").map(str::to_owned),
        output_file: matches.value_of("outputFile").map(str::to_owned),
        verbose: matches.value_of("verbose").map(str::to_owned),
    }
}

fn run(matches: &ArgMatches) -> Result<(), ExportError> {
    let today = Local::now().naive_local().date();
    let defaults = dates::default_window(today);

    let secret_path = matches.value_of("secret-config").unwrap_or_default();
    let secret = config::read_secret_config(Path::new(secret_path))?;
    let api = config::load_api_settings(
        secret,
        env::var(config::TOKEN_ENV_VAR).ok(),
        matches.value_of("api-root"),
        matches.value_of("http-connect-timeout"),
        matches.value_of("http-receive-timeout")
    )?;

    let run_config = config::resolve_config(overrides_from(matches), defaults, &api)?;
    debug!("{:?}", run_config);

    info!("requesting avhdata for {}", run_config.window);
    let response = leads::fetch(&run_config.url, &api.timeouts)?;

    let record_count = export::write_csv(&response, &run_config.output_file)?;
    info!("wrote {} records to {}", record_count, run_config.output_file.display());

    report::report(&run_config, record_count, io::stdout().lock())?;

    Ok(())
}

fn main() {
    env_logger::init();

    let matches = command_usage().get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("\n **** {} ****\n", e);
        process::exit(1);
    }
}
