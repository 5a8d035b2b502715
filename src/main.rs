use chartmogul_cli::{
    actions::metrics::fetch_metric,
    commands::{create_cli_command, params::{PARAMETER_METRIC, PARAMETER_VERBOSE}},
    error::{CliError, EXIT_FAILURE},
};
use clap::error::ErrorKind;
use color_print::ceprintln;
use tracing_subscriber::EnvFilter;

const MISSING_METRIC: &str = "Error: Please specify the metric you would like to fetch, e.g. all, mrr, arr, customer-churn-rate, mrr-churn-rate, ltv, customers, asp, arpa.";

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(error: &CliError) {
    if error.is_usage_error() {
        ceprintln!("<red>Error: {}</>", error);
        eprintln!();
        eprintln!("{}", create_cli_command().render_help());
    } else {
        ceprintln!("<red>{} Type chartmogul -h for more info.</>", error);
    }
}

/// Main entry point for the program
#[tokio::main]
async fn main() {
    let matches = match create_cli_command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                // printing to stdout cannot meaningfully fail here
                let _ = e.print();
                std::process::exit(0);
            }
            _ => {
                let _ = e.print();
                std::process::exit(EXIT_FAILURE);
            }
        },
    };

    init_logging(matches.get_flag(PARAMETER_VERBOSE));

    if !matches.contains_id(PARAMETER_METRIC) {
        eprintln!("{}", create_cli_command().render_help());
        ceprintln!("<red>  {}</>", MISSING_METRIC);
        std::process::exit(EXIT_FAILURE);
    }

    if let Err(e) = fetch_metric(&matches).await {
        report(&e);
        std::process::exit(e.exit_code());
    }
}
