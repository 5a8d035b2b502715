//! Command parameters of the ChartMogul CLI.
//!
//! Parameter names live here as constants so that the command definition and
//! the actions reading the matches agree on them.

use crate::format::OutputFormat;
use crate::query::TimeUnit;
use clap::{Arg, ArgAction};

// Parameter names
pub const PARAMETER_METRIC: &str = "metric";
pub const PARAMETER_THIS: &str = "this";
pub const PARAMETER_START_DATE: &str = "start-date";
pub const PARAMETER_END_DATE: &str = "end-date";
pub const PARAMETER_INTERVAL: &str = "interval";
pub const PARAMETER_GEO: &str = "geo";
pub const PARAMETER_PLANS: &str = "plans";
pub const PARAMETER_CHART: &str = "chart";
pub const PARAMETER_FORMAT: &str = "format";
pub const PARAMETER_PRETTY: &str = "pretty";
pub const PARAMETER_HEADERS: &str = "headers";
pub const PARAMETER_TOKEN: &str = "token";
pub const PARAMETER_KEY: &str = "key";
pub const PARAMETER_VERBOSE: &str = "verbose";

// Environment variables
pub const ENV_FORMAT: &str = "CHARTMOGUL_FORMAT";
pub const ENV_API_TOKEN: &str = "CHARTMOGUL_API_TOKEN";
pub const ENV_SECRET_KEY: &str = "CHARTMOGUL_SECRET_KEY";

/// The metric to fetch. Validated by the query builder so that an unknown
/// name is reported together with the supported set.
pub fn metric_parameter() -> Arg {
    Arg::new(PARAMETER_METRIC)
        .num_args(1)
        .required(false)
        .value_name("metric")
        .help("The metric you would like to fetch, e.g. all, mrr, arr, customer-churn-rate, mrr-churn-rate, ltv, customers, asp, arpa")
}

pub fn this_parameter() -> Arg {
    Arg::new(PARAMETER_THIS)
        .short('t')
        .long(PARAMETER_THIS)
        .num_args(1)
        .required(false)
        .value_name("increment")
        .help("A handy replacement for the start and end date fields, e.g. week, month, quarter")
        .value_parser(TimeUnit::names())
}

pub fn start_date_parameter() -> Arg {
    Arg::new(PARAMETER_START_DATE)
        .short('s')
        .long(PARAMETER_START_DATE)
        .num_args(1)
        .required(false)
        .value_name("start")
        .help("The start date of the required period of data. An ISO-8601 formatted date, e.g. 2015-05-12")
}

pub fn end_date_parameter() -> Arg {
    Arg::new(PARAMETER_END_DATE)
        .short('e')
        .long(PARAMETER_END_DATE)
        .num_args(1)
        .required(false)
        .value_name("end")
        .help("The end date of the required period of data. An ISO-8601 formatted date, e.g. 2015-05-12")
}

pub fn interval_parameter() -> Arg {
    Arg::new(PARAMETER_INTERVAL)
        .short('i')
        .long(PARAMETER_INTERVAL)
        .num_args(1)
        .required(false)
        .value_name("interval")
        .help("One of `day`, `week`, `month` (default), or `quarter`")
        .value_parser(TimeUnit::names())
}

pub fn geo_parameter() -> Arg {
    Arg::new(PARAMETER_GEO)
        .short('g')
        .long(PARAMETER_GEO)
        .num_args(1)
        .required(false)
        .value_name("geo")
        .help("A comma-separated list of ISO 3166-1 Alpha-2 country codes to filter the results to, e.g. US,GB,DE")
}

pub fn plans_parameter() -> Arg {
    Arg::new(PARAMETER_PLANS)
        .short('P')
        .long(PARAMETER_PLANS)
        .num_args(1)
        .required(false)
        .value_name("plans")
        .help("A comma-separated list of plan names to filter the results to, e.g. \"Silver plan,Gold plan\"")
}

pub fn chart_parameter() -> Arg {
    Arg::new(PARAMETER_CHART)
        .short('c')
        .long(PARAMETER_CHART)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("View the result in a chart")
}

pub fn format_parameter() -> Arg {
    Arg::new(PARAMETER_FORMAT)
        .short('f')
        .long(PARAMETER_FORMAT)
        .num_args(1)
        .required(false)
        .env(ENV_FORMAT)
        .default_value("json")
        .help("Output data format")
        .value_parser(OutputFormat::names())
}

/// This flag only affects JSON output.
pub fn format_pretty_parameter() -> Arg {
    Arg::new(PARAMETER_PRETTY)
        .long(PARAMETER_PRETTY)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Format the output pretty")
}

/// This flag only affects CSV output.
pub fn format_with_headers_parameter() -> Arg {
    Arg::new(PARAMETER_HEADERS)
        .long(PARAMETER_HEADERS)
        .action(ArgAction::SetTrue)
        .required(false)
        .help("Format the output with headers")
}

pub fn token_parameter() -> Arg {
    Arg::new(PARAMETER_TOKEN)
        .long(PARAMETER_TOKEN)
        .num_args(1)
        .required(false)
        .env(ENV_API_TOKEN)
        .hide_env_values(true)
        .help("ChartMogul API token, used instead of the stored credentials")
}

pub fn key_parameter() -> Arg {
    Arg::new(PARAMETER_KEY)
        .long(PARAMETER_KEY)
        .num_args(1)
        .required(false)
        .env(ENV_SECRET_KEY)
        .hide_env_values(true)
        .help("ChartMogul secret key, used instead of the stored credentials")
}

pub fn verbose_parameter() -> Arg {
    Arg::new(PARAMETER_VERBOSE)
        .short('v')
        .long(PARAMETER_VERBOSE)
        .action(ArgAction::SetTrue)
        .help("Enable verbose output for debugging")
}
