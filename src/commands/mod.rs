//! CLI command definition and argument parsing.
//!
//! The ChartMogul CLI has a single command taking the metric as a positional
//! argument. The parameters themselves are defined in [`params`].

use clap::Command;

pub mod params;

use params::{
    chart_parameter, end_date_parameter, format_parameter, format_pretty_parameter,
    format_with_headers_parameter, geo_parameter, interval_parameter, key_parameter,
    metric_parameter, plans_parameter, start_date_parameter, this_parameter, token_parameter,
    verbose_parameter,
};

pub const COMMAND_NAME: &str = "chartmogul";

const EXAMPLES: &str = "Examples:

  $ chartmogul all --start-date 2016-01-01 --end-date 2016-10-15
  $ chartmogul mrr --start-date 2016-01-01 --end-date 2016-10-15 --geo DE,US
  $ chartmogul ltv --this week --plans Silver,Gold
  $ chartmogul arr --this quarter --interval week --chart";

/// Create the command-line interface of the ChartMogul CLI.
///
/// The caller decides how to parse with it, so that help, version and usage
/// errors can be mapped to the CLI's own exit codes.
pub fn create_cli_command() -> Command {
    Command::new(COMMAND_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .override_usage("chartmogul <metric> [options]")
        .after_help(EXAMPLES)
        .arg(metric_parameter())
        .arg(this_parameter())
        .arg(start_date_parameter())
        .arg(end_date_parameter())
        .arg(interval_parameter())
        .arg(geo_parameter())
        .arg(plans_parameter())
        .arg(chart_parameter())
        .arg(format_parameter())
        .arg(format_pretty_parameter())
        .arg(format_with_headers_parameter())
        .arg(token_parameter())
        .arg(key_parameter())
        .arg(verbose_parameter())
}

#[cfg(test)]
mod tests {
    use super::params::*;
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        create_cli_command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let matches = create_cli_command()
            .try_get_matches_from([
                "chartmogul", "mrr", "-s", "2016-01-01", "-e", "2016-01-31", "-i", "week", "-g",
                "US,GB", "-P", "Gold", "-c",
            ])
            .unwrap();

        assert_eq!(
            matches.get_one::<String>(PARAMETER_METRIC).map(String::as_str),
            Some("mrr")
        );
        assert_eq!(
            matches.get_one::<String>(PARAMETER_INTERVAL).map(String::as_str),
            Some("week")
        );
        assert_eq!(
            matches.get_one::<String>(PARAMETER_PLANS).map(String::as_str),
            Some("Gold")
        );
        assert!(matches.get_flag(PARAMETER_CHART));
        assert!(!matches.get_flag(PARAMETER_VERBOSE));
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let result = create_cli_command().try_get_matches_from(["chartmogul", "mrr", "-t", "year"]);
        assert!(result.is_err());
    }
}
