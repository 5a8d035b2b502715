use clap::ArgMatches;
use tracing::{debug, trace};

use crate::{
    api::{AnalyticsApi, MetricEntry},
    auth::Authenticator,
    chartmogul::ChartMogulClient,
    commands::params::{
        PARAMETER_CHART, PARAMETER_END_DATE, PARAMETER_FORMAT, PARAMETER_GEO, PARAMETER_HEADERS,
        PARAMETER_INTERVAL, PARAMETER_KEY, PARAMETER_METRIC, PARAMETER_PLANS, PARAMETER_PRETTY,
        PARAMETER_START_DATE, PARAMETER_THIS, PARAMETER_TOKEN,
    },
    configuration::Configuration,
    credentials::{Credential, CredentialStore},
    error::CliError,
    fetcher::MetricFetcher,
    format::{FormattingError, OutputFormat, OutputFormatOptions},
    presenter::Presenter,
    prompt::{CredentialPrompt, InquirePrompt},
    query::{QueryDescriptor, QueryError, TimeUnit},
    spinner::Spinner,
};

fn string_argument<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.get_one::<String>(name).map(String::as_str)
}

fn unit_argument(matches: &ArgMatches, name: &str) -> Result<Option<TimeUnit>, QueryError> {
    string_argument(matches, name).map(TimeUnit::parse).transpose()
}

/// Build the metric query from the parsed command line.
pub fn query_from_matches(matches: &ArgMatches) -> Result<QueryDescriptor, QueryError> {
    QueryDescriptor::builder()
        .metric(string_argument(matches, PARAMETER_METRIC).unwrap_or_default())
        .start_date(string_argument(matches, PARAMETER_START_DATE))
        .end_date(string_argument(matches, PARAMETER_END_DATE))
        .this(unit_argument(matches, PARAMETER_THIS)?)
        .interval(unit_argument(matches, PARAMETER_INTERVAL)?)
        .geo(string_argument(matches, PARAMETER_GEO))
        .plans(string_argument(matches, PARAMETER_PLANS))
        .build()
}

pub fn output_format_from_matches(matches: &ArgMatches) -> Result<OutputFormat, FormattingError> {
    let options = OutputFormatOptions {
        with_headers: matches.get_flag(PARAMETER_HEADERS),
        pretty: matches.get_flag(PARAMETER_PRETTY),
    };
    OutputFormat::from_string_with_options(
        string_argument(matches, PARAMETER_FORMAT).unwrap_or("json"),
        options,
    )
}

/// Credential given with `--token` and `--key`, if both are present.
pub fn credential_from_matches(matches: &ArgMatches) -> Option<Credential> {
    let token = string_argument(matches, PARAMETER_TOKEN)?;
    let key = string_argument(matches, PARAMETER_KEY)?;
    let credential = Credential::new(token.trim(), key.trim());
    credential.is_complete().then_some(credential)
}

/// Authenticate and fetch the entries for `query`, re-authenticating when a
/// session stops being accepted.
pub async fn retrieve_entries<A, P>(
    api: &A,
    prompt: P,
    store: CredentialStore,
    spinner: &Spinner,
    max_retries: u32,
    initial: Option<Credential>,
    query: &QueryDescriptor,
) -> Result<Vec<MetricEntry>, CliError>
where
    A: AnalyticsApi,
    P: CredentialPrompt,
{
    let mut authenticator =
        Authenticator::new(api, prompt, store, spinner).with_max_retries(max_retries);
    let session = authenticator.authenticate(initial).await?;

    let fetcher = MetricFetcher::new(api, spinner);
    let entries = fetcher
        .fetch_with_reauth(&mut authenticator, session, query)
        .await?;
    debug!("Fetched {} entries for {}", entries.len(), query.path());

    Ok(entries)
}

/// Fetch a metric and print it.
///
/// The query is validated before the configuration, the credentials or the
/// network are touched.
pub async fn fetch_metric(matches: &ArgMatches) -> Result<(), CliError> {
    let query = query_from_matches(matches)?;
    let format = output_format_from_matches(matches)?;
    trace!("Query: {}?{}", query.path(), query.to_query_string()?);

    let configuration = Configuration::load_or_create_default()?;
    let store = CredentialStore::new(configuration.credentials_file_path()?);
    let initial = match credential_from_matches(matches) {
        Some(credential) => {
            debug!("Using the credential given on the command line");
            Some(credential)
        }
        None => store.load()?,
    };

    let api = ChartMogulClient::new(&configuration)?;
    let spinner = Spinner::new();
    let entries = retrieve_entries(
        &api,
        InquirePrompt,
        store,
        &spinner,
        configuration.max_auth_retries(),
        initial,
        &query,
    )
    .await;
    spinner.stop();
    let entries = entries?;

    let presenter = Presenter::new(format);
    presenter.render(
        query.metric(),
        &entries,
        &query.title(),
        matches.get_flag(PARAMETER_CHART),
    )?;

    Ok(())
}
