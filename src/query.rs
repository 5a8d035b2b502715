//! Metric query construction.
//!
//! This module turns the raw command-line inputs (metric name, explicit or
//! relative date range, interval and filters) into an immutable
//! [`QueryDescriptor`] that the API client can send as-is.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;
use tracing::trace;

/// Minimum length of an accepted date string (`YYYY-MM-DD`)
const MIN_DATE_LENGTH: usize = 10;

/// Error types that can occur while building a metric query
#[derive(Debug, Error)]
pub enum QueryError {
    /// The requested metric is not one of the supported metrics
    #[error("{name} is not a supported metric. Try one of the following: {supported}")]
    UnsupportedMetric { name: String, supported: String },
    /// The interval or relative unit is not one of the supported units
    #[error("{name} is not a supported time unit. Try one of the following: {supported}")]
    UnsupportedUnit { name: String, supported: String },
    /// Neither an explicit date pair nor a relative shorthand was supplied
    #[error("Missing parameters --start-date and --end-date or just --this are required.")]
    MissingDateRange,
    /// A date could not be parsed as a calendar date
    #[error("Invalid date '{0}'. Dates must be in the format YYYY-MM-DD, e.g. 2015-01-25.")]
    InvalidDate(String),
    /// The start date lies after the end date
    #[error("Invalid date range: the start date {start} is after the end date {end}.")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    /// The relative unit could not be subtracted from the reference date
    #[error("Cannot compute a date range of one {unit} before {reference}.")]
    DateOutOfRange { unit: TimeUnit, reference: NaiveDate },
    #[error("Failed to encode the query string: {0}")]
    EncodingError(#[from] serde_urlencoded::ser::Error),
}

/// The metrics exposed by the ChartMogul metrics API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Metric {
    All,
    Mrr,
    Arr,
    CustomerChurnRate,
    MrrChurnRate,
    Ltv,
    Customers,
    Asp,
    Arpa,
}

impl Metric {
    /// Returns the names of all supported metrics in their canonical order
    pub fn names() -> Vec<String> {
        Metric::iter().map(|metric| metric.to_string()).collect()
    }

    /// `all` bundles several metrics into each entry
    pub fn is_composite(&self) -> bool {
        matches!(self, Metric::All)
    }

    /// Parse a metric name, producing the user-facing error on failure.
    /// Names match exactly: no case folding and no trimming.
    pub fn parse(name: &str) -> Result<Metric, QueryError> {
        Metric::from_str(name).map_err(|_| QueryError::UnsupportedMetric {
            name: name.to_string(),
            supported: Metric::names().join(", "),
        })
    }
}

/// Granularity used both for entry bucketing and for the `--this` shorthand
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, AsRefStr, Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
}

impl TimeUnit {
    pub fn names() -> Vec<String> {
        TimeUnit::iter().map(|unit| unit.to_string()).collect()
    }

    pub fn parse(name: &str) -> Result<TimeUnit, QueryError> {
        TimeUnit::from_str(&name.trim().to_lowercase()).map_err(|_| QueryError::UnsupportedUnit {
            name: name.to_string(),
            supported: TimeUnit::names().join(", "),
        })
    }

    /// The date exactly one unit before `date`. Month arithmetic clamps to the
    /// last day of the target month.
    pub fn one_before(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeUnit::Day => date.checked_sub_days(Days::new(1)),
            TimeUnit::Week => date.checked_sub_days(Days::new(7)),
            TimeUnit::Month => date.checked_sub_months(Months::new(1)),
            TimeUnit::Quarter => date.checked_sub_months(Months::new(3)),
        }
    }
}

/// An inclusive calendar date range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<DateRange, QueryError> {
        if start > end {
            return Err(QueryError::InvalidDateRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// The range from one `unit` before `today` up to `today`.
    pub fn last(unit: TimeUnit, today: NaiveDate) -> Result<DateRange, QueryError> {
        let start = unit
            .one_before(today)
            .ok_or(QueryError::DateOutOfRange {
                unit,
                reference: today,
            })?;
        DateRange::new(start, today)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Parse a user-supplied date.
///
/// Accepts plain `YYYY-MM-DD` dates as well as longer ISO-8601 date-times.
/// A date-time carrying an offset is converted to UTC first; otherwise the
/// leading calendar date is kept and the time of day ignored.
pub fn parse_date(value: &str) -> Result<NaiveDate, QueryError> {
    let value = value.trim();
    let invalid = || QueryError::InvalidDate(value.to_string());
    if value.len() < MIN_DATE_LENGTH {
        return Err(invalid());
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(date_time.with_timezone(&Utc).date_naive());
    }
    if let Ok(date_time) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(date_time.with_timezone(&Utc).date_naive());
    }

    let (date, time) = match (value.get(..MIN_DATE_LENGTH), value.get(MIN_DATE_LENGTH..)) {
        (Some(date), Some(time)) => (date, time),
        _ => return Err(invalid()),
    };
    if !(time.is_empty() || time.starts_with('T') || time.starts_with(' ')) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())
}

/// Split a comma-separated filter, dropping blank items. Items may arrive
/// percent-encoded (`Silver%20plan`) and are stored decoded, since the query
/// string is encoded once on the way out.
fn split_filter(value: &str) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .split(',')
        .map(|item| percent_decode_str(item).decode_utf8_lossy())
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[derive(Serialize)]
struct QueryParameters {
    #[serde(rename = "start-date")]
    start_date: NaiveDate,
    #[serde(rename = "end-date")]
    end_date: NaiveDate,
    interval: TimeUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    geo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plans: Option<String>,
}

/// A fully validated request for one metric over one date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    metric: Metric,
    range: DateRange,
    interval: TimeUnit,
    geo: Option<Vec<String>>,
    plans: Option<Vec<String>>,
}

impl QueryDescriptor {
    pub fn builder() -> MetricQueryBuilder {
        MetricQueryBuilder::default()
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn interval(&self) -> TimeUnit {
        self.interval
    }

    pub fn geo(&self) -> Option<&[String]> {
        self.geo.as_deref()
    }

    pub fn plans(&self) -> Option<&[String]> {
        self.plans.as_deref()
    }

    /// API path of the metric endpoint, relative to the base URL
    pub fn path(&self) -> String {
        format!("/metrics/{}", self.metric)
    }

    pub fn to_query_string(&self) -> Result<String, QueryError> {
        let parameters = QueryParameters {
            start_date: self.range.start(),
            end_date: self.range.end(),
            interval: self.interval,
            geo: self.geo.as_ref().map(|geo| geo.join(",")),
            plans: self.plans.as_ref().map(|plans| plans.join(",")),
        };
        Ok(serde_urlencoded::to_string(parameters)?)
    }

    /// Heading printed above the results
    pub fn title(&self) -> String {
        format!(
            "ChartMogul {} from {} to {}",
            self.metric.as_ref().to_uppercase(),
            self.range.start(),
            self.range.end()
        )
    }
}

/// Builder validating raw user input into a [`QueryDescriptor`].
///
/// When both an explicit start/end pair and a relative unit are supplied, the
/// explicit pair wins.
#[derive(Debug, Clone, Default)]
pub struct MetricQueryBuilder {
    metric: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    this: Option<TimeUnit>,
    interval: Option<TimeUnit>,
    geo: Option<String>,
    plans: Option<String>,
    today: Option<NaiveDate>,
}

impl MetricQueryBuilder {
    pub fn metric(mut self, metric: &str) -> Self {
        self.metric = Some(metric.to_string());
        self
    }

    pub fn start_date(mut self, start_date: Option<&str>) -> Self {
        self.start_date = start_date.map(String::from);
        self
    }

    pub fn end_date(mut self, end_date: Option<&str>) -> Self {
        self.end_date = end_date.map(String::from);
        self
    }

    pub fn this(mut self, unit: Option<TimeUnit>) -> Self {
        self.this = unit;
        self
    }

    pub fn interval(mut self, interval: Option<TimeUnit>) -> Self {
        self.interval = interval;
        self
    }

    pub fn geo(mut self, geo: Option<&str>) -> Self {
        self.geo = geo.map(String::from);
        self
    }

    pub fn plans(mut self, plans: Option<&str>) -> Self {
        self.plans = plans.map(String::from);
        self
    }

    /// Reference date for relative ranges. Defaults to the current UTC date.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn build(self) -> Result<QueryDescriptor, QueryError> {
        let metric = Metric::parse(self.metric.as_deref().unwrap_or_default())?;

        let range = match (&self.start_date, &self.end_date, self.this) {
            (Some(start), Some(end), _) => DateRange::new(parse_date(start)?, parse_date(end)?)?,
            (_, _, Some(unit)) => {
                let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
                DateRange::last(unit, today)?
            }
            _ => return Err(QueryError::MissingDateRange),
        };

        let query = QueryDescriptor {
            metric,
            range,
            interval: self.interval.unwrap_or_default(),
            geo: self.geo.as_deref().and_then(split_filter),
            plans: self.plans.as_deref().and_then(split_filter),
        };
        trace!("Built metric query: {:?}", query);

        Ok(query)
    }
}
