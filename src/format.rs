//! Formatting utilities for the ChartMogul CLI client.
//!
//! This module provides functionality for formatting metric entries as JSON
//! or CSV text.

use crate::api::MetricEntry;
use csv::Writer;
use serde_json::Value;
use std::str::FromStr;

pub const JSON: &str = "json";
pub const CSV: &str = "csv";

/// Error types that can occur during formatting operations
#[derive(Debug, thiserror::Error)]
pub enum FormattingError {
    /// Error when an unsupported output format is requested
    #[error("invalid output format {0}")]
    UnsupportedOutputFormat(String),
    /// Error specific to CSV operations
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    /// Error when converting bytes to UTF-8 string
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),
    #[error("CSV writer into inner error: {0}")]
    CsvIntoInnerError(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),
}

#[derive(Debug, Clone, Default, PartialEq, PartialOrd)]
pub struct OutputFormatOptions {
    pub with_headers: bool,
    pub pretty: bool,
}

/// Enum representing the supported output formats
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum OutputFormat {
    /// JSON (JavaScript Object Notation) format
    Json(OutputFormatOptions),
    /// CSV (Comma-Separated Values) format
    Csv(OutputFormatOptions),
}

impl OutputFormat {
    /// Returns a vector of all supported format names as strings
    pub fn names() -> Vec<&'static str> {
        vec![JSON, CSV]
    }

    pub fn from_string_with_options(
        format_str: &str,
        options: OutputFormatOptions,
    ) -> Result<OutputFormat, FormattingError> {
        let normalized_format = format_str.to_lowercase();
        match normalized_format.as_str() {
            JSON => Ok(OutputFormat::Json(options)),
            CSV => Ok(OutputFormat::Csv(options)),
            _ => Err(FormattingError::UnsupportedOutputFormat(normalized_format)),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json(OutputFormatOptions::default())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            OutputFormat::Json(_) => write!(f, "{}", JSON),
            OutputFormat::Csv(_) => write!(f, "{}", CSV),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormattingError;

    fn from_str(format_str: &str) -> Result<OutputFormat, FormattingError> {
        Self::from_string_with_options(format_str, OutputFormatOptions::default())
    }
}

pub trait Formattable {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError>;
}

/// CSV cell for a JSON value; strings lose their quotes and null is empty
fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Columns of the entry table: `date` first, then the other keys of the
/// first entry in sorted order.
fn csv_columns(entries: &[MetricEntry]) -> Vec<String> {
    let Some(first) = entries.first() else {
        return Vec::new();
    };

    let mut columns: Vec<String> = first
        .fields()
        .keys()
        .filter(|key| key.as_str() != "date")
        .cloned()
        .collect();
    columns.sort();
    if first.fields().contains_key("date") {
        columns.insert(0, "date".to_string());
    }
    columns
}

impl Formattable for [MetricEntry] {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        match f {
            OutputFormat::Json(options) => {
                if options.pretty {
                    Ok(serde_json::to_string_pretty(self)?)
                } else {
                    Ok(serde_json::to_string(self)?)
                }
            }
            OutputFormat::Csv(options) => {
                let columns = csv_columns(self);
                let mut wtr = Writer::from_writer(vec![]);

                if options.with_headers {
                    wtr.write_record(columns.iter().map(|c| c.to_uppercase()))?;
                }
                for entry in self {
                    wtr.write_record(columns.iter().map(|c| csv_cell(entry.fields().get(c))))?;
                }

                Ok(String::from_utf8(wtr.into_inner()?)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    fn entries() -> Vec<MetricEntry> {
        vec![
            entry(r#"{"date":"2016-01-31","mrr":100,"mrr-churn":-5.5}"#),
            entry(r#"{"date":"2016-02-29","mrr":120,"mrr-churn":null}"#),
        ]
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::names(), vec!["json", "csv"]);
        assert_eq!(OutputFormat::from_str("CSV").unwrap().to_string(), "csv");
        assert!(OutputFormat::from_str("tree").is_err());
    }

    #[test]
    fn test_json_output() {
        let compact = entries().format(&OutputFormat::default()).unwrap();
        assert!(compact.starts_with("[{"));
        assert!(compact.contains("\"mrr\":100"));

        let pretty = entries()
            .format(&OutputFormat::Json(OutputFormatOptions {
                pretty: true,
                ..Default::default()
            }))
            .unwrap();
        assert!(pretty.contains("\n"));
        assert!(pretty.contains("\"date\": \"2016-02-29\""));
    }

    #[test]
    fn test_csv_output_with_headers() {
        let csv = entries()
            .format(&OutputFormat::Csv(OutputFormatOptions {
                with_headers: true,
                ..Default::default()
            }))
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "DATE,MRR,MRR-CHURN");
        assert_eq!(lines[1], "2016-01-31,100,-5.5");
        assert_eq!(lines[2], "2016-02-29,120,");
    }

    #[test]
    fn test_csv_of_no_entries_is_empty() {
        let empty: Vec<MetricEntry> = Vec::new();
        let csv = empty
            .format(&OutputFormat::Csv(OutputFormatOptions::default()))
            .unwrap();
        assert!(csv.is_empty());
    }
}
