//! HTTP utilities for the ChartMogul CLI client.
//!
//! Wraps a `reqwest` client with the base URL, default headers and timeout
//! taken from the configuration, and maps responses onto [`ApiError`].

use crate::api::ApiError;
use crate::configuration::Configuration;
use crate::credentials::Credential;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, trace};

pub const USER_AGENT: &str = concat!("chartmogul-cli/", env!("CARGO_PKG_VERSION"));

/// Configuration for HTTP requests with common settings
#[derive(Debug, Clone)]
pub struct HttpRequestConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Default headers to include with all requests
    pub default_headers: HashMap<String, String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for HttpRequestConfig {
    fn default() -> Self {
        Self::from_configuration(&Configuration::default())
    }
}

impl HttpRequestConfig {
    pub fn from_configuration(configuration: &Configuration) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(ACCEPT.as_str().to_string(), "application/json".to_string());

        Self {
            base_url: configuration
                .api_base_url()
                .as_str()
                .trim_end_matches('/')
                .to_string(),
            default_headers,
            timeout: configuration.timeout_secs(),
        }
    }
}

/// HTTP client wrapper with common request handling logic
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpRequestConfig,
}

impl HttpClient {
    pub fn new(config: HttpRequestConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self { client, config })
    }

    /// Full URL for an API path and optional pre-encoded query string
    pub fn url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(query) if !query.is_empty() => {
                format!("{}{}?{}", self.config.base_url, path, query)
            }
            _ => format!("{}{}", self.config.base_url, path),
        }
    }

    /// Make an authenticated GET request and decode the JSON body
    pub async fn get<T>(
        &self,
        path: &str,
        query: Option<&str>,
        credential: &Credential,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path, query);
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .basic_auth(credential.token(), Some(credential.key()));

        for (key, value) in &self.config.default_headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let response_text = response.text().await?;
        trace!("Raw response text: {}", response_text);

        if !status.is_success() {
            return Err(ApiError::Remote {
                status,
                body: response_text,
            });
        }

        serde_json::from_str::<T>(&response_text).map_err(|e| {
            error!(
                "Failed to deserialize response: {}. Raw response: {}",
                e, response_text
            );
            ApiError::JsonError(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_config_default() {
        let config = HttpRequestConfig::default();
        assert_eq!(config.base_url, "https://api.chartmogul.com/v1");
        assert_eq!(config.timeout, 30);
        assert_eq!(
            config.default_headers.get("accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_url_building() {
        let client = HttpClient::new(HttpRequestConfig::default()).unwrap();
        assert_eq!(client.url("/ping", None), "https://api.chartmogul.com/v1/ping");
        assert_eq!(
            client.url("/metrics/mrr", Some("start-date=2016-01-01")),
            "https://api.chartmogul.com/v1/metrics/mrr?start-date=2016-01-01"
        );
    }
}
