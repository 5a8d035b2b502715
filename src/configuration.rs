use crate::credentials::DEFAULT_CREDENTIALS_FILE_NAME;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tracing::debug;
use url::Url;

pub const DEFAULT_APPLICATION_ID: &str = "chartmogul-cli";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const CONFIG_DIR_ENV: &str = "CHARTMOGUL_CONFIG_DIR";
pub const DEFAULT_API_BASE_URL: &str = "https://api.chartmogul.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_AUTH_RETRIES: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data, because of: {cause}")]
    FailedToLoadData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to write configuration data to file, because of: {cause}")]
    FailedToWriteData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    api_base_url: Url,
    timeout_secs: u64,
    max_auth_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    credentials_file: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            // the constant is a valid URL
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("valid default API URL"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_auth_retries: DEFAULT_MAX_AUTH_RETRIES,
            credentials_file: None,
        }
    }
}

impl Configuration {
    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn max_auth_retries(&self) -> u32 {
        self.max_auth_retries
    }

    pub fn set_api_base_url(&mut self, url: Url) {
        self.api_base_url = url;
    }

    pub fn set_credentials_file(&mut self, path: PathBuf) {
        self.credentials_file = Some(path);
    }

    /// Directory holding the configuration and, by default, the credentials.
    ///
    /// `CHARTMOGUL_CONFIG_DIR` takes precedence over the platform directory.
    pub fn get_configuration_directory() -> Result<PathBuf, ConfigurationError> {
        if let Ok(config_dir_str) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(config_dir_str));
        }

        match config_dir() {
            Some(mut directory) => {
                directory.push(DEFAULT_APPLICATION_ID);
                Ok(directory)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        Ok(Self::get_configuration_directory()?.join(DEFAULT_CONFIGURATION_FILE_NAME))
    }

    /// Location of the credential file, honouring an explicit override.
    pub fn credentials_file_path(&self) -> Result<PathBuf, ConfigurationError> {
        match &self.credentials_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::get_configuration_directory()?.join(DEFAULT_CREDENTIALS_FILE_NAME)),
        }
    }

    /// Load the default configuration, creating one with default values if
    /// none exists yet.
    pub fn load_or_create_default() -> Result<Configuration, ConfigurationError> {
        let default_file_path = Configuration::get_default_configuration_file_path()?;
        debug!(
            "Loading or creating configuration from {}...",
            default_file_path.display()
        );

        match fs::read_to_string(&default_file_path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Configuration file not found, creating default configuration");
                let default_config = Configuration::default();
                default_config.save(&default_file_path)?;
                Ok(default_config)
            }
            Err(e) => Err(ConfigurationError::FailedToLoadData { cause: Box::new(e) }),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Configuration, ConfigurationError> {
        let content = fs::read_to_string(path)
            .map_err(|cause| ConfigurationError::FailedToLoadData {
                cause: Box::new(cause),
            })?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Configuration, ConfigurationError> {
        serde_yaml::from_str(content).map_err(|cause| ConfigurationError::FailedToLoadData {
            cause: Box::new(cause),
        })
    }

    pub fn write(&self, writer: Box<dyn Write>) -> Result<(), ConfigurationError> {
        serde_yaml::to_writer(writer, self)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigurationError> {
        // first check if the parent directory exists and try to create it if not
        match path.parent() {
            Some(directory) => fs::create_dir_all(directory)
                .map_err(|_| ConfigurationError::FailedToFindConfigurationDirectory)?,
            None => return Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }

        let file = File::create(path)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        self.write(Box::new(file))
    }
}
