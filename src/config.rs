use crate::errors::ConfigError;
use ini::Ini;
use std::path::Path;

/// Default location of the settings file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

const REGION_KEY: &str = "AWS_REGION";
const ACCESS_KEY_KEY: &str = "ACCESS_TOKEN";
const SECRET_KEY_KEY: &str = "SECRET_KEY";
const ENDPOINT_KEY: &str = "ENDPOINT_URL";

/// Connection settings for the object-storage client
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Only set for S3-compatible providers or local emulators
    pub endpoint_url: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field(
                "access_key",
                &format!("{}****", self.access_key.chars().take(4).collect::<String>()),
            )
            .field("secret_key", &"****")
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

impl Config {
    /// Build a config from explicit values, rejecting empty ones.
    pub fn new(
        region: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            region: region.into().trim().to_string(),
            access_key: access_key.into().trim().to_string(),
            secret_key: secret_key.into().trim().to_string(),
            endpoint_url: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load settings from an INI file.
    ///
    /// Section headers are ignored; when a key appears more than once the
    /// last value wins:
    ///
    /// ```ini
    /// AWS_REGION = us-east-1
    /// ACCESS_TOKEN = AKIA...
    /// SECRET_KEY = ...
    /// ; optional
    /// ENDPOINT_URL = http://localhost:9000
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist
    /// - The file is not valid INI
    /// - Any of the three required settings is missing or empty
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let conf =
            Ini::load_from_file(path).map_err(|e| ConfigError::IniParse(e.to_string()))?;

        let read = |key: &str| {
            conf.iter()
                .filter_map(|(_, props)| props.get(key))
                .last()
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let endpoint_url = Some(read(ENDPOINT_KEY)).filter(|v| !v.is_empty());

        let config = Self {
            region: read(REGION_KEY),
            access_key: read(ACCESS_KEY_KEY),
            secret_key: read(SECRET_KEY_KEY),
            endpoint_url,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.region.is_empty() {
            return Err(ConfigError::MissingField(REGION_KEY));
        }
        if self.access_key.is_empty() {
            return Err(ConfigError::MissingField(ACCESS_KEY_KEY));
        }
        if self.secret_key.is_empty() {
            return Err(ConfigError::MissingField(SECRET_KEY_KEY));
        }
        Ok(())
    }
}
