use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fmt, io};
use url::Url;

use crate::domain::notification::SIGNED_IN_MESSAGE;
use crate::use_cases::{DispatchPolicy, TransportFailurePolicy};

// Runtime settings for the login host. Every field has a default, so an empty
// TOML file or no file at all is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub auth_service_url: String,
    pub login_path: String,
    // Unset or zero disables the request timeout.
    pub request_timeout_ms: Option<u64>,
    pub toast_duration_ms: u64,
    pub home_route: String,
    pub login_route: String,
    pub register_route: String,
    pub signed_in_message: String,
    pub session_file: Option<PathBuf>,
    #[serde(deserialize_with = "deserialize_policy")]
    pub transport_failure: TransportFailurePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_service_url: "http://127.0.0.1:3002".to_string(),
            login_path: "/jwt/login".to_string(),
            request_timeout_ms: None,
            toast_duration_ms: 2000,
            home_route: "/".to_string(),
            login_route: "/login".to_string(),
            register_route: "/register".to_string(),
            signed_in_message: SIGNED_IN_MESSAGE.to_string(),
            session_file: None,
            transport_failure: TransportFailurePolicy::Notify,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    InvalidValue { key: &'static str, value: String },
    InvalidUrl { value: String, source: url::ParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse config {}: {source}", path.display())
            }
            ConfigError::InvalidValue { key, value } => write!(f, "invalid {key}: {value:?}"),
            ConfigError::InvalidUrl { value, source } => write!(f, "invalid url {value:?}: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn parse_policy(value: &str) -> Option<TransportFailurePolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "notify" => Some(TransportFailurePolicy::Notify),
        "silent" => Some(TransportFailurePolicy::Silent),
        _ => None,
    }
}

fn deserialize_policy<'de, D>(deserializer: D) -> Result<TransportFailurePolicy, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_policy(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("unknown transport_failure policy {raw:?}"))
    })
}

fn parse_millis(key: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

// Load settings: optional TOML file named by LOGIN_CONFIG, then environment overrides.
pub fn load() -> Result<AppConfig, ConfigError> {
    let base = match env::var("LOGIN_CONFIG") {
        Ok(path) => AppConfig::from_file(Path::new(&path))?,
        Err(_) => AppConfig::default(),
    };
    base.with_overrides(|key| env::var(key).ok())
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    // Apply environment-style overrides through `lookup` so tests need not touch
    // the process environment.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("AUTH_SERVICE_URL") {
            self.auth_service_url = value;
        }
        if let Some(value) = lookup("LOGIN_PATH") {
            self.login_path = value;
        }
        if let Some(value) = lookup("LOGIN_TIMEOUT_MS") {
            self.request_timeout_ms = Some(parse_millis("LOGIN_TIMEOUT_MS", value)?);
        }
        if let Some(value) = lookup("TOAST_DURATION_MS") {
            self.toast_duration_ms = parse_millis("TOAST_DURATION_MS", value)?;
        }
        if let Some(value) = lookup("HOME_ROUTE") {
            self.home_route = value;
        }
        if let Some(value) = lookup("LOGIN_ROUTE") {
            self.login_route = value;
        }
        if let Some(value) = lookup("REGISTER_ROUTE") {
            self.register_route = value;
        }
        if let Some(value) = lookup("SIGNED_IN_MESSAGE") {
            self.signed_in_message = value;
        }
        if let Some(value) = lookup("SESSION_FILE") {
            self.session_file = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("TRANSPORT_FAILURE_POLICY") {
            self.transport_failure = parse_policy(&value).ok_or(ConfigError::InvalidValue {
                key: "TRANSPORT_FAILURE_POLICY",
                value,
            })?;
        }
        Ok(self)
    }

    // Base URL joined with the login path; an absolute path replaces the base path.
    pub fn login_url(&self) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.auth_service_url).map_err(|source| ConfigError::InvalidUrl {
            value: self.auth_service_url.clone(),
            source,
        })?;
        base.join(&self.login_path)
            .map_err(|source| ConfigError::InvalidUrl {
                value: self.login_path.clone(),
                source,
            })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn dispatch_policy(&self) -> DispatchPolicy {
        DispatchPolicy {
            home_route: self.home_route.clone(),
            toast_duration: self.toast_duration(),
            transport_failure: self.transport_failure,
            signed_in_message: self.signed_in_message.clone(),
        }
    }
}
