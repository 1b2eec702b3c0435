use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::access::RoleMismatchPolicy;
use crate::pipeline::StageTrigger;
use crate::session::RegistrationRedirect;

/// Distinguishes runtime behavior for different stages of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" | "local" => Ok(Self::Development),
            "test" | "ci" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironment {
                value: value.to_string(),
            }),
        }
    }
}

/// Top-level configuration for the portal client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub pipeline: PipelineConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = match env::var("PORTAL_ENV") {
            Ok(raw) => AppEnvironment::parse(&raw)?,
            Err(_) => AppEnvironment::Development,
        };

        let base_url = env::var("PORTAL_API_BASE_URL")
            .unwrap_or_else(|_| ApiConfig::DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl { value: base_url });
        }

        let timeout_secs = env::var("PORTAL_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let credential_path = env::var("PORTAL_CREDENTIAL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".portal/credentials.json"));

        let role_mismatch = match env::var("PORTAL_ROLE_MISMATCH") {
            Ok(raw) => parse_role_mismatch(&raw)?,
            Err(_) => RoleMismatchPolicy::default(),
        };

        let register_redirect = match env::var("PORTAL_REGISTER_REDIRECT") {
            Ok(raw) => parse_register_redirect(&raw)?,
            Err(_) => RegistrationRedirect::default(),
        };

        let stage_trigger = match env::var("PORTAL_STAGE_TRIGGER") {
            Ok(raw) => parse_stage_trigger(&raw)?,
            Err(_) => StageTrigger::default(),
        };

        let log_level = env::var("PORTAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                request_timeout: Duration::from_secs(timeout_secs),
            },
            session: SessionConfig {
                credential_path,
                role_mismatch,
                register_redirect,
            },
            pipeline: PipelineConfig { stage_trigger },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings for the remote hiring API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080/api";
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Credential persistence and navigation policies.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub credential_path: PathBuf,
    pub role_mismatch: RoleMismatchPolicy,
    pub register_redirect: RegistrationRedirect,
}

/// Policies that shape how interview outcomes move an application.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    pub stage_trigger: StageTrigger,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub fn parse_role_mismatch(raw: &str) -> Result<RoleMismatchPolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "login" => Ok(RoleMismatchPolicy::ToLogin),
        "dashboard" | "default" => Ok(RoleMismatchPolicy::ToDefaultDashboard),
        _ => Err(ConfigError::InvalidPolicy {
            key: "PORTAL_ROLE_MISMATCH",
            value: raw.to_string(),
        }),
    }
}

pub fn parse_register_redirect(raw: &str) -> Result<RegistrationRedirect, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "login" => Ok(RegistrationRedirect::Login),
        "dashboard" => Ok(RegistrationRedirect::RoleDashboard),
        _ => Err(ConfigError::InvalidPolicy {
            key: "PORTAL_REGISTER_REDIRECT",
            value: raw.to_string(),
        }),
    }
}

pub fn parse_stage_trigger(raw: &str) -> Result<StageTrigger, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "final" => Ok(StageTrigger::FinalInterview),
        "any" => Ok(StageTrigger::AnyInterview),
        _ => Err(ConfigError::InvalidPolicy {
            key: "PORTAL_STAGE_TRIGGER",
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment { value: String },
    InvalidBaseUrl { value: String },
    InvalidTimeout,
    InvalidPolicy { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEnvironment { value } => {
                write!(f, "PORTAL_ENV must be development, test or production, got '{value}'")
            }
            ConfigError::InvalidBaseUrl { value } => {
                write!(f, "PORTAL_API_BASE_URL must be an http(s) URL, got '{value}'")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "PORTAL_REQUEST_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidPolicy { key, value } => {
                write!(f, "{key} does not accept '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
