use std::net::IpAddr;
use std::time::Duration;

use crate::models::FormType;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub relay: RelayConfig,
    pub relay_paths: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub max_body_size: usize,
    pub default_form_type: Option<FormType>,
    pub log_level: String,
}

/// Where and how submissions are forwarded to the sheet service.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub target: String,
    pub encoding: Encoding,
    pub timeout: Duration,
    /// Accept a 2xx plain-text reply that mentions "success" as an acknowledgement.
    pub lenient_text_ack: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Form,
}

impl Encoding {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "form" | "urlencoded" => Ok(Encoding::Form),
            other => Err(format!("Unknown encoding '{other}', expected 'json' or 'form'")),
        }
    }
}

impl RelayConfig {
    pub fn new(target: impl Into<String>, encoding: Encoding) -> Self {
        Self {
            target: target.into(),
            encoding,
            timeout: Duration::from_secs(10),
            lenient_text_ack: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from any variable source. `from_env` reads the process environment.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let target = var("SHEET_RELAY_TARGET_URL")
            .ok_or_else(|| "Missing required environment variable: SHEET_RELAY_TARGET_URL".to_string())?;
        if !(target.starts_with("http://") || target.starts_with("https://")) {
            return Err(format!("Invalid SHEET_RELAY_TARGET_URL: {target}"));
        }

        let host: IpAddr = env_or("SHEET_RELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SHEET_RELAY_HOST: {e}"))?;

        let port: u16 = env_or("SHEET_RELAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid SHEET_RELAY_PORT: {e}"))?;

        let encoding = Encoding::parse(&env_or("SHEET_RELAY_ENCODING", "json"))
            .map_err(|e| format!("Invalid SHEET_RELAY_ENCODING: {e}"))?;

        let mut relay = RelayConfig::new(target, encoding);

        if let Some(raw) = var("SHEET_RELAY_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|e| format!("Invalid SHEET_RELAY_TIMEOUT_SECS: {e}"))?;
            relay.timeout = Duration::from_secs(secs);
        }

        relay.lenient_text_ack = match env_or("SHEET_RELAY_LENIENT_TEXT_ACK", "false").as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" | "" => false,
            other => return Err(format!("Invalid SHEET_RELAY_LENIENT_TEXT_ACK: {other}")),
        };

        let relay_paths = split_list(&env_or("SHEET_RELAY_PATHS", "/api/submit-form"));
        if relay_paths.is_empty() {
            return Err("SHEET_RELAY_PATHS must name at least one path".to_string());
        }
        if let Some(bad) = relay_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(format!("Invalid SHEET_RELAY_PATHS entry '{bad}': must start with '/'"));
        }

        let allowed_origins = split_list(&env_or("SHEET_RELAY_ALLOWED_ORIGINS", ""));

        let max_body_size: usize = env_or("SHEET_RELAY_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid SHEET_RELAY_MAX_BODY_SIZE: {e}"))?;

        let default_form_type = var("SHEET_RELAY_DEFAULT_FORM_TYPE").and_then(|v| FormType::parse(&v));

        let log_level = env_or("SHEET_RELAY_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            relay,
            relay_paths,
            allowed_origins,
            max_body_size,
            default_form_type,
            log_level,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
