use crate::error::ConfigError;
use reqwest::Url;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

pub const BASE_URL_VAR: &str = "DOCQA_BASE_URL";
pub const TIMEOUT_VAR: &str = "DOCQA_TIMEOUT_SECS";
pub const RESPONSE_ORDER_VAR: &str = "DOCQA_RESPONSE_ORDER";

/// Which query response may update the answer display when submissions overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseOrder {
    /// Every response is applied as it resolves; the last to resolve wins.
    #[default]
    LastResolved,
    /// Responses from submissions superseded by a newer one are dropped.
    LatestIssued,
}

impl FromStr for ResponseOrder {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "last-resolved" => Ok(ResponseOrder::LastResolved),
            "latest-issued" => Ok(ResponseOrder::LatestIssued),
            other => Err(ConfigError::InvalidResponseOrder {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub base_url: Url,
    pub timeout: Option<Duration>,
    pub response_order: ResponseOrder,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: None,
            response_order: ResponseOrder::default(),
        }
    }
}

impl ControllerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = parse_base_url(&value)?;
        }
        if let Some(value) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            config.timeout = Some(parse_timeout(&value)?);
        }
        if let Some(value) = lookup(RESPONSE_ORDER_VAR).filter(|v| !v.trim().is_empty()) {
            config.response_order = value.parse()?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, value: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(value)?;
        Ok(self)
    }

    pub fn endpoint(&self, path: &str) -> Url {
        // join() on a base without a trailing slash would drop its last segment
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url
    }
}

pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidBaseUrl {
            value: value.to_string(),
            reason: format!("unsupported scheme {}", scheme),
        }),
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidTimeout {
            value: value.to_string(),
        })
}
