//! Environment-driven receiver configuration
//!
//! [`ReceiverConfig::from_env`] reads the process environment (call
//! `dotenvy::dotenv()` first to pick up a `.env` file). Tests use
//! [`ReceiverConfig::from_lookup`] with an explicit variable source.

use std::{path::PathBuf, str::FromStr, time::Duration};

use tracing::{error, info, warn};

use crate::error::{ServiceError, ServiceResult};

/// Sender IP shipped as the default; almost certainly wrong for a real setup
pub const DEFAULT_SENDER_IP: &str = "192.168.1.100";

/// Request body cap for browser uploads, 50 MiB
///
/// Cropped full-screen captures arrive as base64 JSON and easily exceed a
/// few megabytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Settings for the vision model client
#[derive(Debug, Clone, PartialEq)]
pub struct VisionConfig {
    /// Bearer credential; `None` disables extraction
    pub api_key:    Option<String>,
    /// Model identifier sent with every request
    pub model:      String,
    /// Max-token budget for the reply
    pub max_tokens: u32,
    /// Base URL of the chat completions API
    pub base_url:   String,
    /// Request timeout; `None` waits indefinitely
    pub timeout:    Option<Duration>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key:    None,
            model:      "gpt-4-vision-preview".to_string(),
            max_tokens: 4000,
            base_url:   DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout:    None,
        }
    }
}

/// Receiver configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverConfig {
    pub debug:              bool,
    pub host:               String,
    pub port:               u16,
    pub sender_ip:          String,
    pub sender_port:        u16,
    pub screenshot_timeout: Duration,
    pub vision:             VisionConfig,
    pub screenshots_dir:    PathBuf,
    pub cropped_dir:        PathBuf,
    pub temp_dir:           PathBuf,
    pub static_dir:         PathBuf,
    /// Largest accepted request body in bytes
    pub max_body_bytes:     usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            debug:              true,
            host:               "0.0.0.0".to_string(),
            port:               5001,
            sender_ip:          DEFAULT_SENDER_IP.to_string(),
            sender_port:        5000,
            screenshot_timeout: Duration::from_secs(10),
            vision:             VisionConfig::default(),
            screenshots_dir:    PathBuf::from("data/screenshots"),
            cropped_dir:        PathBuf::from("data/cropped_screenshots"),
            temp_dir:           PathBuf::from("data/temp"),
            static_dir:         PathBuf::from("static"),
            max_body_bytes:     DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ReceiverConfig {
    /// Builds the configuration from the process environment
    pub fn from_env() -> ServiceResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    ///
    /// Unset and empty variables fall back to defaults. Numeric variables
    /// that fail to parse are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use snaptable_core::config::ReceiverConfig;
    ///
    /// let config = ReceiverConfig::from_lookup(|key| match key {
    ///     "SENDER_IP" => Some("10.0.0.7".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.sender_url(), "http://10.0.0.7:5000");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let vision = VisionConfig {
            api_key:    get("OPENAI_API_KEY"),
            model:      get("OPENAI_MODEL").unwrap_or(defaults.vision.model),
            max_tokens: parse_or("OPENAI_MAX_TOKENS", get("OPENAI_MAX_TOKENS"), 4000)?,
            base_url:   get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.vision.base_url),
            timeout:    get("OPENAI_TIMEOUT_SECS")
                .map(|raw| parse_value::<u64>("OPENAI_TIMEOUT_SECS", &raw))
                .transpose()?
                .map(Duration::from_secs),
        };

        Ok(Self {
            debug: get("DEBUG").map(|v| parse_flag(&v)).unwrap_or(defaults.debug),
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            sender_ip: get("SENDER_IP").unwrap_or(defaults.sender_ip),
            sender_port: parse_or("SENDER_PORT", get("SENDER_PORT"), defaults.sender_port)?,
            screenshot_timeout: Duration::from_secs(parse_or(
                "SCREENSHOT_TIMEOUT_SECS",
                get("SCREENSHOT_TIMEOUT_SECS"),
                defaults.screenshot_timeout.as_secs(),
            )?),
            vision,
            screenshots_dir: get("SCREENSHOTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.screenshots_dir),
            cropped_dir: get("CROPPED_SCREENSHOTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cropped_dir),
            temp_dir: get("TEMP_DIR").map(PathBuf::from).unwrap_or(defaults.temp_dir),
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            max_body_bytes: get("MAX_UPLOAD_MB")
                .map(|raw| parse_value::<usize>("MAX_UPLOAD_MB", &raw))
                .transpose()?
                .map(|mb| mb.saturating_mul(1024 * 1024))
                .unwrap_or(defaults.max_body_bytes),
        })
    }

    /// Base URL of the sender, e.g. `http://192.168.1.100:5000`
    pub fn sender_url(&self) -> String {
        format!("http://{}:{}", self.sender_ip, self.sender_port)
    }

    /// Creates the screenshot, cropped and temp directories if absent
    pub fn ensure_directories(&self) -> ServiceResult<()> {
        for dir in [&self.screenshots_dir, &self.cropped_dir, &self.temp_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Logs configuration problems; returns false when extraction cannot work
    ///
    /// Never fails: a receiver without an API key still serves screenshots.
    pub fn validate(&self) -> bool {
        let mut valid = true;

        match &self.vision.api_key {
            Some(_) => info!("Loaded OpenAI API key from environment"),
            None => {
                error!(
                    "OpenAI API key is missing. Table extraction will not work until \
                     OPENAI_API_KEY is set."
                );
                valid = false;
            }
        }

        if self.sender_ip == DEFAULT_SENDER_IP {
            warn!(
                "Using default sender IP address {}. Set SENDER_IP to the address of the sender \
                 machine.",
                DEFAULT_SENDER_IP
            );
        }

        valid
    }
}

/// `true`, `1` and `t` (any case) are truthy; everything else is false
fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "t")
}

fn parse_value<T>(key: &str, raw: &str) -> ServiceResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ServiceError::InvalidConfig {
        key:    key.to_string(),
        reason: format!("'{}': {}", raw, e),
    })
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> ServiceResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}
