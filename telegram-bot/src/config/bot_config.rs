//! BotConfig: everything the bot reads from the environment. Use load() then validate().

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

use super::RunMode;

pub const DEFAULT_ADMIN_ID: i64 = 1006274417;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CALC_TIMEOUT_MINUTES: u64 = 15;

/// Bot config. Use BotConfig::load() for env-based loading.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN (or `--token`)
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// DATA_FILE
    pub data_file: String,
    /// ADMIN_ID
    pub admin_id: i64,
    /// CALC_TIMEOUT_MINUTES
    pub calc_timeout_minutes: u64,
    /// PRUNE_UNLINKED_CUSTOMERS
    pub prune_unlinked_customers: bool,
    /// PUBLIC_URL or WEBHOOK_URL; selects webhook mode when non-empty
    pub public_url: Option<String>,
    /// WEBHOOK_SECRET
    pub webhook_secret: Option<String>,
    /// PORT
    pub port: u16,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} is not valid: {raw}")),
        None => Ok(default),
    }
}

fn parse_bool_var(name: &str) -> Result<bool> {
    match non_empty_var(name).map(|v| v.to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => anyhow::bail!("{name} must be true or false, got: {v}"),
        },
    }
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            Some(t) => t,
            None => non_empty_var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let telegram_api_url =
            non_empty_var("TELEGRAM_API_URL").or_else(|| non_empty_var("TELOXIDE_API_URL"));
        let log_file = non_empty_var("LOG_FILE").unwrap_or_else(|| "logs/visits-bot.log".to_string());
        let data_file = non_empty_var("DATA_FILE").unwrap_or_else(|| "data.json".to_string());
        let public_url = non_empty_var("PUBLIC_URL").or_else(|| non_empty_var("WEBHOOK_URL"));

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            data_file,
            admin_id: parse_var("ADMIN_ID", DEFAULT_ADMIN_ID)?,
            calc_timeout_minutes: parse_var("CALC_TIMEOUT_MINUTES", DEFAULT_CALC_TIMEOUT_MINUTES)?,
            prune_unlinked_customers: parse_bool_var("PRUNE_UNLINKED_CUSTOMERS")?,
            public_url,
            webhook_secret: non_empty_var("WEBHOOK_SECRET"),
            port: parse_var("PORT", DEFAULT_PORT)?,
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.contains(char::is_whitespace) || self.bot_token.contains('/') {
            anyhow::bail!("BOT_TOKEN contains whitespace or '/'");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if self.calc_timeout_minutes == 0 {
            anyhow::bail!("CALC_TIMEOUT_MINUTES must be greater than zero");
        }
        if self.calc_timeout_minutes.checked_mul(60).is_none() {
            anyhow::bail!(
                "CALC_TIMEOUT_MINUTES is too large: {}",
                self.calc_timeout_minutes
            );
        }
        if let Some(ref secret) = self.webhook_secret {
            let valid_chars = secret
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if secret.len() > 256 || !valid_chars {
                anyhow::bail!("WEBHOOK_SECRET must be 1-256 characters of A-Z, a-z, 0-9, _ and -");
            }
        }
        if self.public_url.is_some() {
            self.webhook_url()?;
        }
        Ok(())
    }

    /// Inactivity timeout; saturates for values `validate` would reject.
    pub fn calc_timeout(&self) -> Duration {
        Duration::from_secs(self.calc_timeout_minutes.saturating_mul(60))
    }

    /// `<PUBLIC_URL without trailing slash>/<token>`.
    pub fn webhook_url(&self) -> Result<Url> {
        let base = self
            .public_url
            .as_deref()
            .context("PUBLIC_URL not set")?
            .trim_end_matches('/');
        let url = Url::parse(&format!("{}/{}", base, self.bot_token))
            .with_context(|| format!("PUBLIC_URL is not a valid URL: {base}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("PUBLIC_URL must be an http(s) URL: {base}");
        }
        Ok(url)
    }

    /// Webhook when PUBLIC_URL (or WEBHOOK_URL) is set, polling otherwise.
    pub fn run_mode(&self) -> Result<RunMode> {
        if self.public_url.is_none() {
            return Ok(RunMode::Polling);
        }
        Ok(RunMode::Webhook {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port)),
            url: self.webhook_url()?,
            secret_token: self.webhook_secret.clone(),
        })
    }
}
