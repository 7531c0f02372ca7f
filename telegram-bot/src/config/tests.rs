//! Config tests.

use crate::config::{BotConfig, RunMode};
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
    "BOT_TOKEN",
    "TELEGRAM_API_URL",
    "TELOXIDE_API_URL",
    "LOG_FILE",
    "DATA_FILE",
    "ADMIN_ID",
    "CALC_TIMEOUT_MINUTES",
    "PRUNE_UNLINKED_CUSTOMERS",
    "PUBLIC_URL",
    "WEBHOOK_URL",
    "WEBHOOK_SECRET",
    "PORT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    clear_env();
    env::set_var("BOT_TOKEN", "test_token");

    let config = BotConfig::load(None).unwrap();

    assert_eq!(config.bot_token, "test_token");
    assert!(config.telegram_api_url.is_none());
    assert_eq!(config.log_file, "logs/visits-bot.log");
    assert_eq!(config.data_file, "data.json");
    assert_eq!(config.admin_id, 1006274417);
    assert_eq!(config.calc_timeout_minutes, 15);
    assert_eq!(config.calc_timeout().as_secs(), 900);
    assert!(!config.prune_unlinked_customers);
    assert_eq!(config.port, 8080);
    assert!(config.validate().is_ok());
    assert_eq!(config.run_mode().unwrap(), RunMode::Polling);
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    clear_env();
    env::set_var("BOT_TOKEN", "custom_token");
    env::set_var("DATA_FILE", "/tmp/customers.json");
    env::set_var("ADMIN_ID", "42");
    env::set_var("CALC_TIMEOUT_MINUTES", "5");
    env::set_var("PRUNE_UNLINKED_CUSTOMERS", "true");
    env::set_var("TELOXIDE_API_URL", "http://127.0.0.1:8081");

    let config = BotConfig::load(None).unwrap();

    assert_eq!(config.data_file, "/tmp/customers.json");
    assert_eq!(config.admin_id, 42);
    assert_eq!(config.calc_timeout_minutes, 5);
    assert!(config.prune_unlinked_customers);
    assert_eq!(config.telegram_api_url.as_deref(), Some("http://127.0.0.1:8081"));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_token_argument_overrides_env() {
    clear_env();
    env::set_var("BOT_TOKEN", "env_token");
    let config = BotConfig::load(Some("cli_token".to_string())).unwrap();
    assert_eq!(config.bot_token, "cli_token");
}

#[test]
#[serial]
fn test_missing_token_fails() {
    clear_env();
    let err = BotConfig::load(None).unwrap_err();
    assert!(err.to_string().contains("BOT_TOKEN"));
}

#[test]
#[serial]
fn test_unparsable_number_fails() {
    clear_env();
    env::set_var("BOT_TOKEN", "t");
    env::set_var("PORT", "eighty");
    assert!(BotConfig::load(None).is_err());
    env::remove_var("PORT");
    env::set_var("PRUNE_UNLINKED_CUSTOMERS", "maybe");
    assert!(BotConfig::load(None).is_err());
}

/// **Test: PUBLIC_URL selects webhook mode; URL is base without trailing slash plus the token.**
#[test]
#[serial]
fn test_webhook_mode_from_public_url() {
    clear_env();
    env::set_var("BOT_TOKEN", "123:abc");
    env::set_var("PUBLIC_URL", "https://bot.example.com/");
    env::set_var("WEBHOOK_SECRET", "s3cret_-token");
    env::set_var("PORT", "9000");

    let config = BotConfig::load(None).unwrap();
    config.validate().unwrap();

    match config.run_mode().unwrap() {
        RunMode::Webhook {
            listen,
            url,
            secret_token,
        } => {
            assert_eq!(listen.port(), 9000);
            assert!(listen.ip().is_unspecified());
            assert_eq!(url.as_str(), "https://bot.example.com/123:abc");
            assert_eq!(secret_token.as_deref(), Some("s3cret_-token"));
        }
        other => panic!("expected webhook mode, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_webhook_url_alias() {
    clear_env();
    env::set_var("BOT_TOKEN", "t");
    env::set_var("WEBHOOK_URL", "https://alias.example.com");
    let config = BotConfig::load(None).unwrap();
    assert_eq!(config.run_mode().unwrap().name(), "webhook");
}

#[test]
#[serial]
fn test_validate_rejects_bad_values() {
    clear_env();
    env::set_var("BOT_TOKEN", "t");

    let mut config = BotConfig::load(None).unwrap();
    config.telegram_api_url = Some("not a url".to_string());
    assert!(config.validate().is_err());

    let mut config = BotConfig::load(None).unwrap();
    config.webhook_secret = Some("has space".to_string());
    assert!(config.validate().is_err());

    let mut config = BotConfig::load(None).unwrap();
    config.public_url = Some("ftp://example.com".to_string());
    assert!(config.validate().is_err());

    let mut config = BotConfig::load(None).unwrap();
    config.calc_timeout_minutes = 0;
    assert!(config.validate().is_err());
}

/// **Test: a timeout whose seconds overflow u64 is rejected; the largest valid one is accepted.**
#[test]
#[serial]
fn test_validate_rejects_overflowing_timeout() {
    clear_env();
    env::set_var("CALC_TIMEOUT_MINUTES", u64::MAX.to_string());

    let config = BotConfig::load(Some("t".to_string())).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("CALC_TIMEOUT_MINUTES is too large"));
    assert_eq!(config.calc_timeout().as_secs(), u64::MAX);

    let mut config = BotConfig::load(Some("t".to_string())).unwrap();
    config.calc_timeout_minutes = u64::MAX / 60;
    assert!(config.validate().is_ok());
    assert_eq!(config.calc_timeout().as_secs(), (u64::MAX / 60) * 60);
}
