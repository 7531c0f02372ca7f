use std::sync::Arc;

use anyhow::Result;
use dbot_core::init_tracing;
use storage::CustomerStore;
use tariff::MoscowClock;
use tracing::{error, info, instrument};

use crate::commands::setup_command_menu;
use crate::components::{build_handler_chain, BotComponents};
use crate::config::BotConfig;
use crate::telegram::{run_dispatcher, TelegramBotAdapter};

/// teloxide Bot with the configured API URL; an unparsable URL falls back to the default.
pub fn build_teloxide_bot(config: &BotConfig) -> teloxide::Bot {
    let bot = teloxide::Bot::new(config.bot_token.clone());
    match config.telegram_api_url.as_deref() {
        Some(url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    }
}

/// Main entry: validate config, init logging, open the customer store, install command menus,
/// then dispatch updates until Ctrl-C.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;
    let mode = config.run_mode()?;

    info!(
        data_file = %config.data_file,
        admin_id = config.admin_id,
        calc_timeout_minutes = config.calc_timeout_minutes,
        mode = mode.name(),
        "Initializing bot"
    );

    let teloxide_bot = build_teloxide_bot(&config);
    let bot = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let store = Arc::new(CustomerStore::open(
        &config.data_file,
        config.prune_unlinked_customers,
    ));
    info!(customers = store.list().len(), "Customer store loaded");

    let components = BotComponents::new(&config, bot, store, Arc::new(MoscowClock));
    setup_command_menu(components.bot.as_ref(), config.admin_id).await;
    let chain = build_handler_chain(&components);

    info!("Bot started successfully");
    run_dispatcher(teloxide_bot, chain, mode).await
}
