//! Dispatcher runner: converts teloxide messages and callback queries to core updates and passes
//! them to the HandlerChain, over long polling or a webhook.

use anyhow::Result;
use dbot_core::Update as CoreUpdate;
use handler_chain::HandlerChain;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::update_listeners::{self, webhooks};
use tracing::{debug, error, info, instrument};

use super::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};
use crate::config::RunMode;

async fn run_chain(chain: &HandlerChain, update: CoreUpdate) {
    let user_id = update.user().id;
    if let Err(e) = chain.handle(&update).await {
        error!(error = %e, user_id, kind = update.kind(), "Handler chain failed");
    }
}

async fn on_message(msg: teloxide::types::Message, chain: HandlerChain) -> ResponseResult<()> {
    run_chain(&chain, CoreUpdate::Message(TelegramMessageWrapper(&msg).to_core())).await;
    Ok(())
}

async fn on_callback(q: teloxide::types::CallbackQuery, chain: HandlerChain) -> ResponseResult<()> {
    run_chain(&chain, CoreUpdate::Callback(TelegramCallbackWrapper(&q).to_core())).await;
    Ok(())
}

/// Runs the dispatcher until Ctrl-C. Updates from one chat are handled in order.
///
/// Polling removes any registered webhook first; both modes drop updates queued while the bot
/// was offline.
#[instrument(skip(bot, chain))]
pub async fn run_dispatcher(bot: teloxide::Bot, chain: HandlerChain, mode: RunMode) -> Result<()> {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![chain])
        .default_handler(|upd| async move {
            debug!(update_id = ?upd.id, "Ignoring unsupported update");
        })
        .enable_ctrlc_handler()
        .build();

    match mode {
        RunMode::Polling => {
            bot.delete_webhook().drop_pending_updates(true).await?;
            info!("Starting long polling");
            let listener = update_listeners::Polling::builder(bot)
                .drop_pending_updates()
                .build();
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
        RunMode::Webhook {
            listen,
            url,
            secret_token,
        } => {
            info!(%listen, url = %url, "Starting webhook listener");
            let mut options = webhooks::Options::new(listen, url).drop_pending_updates();
            if let Some(secret) = secret_token {
                options = options.secret_token(secret);
            }
            let listener = webhooks::axum(bot, options).await?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
                )
                .await;
        }
    }

    info!("Dispatcher stopped");
    Ok(())
}
