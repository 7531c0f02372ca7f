//! Handlers for the visits bot: logging, the admin panel, admin text commands, and the customer
//! menu. Also the small send/edit helpers they share.

mod admin_commands;
mod admin_panel;
mod admin_state;
mod logging;
mod user_menu;

pub use admin_commands::AdminCommandsHandler;
pub use admin_panel::AdminPanelHandler;
pub use admin_state::{AdminSession, AdminSessions, AdminStep, VisitDraft};
pub use logging::LoggingHandler;
pub use user_menu::UserMenuHandler;

use dbot_core::{Bot, CallbackQuery, InlineKeyboard};
use tracing::{info, warn};

use crate::components::BotComponents;
use crate::keyboards;
use crate::texts;

/// Answers a callback query; failures are logged.
pub(crate) async fn answer(bot: &dyn Bot, q: &CallbackQuery, text: Option<&str>, show_alert: bool) {
    if let Err(e) = bot.answer_callback(&q.id, text, show_alert).await {
        warn!(user_id = q.user.id, error = %e, "Failed to answer callback");
    }
}

/// Sends a message; returns its id, or `None` after logging the failure.
pub(crate) async fn send(
    bot: &dyn Bot,
    chat_id: i64,
    text: &str,
    keyboard: Option<&InlineKeyboard>,
) -> Option<i32> {
    match bot.send_message(chat_id, text, keyboard).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(chat_id, error = %e, "Failed to send message");
            None
        }
    }
}

/// Edits the message a callback came from; returns whether the edit succeeded.
pub(crate) async fn edit(
    bot: &dyn Bot,
    q: &CallbackQuery,
    text: &str,
    keyboard: Option<&InlineKeyboard>,
) -> bool {
    let Some(message_id) = q.message_id else {
        warn!(user_id = q.user.id, "Callback without a message, cannot edit");
        return false;
    };
    match bot.edit_message(q.chat.id, message_id, text, keyboard).await {
        Ok(()) => true,
        Err(e) => {
            warn!(user_id = q.user.id, message_id, error = %e, "Failed to edit message");
            false
        }
    }
}

/// Edits the callback's message, sending a new one if the edit fails.
pub(crate) async fn edit_or_send(
    bot: &dyn Bot,
    q: &CallbackQuery,
    text: &str,
    keyboard: Option<&InlineKeyboard>,
) {
    if !edit(bot, q, text, keyboard).await {
        send(bot, q.chat.id, text, keyboard).await;
    }
}

/// Tells a freshly linked user they can use the bot, dropping their pending welcome messages.
pub(crate) async fn notify_user_registered(components: &BotComponents, user_id: i64, customer_name: &str) {
    components
        .welcome_messages
        .delete_all(components.bot.as_ref(), user_id)
        .await;
    let menu = keyboards::main_menu();
    if send(
        components.bot.as_ref(),
        user_id,
        &texts::registered(customer_name),
        Some(&menu),
    )
    .await
    .is_some()
    {
        info!(user_id, customer = %customer_name, "User notified about registration");
    }
}
