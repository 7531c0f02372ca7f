//! Bot command menus: hidden for customers, admin commands in the admin's chat.

use dbot_core::{Bot, BotCommand, CommandScope};
use tracing::{error, info, instrument};

pub fn admin_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("admin", "Панель администратора"),
        BotCommand::new("create", "Создать заказчика"),
        BotCommand::new("link", "Привязать пользователя"),
        BotCommand::new("unlink", "Отвязать пользователя"),
        BotCommand::new("addvisit", "Добавить выезд"),
        BotCommand::new("finduser", "Найти заказчика по ID"),
    ]
}

/// Installs both menus. Failures are logged; startup continues.
#[instrument(skip(bot))]
pub async fn setup_command_menu(bot: &dyn Bot, admin_id: i64) {
    if let Err(e) = bot.set_commands(CommandScope::Default, &[]).await {
        error!(error = %e, "Failed to clear default command menu");
    }
    match bot
        .set_commands(CommandScope::Chat(admin_id), &admin_commands())
        .await
    {
        Ok(()) => info!(admin_id, "Command menus installed"),
        Err(e) => error!(admin_id, error = %e, "Failed to set admin command menu"),
    }
}
