//! Admin text commands (`/register`, `/create`, `/customers`, `/link`, …).

use std::str::FromStr;

use async_trait::async_trait;
use dbot_core::{Command, Handler, HandlerResponse, Message, Result, Update};
use storage::{CustomerId, LinkOutcome, StorageError};
use tariff::format_rub;
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::{notify_user_registered, send};
use crate::components::BotComponents;
use crate::texts;

/// Recognised commands with their usage line.
const COMMANDS: [(&str, &str); 10] = [
    (
        "register",
        "Использование: /register <id_пользователя> <id_заказчика>\n\nПример: /register 123456789 1",
    ),
    ("create", "Использование: /create <имя>"),
    ("customers", "Использование: /customers"),
    ("link", "Использование: /link <id_заказчика> <id_пользователя>"),
    ("unlink", "Использование: /unlink <id_заказчика> <id_пользователя>"),
    ("addsum", "Использование: /addsum <id_заказчика> <сумма>"),
    ("setsum", "Использование: /setsum <id_заказчика> <сумма>"),
    ("remove", "Использование: /remove <id_заказчика>"),
    ("finduser", "Использование: /finduser <id_пользователя>"),
    ("clearvisits", "Использование: /clearvisits <id_заказчика>"),
];

#[derive(Error, Debug)]
enum CommandError {
    #[error("wrong number of arguments")]
    Usage,
    #[error("{0}")]
    Parse(String),
    #[error("customer {0} not found")]
    UnknownCustomer(CustomerId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn arity(cmd: &Command, n: usize) -> std::result::Result<(), CommandError> {
    if cmd.args.len() == n {
        Ok(())
    } else {
        Err(CommandError::Usage)
    }
}

fn arg<T>(cmd: &Command, i: usize) -> std::result::Result<T, CommandError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = cmd.args.get(i).ok_or(CommandError::Usage)?;
    raw.parse()
        .map_err(|e: T::Err| CommandError::Parse(format!("{raw}: {e}")))
}

pub struct AdminCommandsHandler {
    c: BotComponents,
}

impl AdminCommandsHandler {
    pub fn new(components: BotComponents) -> Self {
        Self { c: components }
    }

    fn existing(&self, id: &CustomerId) -> std::result::Result<String, CommandError> {
        self.c
            .store
            .get(id)
            .map(|c| c.name)
            .ok_or_else(|| CommandError::UnknownCustomer(id.clone()))
    }

    /// Runs one command; returns the replies to send in order.
    async fn run(&self, cmd: &Command) -> std::result::Result<Vec<String>, CommandError> {
        let store = &self.c.store;
        let reply = match cmd.name.as_str() {
            "register" => {
                arity(cmd, 2)?;
                let uid: i64 = arg(cmd, 0)?;
                let id = CustomerId::new(cmd.args[1].clone());
                let name = self.existing(&id)?;
                match store.link_user(&id, uid)? {
                    LinkOutcome::Linked => {
                        notify_user_registered(&self.c, uid, &name).await;
                        format!(
                            "✅ Пользователь {uid} привязан к заказчику {name}\n\nПользователь получил уведомление."
                        )
                    }
                    LinkOutcome::AlreadyLinked => texts::admin_already_linked(uid, &name),
                }
            }
            "create" => {
                let name = cmd.rest();
                if name.is_empty() {
                    return Err(CommandError::Usage);
                }
                let id = store.create_customer(&name)?;
                format!("✅ Создан заказчик: {name} (ID: {id})")
            }
            "customers" => {
                let customers = store.list();
                if customers.is_empty() {
                    return Ok(vec![texts::CUSTOMERS_EMPTY.to_string()]);
                }
                return Ok(texts::split_chunks(
                    &texts::customers_listing(&customers),
                    texts::MESSAGE_CHUNK_CHARS,
                ));
            }
            "link" => {
                arity(cmd, 2)?;
                let id = CustomerId::new(cmd.args[0].clone());
                let uid: i64 = arg(cmd, 1)?;
                let name = self.existing(&id)?;
                match store.link_user(&id, uid)? {
                    LinkOutcome::Linked => {
                        notify_user_registered(&self.c, uid, &name).await;
                        format!("✅ Пользователь {uid} привязан к заказчику {id} ({name})")
                    }
                    LinkOutcome::AlreadyLinked => {
                        format!("ℹ Пользователь {uid} уже привязан к заказчику {id}")
                    }
                }
            }
            "unlink" => {
                arity(cmd, 2)?;
                let id = CustomerId::new(cmd.args[0].clone());
                let uid: i64 = arg(cmd, 1)?;
                self.existing(&id)?;
                if store.unlink_user(&id, uid)? {
                    format!("✅ Пользователь {uid} отвязан от заказчика {id}")
                } else {
                    format!("ℹ Пользователь {uid} не привязан к заказчику {id}")
                }
            }
            "addsum" => {
                arity(cmd, 2)?;
                let id = CustomerId::new(cmd.args[0].clone());
                let amount: i64 = arg(cmd, 1)?;
                self.existing(&id)?;
                let total = store.add_projects_sum(&id, amount)?;
                format!(
                    "✅ {} добавлено заказчику {id}. Всего: {}",
                    format_rub(amount),
                    format_rub(total)
                )
            }
            "setsum" => {
                arity(cmd, 2)?;
                let id = CustomerId::new(cmd.args[0].clone());
                let amount: i64 = arg(cmd, 1)?;
                self.existing(&id)?;
                store.set_projects_sum(&id, amount)?;
                format!("✅ Сумма заказчика {id} установлена: {}", format_rub(amount))
            }
            "remove" => {
                arity(cmd, 1)?;
                let id = CustomerId::new(cmd.args[0].clone());
                match store.remove_customer(&id)? {
                    Some(c) => format!("✅ Заказчик {} (ID: {id}) удален.", c.name),
                    None => return Err(CommandError::UnknownCustomer(id)),
                }
            }
            "finduser" => {
                arity(cmd, 1)?;
                let uid: i64 = arg(cmd, 0)?;
                match store.find_by_user(uid) {
                    Some((id, c)) => texts::find_user_result(uid, &id, &c),
                    None => format!("❌ Пользователь {uid} не привязан ни к одному заказчику."),
                }
            }
            "clearvisits" => {
                arity(cmd, 1)?;
                let id = CustomerId::new(cmd.args[0].clone());
                self.existing(&id)?;
                let count = store.clear_visits(&id)?;
                format!("✅ История выездов заказчика {id} очищена. Удалено записей: {count}")
            }
            _ => return Ok(Vec::new()),
        };
        Ok(vec![reply])
    }

    #[instrument(skip(self, msg, cmd, usage))]
    async fn on_command(&self, msg: &Message, cmd: &Command, usage: &str) {
        let bot = self.c.bot.as_ref();
        let admin_id = msg.user.id;
        self.c.calc_messages.delete_all(bot, admin_id).await;

        let replies = match self.run(cmd).await {
            Ok(replies) => {
                info!(user_id = admin_id, command = %cmd.name, args = ?cmd.args, "step: admin command done");
                replies
            }
            Err(CommandError::Usage) => vec![usage.to_string()],
            Err(CommandError::UnknownCustomer(id)) => {
                vec![format!("❌ Заказчик с ID {id} не найден.")]
            }
            Err(e) => {
                warn!(user_id = admin_id, command = %cmd.name, error = %e, "Admin command failed");
                vec![format!("Ошибка: {e}\n{usage}")]
            }
        };
        for reply in replies {
            send(bot, msg.chat.id, &reply, None).await;
        }
    }
}

#[async_trait]
impl Handler for AdminCommandsHandler {
    async fn handle(&self, update: &Update) -> Result<HandlerResponse> {
        let Some(msg) = update.as_message() else {
            return Ok(HandlerResponse::Continue);
        };
        let Some(cmd) = msg.command() else {
            return Ok(HandlerResponse::Continue);
        };
        let Some((_, usage)) = COMMANDS.iter().find(|(name, _)| *name == cmd.name) else {
            return Ok(HandlerResponse::Continue);
        };
        if !self.c.is_admin(msg.user.id) {
            warn!(user_id = msg.user.id, command = %cmd.name, "Admin command from non-admin");
            return Ok(HandlerResponse::Stop);
        }
        self.on_command(msg, &cmd, usage).await;
        Ok(HandlerResponse::Stop)
    }
}
