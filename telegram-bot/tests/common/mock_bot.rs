//! Recording Bot for integration tests: every outgoing call is kept in order so tests can assert
//! what the user or admin would see. Sent messages get increasing ids starting at 100.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dbot_core::{Bot, BotCommand, CommandScope, DbotError, InlineKeyboard, Result};

#[derive(Debug, Clone)]
pub struct Sent {
    pub chat_id: i64,
    pub message_id: i32,
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
}

#[derive(Debug, Clone)]
pub struct Edited {
    pub chat_id: i64,
    pub message_id: i32,
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answered {
    pub callback_id: String,
    pub text: Option<String>,
    pub show_alert: bool,
}

pub struct MockBot {
    next_id: AtomicI32,
    fail_edits: AtomicBool,
    pub sent: Mutex<Vec<Sent>>,
    pub edited: Mutex<Vec<Edited>>,
    pub deleted: Mutex<Vec<(i64, i32)>>,
    pub answers: Mutex<Vec<Answered>>,
    pub commands: Mutex<Vec<(CommandScope, Vec<BotCommand>)>>,
}

impl MockBot {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(100),
            fail_edits: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            edited: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            answers: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Makes every following edit fail, as Telegram does for too-old messages.
    pub fn fail_edits(&self) {
        self.fail_edits.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| s.chat_id == chat_id)
            .collect()
    }

    pub fn last_sent(&self) -> Sent {
        self.sent().last().cloned().expect("nothing was sent")
    }

    pub fn edited(&self) -> Vec<Edited> {
        self.edited.lock().unwrap().clone()
    }

    pub fn last_edit(&self) -> Edited {
        self.edited().last().cloned().expect("nothing was edited")
    }

    pub fn deleted(&self) -> Vec<(i64, i32)> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn answers(&self) -> Vec<Answered> {
        self.answers.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<(CommandScope, Vec<BotCommand>)> {
        self.commands.lock().unwrap().clone()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
        self.edited.lock().unwrap().clear();
        self.deleted.lock().unwrap().clear();
        self.answers.lock().unwrap().clear();
        self.commands.lock().unwrap().clear();
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<i32> {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(Sent {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(message_id)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(DbotError::Bot("message can't be edited".to_string()));
        }
        self.edited.lock().unwrap().push(Edited {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<()> {
        self.deleted.lock().unwrap().push((chat_id, message_id));
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        self.answers.lock().unwrap().push(Answered {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
            show_alert,
        });
        Ok(())
    }

    async fn set_commands(&self, scope: CommandScope, commands: &[BotCommand]) -> Result<()> {
        self.commands
            .lock()
            .unwrap()
            .push((scope, commands.to_vec()));
        Ok(())
    }
}
