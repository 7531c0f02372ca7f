//! Test harness: components over a [`MockBot`], a temp-dir customer store, and a fixed Moscow
//! clock (Monday 13.05.2024 10:00 unless a test picks another time).

use std::sync::Arc;
use std::time::Duration;

use dbot_core::{CallbackQuery, Chat, HandlerResponse, Message, Update, User};
use handler_chain::HandlerChain;
use storage::{CustomerId, CustomerStore};
use tariff::FixedClock;
use tempfile::TempDir;
use visits_bot::{build_handler_chain, BotComponents, BotConfig};

use super::mock_bot::MockBot;

pub const ADMIN: i64 = 1000;

/// Message id of the screen the test clicks on, unless a test says otherwise.
pub const SCREEN: i32 = 7;

pub struct Harness {
    pub bot: Arc<MockBot>,
    pub components: BotComponents,
    pub chain: HandlerChain,
    pub dir: TempDir,
    next_callback: std::sync::atomic::AtomicU32,
}

pub fn test_config(dir: &TempDir) -> BotConfig {
    BotConfig {
        bot_token: "123456:test-token".to_string(),
        telegram_api_url: None,
        log_file: dir.path().join("bot.log").display().to_string(),
        data_file: dir.path().join("data.json").display().to_string(),
        admin_id: ADMIN,
        calc_timeout_minutes: 15,
        prune_unlinked_customers: false,
        public_url: None,
        webhook_secret: None,
        port: 8080,
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::at(FixedClock::at(2024, 5, 13, 10, 0).unwrap())
    }

    pub fn at(clock: FixedClock) -> Self {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let bot = Arc::new(MockBot::new());
        let store = Arc::new(CustomerStore::open(&config.data_file, false));
        let components = BotComponents::new(&config, bot.clone(), store, Arc::new(clock));
        let chain = build_handler_chain(&components);
        Self {
            bot,
            components,
            chain,
            dir,
            next_callback: std::sync::atomic::AtomicU32::new(1),
        }
    }

    pub fn timeout(&self) -> Duration {
        test_config(&self.dir).calc_timeout()
    }

    pub fn store(&self) -> &CustomerStore {
        &self.components.store
    }

    /// Makes every later store save fail: the temp file path is taken by a directory.
    pub fn block_writes(&self) {
        let mut tmp = self.store().path().to_path_buf().into_os_string();
        tmp.push(".tmp");
        std::fs::create_dir(tmp).unwrap();
    }

    /// Creates a customer and links `users` to it.
    pub fn customer(&self, name: &str, users: &[i64]) -> CustomerId {
        let id = self.store().create_customer(name).unwrap();
        for uid in users {
            self.store().link_user(&id, *uid).unwrap();
        }
        id
    }

    /// Sends `text` from `user_id` in their private chat.
    pub async fn text(&self, user_id: i64, text: &str) -> HandlerResponse {
        let user = User {
            id: user_id,
            username: Some(format!("user{user_id}")),
            first_name: Some("Иван".to_string()),
            last_name: None,
        };
        let msg = Message::text(1, user, Chat::private(user_id), text);
        self.chain.handle(&Update::Message(msg)).await.unwrap()
    }

    /// Presses a button with `data` on message [`SCREEN`].
    pub async fn click(&self, user_id: i64, data: impl ToString) -> HandlerResponse {
        self.click_on(user_id, SCREEN, data).await
    }

    pub async fn click_on(&self, user_id: i64, message_id: i32, data: impl ToString) -> HandlerResponse {
        let n = self
            .next_callback
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let q = CallbackQuery {
            id: format!("cb-{n}"),
            user: User::with_id(user_id),
            chat: Chat::private(user_id),
            message_id: Some(message_id),
            data: data.to_string(),
        };
        self.chain.handle(&Update::Callback(q)).await.unwrap()
    }
}
