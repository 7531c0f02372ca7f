//! Component factory: shared state for the handlers and the handler chain built on it.

use std::sync::Arc;

use dbot_core::Bot;
use handler_chain::HandlerChain;
use storage::CustomerStore;
use tariff::Clock;

use crate::config::BotConfig;
use crate::handlers::{
    AdminCommandsHandler, AdminPanelHandler, AdminSessions, LoggingHandler, UserMenuHandler,
};
use crate::sessions::CalcSessions;
use crate::tracking::MessageTracker;

/// Everything the handlers share. Cheap to clone.
#[derive(Clone)]
pub struct BotComponents {
    pub bot: Arc<dyn Bot>,
    pub store: Arc<CustomerStore>,
    pub sessions: Arc<CalcSessions>,
    /// Calculation screens, deleted when a new calculation starts.
    pub calc_messages: Arc<MessageTracker>,
    /// "Access pending" replies, deleted once the user is linked.
    pub welcome_messages: Arc<MessageTracker>,
    pub admin_sessions: Arc<AdminSessions>,
    pub clock: Arc<dyn Clock>,
    pub admin_id: i64,
}

impl BotComponents {
    pub fn new(
        config: &BotConfig,
        bot: Arc<dyn Bot>,
        store: Arc<CustomerStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let welcome_messages = Arc::new(MessageTracker::new());
        let sessions = Arc::new(CalcSessions::new(
            bot.clone(),
            welcome_messages.clone(),
            config.calc_timeout(),
        ));
        Self {
            bot,
            store,
            sessions,
            calc_messages: Arc::new(MessageTracker::new()),
            welcome_messages,
            admin_sessions: Arc::new(AdminSessions::new()),
            clock,
            admin_id: config.admin_id,
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        user_id == self.admin_id
    }
}

/// Builds the handler chain (logging → admin panel → admin commands → user menu).
pub fn build_handler_chain(components: &BotComponents) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(AdminPanelHandler::new(components.clone())))
        .add_handler(Arc::new(AdminCommandsHandler::new(components.clone())))
        .add_handler(Arc::new(UserMenuHandler::new(components.clone())))
}
