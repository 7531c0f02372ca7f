//! Calculation sessions: one in-progress price calculation per user, expired after a period of
//! inactivity.
//!
//! Each session carries a millisecond timestamp id that is embedded in the date/time buttons, so
//! buttons from an older calculation can be recognised as stale. Every `start`/`touch` re-arms a
//! tokio timer; when it fires the session is dropped and the user is told to start again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dbot_core::Bot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::keyboards;
use crate::texts;
use crate::tracking::MessageTracker;

struct Session {
    id: String,
    timer: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct SessionState {
    sessions: HashMap<i64, Session>,
    last_id: u128,
}

pub struct CalcSessions {
    bot: Arc<dyn Bot>,
    welcome_messages: Arc<MessageTracker>,
    timeout: Duration,
    state: Mutex<SessionState>,
}

impl CalcSessions {
    pub fn new(bot: Arc<dyn Bot>, welcome_messages: Arc<MessageTracker>, timeout: Duration) -> Self {
        Self {
            bot,
            welcome_messages,
            timeout,
            state: Mutex::new(SessionState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts a new session for `user_id`, replacing any previous one. Returns its id.
    pub fn start(self: &Arc<Self>, user_id: i64) -> String {
        let mut state = self.lock();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let next = now.max(state.last_id + 1);
        state.last_id = next;
        let id = next.to_string();

        if let Some(old) = state.sessions.remove(&user_id) {
            if let Some(timer) = old.timer {
                timer.abort();
            }
        }
        let timer = self.arm(user_id, id.clone());
        state.sessions.insert(
            user_id,
            Session {
                id: id.clone(),
                timer: Some(timer),
            },
        );
        info!(user_id, session_id = %id, "Calculation session started");
        id
    }

    /// Re-arms the inactivity timer; no-op without a session.
    pub fn touch(self: &Arc<Self>, user_id: i64) {
        let mut state = self.lock();
        let Some(session) = state.sessions.get_mut(&user_id) else {
            return;
        };
        if let Some(timer) = session.timer.take() {
            timer.abort();
        }
        let id = session.id.clone();
        session.timer = Some(self.arm(user_id, id));
    }

    pub fn reset(&self, user_id: i64) {
        if let Some(session) = self.lock().sessions.remove(&user_id) {
            if let Some(timer) = session.timer {
                timer.abort();
            }
        }
    }

    pub fn is_valid(&self, user_id: i64, session_id: &str) -> bool {
        !session_id.is_empty()
            && self
                .lock()
                .sessions
                .get(&user_id)
                .is_some_and(|s| s.id == session_id)
    }

    pub fn active(&self, user_id: i64) -> Option<String> {
        self.lock().sessions.get(&user_id).map(|s| s.id.clone())
    }

    fn arm(self: &Arc<Self>, user_id: i64, session_id: String) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let timeout = self.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(sessions) = weak.upgrade() {
                sessions.expire(user_id, &session_id).await;
            }
        })
    }

    async fn expire(&self, user_id: i64, session_id: &str) {
        {
            let mut state = self.lock();
            match state.sessions.get(&user_id) {
                Some(s) if s.id == session_id => {
                    state.sessions.remove(&user_id);
                }
                _ => return,
            }
        }
        info!(user_id, session_id, "Calculation session expired");

        self.welcome_messages
            .delete_all(self.bot.as_ref(), user_id)
            .await;
        let menu = keyboards::main_menu();
        if let Err(e) = self
            .bot
            .send_message(user_id, texts::CALC_TIMEOUT, Some(&menu))
            .await
        {
            warn!(user_id, error = %e, "Failed to send timeout notice");
        }
    }
}

impl Drop for CalcSessions {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner());
        for session in state.sessions.values() {
            if let Some(timer) = &session.timer {
                timer.abort();
            }
        }
    }
}
