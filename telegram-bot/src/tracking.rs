//! Per-user lists of sent messages that are deleted later: calculation screens and the
//! "access pending" welcome messages.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use dbot_core::Bot;
use tracing::debug;

pub const TRACKED_PER_USER: usize = 10;

/// A sent message: chat id and message id.
pub type TrackedMessage = (i64, i32);

/// Remembers the last [`TRACKED_PER_USER`] messages per user.
#[derive(Default)]
pub struct MessageTracker {
    inner: Mutex<HashMap<i64, VecDeque<TrackedMessage>>>,
}

impl MessageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<i64, VecDeque<TrackedMessage>>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Tracks a message; the same message is never tracked twice and the oldest entries fall off.
    pub fn track(&self, user_id: i64, chat_id: i64, message_id: i32) {
        let mut map = self.lock();
        let list = map.entry(user_id).or_default();
        if list.contains(&(chat_id, message_id)) {
            return;
        }
        list.push_back((chat_id, message_id));
        while list.len() > TRACKED_PER_USER {
            list.pop_front();
        }
    }

    pub fn tracked(&self, user_id: i64) -> Vec<TrackedMessage> {
        self.lock()
            .get(&user_id)
            .map(|l| l.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Takes every tracked message of the user.
    pub fn drain(&self, user_id: i64) -> Vec<TrackedMessage> {
        self.lock()
            .remove(&user_id)
            .map(Vec::from)
            .unwrap_or_default()
    }

    /// Deletes every tracked message. Messages that are already gone are logged at debug.
    pub async fn delete_all(&self, bot: &dyn Bot, user_id: i64) {
        self.delete_except(bot, user_id, None).await;
    }

    /// Like [`delete_all`](Self::delete_all) but leaves `keep` alone (and untracked).
    pub async fn delete_except(&self, bot: &dyn Bot, user_id: i64, keep: Option<i32>) {
        for (chat_id, message_id) in self.drain(user_id) {
            if Some(message_id) == keep {
                continue;
            }
            if let Err(e) = bot.delete_message(chat_id, message_id).await {
                debug!(user_id, chat_id, message_id, error = %e, "Tracked message not deleted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_keeps_last_ten() {
        let tracker = MessageTracker::new();
        for id in 1..=12 {
            tracker.track(5, 5, id);
        }
        tracker.track(5, 5, 12);
        let ids: Vec<i32> = tracker.tracked(5).into_iter().map(|(_, m)| m).collect();
        assert_eq!(ids, (3..=12).collect::<Vec<_>>());

        assert_eq!(tracker.drain(5).len(), 10);
        assert!(tracker.tracked(5).is_empty());
        assert!(tracker.drain(6).is_empty());
    }
}
