//! Customer-facing flow: `/start`, the main menu, and the date → duration price calculation.

use async_trait::async_trait;
use dbot_core::{CallbackQuery, Handler, HandlerResponse, Message, Result, Update};
use tariff::{classify, format_date_long, price, VisitDate, VisitKind};
use tracing::{info, instrument, warn};

use super::{answer, edit, send};
use crate::callback_data::{CallbackData, CallbackParseError, MenuAction};
use crate::components::BotComponents;
use crate::keyboards;
use crate::texts::{self, CalcSummary};

pub struct UserMenuHandler {
    c: BotComponents,
}

impl UserMenuHandler {
    pub fn new(components: BotComponents) -> Self {
        Self { c: components }
    }

    #[instrument(skip(self, msg))]
    async fn on_start(&self, msg: &Message) {
        let user = &msg.user;
        let bot = self.c.bot.as_ref();
        self.c.calc_messages.delete_all(bot, user.id).await;

        let Some((_, customer)) = self.c.store.find_by_user(user.id) else {
            info!(user_id = user.id, "step: /start from unlinked user, notifying admin");
            let notice = texts::new_user_notice(user, self.c.clock.now());
            let link = keyboards::admin_panel_link(user.id);
            send(bot, self.c.admin_id, &notice, Some(&link)).await;
            if let Some(id) = send(bot, msg.chat.id, texts::WELCOME_PENDING, None).await {
                self.c.welcome_messages.track(user.id, msg.chat.id, id);
            }
            return;
        };

        self.c.welcome_messages.delete_all(bot, user.id).await;
        self.c.sessions.reset(user.id);
        let menu = keyboards::main_menu();
        send(bot, msg.chat.id, &texts::welcome_linked(&customer.name), Some(&menu)).await;
    }

    #[instrument(skip(self, q))]
    async fn on_menu(&self, q: &CallbackQuery, action: MenuAction) {
        let bot = self.c.bot.as_ref();
        let user_id = q.user.id;
        answer(bot, q, None, false).await;

        let Some((_, customer)) = self.c.store.find_by_user(user_id) else {
            edit(bot, q, texts::NOT_LINKED, None).await;
            return;
        };

        self.c.sessions.reset(user_id);
        let menu = keyboards::main_menu();
        match action {
            MenuAction::Start => {
                self.c
                    .calc_messages
                    .delete_except(bot, user_id, q.message_id)
                    .await;
                edit(bot, q, &texts::working_with(&customer.name), Some(&menu)).await;
            }
            MenuAction::Calc => {
                self.c
                    .calc_messages
                    .delete_except(bot, user_id, q.message_id)
                    .await;
                let session = self.c.sessions.start(user_id);
                let dates = keyboards::dates_menu(&session, self.c.clock.today());
                if edit(bot, q, texts::CHOOSE_DATE, Some(&dates)).await {
                    self.track(q);
                }
                info!(user_id, session_id = %session, "step: calculation started");
            }
            MenuAction::Status => {
                edit(bot, q, &texts::customer_status(&customer), Some(&menu)).await;
            }
            MenuAction::Visits => {
                if customer.visits.is_empty() {
                    edit(bot, q, texts::NO_VISITS, Some(&menu)).await;
                } else {
                    let visits_menu = keyboards::visits_menu();
                    edit(bot, q, &texts::customer_visits(&customer), Some(&visits_menu)).await;
                }
            }
        }
    }

    fn track(&self, q: &CallbackQuery) {
        if let Some(message_id) = q.message_id {
            self.c.calc_messages.track(q.user.id, q.chat.id, message_id);
        }
    }

    /// Answers a stale-session button: alert plus an edit pointing at a new calculation.
    async fn reject_stale(&self, q: &CallbackQuery) {
        let bot = self.c.bot.as_ref();
        info!(user_id = q.user.id, data = %q.data, "step: stale calculation button");
        answer(bot, q, Some(texts::STALE_ALERT), true).await;
        let menu = keyboards::main_menu();
        edit(bot, q, texts::STALE_EDIT, Some(&menu)).await;
    }

    async fn reject_malformed(&self, q: &CallbackQuery) {
        let bot = self.c.bot.as_ref();
        warn!(user_id = q.user.id, data = %q.data, "Malformed calculation callback");
        answer(bot, q, None, false).await;
        let menu = keyboards::main_menu();
        edit(bot, q, texts::MALFORMED_CALLBACK, Some(&menu)).await;
    }

    #[instrument(skip(self, q))]
    async fn on_date(&self, q: &CallbackQuery, session: &str, date: VisitDate) {
        let user_id = q.user.id;
        if !self.c.sessions.is_valid(user_id, session) {
            self.reject_stale(q).await;
            return;
        }
        let bot = self.c.bot.as_ref();
        answer(bot, q, None, false).await;
        self.c.sessions.touch(user_id);

        let kind = match date {
            VisitDate::Free => VisitKind::Free,
            VisitDate::Day(d) => classify(d, self.c.clock.now()),
        };
        let durations = keyboards::duration_menu(session, date, kind);
        if edit(bot, q, &texts::date_prompt(date, kind), Some(&durations)).await {
            self.track(q);
        }
        info!(user_id, date = %date, kind = %kind, "step: date chosen");
    }

    #[instrument(skip(self, q))]
    async fn on_time(&self, q: &CallbackQuery, callback: &CallbackData) {
        let CallbackData::Time {
            session,
            date,
            kind,
            shift,
        } = callback
        else {
            return;
        };
        let user_id = q.user.id;
        if !self.c.sessions.is_valid(user_id, session) {
            self.reject_stale(q).await;
            return;
        }
        let bot = self.c.bot.as_ref();
        answer(bot, q, None, false).await;
        self.c.sessions.touch(user_id);

        let Some((_, customer)) = self.c.store.find_by_user(user_id) else {
            self.c.sessions.reset(user_id);
            edit(bot, q, texts::NOT_LINKED, None).await;
            return;
        };

        let amount = price(*kind, *shift, customer.discount);
        let shown_date = match date {
            VisitDate::Free => VisitDate::Day(self.c.clock.today()),
            day => *day,
        };
        let summary = texts::calc_summary(&CalcSummary {
            customer: &customer.name,
            date: format_date_long(shown_date),
            kind: *kind,
            shift: *shift,
            price: amount,
        });
        let menu = keyboards::after_calc_menu();
        if edit(bot, q, &summary, Some(&menu)).await {
            self.track(q);
        }
        self.c.sessions.reset(user_id);
        info!(user_id, kind = %kind, shift = %shift, price = amount, "step: calculation finished");
    }

    async fn on_callback(&self, q: &CallbackQuery) -> HandlerResponse {
        match q.data.parse::<CallbackData>() {
            Ok(CallbackData::Menu(action)) => self.on_menu(q, action).await,
            Ok(CallbackData::Date { session, date }) => self.on_date(q, &session, date).await,
            Ok(time @ CallbackData::Time { .. }) => self.on_time(q, &time).await,
            Err(CallbackParseError::Malformed { prefix, .. })
                if matches!(prefix.as_str(), "menu" | "date" | "time") =>
            {
                self.reject_malformed(q).await
            }
            Ok(_) | Err(_) => {
                // Admin buttons from non-admins and unknown data: just stop the spinner.
                answer(self.c.bot.as_ref(), q, None, false).await;
            }
        }
        HandlerResponse::Stop
    }
}

#[async_trait]
impl Handler for UserMenuHandler {
    async fn handle(&self, update: &Update) -> Result<HandlerResponse> {
        match update {
            Update::Message(msg) => match msg.command() {
                Some(cmd) if cmd.name == "start" => {
                    self.on_start(msg).await;
                    Ok(HandlerResponse::Stop)
                }
                _ => Ok(HandlerResponse::Continue),
            },
            Update::Callback(q) => Ok(self.on_callback(q).await),
        }
    }
}
