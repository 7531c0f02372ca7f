//! Interactive admin panel: customer selection, per-customer management, and the add-visit
//! wizard.
//!
//! Buttons are routed by their callback prefix whatever the current step is; plain text is only
//! consumed while the panel waits for typed input (customer name, user id, or a sum). Only the
//! configured admin is served; admin buttons pressed by anyone else are answered and dropped.

use async_trait::async_trait;
use dbot_core::{CallbackQuery, Handler, HandlerResponse, InlineKeyboard, Message, Result, Update};
use storage::{Customer, CustomerId, LinkOutcome, StorageError, Visit};
use tariff::{price_for, VisitDate};
use tracing::{info, instrument, warn};

use super::admin_state::{AdminStep, VisitDraft};
use super::{answer, edit, edit_or_send, notify_user_registered, send};
use crate::callback_data::{AdminAction, CallbackData};
use crate::components::BotComponents;
use crate::keyboards;
use crate::texts::{self, VisitConfirmation};

type PanelResult = std::result::Result<(), StorageError>;

/// Commands that open the panel. `addvist` is a long-standing typo kept as an alias.
const PANEL_COMMANDS: [&str; 3] = ["admin", "addvisit", "addvist"];

pub struct AdminPanelHandler {
    c: BotComponents,
}

impl AdminPanelHandler {
    pub fn new(components: BotComponents) -> Self {
        Self { c: components }
    }

    fn customers(&self) -> Vec<(CustomerId, Customer)> {
        self.c.store.list()
    }

    fn customers_keyboard(&self) -> InlineKeyboard {
        keyboards::admin_customers(&self.customers())
    }

    /// Panel home: quick-link list when a user is waiting to be linked, customers otherwise.
    fn panel_view(&self, admin_id: i64) -> (String, InlineKeyboard) {
        let pending = self.c.admin_sessions.update(admin_id, |s| {
            s.step = AdminStep::SelectCustomer;
            s.draft = None;
            s.link_target = None;
            s.sum_target = None;
            s.pending_link_user
        });
        match pending {
            Some(uid) => (
                texts::admin_pick_for_link(uid),
                keyboards::admin_quick_customers(&self.customers(), uid),
            ),
            None => (texts::ADMIN_PANEL.to_string(), self.customers_keyboard()),
        }
    }

    #[instrument(skip(self, msg))]
    async fn open_from_command(&self, msg: &Message) {
        let admin_id = msg.user.id;
        self.c
            .admin_sessions
            .update(admin_id, |s| s.pending_link_user = None);
        let (text, kb) = self.panel_view(admin_id);
        send(self.c.bot.as_ref(), msg.chat.id, &text, Some(&kb)).await;
        info!(user_id = admin_id, "step: admin panel opened");
    }

    async fn open_from_button(&self, q: &CallbackQuery) {
        let (text, kb) = self.panel_view(q.user.id);
        edit_or_send(self.c.bot.as_ref(), q, &text, Some(&kb)).await;
    }

    /// Edits the callback message to `❌ Заказчик не найден.` with the customer list.
    async fn customer_missing(&self, q: &CallbackQuery) {
        let kb = self.customers_keyboard();
        edit(self.c.bot.as_ref(), q, texts::ADMIN_CUSTOMER_NOT_FOUND, Some(&kb)).await;
    }

    /// The wizard draft, or `None` after reopening the panel when there is none.
    async fn draft_or_reopen(&self, q: &CallbackQuery) -> Option<VisitDraft> {
        let draft = self.c.admin_sessions.get(q.user.id).draft;
        if draft.is_none() {
            warn!(user_id = q.user.id, data = %q.data, "Wizard button without a draft, reopening panel");
            self.open_from_button(q).await;
        }
        draft
    }

    fn set_draft(&self, admin_id: i64, step: AdminStep, draft: VisitDraft) {
        self.c.admin_sessions.update(admin_id, |s| {
            s.step = step;
            s.draft = Some(draft);
        });
    }

    async fn on_callback(&self, q: &CallbackQuery, data: CallbackData) -> PanelResult {
        let bot = self.c.bot.as_ref();
        let admin_id = q.user.id;
        let store = &self.c.store;
        let sessions = &self.c.admin_sessions;

        match data {
            CallbackData::AdminPanel => {
                sessions.update(admin_id, |s| s.pending_link_user = None);
                self.open_from_button(q).await;
            }
            CallbackData::AdminPanelLink(uid) => {
                sessions.update(admin_id, |s| s.pending_link_user = Some(uid));
                self.open_from_button(q).await;
                info!(user_id = admin_id, pending_user = uid, "step: admin panel opened to link user");
            }
            CallbackData::AdminQuickLink { customer, user } => {
                let Some(c) = store.get(&customer) else {
                    self.customer_missing(q).await;
                    return Ok(());
                };
                match store.link_user(&customer, user)? {
                    LinkOutcome::Linked => {
                        sessions.update(admin_id, |s| s.pending_link_user = None);
                        notify_user_registered(&self.c, user, &c.name).await;
                        edit(bot, q, &texts::admin_quick_linked(user, &c.name), None).await;
                    }
                    LinkOutcome::AlreadyLinked => {
                        edit(bot, q, &texts::admin_already_linked(user, &c.name), None).await;
                    }
                }
            }
            CallbackData::AdminCustomer(id) => {
                let Some(c) = store.get(&id) else {
                    self.customer_missing(q).await;
                    return Ok(());
                };
                sessions.update(admin_id, |s| {
                    s.step = AdminStep::SelectAction;
                    s.draft = None;
                });
                let kb = keyboards::admin_actions(&id, &c);
                edit(bot, q, &texts::admin_selected(&c.name), Some(&kb)).await;
            }
            CallbackData::AdminCreateCustomer => {
                sessions.set_step(admin_id, AdminStep::CreateCustomer);
                let kb = keyboards::admin_cancel();
                edit(bot, q, texts::ADMIN_CREATE_PROMPT, Some(&kb)).await;
            }
            CallbackData::AdminFindCustomer => {
                sessions.set_step(admin_id, AdminStep::FindCustomer);
                let kb = keyboards::admin_cancel();
                edit(bot, q, texts::ADMIN_FIND_PROMPT, Some(&kb)).await;
            }
            CallbackData::AdminCancel => {
                sessions.clear(admin_id);
                edit(bot, q, texts::ADMIN_CANCELLED, None).await;
                info!(user_id = admin_id, "step: admin panel cancelled");
            }
            CallbackData::AdminAction { action, customer } => {
                self.on_action(q, action, customer).await?;
            }
            CallbackData::AdminVisitInfo { .. } | CallbackData::AdminUserInfo { .. } => {}
            CallbackData::AdminDeleteVisit { customer, index } => {
                let Some(removed) = store.remove_visit(&customer, index)? else {
                    let visits = store.get(&customer).map(|c| c.visits).unwrap_or_default();
                    let kb = keyboards::admin_visits_management(&customer, &visits);
                    edit(bot, q, texts::ADMIN_VISIT_NOT_FOUND, Some(&kb)).await;
                    return Ok(());
                };
                let visits = store.get(&customer).map(|c| c.visits).unwrap_or_default();
                let kb = keyboards::admin_visits_management(&customer, &visits);
                edit(
                    bot,
                    q,
                    &texts::admin_visit_deleted(&removed, visits.len()),
                    Some(&kb),
                )
                .await;
                info!(user_id = admin_id, customer_id = %customer, index, "step: visit deleted");
            }
            CallbackData::AdminDeleteAll(customer) => {
                let count = store.clear_visits(&customer)?;
                let Some(c) = store.get(&customer) else {
                    self.customer_missing(q).await;
                    return Ok(());
                };
                let kb = keyboards::admin_actions(&customer, &c);
                edit(bot, q, &texts::admin_all_deleted(count), Some(&kb)).await;
            }
            CallbackData::AdminUnlinkSpecific { customer, user } => {
                let unlinked = store.unlink_user(&customer, user)?;
                let Some(c) = store.get(&customer) else {
                    self.customer_missing(q).await;
                    return Ok(());
                };
                let text = if unlinked {
                    texts::admin_unlinked(user, &c.name)
                } else {
                    texts::admin_not_linked_here(user)
                };
                let kb = keyboards::admin_user_management(&customer, &c);
                edit(bot, q, &text, Some(&kb)).await;
            }
            CallbackData::AdminLinkUser(customer) => {
                if store.get(&customer).is_none() {
                    self.customer_missing(q).await;
                    return Ok(());
                }
                sessions.update(admin_id, |s| {
                    s.step = AdminStep::LinkUser;
                    s.link_target = Some(customer);
                });
                let kb = keyboards::admin_cancel();
                edit(bot, q, texts::ADMIN_LINK_PROMPT, Some(&kb)).await;
            }
            CallbackData::AdminAddAmount { customer, amount } => {
                let total = store.add_projects_sum(&customer, amount)?;
                let kb = keyboards::admin_projects_management(&customer);
                edit(bot, q, &texts::admin_amount_added(amount, total), Some(&kb)).await;
            }
            CallbackData::AdminSetExact(customer) => {
                if store.get(&customer).is_none() {
                    self.customer_missing(q).await;
                    return Ok(());
                }
                sessions.update(admin_id, |s| {
                    s.step = AdminStep::SetSum;
                    s.sum_target = Some(customer);
                });
                let kb = keyboards::admin_cancel();
                edit(bot, q, texts::ADMIN_SUM_PROMPT, Some(&kb)).await;
            }
            CallbackData::AdminResetSum(customer) => {
                store.set_projects_sum(&customer, 0)?;
                let kb = keyboards::admin_projects_management(&customer);
                edit(bot, q, texts::ADMIN_SUM_RESET, Some(&kb)).await;
            }
            CallbackData::AdminDateBack(customer) => {
                self.on_action(q, AdminAction::Back, customer).await?;
            }
            other => self.on_wizard(q, other).await?,
        }
        Ok(())
    }

    #[instrument(skip(self, q))]
    async fn on_action(&self, q: &CallbackQuery, action: AdminAction, id: CustomerId) -> PanelResult {
        let bot = self.c.bot.as_ref();
        let admin_id = q.user.id;
        let Some(c) = self.c.store.get(&id) else {
            self.customer_missing(q).await;
            return Ok(());
        };
        self.c.admin_sessions.update(admin_id, |s| {
            s.step = AdminStep::SelectAction;
            s.draft = None;
        });

        match action {
            AdminAction::Back => {
                let kb = keyboards::admin_actions(&id, &c);
                edit(bot, q, &texts::admin_selected(&c.name), Some(&kb)).await;
            }
            AdminAction::Tariff => {
                let kb = keyboards::admin_back(&id);
                edit(bot, q, &texts::admin_tariff(&c), Some(&kb)).await;
            }
            AdminAction::Visits => {
                let kb = keyboards::admin_visits_management(&id, &c.visits);
                edit(bot, q, &texts::admin_visits(&c), Some(&kb)).await;
            }
            AdminAction::Users => {
                let kb = keyboards::admin_user_management(&id, &c);
                edit(bot, q, &texts::admin_users(&c), Some(&kb)).await;
            }
            AdminAction::Projects => {
                let kb = keyboards::admin_projects_management(&id);
                edit(bot, q, &texts::admin_projects(&c), Some(&kb)).await;
            }
            AdminAction::AddVisit => {
                let kb = keyboards::admin_dates(&id, self.c.clock.today());
                let draft = VisitDraft::new(id.clone(), c.name.clone());
                self.set_draft(admin_id, AdminStep::SelectDate, draft);
                edit(bot, q, texts::ADMIN_CHOOSE_VISIT_DATE, Some(&kb)).await;
            }
            AdminAction::Remove => {
                self.c.store.remove_customer(&id)?;
                self.c.admin_sessions.clear(admin_id);
                edit(bot, q, &texts::admin_removed(&c.name), None).await;
            }
            AdminAction::ClearVisits => {
                let count = self.c.store.clear_visits(&id)?;
                edit(bot, q, &texts::admin_visits_cleared(count), None).await;
            }
        }
        info!(user_id = admin_id, customer_id = %id, action = ?action, "step: admin action");
        Ok(())
    }

    /// Add-visit wizard: date → kind → duration → tariff type → confirm.
    async fn on_wizard(&self, q: &CallbackQuery, data: CallbackData) -> PanelResult {
        let bot = self.c.bot.as_ref();
        let admin_id = q.user.id;
        let Some(mut draft) = self.draft_or_reopen(q).await else {
            return Ok(());
        };

        match data {
            CallbackData::AdminDate(date) => {
                draft.date = Some(date);
                self.set_draft(admin_id, AdminStep::SelectKind, draft);
                let kb = keyboards::admin_kind();
                edit(bot, q, texts::ADMIN_CHOOSE_KIND, Some(&kb)).await;
            }
            CallbackData::AdminKindBack => {
                let kb = keyboards::admin_dates(&draft.customer, self.c.clock.today());
                self.set_draft(admin_id, AdminStep::SelectDate, draft);
                edit(bot, q, texts::ADMIN_CHOOSE_VISIT_DATE, Some(&kb)).await;
            }
            CallbackData::AdminKind(kind) => {
                let date = draft.date.unwrap_or(VisitDate::Free);
                draft.kind = Some(kind);
                self.set_draft(admin_id, AdminStep::SelectDuration, draft);
                let kb = keyboards::admin_duration();
                edit(bot, q, &texts::admin_kind_chosen(date, kind), Some(&kb)).await;
            }
            CallbackData::AdminDurationBack => {
                self.set_draft(admin_id, AdminStep::SelectKind, draft);
                let kb = keyboards::admin_kind();
                edit(bot, q, texts::ADMIN_CHOOSE_KIND, Some(&kb)).await;
            }
            CallbackData::AdminDuration(shift) => {
                draft.shift = Some(shift);
                self.set_draft(admin_id, AdminStep::SelectTariffType, draft);
                let kb = keyboards::admin_tariff_type();
                edit(bot, q, texts::ADMIN_CHOOSE_TARIFF, Some(&kb)).await;
            }
            CallbackData::AdminTariffBack => {
                self.set_draft(admin_id, AdminStep::SelectDuration, draft);
                let kb = keyboards::admin_duration();
                edit(bot, q, texts::ADMIN_CHOOSE_DURATION, Some(&kb)).await;
            }
            CallbackData::AdminTariff(tariff) => {
                let (Some(date), Some(kind), Some(shift)) = (draft.date, draft.kind, draft.shift)
                else {
                    self.open_from_button(q).await;
                    return Ok(());
                };
                let amount = price_for(kind, shift, tariff);
                draft.tariff = Some(tariff);
                draft.price = Some(amount);
                let text = texts::admin_confirm_visit(&VisitConfirmation {
                    customer: &draft.customer_name,
                    date,
                    kind,
                    shift,
                    tariff,
                    price: amount,
                });
                self.set_draft(admin_id, AdminStep::ConfirmVisit, draft);
                let kb = keyboards::admin_confirm();
                edit(bot, q, &text, Some(&kb)).await;
            }
            CallbackData::AdminConfirmBack => {
                self.set_draft(admin_id, AdminStep::SelectTariffType, draft);
                let kb = keyboards::admin_tariff_type();
                edit(bot, q, texts::ADMIN_CHOOSE_TARIFF, Some(&kb)).await;
            }
            CallbackData::AdminConfirm => {
                let VisitDraft {
                    customer,
                    date: Some(date),
                    kind: Some(kind),
                    shift: Some(duration),
                    tariff: Some(tariff_type),
                    price: Some(price),
                    ..
                } = draft
                else {
                    self.open_from_button(q).await;
                    return Ok(());
                };
                let visit = Visit {
                    date,
                    kind,
                    duration,
                    price,
                    tariff_type,
                };
                self.c.store.add_visit(&customer, visit)?;
                self.c.admin_sessions.clear(admin_id);
                edit(bot, q, texts::ADMIN_VISIT_ADDED, None).await;
                info!(user_id = admin_id, customer_id = %customer, price, "step: visit added");
            }
            other => {
                warn!(user_id = admin_id, data = %other, "Unexpected admin callback");
            }
        }
        Ok(())
    }

    #[instrument(skip(self, msg))]
    async fn on_text(&self, msg: &Message, step: AdminStep) -> PanelResult {
        let bot = self.c.bot.as_ref();
        let admin_id = msg.user.id;
        let chat_id = msg.chat.id;
        let input = msg.content.trim();
        let store = &self.c.store;
        let sessions = &self.c.admin_sessions;

        match step {
            AdminStep::CreateCustomer => {
                if input.is_empty() {
                    send(bot, chat_id, texts::ADMIN_EMPTY_NAME, None).await;
                    return Ok(());
                }
                let id = store.create_customer(input)?;
                let pending = sessions.update(admin_id, |s| {
                    s.step = AdminStep::SelectCustomer;
                    s.pending_link_user
                });
                let kb = match pending {
                    Some(uid) => keyboards::admin_quick_customers(&self.customers(), uid),
                    None => self.customers_keyboard(),
                };
                send(bot, chat_id, &texts::admin_created(input, &id, pending), Some(&kb)).await;
            }
            AdminStep::FindCustomer => {
                let found = input
                    .parse::<i64>()
                    .ok()
                    .and_then(|uid| store.find_by_user(uid));
                match found {
                    Some((id, c)) => {
                        sessions.update(admin_id, |s| {
                            s.step = AdminStep::SelectAction;
                            s.draft = None;
                        });
                        let kb = keyboards::admin_actions(&id, &c);
                        send(bot, chat_id, &texts::admin_found(&c.name, &id), Some(&kb)).await;
                    }
                    None => {
                        sessions.set_step(admin_id, AdminStep::SelectCustomer);
                        let kb = self.customers_keyboard();
                        send(bot, chat_id, &texts::admin_user_not_linked(input), Some(&kb)).await;
                    }
                }
            }
            AdminStep::LinkUser => {
                let target = sessions.get(admin_id).link_target;
                let Some((id, c)) = target.and_then(|id| store.get(&id).map(|c| (id, c))) else {
                    send(bot, chat_id, texts::ADMIN_CUSTOMER_MISSING, None).await;
                    return Ok(());
                };
                let Ok(uid) = input.parse::<i64>() else {
                    send(bot, chat_id, texts::ADMIN_NOT_A_NUMBER, None).await;
                    return Ok(());
                };
                let outcome = store.link_user(&id, uid)?;
                sessions.update(admin_id, |s| {
                    s.step = AdminStep::SelectAction;
                    s.link_target = None;
                });
                let text = match outcome {
                    LinkOutcome::Linked => {
                        notify_user_registered(&self.c, uid, &c.name).await;
                        texts::admin_linked_from_panel(uid, &c.name)
                    }
                    LinkOutcome::AlreadyLinked => texts::admin_already_linked_here(uid),
                };
                let refreshed = store.get(&id).unwrap_or(c);
                let kb = keyboards::admin_user_management(&id, &refreshed);
                send(bot, chat_id, &text, Some(&kb)).await;
            }
            AdminStep::SetSum => {
                let Ok(amount) = input.parse::<i64>() else {
                    send(bot, chat_id, texts::ADMIN_NOT_A_NUMBER, None).await;
                    return Ok(());
                };
                let target = sessions.get(admin_id).sum_target;
                let Some(id) = target.filter(|id| store.get(id).is_some()) else {
                    send(bot, chat_id, texts::ADMIN_CUSTOMER_MISSING, None).await;
                    return Ok(());
                };
                store.set_projects_sum(&id, amount)?;
                sessions.update(admin_id, |s| {
                    s.step = AdminStep::SelectAction;
                    s.sum_target = None;
                });
                let kb = keyboards::admin_projects_management(&id);
                send(bot, chat_id, &texts::admin_sum_set(amount), Some(&kb)).await;
            }
            _ => {}
        }
        Ok(())
    }

    async fn report_callback_error(&self, q: &CallbackQuery, e: StorageError) {
        match e {
            StorageError::NotFound(_) => self.customer_missing(q).await,
            e => {
                warn!(user_id = q.user.id, error = %e, "Admin action failed");
                edit(self.c.bot.as_ref(), q, &format!("❌ Ошибка: {e}"), None).await;
            }
        }
    }
}

#[async_trait]
impl Handler for AdminPanelHandler {
    async fn handle(&self, update: &Update) -> Result<HandlerResponse> {
        match update {
            Update::Callback(q) => {
                let Ok(data) = q.data.parse::<CallbackData>() else {
                    return Ok(HandlerResponse::Continue);
                };
                if !data.is_admin() {
                    return Ok(HandlerResponse::Continue);
                }
                answer(self.c.bot.as_ref(), q, None, false).await;
                if !self.c.is_admin(q.user.id) {
                    warn!(user_id = q.user.id, data = %q.data, "Admin button pressed by non-admin");
                    return Ok(HandlerResponse::Stop);
                }
                if let Err(e) = self.on_callback(q, data).await {
                    self.report_callback_error(q, e).await;
                }
                Ok(HandlerResponse::Stop)
            }
            Update::Message(msg) => {
                if let Some(cmd) = msg.command() {
                    if !PANEL_COMMANDS.contains(&cmd.name.as_str()) {
                        return Ok(HandlerResponse::Continue);
                    }
                    if self.c.is_admin(msg.user.id) {
                        self.open_from_command(msg).await;
                    } else {
                        warn!(user_id = msg.user.id, command = %cmd.name, "Admin command from non-admin");
                    }
                    return Ok(HandlerResponse::Stop);
                }
                if !self.c.is_admin(msg.user.id) {
                    return Ok(HandlerResponse::Continue);
                }
                let step = self.c.admin_sessions.step(msg.user.id);
                if !step.expects_text() {
                    return Ok(HandlerResponse::Continue);
                }
                if let Err(e) = self.on_text(msg, step).await {
                    warn!(user_id = msg.user.id, error = %e, "Admin input failed");
                    send(self.c.bot.as_ref(), msg.chat.id, &format!("❌ Ошибка: {e}"), None).await;
                }
                Ok(HandlerResponse::Stop)
            }
        }
    }
}
