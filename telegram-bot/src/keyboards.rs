//! Inline keyboards for the customer menus and the admin panel.

use chrono::{Datelike, Duration, NaiveDate};
use dbot_core::{InlineButton, InlineKeyboard};
use storage::{Customer, CustomerId, Visit};
use tariff::{format_rub, weekday_ru, Shift, TariffType, VisitDate, VisitKind};

use crate::callback_data::{AdminAction, CallbackData, MenuAction};
use crate::texts::visit_short;

const BUTTON_CAPTION_MAX: usize = 30;

fn button(text: impl Into<String>, data: CallbackData) -> InlineButton {
    InlineButton::new(text, data.to_string())
}

fn menu(action: MenuAction) -> CallbackData {
    CallbackData::Menu(action)
}

fn main_menu_button() -> InlineButton {
    button("⬅ Главное меню", menu(MenuAction::Start))
}

fn new_calc_button() -> InlineButton {
    button("🧮 Новый расчёт", menu(MenuAction::Calc))
}

fn cancel_button() -> InlineButton {
    button("❌ Отменить", CallbackData::AdminCancel)
}

fn admin_back_button(customer: &CustomerId) -> InlineButton {
    button(
        "⬅ Назад",
        CallbackData::AdminAction {
            action: AdminAction::Back,
            customer: customer.clone(),
        },
    )
}

pub fn main_menu() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![new_calc_button()])
        .row(vec![button("📊 Ваш тариф", menu(MenuAction::Status))])
        .row(vec![button("🚗 Выезды", menu(MenuAction::Visits))])
}

pub fn after_calc_menu() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![new_calc_button()])
        .row(vec![main_menu_button()])
}

pub fn visits_menu() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![main_menu_button()])
        .row(vec![new_calc_button()])
}

/// Today, tomorrow, then the next ten days in rows of five.
pub fn dates_menu(session: &str, today: NaiveDate) -> InlineKeyboard {
    let date_button = |text: String, d: NaiveDate| {
        button(
            text,
            CallbackData::Date {
                session: session.to_string(),
                date: VisitDate::Day(d),
            },
        )
    };
    let mut kb = InlineKeyboard::new().row(vec![
        date_button("📅 Сегодня".to_string(), today),
        date_button("📅 Завтра".to_string(), today + Duration::days(1)),
    ]);
    let days: Vec<InlineButton> = (2..12)
        .map(|i| {
            let d = today + Duration::days(i);
            date_button(format!("{:02} ({})", d.day(), weekday_ru(d)), d)
        })
        .collect();
    for chunk in days.chunks(5) {
        kb = kb.row(chunk.to_vec());
    }
    kb.row(vec![main_menu_button()])
}

pub fn duration_menu(session: &str, date: VisitDate, kind: VisitKind) -> InlineKeyboard {
    let shift_button = |shift: Shift| {
        button(
            shift.button_label(),
            CallbackData::Time {
                session: session.to_string(),
                date,
                kind,
                shift,
            },
        )
    };
    InlineKeyboard::new()
        .row(vec![shift_button(Shift::Day4), shift_button(Shift::Day8)])
        .row(vec![shift_button(Shift::Night4), shift_button(Shift::Night8)])
        .row(vec![main_menu_button()])
}

/// Sent to the admin when an unlinked user presses /start.
pub fn admin_panel_link(user_id: i64) -> InlineKeyboard {
    InlineKeyboard::new().button(
        "👨‍💼 Панель администратора",
        CallbackData::AdminPanelLink(user_id).to_string(),
    )
}

pub fn admin_cancel() -> InlineKeyboard {
    InlineKeyboard::new().row(vec![cancel_button()])
}

fn customer_caption(customer: &Customer) -> String {
    format!(
        "{} (🚗{} 👥{})",
        customer.name,
        customer.visits.len(),
        customer.ids.len()
    )
}

pub fn admin_customers(customers: &[(CustomerId, Customer)]) -> InlineKeyboard {
    let mut kb = InlineKeyboard::new();
    for (id, customer) in customers {
        kb = kb.row(vec![button(
            customer_caption(customer),
            CallbackData::AdminCustomer(id.clone()),
        )]);
    }
    kb.row(vec![button("➕ Создать нового заказчика", CallbackData::AdminCreateCustomer)])
        .row(vec![button(
            "🔍 Найти заказчика по пользователю",
            CallbackData::AdminFindCustomer,
        )])
        .row(vec![cancel_button()])
}

/// Customer buttons link `user_id` immediately; cancel returns to the plain panel.
pub fn admin_quick_customers(customers: &[(CustomerId, Customer)], user_id: i64) -> InlineKeyboard {
    let mut kb = InlineKeyboard::new();
    for (id, customer) in customers {
        kb = kb.row(vec![button(
            customer_caption(customer),
            CallbackData::AdminQuickLink {
                customer: id.clone(),
                user: user_id,
            },
        )]);
    }
    kb.row(vec![button("➕ Создать нового заказчика", CallbackData::AdminCreateCustomer)])
        .row(vec![button(
            "🔍 Найти заказчика по пользователю",
            CallbackData::AdminFindCustomer,
        )])
        .row(vec![button("❌ Отменить", CallbackData::AdminPanel)])
}

pub fn admin_actions(id: &CustomerId, customer: &Customer) -> InlineKeyboard {
    let action = |action: AdminAction| CallbackData::AdminAction {
        action,
        customer: id.clone(),
    };
    let status = if customer.discount { "✅" } else { "❌" };
    InlineKeyboard::new()
        .row(vec![button(
            format!("📊 Тариф: {status} Льгота"),
            action(AdminAction::Tariff),
        )])
        .row(vec![button(
            format!("🚗 Выезды: {}", customer.visits.len()),
            action(AdminAction::Visits),
        )])
        .row(vec![button(
            format!("👥 Пользователи: {}", customer.ids.len()),
            action(AdminAction::Users),
        )])
        .row(vec![button(
            format!("💰 Проекты: {}", format_rub(customer.projects_sum)),
            action(AdminAction::Projects),
        )])
        .row(vec![button("📅 Добавить выезд", action(AdminAction::AddVisit))])
        .row(vec![button("🗑 Удалить заказчика", action(AdminAction::Remove))])
        .row(vec![button("🧹 Очистить выезды", action(AdminAction::ClearVisits))])
        .row(vec![cancel_button()])
}

fn truncate_caption(text: String) -> String {
    if text.chars().count() <= BUTTON_CAPTION_MAX {
        return text;
    }
    let head: String = text.chars().take(BUTTON_CAPTION_MAX - 3).collect();
    format!("{head}...")
}

/// One row per visit (caption + delete button), then delete-all and back.
pub fn admin_visits_management(id: &CustomerId, visits: &[Visit]) -> InlineKeyboard {
    let mut kb = InlineKeyboard::new();
    for (index, visit) in visits.iter().enumerate() {
        kb = kb.row(vec![
            button(
                truncate_caption(visit_short(visit, index + 1)),
                CallbackData::AdminVisitInfo {
                    customer: id.clone(),
                    index,
                },
            ),
            button(
                "🗑",
                CallbackData::AdminDeleteVisit {
                    customer: id.clone(),
                    index,
                },
            ),
        ]);
    }
    if !visits.is_empty() {
        kb = kb.row(vec![button(
            "🔥 Удалить все выезды",
            CallbackData::AdminDeleteAll(id.clone()),
        )]);
    }
    kb.row(vec![admin_back_button(id)])
}

pub fn admin_back(id: &CustomerId) -> InlineKeyboard {
    InlineKeyboard::new().row(vec![admin_back_button(id)])
}

pub fn admin_user_management(id: &CustomerId, customer: &Customer) -> InlineKeyboard {
    let mut kb = InlineKeyboard::new();
    for uid in customer.ids.iter().filter_map(|s| s.parse::<i64>().ok()) {
        kb = kb.row(vec![
            button(
                format!("👤 {uid}"),
                CallbackData::AdminUserInfo {
                    customer: id.clone(),
                    user: uid,
                },
            ),
            button(
                "❌ Отвязать",
                CallbackData::AdminUnlinkSpecific {
                    customer: id.clone(),
                    user: uid,
                },
            ),
        ]);
    }
    kb.row(vec![button(
        "➕ Привязать пользователя",
        CallbackData::AdminLinkUser(id.clone()),
    )])
    .row(vec![admin_back_button(id)])
}

pub fn admin_projects_management(id: &CustomerId) -> InlineKeyboard {
    let add = |caption: &str, amount: i64| {
        button(
            caption,
            CallbackData::AdminAddAmount {
                customer: id.clone(),
                amount,
            },
        )
    };
    InlineKeyboard::new()
        .row(vec![add("➕ Добавить 10,000 ₽", 10_000)])
        .row(vec![add("➕ Добавить 25,000 ₽", 25_000)])
        .row(vec![add("➕ Добавить 50,000 ₽", 50_000)])
        .row(vec![button(
            "💵 Установить точную сумму",
            CallbackData::AdminSetExact(id.clone()),
        )])
        .row(vec![button("🔄 Обнулить сумму", CallbackData::AdminResetSum(id.clone()))])
        .row(vec![admin_back_button(id)])
}

/// Today, then the ten previous days in rows of three.
pub fn admin_dates(id: &CustomerId, today: NaiveDate) -> InlineKeyboard {
    let mut kb = InlineKeyboard::new().row(vec![button(
        "📅 Сегодня",
        CallbackData::AdminDate(VisitDate::Day(today)),
    )]);
    let days: Vec<InlineButton> = (1..11)
        .map(|i| {
            let d = today - Duration::days(i);
            button(
                format!("{:02}.{:02} ({})", d.day(), d.month(), weekday_ru(d)),
                CallbackData::AdminDate(VisitDate::Day(d)),
            )
        })
        .collect();
    for chunk in days.chunks(3) {
        kb = kb.row(chunk.to_vec());
    }
    kb.row(vec![
        button("⬅ Назад", CallbackData::AdminDateBack(id.clone())),
        cancel_button(),
    ])
}

pub fn admin_kind() -> InlineKeyboard {
    let order = [
        VisitKind::Exact,
        VisitKind::UrgentTomorrow,
        VisitKind::UrgentToday,
        VisitKind::Holiday,
        VisitKind::Free,
    ];
    let mut kb = InlineKeyboard::new();
    for kind in order {
        kb = kb.row(vec![button(kind.label(), CallbackData::AdminKind(kind))]);
    }
    kb.row(vec![button("⬅ Назад", CallbackData::AdminKindBack), cancel_button()])
}

pub fn admin_duration() -> InlineKeyboard {
    let mut kb = InlineKeyboard::new();
    for shift in Shift::ALL {
        kb = kb.row(vec![button(shift.button_label(), CallbackData::AdminDuration(shift))]);
    }
    kb.row(vec![button("⬅ Назад", CallbackData::AdminDurationBack), cancel_button()])
}

pub fn admin_tariff_type() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![button(
            format!("💰 {}", TariffType::Discount.label()),
            CallbackData::AdminTariff(TariffType::Discount),
        )])
        .row(vec![button(
            format!("💰 {}", TariffType::Standard.label()),
            CallbackData::AdminTariff(TariffType::Standard),
        )])
        .row(vec![button("⬅ Назад", CallbackData::AdminTariffBack), cancel_button()])
}

pub fn admin_confirm() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![button("✅ Подтвердить", CallbackData::AdminConfirm)])
        .row(vec![button("⬅ Назад", CallbackData::AdminConfirmBack), cancel_button()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 13).unwrap()
    }

    /// **Test: date menu has today/tomorrow, two rows of five days, and the back row.**
    #[test]
    fn test_dates_menu_layout() {
        let kb = dates_menu("42", today());
        let lens: Vec<usize> = kb.rows.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![2, 5, 5, 1]);
        assert_eq!(kb.rows[0][0].data, "date:42:2024-05-13");
        assert_eq!(kb.rows[0][1].data, "date:42:2024-05-14");
        assert_eq!(kb.rows[1][0].text, "15 (ср)");
        assert_eq!(kb.rows[2][4].data, "date:42:2024-05-24");
        assert_eq!(kb.rows[3][0].data, "menu:start");
    }

    #[test]
    fn test_duration_menu_data() {
        let kb = duration_menu("7", VisitDate::Free, VisitKind::Free);
        assert_eq!(kb.rows[0][0].text, "☀ 4 часа");
        assert_eq!(kb.rows[0][0].data, "time:7:free:free:4");
        assert_eq!(kb.rows[1][1].data, "time:7:free:free:night_8");
    }

    /// **Test: admin dates go backwards ten days in rows of three.**
    #[test]
    fn test_admin_dates_layout() {
        let kb = admin_dates(&CustomerId::from("3"), today());
        let lens: Vec<usize> = kb.rows.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![1, 3, 3, 3, 1, 2]);
        assert_eq!(kb.rows[1][0].text, "12.05 (вс)");
        assert_eq!(kb.rows[4][0].data, "admin_date:2024-05-03");
        assert_eq!(kb.rows[5][0].data, "admin_date:back:3");
        assert_eq!(kb.rows[5][1].data, "admin_cancel");
    }

    #[test]
    fn test_customer_captions() {
        let mut c = Customer::new("ООО Ромашка");
        c.ids.push("5".to_string());
        let kb = admin_customers(&[(CustomerId::from("1"), c.clone())]);
        assert_eq!(kb.rows[0][0].text, "ООО Ромашка (🚗0 👥1)");
        assert_eq!(kb.rows[0][0].data, "admin_customer:1");
        assert_eq!(kb.rows.len(), 4);

        let quick = admin_quick_customers(&[(CustomerId::from("1"), c)], 99);
        assert_eq!(quick.rows[0][0].data, "admin_quick_link:1:99");
        assert_eq!(quick.rows[3][0].data, "admin_panel");
    }

    #[test]
    fn test_truncate_caption() {
        assert_eq!(truncate_caption("short".to_string()), "short");
        let long = "x".repeat(40);
        let cut = truncate_caption(long);
        assert_eq!(cut.chars().count(), 30);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_visits_management_without_visits() {
        let kb = admin_visits_management(&CustomerId::from("1"), &[]);
        assert_eq!(kb.rows.len(), 1);
        assert_eq!(kb.rows[0][0].data, "admin_action:back:1");
    }
}
