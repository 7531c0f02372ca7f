//! Message texts shown to customers and the administrator.

use chrono::NaiveDateTime;
use dbot_core::User;
use storage::{Customer, CustomerId, Visit};
use tariff::{format_date_long, format_date_short, format_rub, Shift, TariffType, VisitDate, VisitKind};

/// Telegram rejects messages longer than 4096 characters; lists are cut below that.
pub const MESSAGE_CHUNK_CHARS: usize = 4000;

pub const WELCOME_PENDING: &str = "👋 Вас приветствует бот «Выезды ИП Смирнов».\nСкоро вам будет предоставлен доступ к функциям бота.";
pub const NOT_LINKED: &str = "❌ Вы не привязаны к заказчику. Обратитесь к администратору.";
pub const CHOOSE_DATE: &str = "Выберите дату:";
pub const MALFORMED_CALLBACK: &str = "❌ Некорректные данные. Нажмите «🧮 Новый расчёт».";
pub const STALE_ALERT: &str = "Этот расчёт устарел. Нажмите «🧮 Новый расчёт».";
pub const STALE_EDIT: &str = "♻️ Этот расчёт уже неактуален.\n\nНажмите «🧮 Новый расчёт».";
pub const CALC_TIMEOUT: &str = "⏳ Расчёт сброшен из-за неактивности. Нажмите «🧮 Новый расчёт», чтобы начать заново.";
pub const NO_VISITS: &str = "🚗 У вас пока нет записей о выездах.";
const NIGHT_NOTE: &str = "🌙 Ночной тариф действует с 21:00 до 09:00";

pub const ADMIN_PANEL: &str = "👑 Админ-панель: выберите действие / заказчика:";
pub const ADMIN_CANCELLED: &str = "❌ Добавление выезда отменено.";
pub const ADMIN_CUSTOMER_NOT_FOUND: &str = "❌ Заказчик не найден.";
pub const ADMIN_CUSTOMER_MISSING: &str = "❌ Ошибка: заказчик не найден";
pub const ADMIN_CREATE_PROMPT: &str = "👤 Создание нового заказчика:\n\nВведите название заказчика:";
pub const ADMIN_EMPTY_NAME: &str = "❌ Название заказчика не может быть пустым.";
pub const ADMIN_FIND_PROMPT: &str = "🔍 Поиск заказчика по ID пользователя:\n\nВведите ID пользователя:";
pub const ADMIN_LINK_PROMPT: &str = "🔗 Привязка пользователя к заказчику\n\nВведите ID пользователя:";
pub const ADMIN_SUM_PROMPT: &str = "💵 Установка точной суммы проектов\n\nВведите сумму:";
pub const ADMIN_NOT_A_NUMBER: &str = "❌ Ошибка: введите число";
pub const ADMIN_VISIT_NOT_FOUND: &str = "❌ Ошибка: выезд не найден";
pub const ADMIN_SUM_RESET: &str = "✅ Сумма проектов обнулена";
pub const ADMIN_CHOOSE_VISIT_DATE: &str = "📅 Выберите дату выезда:";
pub const ADMIN_CHOOSE_KIND: &str = "📌 Выберите тип выезда:";
pub const ADMIN_CHOOSE_DURATION: &str = "⏳ Выберите длительность:";
pub const ADMIN_CHOOSE_TARIFF: &str = "💰 Выберите тип тарифа:";
pub const ADMIN_VISIT_ADDED: &str = "✅ Выезд успешно добавлен!";
pub const CUSTOMERS_EMPTY: &str = "Список заказчиков пуст.";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Да ✅"
    } else {
        "Нет ❌"
    }
}

/// Sent to the admin when someone without a customer presses /start.
pub fn new_user_notice(user: &User, now: NaiveDateTime) -> String {
    format!(
        "🔔 Новый пользователь!\nID: {}\nИмя: {}\nФамилия: {}\nUsername: @{}\nВремя: {}",
        user.id,
        user.first_name.as_deref().unwrap_or("Не указано"),
        user.last_name.as_deref().unwrap_or("Не указана"),
        user.username.as_deref().unwrap_or("Не указан"),
        now.format("%d.%m.%Y %H:%M"),
    )
}

pub fn welcome_linked(name: &str) -> String {
    format!("Добро пожаловать! Вы работаете с заказчиком: {name}")
}

pub fn working_with(name: &str) -> String {
    format!("Вы работаете с заказчиком: {name}")
}

pub fn registered(name: &str) -> String {
    format!("✅ Вы успешно зарегистрированы как представитель заказчика: {name}.")
}

fn status_lines(customer: &Customer) -> String {
    format!(
        "— Выездов: {}\n— Льготный тариф: {}\n— Сумма проектов: {}",
        customer.visits.len(),
        yes_no(customer.discount),
        format_rub(customer.projects_sum),
    )
}

pub fn customer_status(customer: &Customer) -> String {
    format!("📊 Ваш тариф ({})\n{}", customer.name, status_lines(customer))
}

pub fn admin_tariff(customer: &Customer) -> String {
    format!(
        "📊 Тариф заказчика {}\n{}",
        customer.name,
        status_lines(customer)
    )
}

fn visit_entry(visit: &Visit, number: usize) -> String {
    format!(
        "{number}. 📅 {}\n   📌 {}\n   ⏳ {}\n   💰 {}\n   📊 Тариф: {}\n   ——————————————\n",
        format_date_long(visit.date),
        visit.kind.label(),
        visit.duration.label(),
        format_rub(visit.price),
        visit.tariff_type.label(),
    )
}

/// Full visit history under `header`.
pub fn visits_list(header: String, visits: &[Visit]) -> String {
    let mut out = header;
    for (i, visit) in visits.iter().enumerate() {
        out.push_str(&visit_entry(visit, i + 1));
    }
    out
}

pub fn customer_visits(customer: &Customer) -> String {
    visits_list(
        format!("🚗 Выезды сварщиков для {}:\n\n", customer.name),
        &customer.visits,
    )
}

/// Admin view of the history, cut to one message.
pub fn admin_visits(customer: &Customer) -> String {
    if customer.visits.is_empty() {
        return format!("🚗 У заказчика {} пока нет записей о выездах.", customer.name);
    }
    let text = customer_visits(customer);
    if text.chars().count() > MESSAGE_CHUNK_CHARS {
        let head: String = text.chars().take(MESSAGE_CHUNK_CHARS).collect();
        return format!("{head}\n... (список обрезан)");
    }
    text
}

/// One-line caption for the admin visit list.
pub fn visit_short(visit: &Visit, number: usize) -> String {
    format!(
        "{number}. {} {} {} {}",
        format_date_short(visit.date),
        visit.kind.icon(),
        visit.duration.icon(),
        format_rub(visit.price),
    )
}

pub fn date_prompt(date: VisitDate, kind: VisitKind) -> String {
    match date {
        VisitDate::Free => format!(
            "🆓 Свободный график\n\n{NIGHT_NOTE}\n\nВыберите длительность и тип тарифа:"
        ),
        VisitDate::Day(_) => format!(
            "📅 Дата: {}\n📌 Тип выезда: {}\n\n{NIGHT_NOTE}\n\nВыберите длительность и тип тарифа:",
            format_date_long(date),
            kind.label(),
        ),
    }
}

pub struct CalcSummary<'a> {
    pub customer: &'a str,
    pub date: String,
    pub kind: VisitKind,
    pub shift: Shift,
    pub price: i64,
}

pub fn calc_summary(s: &CalcSummary<'_>) -> String {
    format!(
        "📌 Заказчик: {}\n📅 Дата: {}\n📌 Тип выезда: {}\n⏳ Длительность: {}\n💰 Стоимость: {}",
        s.customer,
        s.date,
        s.kind.label(),
        s.shift.label(),
        format_rub(s.price),
    )
}

pub fn admin_pick_for_link(user_id: i64) -> String {
    format!("👥 Выберите заказчика для привязки пользователя {user_id}:")
}

pub fn admin_quick_linked(user_id: i64, name: &str) -> String {
    format!(
        "✅ Пользователь {user_id} привязан к заказчику {name}\n\nПользователь получил уведомление о регистрации."
    )
}

pub fn admin_already_linked(user_id: i64, name: &str) -> String {
    format!("ℹ Пользователь {user_id} уже привязан к заказчику {name}")
}

pub fn admin_created(name: &str, id: &CustomerId, pending_user: Option<i64>) -> String {
    match pending_user {
        Some(uid) => format!(
            "✅ Создан заказчик: {name} (ID: {id})\n\nТеперь выберите заказчика для привязки пользователя {uid}:"
        ),
        None => format!("✅ Создан заказчик: {name} (ID: {id})\n\nТеперь выберите заказчика:"),
    }
}

pub fn admin_user_not_linked(user_id: &str) -> String {
    format!(
        "❌ Пользователь {user_id} не привязан ни к одному заказчику.\n\nПопробуйте другой ID или выберите заказчика вручную:"
    )
}

pub fn admin_found(name: &str, id: &CustomerId) -> String {
    format!("✅ Найден заказчик: {name} (ID: {id})\n\nВыберите действие:")
}

pub fn admin_selected(name: &str) -> String {
    format!("👥 Заказчик: {name}\n\nВыберите действие:")
}

pub fn admin_visit_deleted(visit: &Visit, remaining: usize) -> String {
    format!(
        "✅ Выезд от {} удален!\nОсталось выездов: {remaining}",
        format_date_long(visit.date)
    )
}

pub fn admin_all_deleted(count: usize) -> String {
    format!("✅ Все выезды удалены! Удалено записей: {count}")
}

pub fn admin_unlinked(user_id: i64, name: &str) -> String {
    format!("✅ Пользователь {user_id} отвязан от заказчика {name}")
}

pub fn admin_not_linked_here(user_id: i64) -> String {
    format!("❌ Пользователь {user_id} не привязан к заказчику")
}

pub fn admin_amount_added(amount: i64, total: i64) -> String {
    format!(
        "✅ Добавлено {} к сумме проектов\nТекущая сумма: {}",
        format_rub(amount),
        format_rub(total)
    )
}

pub fn admin_users(customer: &Customer) -> String {
    format!(
        "👥 Управление пользователями для {}\nПривязано пользователей: {}",
        customer.name,
        customer.ids.len()
    )
}

pub fn admin_projects(customer: &Customer) -> String {
    format!(
        "💰 Управление суммой проектов для {}\nТекущая сумма: {}",
        customer.name,
        format_rub(customer.projects_sum)
    )
}

pub fn admin_removed(name: &str) -> String {
    format!("✅ Заказчик '{name}' удален!")
}

pub fn admin_visits_cleared(count: usize) -> String {
    format!("✅ Выезды очищены! Удалено: {count} записей")
}

pub fn admin_linked_from_panel(user_id: i64, name: &str) -> String {
    format!("✅ Пользователь {user_id} привязан к заказчика {name}")
}

pub fn admin_already_linked_here(user_id: i64) -> String {
    format!("ℹ Пользователь {user_id} уже привязан к заказчику")
}

pub fn admin_sum_set(amount: i64) -> String {
    format!("✅ Сумма проектов установлена: {}", format_rub(amount))
}

pub fn admin_kind_chosen(date: VisitDate, kind: VisitKind) -> String {
    format!(
        "📅 Дата: {}\n📌 Тип: {}\n\n⏳ Выберите длительность:",
        format_date_long(date),
        kind.label()
    )
}

pub struct VisitConfirmation<'a> {
    pub customer: &'a str,
    pub date: VisitDate,
    pub kind: VisitKind,
    pub shift: Shift,
    pub tariff: TariffType,
    pub price: i64,
}

pub fn admin_confirm_visit(c: &VisitConfirmation<'_>) -> String {
    format!(
        "✅ Подтвердите добавление выезда:\n\n👥 Заказчик: {}\n📅 Дата: {}\n📌 Тип: {}\n⏳ Длительность: {}\n💰 Тип тарифа: {}\n💵 Стоимость: {}",
        c.customer,
        format_date_long(c.date),
        c.kind.label(),
        c.shift.label(),
        c.tariff.label(),
        format_rub(c.price),
    )
}

/// `/customers` listing; one block per customer.
pub fn customers_listing(customers: &[(CustomerId, Customer)]) -> String {
    let mut lines = vec!["📋 Заказчики:".to_string()];
    for (id, c) in customers {
        let ids = if c.ids.is_empty() {
            "нет".to_string()
        } else {
            c.ids.join(", ")
        };
        lines.push(format!("├─ {id}: {}", c.name));
        lines.push(format!("│  ID пользователей: {ids}"));
        lines.push(format!(
            "│  Выездов: {} | Льгота: {} | Проекты: {}",
            c.visits.len(),
            yes_no(c.discount),
            format_rub(c.projects_sum),
        ));
        lines.push("╰──────────────────".to_string());
    }
    lines.join("\n")
}

pub fn find_user_result(user_id: i64, id: &CustomerId, c: &Customer) -> String {
    format!(
        "👤 Пользователь {user_id} привязан к:\nЗаказчик: {} (ID: {id})\nВыездов: {} | Льгота: {} | Проекты: {}",
        c.name,
        c.visits.len(),
        yes_no(c.discount),
        format_rub(c.projects_sum),
    )
}

/// Splits `text` into pieces of at most `max` characters, preferring line boundaries.
pub fn split_chunks(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > max && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
