//! Integration tests for admin text commands and the command menus.

mod common;

use chrono::NaiveDate;
use common::harness::{Harness, ADMIN};
use dbot_core::{CommandScope, HandlerResponse};
use storage::Visit;
use tariff::{Shift, TariffType, VisitDate, VisitKind};
use visits_bot::commands::{admin_commands, setup_command_menu};
use visits_bot::texts;

const USER: i64 = 555;

fn visit() -> Visit {
    Visit {
        date: VisitDate::Day(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()),
        kind: VisitKind::Exact,
        duration: Shift::Day4,
        price: 25_000,
        tariff_type: TariffType::Standard,
    }
}

/// Runs `command` as the admin and returns the texts sent back to the admin.
async fn run(h: &Harness, command: &str) -> Vec<String> {
    let before = h.bot.sent_to(ADMIN).len();
    assert_eq!(h.text(ADMIN, command).await, HandlerResponse::Stop);
    h.bot.sent_to(ADMIN)[before..]
        .iter()
        .map(|s| s.text.clone())
        .collect()
}

async fn reply(h: &Harness, command: &str) -> String {
    let replies = run(h, command).await;
    assert_eq!(replies.len(), 1, "{command}: {replies:?}");
    replies.into_iter().next().unwrap()
}

/// **Test: /register links and notifies; a repeat reports the existing link.**
#[tokio::test]
async fn test_register() {
    let h = Harness::new();
    let id = h.customer("ООО Ромашка", &[]);

    assert_eq!(
        reply(&h, &format!("/register {USER} {id}")).await,
        format!("✅ Пользователь {USER} привязан к заказчику ООО Ромашка\n\nПользователь получил уведомление.")
    );
    assert_eq!(h.store().find_by_user(USER).unwrap().0, id);
    assert_eq!(
        h.bot.sent_to(USER).last().unwrap().text,
        texts::registered("ООО Ромашка")
    );

    assert_eq!(
        reply(&h, &format!("/register {USER} {id}")).await,
        texts::admin_already_linked(USER, "ООО Ромашка")
    );
}

/// **Test: /register argument errors: usage, bad number, unknown customer.**
#[tokio::test]
async fn test_register_errors() {
    let h = Harness::new();
    h.customer("ООО Ромашка", &[]);

    assert_eq!(
        reply(&h, "/register 5").await,
        "Использование: /register <id_пользователя> <id_заказчика>\n\nПример: /register 123456789 1"
    );

    let parse_error = reply(&h, "/register abc 1").await;
    assert!(parse_error.starts_with("Ошибка: abc: invalid digit found in string\n"));
    assert!(parse_error.contains("Использование: /register"));

    assert_eq!(
        reply(&h, "/register 5 99").await,
        "❌ Заказчик с ID 99 не найден."
    );
}

/// **Test: /create takes the rest of the line as the name and assigns the next id.**
#[tokio::test]
async fn test_create() {
    let h = Harness::new();

    assert_eq!(
        reply(&h, "/create ООО  Новый Дом").await,
        "✅ Создан заказчик: ООО Новый Дом (ID: 1)"
    );
    assert_eq!(
        reply(&h, "/create Второй").await,
        "✅ Создан заказчик: Второй (ID: 2)"
    );
    assert_eq!(reply(&h, "/create").await, "Использование: /create <имя>");
    assert_eq!(h.store().list().len(), 2);
}

/// **Test: /customers lists every customer, or says the list is empty.**
#[tokio::test]
async fn test_customers() {
    let h = Harness::new();
    assert_eq!(reply(&h, "/customers").await, texts::CUSTOMERS_EMPTY);

    let id = h.customer("ООО Ромашка", &[USER, 777]);
    let listing = reply(&h, "/customers").await;
    assert_eq!(listing, texts::customers_listing(&h.store().list()));
    assert!(listing.contains(&format!("├─ {id}: ООО Ромашка")));
    assert!(listing.contains("│  ID пользователей: 555, 777"));
}

/// **Test: a long /customers listing is split into several messages under the size limit.**
#[tokio::test]
async fn test_customers_split() {
    let h = Harness::new();
    for i in 0..120 {
        h.customer(&format!("Заказчик с длинным названием номер {i}"), &[]);
    }

    let chunks = run(&h, "/customers").await;
    assert!(chunks.len() > 1);
    assert!(chunks
        .iter()
        .all(|c| c.chars().count() <= texts::MESSAGE_CHUNK_CHARS));
    assert_eq!(
        chunks.concat(),
        texts::customers_listing(&h.store().list())
    );
}

/// **Test: /link and /unlink by customer id.**
#[tokio::test]
async fn test_link_unlink() {
    let h = Harness::new();
    let id = h.customer("ООО Ромашка", &[]);

    assert_eq!(
        reply(&h, &format!("/link {id} {USER}")).await,
        format!("✅ Пользователь {USER} привязан к заказчику {id} (ООО Ромашка)")
    );
    assert_eq!(
        reply(&h, &format!("/link {id} {USER}")).await,
        format!("ℹ Пользователь {USER} уже привязан к заказчику {id}")
    );
    assert_eq!(
        reply(&h, &format!("/unlink {id} {USER}")).await,
        format!("✅ Пользователь {USER} отвязан от заказчика {id}")
    );
    assert_eq!(
        reply(&h, &format!("/unlink {id} {USER}")).await,
        format!("ℹ Пользователь {USER} не привязан к заказчику {id}")
    );
    assert_eq!(
        reply(&h, &format!("/unlink 42 {USER}")).await,
        "❌ Заказчик с ID 42 не найден."
    );
}

/// **Test: linking moves the user away from their previous customer.**
#[tokio::test]
async fn test_link_moves_user() {
    let h = Harness::new();
    let first = h.customer("Первый", &[USER]);
    let second = h.customer("Второй", &[]);

    reply(&h, &format!("/link {second} {USER}")).await;

    assert!(h.store().get(&first).unwrap().ids.is_empty());
    assert_eq!(h.store().find_by_user(USER).unwrap().0, second);
}

/// **Test: /addsum and /setsum update the projects sum and the discount flag.**
#[tokio::test]
async fn test_sums() {
    let h = Harness::new();
    let id = h.customer("ООО Ромашка", &[]);

    assert_eq!(
        reply(&h, &format!("/addsum {id} 30000")).await,
        format!("✅ 30 000 ₽ добавлено заказчику {id}. Всего: 30 000 ₽")
    );
    assert!(!h.store().get(&id).unwrap().discount);

    assert_eq!(
        reply(&h, &format!("/setsum {id} 70000")).await,
        format!("✅ Сумма заказчика {id} установлена: 70 000 ₽")
    );
    assert!(h.store().get(&id).unwrap().discount);

    let err = reply(&h, &format!("/addsum {id} много")).await;
    assert!(err.starts_with("Ошибка: много:"));
    assert!(err.ends_with("Использование: /addsum <id_заказчика> <сумма>"));
}

/// **Test: /remove deletes the customer once.**
#[tokio::test]
async fn test_remove() {
    let h = Harness::new();
    let id = h.customer("ООО Ромашка", &[USER]);

    assert_eq!(
        reply(&h, &format!("/remove {id}")).await,
        format!("✅ Заказчик ООО Ромашка (ID: {id}) удален.")
    );
    assert!(h.store().find_by_user(USER).is_none());
    assert_eq!(
        reply(&h, &format!("/remove {id}")).await,
        format!("❌ Заказчик с ID {id} не найден.")
    );
}

/// **Test: /finduser reports the customer a user belongs to.**
#[tokio::test]
async fn test_finduser() {
    let h = Harness::new();
    let id = h.customer("ООО Ромашка", &[USER]);

    let found = reply(&h, &format!("/finduser {USER}")).await;
    assert_eq!(
        found,
        texts::find_user_result(USER, &id, &h.store().get(&id).unwrap())
    );
    assert_eq!(
        reply(&h, "/finduser 999").await,
        "❌ Пользователь 999 не привязан ни к одному заказчику."
    );
}

/// **Test: /clearvisits empties the history and reports the count.**
#[tokio::test]
async fn test_clearvisits() {
    let h = Harness::new();
    let id = h.customer("ООО Ромашка", &[]);
    h.store().add_visit(&id, visit()).unwrap();
    h.store().add_visit(&id, visit()).unwrap();

    assert_eq!(
        reply(&h, &format!("/clearvisits {id}")).await,
        format!("✅ История выездов заказчика {id} очищена. Удалено записей: 2")
    );
    assert!(h.store().get(&id).unwrap().visits.is_empty());
}

/// **Test: admin commands from anyone else are swallowed.**
#[tokio::test]
async fn test_non_admin_commands_ignored() {
    let h = Harness::new();

    assert_eq!(h.text(USER, "/create Чужой").await, HandlerResponse::Stop);
    assert_eq!(h.text(USER, "/customers").await, HandlerResponse::Stop);

    assert!(h.bot.sent().is_empty());
    assert!(h.store().list().is_empty());
}

/// **Test: an admin command first clears the admin's own calculation screens.**
#[tokio::test]
async fn test_command_clears_calc_messages() {
    let h = Harness::new();
    h.components.calc_messages.track(ADMIN, ADMIN, 50);

    reply(&h, "/customers").await;

    assert_eq!(h.bot.deleted(), vec![(ADMIN, 50)]);
}

/// **Test: customers get no command menu; the admin chat gets the admin commands.**
#[tokio::test]
async fn test_command_menus() {
    let h = Harness::new();

    setup_command_menu(h.bot.as_ref(), ADMIN).await;

    let menus = h.bot.commands();
    assert_eq!(menus.len(), 2);
    assert_eq!(menus[0].0, CommandScope::Default);
    assert!(menus[0].1.is_empty());
    assert_eq!(menus[1].0, CommandScope::Chat(ADMIN));
    assert_eq!(menus[1].1, admin_commands());
    assert!(menus[1].1.iter().any(|c| c.command == "admin"));
}

/// **Test: a failed save is reported with the usage line and nothing changes.**
#[tokio::test]
async fn test_write_failure_reported() {
    let h = Harness::new();
    let id = h.customer("ООО Ромашка", &[]);
    h.block_writes();

    let err = reply(&h, "/create Призрак").await;
    assert!(err.starts_with("Ошибка: IO error:"), "{err}");
    assert!(err.ends_with("Использование: /create <имя>"));

    let err = reply(&h, &format!("/link {id} {USER}")).await;
    assert!(err.starts_with("Ошибка: IO error:"), "{err}");

    assert_eq!(h.store().list().len(), 1);
    assert!(!reply(&h, "/customers").await.contains("Призрак"));
    assert_eq!(
        reply(&h, &format!("/finduser {USER}")).await,
        format!("❌ Пользователь {USER} не привязан ни к одному заказчику.")
    );
    assert!(h.bot.sent_to(USER).is_empty());
}

/// **Test: /addsum past the largest sum is an error and keeps the old sum.**
#[tokio::test]
async fn test_addsum_overflow() {
    let h = Harness::new();
    let id = h.customer("ООО Ромашка", &[]);
    reply(&h, &format!("/setsum {id} {}", i64::MAX)).await;

    let err = reply(&h, &format!("/addsum {id} 10000")).await;
    assert!(err.starts_with("Ошибка: Amount out of range:"), "{err}");
    assert!(err.ends_with("Использование: /addsum <id_заказчика> <сумма>"));
    assert_eq!(h.store().get(&id).unwrap().projects_sum, i64::MAX);
}
