//! Tests for pricing tables, holiday detection, date classification, the discount rule, and
//! rouble/date formatting.

use chrono::NaiveDate;
use tariff::{
    classify, discount_eligible, format_date_long, format_date_short, format_rub, is_holiday,
    price, price_for, Clock, FixedClock, Shift, TariffType, VisitDate, VisitKind,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// **Test: both tables, row by row, in column order 4 / 8 / night_4 / night_8.**
#[test]
fn test_price_tables() {
    let cols = Shift::ALL;
    let discount: [(VisitKind, [i64; 4]); 5] = [
        (VisitKind::Free, [20000, 23000, 27000, 30000]),
        (VisitKind::Exact, [22000, 25000, 27000, 30000]),
        (VisitKind::UrgentTomorrow, [25000, 27000, 27000, 30000]),
        (VisitKind::UrgentToday, [27000, 30000, 27000, 30000]),
        (VisitKind::Holiday, [35000, 35000, 35000, 35000]),
    ];
    let standard: [(VisitKind, [i64; 4]); 5] = [
        (VisitKind::Free, [22000, 25000, 35000, 40000]),
        (VisitKind::Exact, [25000, 30000, 35000, 40000]),
        (VisitKind::UrgentTomorrow, [30000, 35000, 35000, 40000]),
        (VisitKind::UrgentToday, [35000, 40000, 35000, 40000]),
        (VisitKind::Holiday, [40000, 45000, 40000, 45000]),
    ];
    for (kind, row) in discount {
        for (shift, expected) in cols.iter().zip(row) {
            assert_eq!(price(kind, *shift, true), expected, "discount {kind} {shift}");
        }
    }
    for (kind, row) in standard {
        for (shift, expected) in cols.iter().zip(row) {
            assert_eq!(price(kind, *shift, false), expected, "standard {kind} {shift}");
        }
    }
}

/// **Test: price_for follows the explicit tariff type.**
#[test]
fn test_price_for_tariff_type() {
    assert_eq!(price_for(VisitKind::Exact, Shift::Day8, TariffType::Discount), 25000);
    assert_eq!(price_for(VisitKind::Exact, Shift::Day8, TariffType::Standard), 30000);
}

/// **Test: statutory fixed-date holidays are recognised; ordinary days are not.**
#[test]
fn test_is_holiday() {
    for (m, d) in [(1, 1), (1, 7), (1, 8), (2, 23), (3, 8), (5, 1), (5, 9), (6, 12), (11, 4)] {
        assert!(is_holiday(date(2025, m, d)), "{m}-{d}");
    }
    assert!(!is_holiday(date(2025, 1, 9)));
    assert!(!is_holiday(date(2025, 5, 14)));
    assert!(!is_holiday(date(2025, 12, 31)));
}

/// **Test: holiday wins over today; today is urgent; tomorrow urgent only from 17:00.**
#[test]
fn test_classify() {
    let morning = FixedClock::at(2025, 5, 13, 10, 0).unwrap().now();
    let evening = FixedClock::at(2025, 5, 13, 17, 0).unwrap().now();
    let just_before = FixedClock::at(2025, 5, 13, 16, 59).unwrap().now();

    assert_eq!(classify(date(2025, 5, 13), morning), VisitKind::UrgentToday);
    assert_eq!(classify(date(2025, 5, 14), morning), VisitKind::Exact);
    assert_eq!(classify(date(2025, 5, 14), just_before), VisitKind::Exact);
    assert_eq!(classify(date(2025, 5, 14), evening), VisitKind::UrgentTomorrow);
    assert_eq!(classify(date(2025, 5, 20), evening), VisitKind::Exact);

    let on_holiday = FixedClock::at(2025, 5, 9, 12, 0).unwrap().now();
    assert_eq!(classify(date(2025, 5, 9), on_holiday), VisitKind::Holiday);
    let eve = FixedClock::at(2025, 5, 8, 20, 0).unwrap().now();
    assert_eq!(classify(date(2025, 5, 9), eve), VisitKind::Holiday);
}

/// **Test: year rollover counts Dec 31 → Jan 1 as tomorrow (and Jan 1 is a holiday anyway).**
#[test]
fn test_classify_year_end() {
    let now = FixedClock::at(2025, 12, 30, 18, 0).unwrap().now();
    assert_eq!(classify(date(2025, 12, 31), now), VisitKind::UrgentTomorrow);
}

/// **Test: discount threshold at 4 visits or 60 000 ₽.**
#[test]
fn test_discount_threshold() {
    assert!(!discount_eligible(3, 59_999));
    assert!(discount_eligible(4, 0));
    assert!(discount_eligible(0, 60_000));
    assert!(!discount_eligible(0, 0));
}

/// **Test: thousands separated by spaces; sign kept.**
#[test]
fn test_format_rub() {
    assert_eq!(format_rub(0), "0 ₽");
    assert_eq!(format_rub(999), "999 ₽");
    assert_eq!(format_rub(25000), "25 000 ₽");
    assert_eq!(format_rub(1_234_567), "1 234 567 ₽");
    assert_eq!(format_rub(-60000), "-60 000 ₽");
}

/// **Test: long and short date captions, including `free`.**
#[test]
fn test_format_dates() {
    let d = VisitDate::Day(date(2024, 5, 4));
    assert_eq!(format_date_long(d), "04.05.2024");
    assert_eq!(format_date_short(d), "04.05");
    assert_eq!(format_date_long(VisitDate::Free), "Свободная дата");
    assert_eq!(format_date_short(VisitDate::Free), "Своб.");
}
