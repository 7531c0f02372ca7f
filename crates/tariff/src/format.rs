use chrono::{Datelike, NaiveDate, Weekday};

use crate::kind::VisitDate;

/// `25000` → `"25 000 ₽"`.
pub fn format_rub(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped} ₽")
}

pub fn weekday_ru(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "пн",
        Weekday::Tue => "вт",
        Weekday::Wed => "ср",
        Weekday::Thu => "чт",
        Weekday::Fri => "пт",
        Weekday::Sat => "сб",
        Weekday::Sun => "вс",
    }
}

/// `DD.MM.YYYY`, or `Свободная дата`.
pub fn format_date_long(date: VisitDate) -> String {
    match date {
        VisitDate::Free => "Свободная дата".to_string(),
        VisitDate::Day(d) => d.format("%d.%m.%Y").to_string(),
    }
}

/// `DD.MM`, or `Своб.`.
pub fn format_date_short(date: VisitDate) -> String {
    match date {
        VisitDate::Free => "Своб.".to_string(),
        VisitDate::Day(d) => d.format("%d.%m").to_string(),
    }
}
