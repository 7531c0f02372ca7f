//! # Tariff
//!
//! Pure pricing domain for welder visits.
//!
//! ## Pricing
//!
//! A visit price is looked up in one of two tables (discount / standard) by [`VisitKind`] and
//! [`Shift`]. Which table applies is decided by [`discount_eligible`] for customers, or chosen
//! explicitly ([`TariffType`]) when an administrator records a visit.
//!
//! ## Dates
//!
//! "Today" is Moscow wall-clock time (UTC+3, no DST), supplied by a [`Clock`]. [`classify`] maps a
//! chosen date to a visit kind: public holidays first, then same-day, then next-day after 17:00.
//!
//! ## Usage
//!
//! Used by `storage` (serde forms of kinds, shifts, dates) and by the bot for keyboards and texts.

mod calendar;
mod error;
mod format;
mod kind;
mod pricing;

pub use calendar::{
    classify, is_holiday, moscow_now, Clock, FixedClock, MoscowClock, URGENT_TOMORROW_HOUR,
};
pub use error::TariffError;
pub use format::{format_date_long, format_date_short, format_rub, weekday_ru};
pub use kind::{Shift, TariffType, VisitDate, VisitKind};
pub use pricing::{
    discount_eligible, price, price_for, DISCOUNT_MIN_PROJECTS_SUM, DISCOUNT_MIN_VISITS,
};
