use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TariffError;

/// How a visit was booked; drives the table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitKind {
    Free,
    Exact,
    UrgentTomorrow,
    UrgentToday,
    Holiday,
}

impl VisitKind {
    pub const ALL: [VisitKind; 5] = [
        VisitKind::Free,
        VisitKind::Exact,
        VisitKind::UrgentTomorrow,
        VisitKind::UrgentToday,
        VisitKind::Holiday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitKind::Free => "free",
            VisitKind::Exact => "exact",
            VisitKind::UrgentTomorrow => "urgent_tomorrow",
            VisitKind::UrgentToday => "urgent_today",
            VisitKind::Holiday => "holiday",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisitKind::Free => "🆓 Свободный график",
            VisitKind::Exact => "📅 К точному времени",
            VisitKind::UrgentTomorrow => "⏰ Срочный (на завтра)",
            VisitKind::UrgentToday => "⏰ Срочный (сегодня)",
            VisitKind::Holiday => "🎉 Праздничный",
        }
    }

    /// Icon used in compact button captions.
    pub fn icon(&self) -> &'static str {
        match self {
            VisitKind::Free => "🆓",
            VisitKind::Exact => "📅",
            VisitKind::UrgentTomorrow | VisitKind::UrgentToday => "⏰",
            VisitKind::Holiday => "🎉",
        }
    }
}

impl fmt::Display for VisitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitKind {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisitKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| TariffError::UnknownKind(s.to_string()))
    }
}

/// Shift length and day/night; drives the table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "4")]
    Day4,
    #[serde(rename = "8")]
    Day8,
    #[serde(rename = "night_4")]
    Night4,
    #[serde(rename = "night_8")]
    Night8,
}

impl Shift {
    pub const ALL: [Shift; 4] = [Shift::Day4, Shift::Day8, Shift::Night4, Shift::Night8];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Day4 => "4",
            Shift::Day8 => "8",
            Shift::Night4 => "night_4",
            Shift::Night8 => "night_8",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shift::Day4 => "4 часа ☀",
            Shift::Day8 => "8 часов ☀",
            Shift::Night4 => "4 часа 🌙 (ночной тариф)",
            Shift::Night8 => "8 часов 🌙 (ночной тариф)",
        }
    }

    /// Caption on the duration picker buttons.
    pub fn button_label(&self) -> &'static str {
        match self {
            Shift::Day4 => "☀ 4 часа",
            Shift::Day8 => "☀ 8 часов",
            Shift::Night4 => "🌙 4 часа",
            Shift::Night8 => "🌙 8 часов",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Shift::Day4 => "4☀",
            Shift::Day8 => "8☀",
            Shift::Night4 => "4🌙",
            Shift::Night8 => "8🌙",
        }
    }

    pub(crate) fn column(&self) -> usize {
        match self {
            Shift::Day4 => 0,
            Shift::Day8 => 1,
            Shift::Night4 => 2,
            Shift::Night8 => 3,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shift::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| TariffError::UnknownShift(s.to_string()))
    }
}

/// Which table a recorded visit was priced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffType {
    Discount,
    Standard,
}

impl TariffType {
    pub fn from_discount(discount: bool) -> Self {
        if discount {
            TariffType::Discount
        } else {
            TariffType::Standard
        }
    }

    pub fn is_discount(&self) -> bool {
        matches!(self, TariffType::Discount)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TariffType::Discount => "discount",
            TariffType::Standard => "standard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TariffType::Discount => "Льготный",
            TariffType::Standard => "Стандартный",
        }
    }
}

impl fmt::Display for TariffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TariffType {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discount" => Ok(TariffType::Discount),
            "standard" => Ok(TariffType::Standard),
            other => Err(TariffError::UnknownTariffType(other.to_string())),
        }
    }
}

/// Visit date: a calendar day, or `free` (no fixed date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VisitDate {
    Free,
    Day(NaiveDate),
}

impl VisitDate {
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            VisitDate::Free => None,
            VisitDate::Day(d) => Some(*d),
        }
    }
}

impl fmt::Display for VisitDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitDate::Free => f.write_str("free"),
            VisitDate::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for VisitDate {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "free" {
            return Ok(VisitDate::Free);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(VisitDate::Day)
            .map_err(|_| TariffError::InvalidDate(s.to_string()))
    }
}

impl TryFrom<String> for VisitDate {
    type Error = TariffError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<VisitDate> for String {
    fn from(d: VisitDate) -> Self {
        d.to_string()
    }
}

impl From<NaiveDate> for VisitDate {
    fn from(d: NaiveDate) -> Self {
        VisitDate::Day(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: wire strings parse back to the same value for every kind and shift.**
    #[test]
    fn test_wire_names() {
        for k in VisitKind::ALL {
            assert_eq!(k.as_str().parse::<VisitKind>().unwrap(), k);
        }
        for s in Shift::ALL {
            assert_eq!(s.as_str().parse::<Shift>().unwrap(), s);
        }
        assert!("night".parse::<Shift>().is_err());
        assert!("urgent".parse::<VisitKind>().is_err());
    }

    /// **Test: serde uses the wire strings (`"night_4"`, `"urgent_today"`, `"free"`).**
    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Shift::Night4).unwrap(), "\"night_4\"");
        assert_eq!(serde_json::to_string(&Shift::Day8).unwrap(), "\"8\"");
        assert_eq!(
            serde_json::to_string(&VisitKind::UrgentToday).unwrap(),
            "\"urgent_today\""
        );
        assert_eq!(serde_json::to_string(&VisitDate::Free).unwrap(), "\"free\"");
        let d: VisitDate = serde_json::from_str("\"2024-05-14\"").unwrap();
        assert_eq!(d, VisitDate::Day(NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()));
        assert!(serde_json::from_str::<VisitDate>("\"14.05.2024\"").is_err());
    }
}
