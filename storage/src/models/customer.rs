use serde::{Deserialize, Serialize};
use tariff::{discount_eligible, Shift, TariffType, VisitDate, VisitKind};

/// One recorded welder visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub date: VisitDate,
    pub kind: VisitKind,
    pub duration: Shift,
    pub price: i64,
    #[serde(default = "standard_tariff")]
    pub tariff_type: TariffType,
}

fn standard_tariff() -> TariffType {
    TariffType::Standard
}

/// A customer with its linked Telegram users, visits, and projects sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    /// Linked Telegram user ids, as decimal strings.
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub projects_sum: i64,
    #[serde(default)]
    pub discount: bool,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ids: Vec::new(),
            projects_sum: 0,
            discount: false,
            visits: Vec::new(),
        }
    }

    pub fn has_user(&self, uid: i64) -> bool {
        let uid = uid.to_string();
        self.ids.iter().any(|id| *id == uid)
    }

    /// Removes `uid`; returns whether it was linked.
    pub(crate) fn remove_user(&mut self, uid: i64) -> bool {
        let uid = uid.to_string();
        let before = self.ids.len();
        self.ids.retain(|id| *id != uid);
        self.ids.len() != before
    }

    pub fn recalc_discount(&mut self) {
        self.discount = discount_eligible(self.visits.len(), self.projects_sum);
    }
}
