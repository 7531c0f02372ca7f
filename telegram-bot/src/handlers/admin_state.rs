//! Where the administrator is in the interactive panel.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use storage::CustomerId;
use tariff::{Shift, TariffType, VisitDate, VisitKind};

/// Panel step. Only the text-input steps consume plain messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminStep {
    #[default]
    Idle,
    SelectCustomer,
    CreateCustomer,
    FindCustomer,
    SelectAction,
    LinkUser,
    SetSum,
    SelectDate,
    SelectKind,
    SelectDuration,
    SelectTariffType,
    ConfirmVisit,
}

impl AdminStep {
    pub fn expects_text(&self) -> bool {
        matches!(
            self,
            AdminStep::CreateCustomer | AdminStep::FindCustomer | AdminStep::LinkUser | AdminStep::SetSum
        )
    }
}

/// A visit being assembled by the add-visit wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitDraft {
    pub customer: CustomerId,
    pub customer_name: String,
    pub date: Option<VisitDate>,
    pub kind: Option<VisitKind>,
    pub shift: Option<Shift>,
    pub tariff: Option<TariffType>,
    pub price: Option<i64>,
}

impl VisitDraft {
    pub fn new(customer: CustomerId, customer_name: impl Into<String>) -> Self {
        Self {
            customer,
            customer_name: customer_name.into(),
            date: None,
            kind: None,
            shift: None,
            tariff: None,
            price: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdminSession {
    pub step: AdminStep,
    pub draft: Option<VisitDraft>,
    /// User to link once a customer is chosen (from the new-user notice).
    pub pending_link_user: Option<i64>,
    /// Customer that the next typed user id is linked to.
    pub link_target: Option<CustomerId>,
    /// Customer whose projects sum the next typed number sets.
    pub sum_target: Option<CustomerId>,
}

#[derive(Default)]
pub struct AdminSessions {
    inner: Mutex<HashMap<i64, AdminSession>>,
}

impl AdminSessions {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, AdminSession>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, admin_id: i64) -> AdminSession {
        self.lock().get(&admin_id).cloned().unwrap_or_default()
    }

    pub fn step(&self, admin_id: i64) -> AdminStep {
        self.lock().get(&admin_id).map(|s| s.step).unwrap_or_default()
    }

    /// Applies `f` to the admin's session, creating it if needed.
    pub fn update<T>(&self, admin_id: i64, f: impl FnOnce(&mut AdminSession) -> T) -> T {
        f(self.lock().entry(admin_id).or_default())
    }

    pub fn set_step(&self, admin_id: i64, step: AdminStep) {
        self.update(admin_id, |s| s.step = step);
    }

    /// Ends the panel conversation.
    pub fn clear(&self, admin_id: i64) {
        self.lock().remove(&admin_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_update_and_clear() {
        let sessions = AdminSessions::new();
        assert_eq!(sessions.step(1), AdminStep::Idle);

        sessions.update(1, |s| {
            s.step = AdminStep::SetSum;
            s.sum_target = Some(CustomerId::from("3"));
        });
        assert!(sessions.step(1).expects_text());
        assert_eq!(sessions.get(1).sum_target, Some(CustomerId::from("3")));

        sessions.clear(1);
        assert!(sessions.get(1).sum_target.is_none());
        assert!(!AdminStep::SelectKind.expects_text());
    }
}
