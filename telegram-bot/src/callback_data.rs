//! Inline-button payloads: `prefix:field:field…` strings, parsed into [`CallbackData`] and
//! rendered back with `Display`.

use std::fmt;
use std::str::FromStr;

use storage::CustomerId;
use tariff::{Shift, TariffType, VisitDate, VisitKind};
use thiserror::Error;

/// Main-menu buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    Calc,
    Status,
    Visits,
}

impl MenuAction {
    fn as_str(&self) -> &'static str {
        match self {
            MenuAction::Start => "start",
            MenuAction::Calc => "calc",
            MenuAction::Status => "status",
            MenuAction::Visits => "visits",
        }
    }
}

/// Buttons of the per-customer admin menu (`admin_action:<action>:<cid>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Back,
    Tariff,
    Visits,
    Users,
    Projects,
    AddVisit,
    Remove,
    ClearVisits,
}

impl AdminAction {
    fn as_str(&self) -> &'static str {
        match self {
            AdminAction::Back => "back",
            AdminAction::Tariff => "tariff",
            AdminAction::Visits => "visits",
            AdminAction::Users => "users",
            AdminAction::Projects => "projects",
            AdminAction::AddVisit => "add_visit",
            AdminAction::Remove => "remove",
            AdminAction::ClearVisits => "clear_visits",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "back" => AdminAction::Back,
            "tariff" => AdminAction::Tariff,
            "visits" => AdminAction::Visits,
            "users" => AdminAction::Users,
            "projects" => AdminAction::Projects,
            "add_visit" => AdminAction::AddVisit,
            "remove" => AdminAction::Remove,
            "clear_visits" => AdminAction::ClearVisits,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackData {
    Menu(MenuAction),
    /// Date picked in a calculation.
    Date { session: String, date: VisitDate },
    /// Shift picked in a calculation; the last step.
    Time {
        session: String,
        date: VisitDate,
        kind: VisitKind,
        shift: Shift,
    },

    AdminPanel,
    /// Open the panel to link this user.
    AdminPanelLink(i64),
    AdminQuickLink { customer: CustomerId, user: i64 },
    AdminCustomer(CustomerId),
    AdminCreateCustomer,
    AdminFindCustomer,
    AdminCancel,
    AdminAction { action: AdminAction, customer: CustomerId },
    AdminVisitInfo { customer: CustomerId, index: usize },
    AdminDeleteVisit { customer: CustomerId, index: usize },
    AdminDeleteAll(CustomerId),
    AdminUserInfo { customer: CustomerId, user: i64 },
    AdminUnlinkSpecific { customer: CustomerId, user: i64 },
    AdminLinkUser(CustomerId),
    AdminAddAmount { customer: CustomerId, amount: i64 },
    AdminSetExact(CustomerId),
    AdminResetSum(CustomerId),

    AdminDate(VisitDate),
    AdminDateBack(CustomerId),
    AdminKind(VisitKind),
    AdminKindBack,
    AdminDuration(Shift),
    AdminDurationBack,
    AdminTariff(TariffType),
    AdminTariffBack,
    AdminConfirm,
    AdminConfirmBack,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackParseError {
    /// Known prefix, wrong fields.
    #[error("Malformed {prefix} callback: {data}")]
    Malformed { prefix: String, data: String },
    #[error("Unknown callback: {0}")]
    Unknown(String),
}

impl CallbackData {
    pub fn is_admin(&self) -> bool {
        !matches!(
            self,
            CallbackData::Menu(_) | CallbackData::Date { .. } | CallbackData::Time { .. }
        )
    }
}

impl FromStr for CallbackData {
    type Err = CallbackParseError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = data.split(':').collect();
        let prefix = parts[0];
        let malformed = || CallbackParseError::Malformed {
            prefix: prefix.to_string(),
            data: data.to_string(),
        };
        let cid = |i: usize| -> Result<CustomerId, CallbackParseError> {
            parts
                .get(i)
                .filter(|s| !s.is_empty())
                .map(|s| CustomerId::from(*s))
                .ok_or_else(malformed)
        };
        let num = |i: usize| -> Result<i64, CallbackParseError> {
            parts
                .get(i)
                .and_then(|s| s.parse().ok())
                .ok_or_else(malformed)
        };
        let index = |i: usize| -> Result<usize, CallbackParseError> {
            parts
                .get(i)
                .and_then(|s| s.parse().ok())
                .ok_or_else(malformed)
        };
        let field = |i: usize| parts.get(i).copied().ok_or_else(malformed);
        let arity = |n: usize| -> Result<(), CallbackParseError> {
            if parts.len() == n {
                Ok(())
            } else {
                Err(malformed())
            }
        };

        let parsed = match prefix {
            "menu" => {
                arity(2)?;
                CallbackData::Menu(match parts[1] {
                    "start" => MenuAction::Start,
                    "calc" => MenuAction::Calc,
                    "status" => MenuAction::Status,
                    "visits" => MenuAction::Visits,
                    _ => return Err(malformed()),
                })
            }
            "date" => {
                arity(3)?;
                CallbackData::Date {
                    session: field(1)?.to_string(),
                    date: field(2)?.parse().map_err(|_| malformed())?,
                }
            }
            "time" => {
                arity(5)?;
                CallbackData::Time {
                    session: field(1)?.to_string(),
                    date: field(2)?.parse().map_err(|_| malformed())?,
                    kind: field(3)?.parse().map_err(|_| malformed())?,
                    shift: field(4)?.parse().map_err(|_| malformed())?,
                }
            }
            "admin_panel" => {
                arity(1)?;
                CallbackData::AdminPanel
            }
            "admin_panel_link" => {
                arity(2)?;
                CallbackData::AdminPanelLink(num(1)?)
            }
            "admin_quick_link" => {
                arity(3)?;
                CallbackData::AdminQuickLink {
                    customer: cid(1)?,
                    user: num(2)?,
                }
            }
            "admin_customer" => {
                arity(2)?;
                CallbackData::AdminCustomer(cid(1)?)
            }
            "admin_create_customer" => {
                arity(1)?;
                CallbackData::AdminCreateCustomer
            }
            "admin_find_customer" => {
                arity(1)?;
                CallbackData::AdminFindCustomer
            }
            "admin_cancel" => {
                arity(1)?;
                CallbackData::AdminCancel
            }
            "admin_action" => {
                arity(3)?;
                CallbackData::AdminAction {
                    action: AdminAction::parse(parts[1]).ok_or_else(malformed)?,
                    customer: cid(2)?,
                }
            }
            "admin_visit_info" => {
                arity(3)?;
                CallbackData::AdminVisitInfo {
                    customer: cid(1)?,
                    index: index(2)?,
                }
            }
            "admin_delete_visit" => {
                arity(3)?;
                CallbackData::AdminDeleteVisit {
                    customer: cid(1)?,
                    index: index(2)?,
                }
            }
            "admin_delete_all" => {
                arity(2)?;
                CallbackData::AdminDeleteAll(cid(1)?)
            }
            "admin_user_info" => {
                arity(3)?;
                CallbackData::AdminUserInfo {
                    customer: cid(1)?,
                    user: num(2)?,
                }
            }
            "admin_unlink_specific" => {
                arity(3)?;
                CallbackData::AdminUnlinkSpecific {
                    customer: cid(1)?,
                    user: num(2)?,
                }
            }
            "admin_link_user" => {
                arity(2)?;
                CallbackData::AdminLinkUser(cid(1)?)
            }
            "admin_add_amount" => {
                arity(3)?;
                CallbackData::AdminAddAmount {
                    customer: cid(1)?,
                    amount: num(2)?,
                }
            }
            "admin_set_exact" => {
                arity(2)?;
                CallbackData::AdminSetExact(cid(1)?)
            }
            "admin_reset_sum" => {
                arity(2)?;
                CallbackData::AdminResetSum(cid(1)?)
            }
            "admin_date" => match parts.get(1).copied() {
                Some("back") => {
                    arity(3)?;
                    CallbackData::AdminDateBack(cid(2)?)
                }
                _ => {
                    arity(2)?;
                    CallbackData::AdminDate(field(1)?.parse().map_err(|_| malformed())?)
                }
            },
            "admin_kind" => {
                arity(2)?;
                match parts[1] {
                    "back" => CallbackData::AdminKindBack,
                    k => CallbackData::AdminKind(k.parse().map_err(|_| malformed())?),
                }
            }
            "admin_duration" => {
                arity(2)?;
                match parts[1] {
                    "back" => CallbackData::AdminDurationBack,
                    s => CallbackData::AdminDuration(s.parse().map_err(|_| malformed())?),
                }
            }
            "admin_tariff" => {
                arity(2)?;
                match parts[1] {
                    "back" => CallbackData::AdminTariffBack,
                    t => CallbackData::AdminTariff(t.parse().map_err(|_| malformed())?),
                }
            }
            "admin_confirm" => {
                arity(2)?;
                match parts[1] {
                    "yes" => CallbackData::AdminConfirm,
                    "back" => CallbackData::AdminConfirmBack,
                    _ => return Err(malformed()),
                }
            }
            _ => return Err(CallbackParseError::Unknown(data.to_string())),
        };
        Ok(parsed)
    }
}

impl fmt::Display for CallbackData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CallbackData::*;
        match self {
            Menu(a) => write!(f, "menu:{}", a.as_str()),
            Date { session, date } => write!(f, "date:{session}:{date}"),
            Time {
                session,
                date,
                kind,
                shift,
            } => write!(f, "time:{session}:{date}:{kind}:{shift}"),
            AdminPanel => f.write_str("admin_panel"),
            AdminPanelLink(uid) => write!(f, "admin_panel_link:{uid}"),
            AdminQuickLink { customer, user } => write!(f, "admin_quick_link:{customer}:{user}"),
            AdminCustomer(cid) => write!(f, "admin_customer:{cid}"),
            AdminCreateCustomer => f.write_str("admin_create_customer"),
            AdminFindCustomer => f.write_str("admin_find_customer"),
            AdminCancel => f.write_str("admin_cancel"),
            AdminAction { action, customer } => {
                write!(f, "admin_action:{}:{customer}", action.as_str())
            }
            AdminVisitInfo { customer, index } => write!(f, "admin_visit_info:{customer}:{index}"),
            AdminDeleteVisit { customer, index } => {
                write!(f, "admin_delete_visit:{customer}:{index}")
            }
            AdminDeleteAll(cid) => write!(f, "admin_delete_all:{cid}"),
            AdminUserInfo { customer, user } => write!(f, "admin_user_info:{customer}:{user}"),
            AdminUnlinkSpecific { customer, user } => {
                write!(f, "admin_unlink_specific:{customer}:{user}")
            }
            AdminLinkUser(cid) => write!(f, "admin_link_user:{cid}"),
            AdminAddAmount { customer, amount } => {
                write!(f, "admin_add_amount:{customer}:{amount}")
            }
            AdminSetExact(cid) => write!(f, "admin_set_exact:{cid}"),
            AdminResetSum(cid) => write!(f, "admin_reset_sum:{cid}"),
            AdminDate(date) => write!(f, "admin_date:{date}"),
            AdminDateBack(cid) => write!(f, "admin_date:back:{cid}"),
            AdminKind(kind) => write!(f, "admin_kind:{kind}"),
            AdminKindBack => f.write_str("admin_kind:back"),
            AdminDuration(shift) => write!(f, "admin_duration:{shift}"),
            AdminDurationBack => f.write_str("admin_duration:back"),
            AdminTariff(t) => write!(f, "admin_tariff:{t}"),
            AdminTariffBack => f.write_str("admin_tariff:back"),
            AdminConfirm => f.write_str("admin_confirm:yes"),
            AdminConfirmBack => f.write_str("admin_confirm:back"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(s: &str) -> Result<CallbackData, CallbackParseError> {
        s.parse()
    }

    #[test]
    fn test_parse_calc_steps() {
        assert_eq!(parse("menu:calc").unwrap(), CallbackData::Menu(MenuAction::Calc));
        assert_eq!(
            parse("date:1715000000000:2024-05-14").unwrap(),
            CallbackData::Date {
                session: "1715000000000".to_string(),
                date: VisitDate::Day(NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()),
            }
        );
        assert_eq!(
            parse("time:1:free:free:night_8").unwrap(),
            CallbackData::Time {
                session: "1".to_string(),
                date: VisitDate::Free,
                kind: VisitKind::Free,
                shift: Shift::Night8,
            }
        );
    }

    /// **Test: known prefixes with broken fields are Malformed, unknown prefixes are Unknown.**
    #[test]
    fn test_malformed_and_unknown() {
        for bad in [
            "date:123",
            "date:1:2024-13-40",
            "time:1:2024-05-14:exact",
            "time:1:2024-05-14:rush:4",
            "menu:nope",
            "admin_delete_visit:1:x",
            "admin_panel_link:abc",
            "admin_confirm:maybe",
        ] {
            assert!(
                matches!(parse(bad), Err(CallbackParseError::Malformed { .. })),
                "{bad}"
            );
        }
        assert!(matches!(parse("whatever"), Err(CallbackParseError::Unknown(_))));
    }

    /// **Test: admin payloads survive Display then parse.**
    #[test]
    fn test_admin_payloads_display_parse() {
        let cid = CustomerId::from("7");
        let samples = [
            CallbackData::AdminPanel,
            CallbackData::AdminPanelLink(123456789),
            CallbackData::AdminQuickLink {
                customer: cid.clone(),
                user: 5,
            },
            CallbackData::AdminAction {
                action: AdminAction::ClearVisits,
                customer: cid.clone(),
            },
            CallbackData::AdminDeleteVisit {
                customer: cid.clone(),
                index: 3,
            },
            CallbackData::AdminAddAmount {
                customer: cid.clone(),
                amount: 25000,
            },
            CallbackData::AdminDateBack(cid.clone()),
            CallbackData::AdminDate(VisitDate::Day(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())),
            CallbackData::AdminKind(VisitKind::UrgentTomorrow),
            CallbackData::AdminDuration(Shift::Day4),
            CallbackData::AdminTariff(TariffType::Discount),
            CallbackData::AdminConfirm,
        ];
        for data in samples {
            let wire = data.to_string();
            assert!(wire.len() <= 64, "{wire}");
            assert_eq!(parse(&wire).unwrap(), data);
        }
        assert_eq!(
            CallbackData::AdminAction {
                action: AdminAction::AddVisit,
                customer: cid
            }
            .to_string(),
            "admin_action:add_visit:7"
        );
    }

    #[test]
    fn test_is_admin() {
        assert!(!parse("menu:start").unwrap().is_admin());
        assert!(parse("admin_cancel").unwrap().is_admin());
    }
}
