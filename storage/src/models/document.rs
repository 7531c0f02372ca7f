use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Customer, CustomerId};

/// The persisted file: `{"customers": {...}, "last_reset": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub customers: BTreeMap<CustomerId, Customer>,
    /// Carried through unchanged.
    #[serde(default)]
    pub last_reset: Option<serde_json::Value>,
}

impl StoreDocument {
    /// `max(numeric ids) + 1`, or `1` when there are none.
    pub fn next_id(&self) -> CustomerId {
        let next = self
            .customers
            .keys()
            .filter_map(CustomerId::numeric)
            .max()
            .map_or(1, |max| max + 1);
        CustomerId::new(next.to_string())
    }

    pub fn find_by_user(&self, uid: i64) -> Option<(&CustomerId, &Customer)> {
        self.customers.iter().find(|(_, c)| c.has_user(uid))
    }

    /// Drops customers with a numeric id and no linked users; returns the removed ids.
    pub fn prune_unlinked(&mut self) -> Vec<CustomerId> {
        let doomed: Vec<CustomerId> = self
            .customers
            .iter()
            .filter(|(id, c)| c.ids.is_empty() && id.numeric().is_some())
            .map(|(id, _)| id.clone())
            .collect();
        for id in &doomed {
            self.customers.remove(id);
        }
        doomed
    }
}
