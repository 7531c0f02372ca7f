//! Customer repository backed by a single JSON file.
//!
//! The whole document is held in memory behind a mutex. Every mutation is applied to a copy,
//! written out (temp file + rename), and only then swapped in. Locks are never held across
//! `.await`; all methods are synchronous.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{error, info, warn};

use crate::error::StorageError;
use crate::models::{Customer, CustomerId, StoreDocument, Visit};

/// Result of [`CustomerStore::link_user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    AlreadyLinked,
}

pub struct CustomerStore {
    path: PathBuf,
    doc: Mutex<StoreDocument>,
}

impl CustomerStore {
    /// Loads the document at `path`. A missing file gives an empty store; an unreadable or corrupt
    /// file is logged and also gives an empty store. With `prune_unlinked`, numeric-id customers
    /// without users are dropped (and the file rewritten if any were).
    pub fn open(path: impl AsRef<Path>, prune_unlinked: bool) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut doc = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<StoreDocument>(&raw) {
                Ok(doc) => doc,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to parse data file, starting empty");
                    StoreDocument::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "Data file not found, starting empty");
                StoreDocument::default()
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read data file, starting empty");
                StoreDocument::default()
            }
        };

        let pruned = if prune_unlinked {
            doc.prune_unlinked()
        } else {
            Vec::new()
        };

        let store = Self {
            path,
            doc: Mutex::new(doc),
        };

        if !pruned.is_empty() {
            for id in &pruned {
                info!(customer_id = %id, "Pruned customer without linked users");
            }
            let guard = store.lock();
            if let Err(e) = store.persist(&guard) {
                warn!(error = %e, "Failed to save data file after pruning");
            }
        }

        info!(
            path = %store.path.display(),
            customers = store.lock().customers.len(),
            "Customer store loaded"
        );
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, StoreDocument> {
        self.doc.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, doc: &StoreDocument) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(doc)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let written = fs::write(&tmp, json).and_then(|_| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            error!(path = %self.path.display(), error = %e, "Failed to write data file");
            return Err(e.into());
        }
        Ok(())
    }

    /// Saves `draft` and only then makes it the live document. On a failed write the live
    /// document is left as it was.
    fn commit(
        &self,
        doc: &mut MutexGuard<'_, StoreDocument>,
        draft: StoreDocument,
    ) -> Result<(), StorageError> {
        self.persist(&draft)?;
        **doc = draft;
        Ok(())
    }

    /// Applies `f` to a copy of one customer, recomputes its discount and commits.
    fn mutate<T>(
        &self,
        id: &CustomerId,
        f: impl FnOnce(&mut Customer) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut doc = self.lock();
        let mut draft = doc.clone();
        let customer = draft
            .customers
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(format!("customer {id}")))?;
        let out = f(customer)?;
        customer.recalc_discount();
        self.commit(&mut doc, draft)?;
        Ok(out)
    }

    /// Snapshot of the whole document.
    pub fn snapshot(&self) -> StoreDocument {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().customers.is_empty()
    }

    pub fn get(&self, id: &CustomerId) -> Option<Customer> {
        self.lock().customers.get(id).cloned()
    }

    /// All customers in id order.
    pub fn list(&self) -> Vec<(CustomerId, Customer)> {
        self.lock()
            .customers
            .iter()
            .map(|(id, c)| (id.clone(), c.clone()))
            .collect()
    }

    pub fn find_by_user(&self, uid: i64) -> Option<(CustomerId, Customer)> {
        self.lock()
            .find_by_user(uid)
            .map(|(id, c)| (id.clone(), c.clone()))
    }

    pub fn create_customer(&self, name: &str) -> Result<CustomerId, StorageError> {
        let mut doc = self.lock();
        let mut draft = doc.clone();
        let id = draft.next_id();
        draft.customers.insert(id.clone(), Customer::new(name));
        self.commit(&mut doc, draft)?;
        info!(customer_id = %id, name, "Customer created");
        Ok(id)
    }

    /// Removes a customer; `Ok(None)` if there was none with this id.
    pub fn remove_customer(&self, id: &CustomerId) -> Result<Option<Customer>, StorageError> {
        let mut doc = self.lock();
        let mut draft = doc.clone();
        let Some(removed) = draft.customers.remove(id) else {
            return Ok(None);
        };
        self.commit(&mut doc, draft)?;
        info!(customer_id = %id, "Customer removed");
        Ok(Some(removed))
    }

    /// Links `uid` to `id`, first unlinking it from every other customer.
    pub fn link_user(&self, id: &CustomerId, uid: i64) -> Result<LinkOutcome, StorageError> {
        let mut doc = self.lock();
        let target = doc
            .customers
            .get(id)
            .ok_or_else(|| StorageError::NotFound(format!("customer {id}")))?;
        if target.has_user(uid) {
            return Ok(LinkOutcome::AlreadyLinked);
        }
        let mut draft = doc.clone();
        let mut moved_from = Vec::new();
        for (other_id, other) in draft.customers.iter_mut() {
            if other.remove_user(uid) {
                moved_from.push(other_id.clone());
            }
        }
        if let Some(target) = draft.customers.get_mut(id) {
            target.ids.push(uid.to_string());
        }
        self.commit(&mut doc, draft)?;
        for other_id in &moved_from {
            info!(user_id = uid, customer_id = %other_id, "User unlinked from previous customer");
        }
        info!(user_id = uid, customer_id = %id, "User linked");
        Ok(LinkOutcome::Linked)
    }

    /// Returns whether the user was linked to this customer.
    pub fn unlink_user(&self, id: &CustomerId, uid: i64) -> Result<bool, StorageError> {
        let mut doc = self.lock();
        let mut draft = doc.clone();
        let customer = draft
            .customers
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(format!("customer {id}")))?;
        if !customer.remove_user(uid) {
            return Ok(false);
        }
        self.commit(&mut doc, draft)?;
        info!(user_id = uid, customer_id = %id, "User unlinked");
        Ok(true)
    }

    /// Adds to the projects sum; returns the new sum. A sum outside `i64` is rejected.
    pub fn add_projects_sum(&self, id: &CustomerId, amount: i64) -> Result<i64, StorageError> {
        self.mutate(id, |c| {
            let current = c.projects_sum;
            c.projects_sum = current
                .checked_add(amount)
                .ok_or_else(|| StorageError::Overflow(format!("{current} + {amount}")))?;
            Ok(c.projects_sum)
        })
    }

    pub fn set_projects_sum(&self, id: &CustomerId, amount: i64) -> Result<(), StorageError> {
        self.mutate(id, |c| {
            c.projects_sum = amount;
            Ok(())
        })
    }

    pub fn add_visit(&self, id: &CustomerId, visit: Visit) -> Result<(), StorageError> {
        self.mutate(id, |c| {
            c.visits.push(visit);
            Ok(())
        })
    }

    /// Removes the visit at `index`; `Ok(None)` when out of range (nothing is saved then).
    pub fn remove_visit(&self, id: &CustomerId, index: usize) -> Result<Option<Visit>, StorageError> {
        let mut doc = self.lock();
        let mut draft = doc.clone();
        let customer = draft
            .customers
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(format!("customer {id}")))?;
        if index >= customer.visits.len() {
            return Ok(None);
        }
        let removed = customer.visits.remove(index);
        customer.recalc_discount();
        self.commit(&mut doc, draft)?;
        Ok(Some(removed))
    }

    /// Deletes all visits; returns how many there were.
    pub fn clear_visits(&self, id: &CustomerId) -> Result<usize, StorageError> {
        self.mutate(id, |c| {
            let n = c.visits.len();
            c.visits.clear();
            Ok(n)
        })
    }
}
