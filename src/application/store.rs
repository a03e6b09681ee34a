//! In-memory store for job applications.
//!
//! The store lives for the lifetime of the process. It is owned by a
//! [`StoreScope`] created at the root of the program, and every consumer
//! reaches it through a [`StoreHandle`] handed out by that scope.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use thiserror::Error;

use crate::domain::{ApplicationId, JobApplication, NewJobApplication};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("application store accessed outside of its StoreScope")]
    OutsideScope,
}

/// The canonical collection of applications and the only ways to change it.
#[derive(Debug, Default)]
pub struct ApplicationStore {
    applications: Vec<JobApplication>,
}

impl ApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new application and returns the id it was given.
    ///
    /// The id is one more than the largest id in the store, or 1 when the
    /// store is empty. Fields are stored exactly as given.
    pub fn add(&mut self, application: NewJobApplication) -> ApplicationId {
        let id = self.next_id();
        let record = application.with_id(id);
        tracing::info!(id, company = %record.company, stage = %record.stage, "application added");
        self.applications.push(record);
        id
    }

    /// Replaces the application with the same id.
    ///
    /// Returns `false` and leaves the store untouched when no application
    /// has that id.
    pub fn update(&mut self, application: JobApplication) -> bool {
        match self.applications.iter_mut().find(|app| app.id == application.id) {
            Some(existing) => {
                tracing::info!(id = application.id, stage = %application.stage, "application updated");
                *existing = application;
                true
            }
            None => {
                tracing::debug!(id = application.id, "update ignored, no such application");
                false
            }
        }
    }

    /// Removes the application with the given id, if present.
    pub fn delete(&mut self, id: ApplicationId) -> bool {
        let before = self.applications.len();
        self.applications.retain(|app| app.id != id);
        let removed = self.applications.len() != before;
        if removed {
            tracing::info!(id, "application deleted");
        } else {
            tracing::debug!(id, "delete ignored, no such application");
        }
        removed
    }

    /// All applications in insertion order.
    pub fn list(&self) -> &[JobApplication] {
        &self.applications
    }

    pub fn get(&self, id: ApplicationId) -> Option<&JobApplication> {
        self.applications.iter().find(|app| app.id == id)
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    fn next_id(&self) -> ApplicationId {
        self.applications.iter().map(|app| app.id).max().map_or(1, |max| max + 1)
    }
}

/// Root-level owner of the application store.
///
/// Handles created from a scope stop working once the scope is dropped.
#[derive(Debug, Default)]
pub struct StoreScope {
    store: Rc<RefCell<ApplicationStore>>,
}

impl StoreScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            store: Rc::downgrade(&self.store),
        }
    }
}

/// Shared read/write access to the store owned by a [`StoreScope`].
///
/// Every operation panics if the owning scope no longer exists: that can
/// only happen through a programming error, and it must not go unnoticed.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    store: Weak<RefCell<ApplicationStore>>,
}

impl StoreHandle {
    /// Resolves the underlying store, failing if the scope is gone.
    pub fn try_access(&self) -> Result<Rc<RefCell<ApplicationStore>>, StoreError> {
        self.store.upgrade().ok_or(StoreError::OutsideScope)
    }

    pub fn add(&self, application: NewJobApplication) -> ApplicationId {
        self.with_store_mut(|store| store.add(application))
    }

    pub fn update(&self, application: JobApplication) -> bool {
        self.with_store_mut(|store| store.update(application))
    }

    pub fn delete(&self, id: ApplicationId) -> bool {
        self.with_store_mut(|store| store.delete(id))
    }

    /// Snapshot of every application in insertion order.
    pub fn list(&self) -> Vec<JobApplication> {
        self.with_store(|store| store.list().to_vec())
    }

    pub fn get(&self, id: ApplicationId) -> Option<JobApplication> {
        self.with_store(|store| store.get(id).cloned())
    }

    pub fn len(&self) -> usize {
        self.with_store(ApplicationStore::len)
    }

    pub fn is_empty(&self) -> bool {
        self.with_store(ApplicationStore::is_empty)
    }

    fn with_store<R>(&self, f: impl FnOnce(&ApplicationStore) -> R) -> R {
        let store = self.resolve();
        let borrowed = store.borrow();
        f(&borrowed)
    }

    fn with_store_mut<R>(&self, f: impl FnOnce(&mut ApplicationStore) -> R) -> R {
        let store = self.resolve();
        let mut borrowed = store.borrow_mut();
        f(&mut borrowed)
    }

    fn resolve(&self) -> Rc<RefCell<ApplicationStore>> {
        match self.try_access() {
            Ok(store) => store,
            Err(err) => {
                tracing::error!(error = %err, "store handle used without a live scope");
                panic!("{err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stage;

    fn acme() -> NewJobApplication {
        NewJobApplication {
            company: "Acme".to_string(),
            position: "Eng".to_string(),
            stage: Stage::Applied,
            date_applied: "2024-01-10".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_first_ids_are_one_and_two() {
        let mut store = ApplicationStore::new();
        assert_eq!(store.add(acme()), 1);
        assert_eq!(store.add(acme()), 2);
        assert_eq!(store.list()[0].id, 1);
        assert_eq!(store.list()[1].id, 2);
        assert_eq!(store.list()[0].company, "Acme");
    }

    #[test]
    fn test_ids_strictly_increase_and_stay_unique() {
        let mut store = ApplicationStore::new();
        let mut last = 0;
        for _ in 0..25 {
            let id = store.add(acme());
            assert!(id > last);
            last = id;
        }
        let mut ids: Vec<u32> = store.list().iter().map(|a| a.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 25);
    }

    #[test]
    fn test_id_follows_max_after_delete() {
        let mut store = ApplicationStore::new();
        store.add(acme());
        store.add(acme());
        store.add(acme());
        assert!(store.delete(2));
        assert_eq!(store.add(acme()), 4);

        assert!(store.delete(4));
        assert!(store.delete(3));
        assert_eq!(store.add(acme()), 2);
    }

    #[test]
    fn test_add_accepts_empty_fields() {
        let mut store = ApplicationStore::new();
        let id = store.add(NewJobApplication::default());
        let stored = store.get(id).unwrap();
        assert_eq!(stored.company, "");
        assert_eq!(stored.position, "");
        assert_eq!(stored.date_applied, "");
    }

    #[test]
    fn test_update_replaces_whole_record() {
        let mut store = ApplicationStore::new();
        let id = store.add(acme());
        let replacement = JobApplication {
            id,
            company: "Globex".to_string(),
            position: "Staff Eng".to_string(),
            stage: Stage::Offer,
            date_applied: "2024-02-01".to_string(),
            notes: "Negotiating".to_string(),
        };
        assert!(store.update(replacement.clone()));
        assert_eq!(store.list(), &[replacement]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = ApplicationStore::new();
        store.add(acme());
        store.add(acme());
        let before = store.list().to_vec();

        let stranger = acme().with_id(99);
        assert!(!store.update(stranger));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut store = ApplicationStore::new();
        store.add(acme());
        let before = store.list().to_vec();

        assert!(!store.delete(42));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_delete_keeps_order_of_others() {
        let mut store = ApplicationStore::new();
        for company in ["A", "B", "C"] {
            store.add(NewJobApplication { company: company.to_string(), ..acme() });
        }
        store.delete(2);
        let companies: Vec<&str> = store.list().iter().map(|a| a.company.as_str()).collect();
        assert_eq!(companies, vec!["A", "C"]);
    }

    #[test]
    fn test_handles_share_one_store() {
        let scope = StoreScope::new();
        let writer = scope.handle();
        let reader = scope.handle();

        writer.add(acme());
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.list()[0].id, 1);

        let mut record = reader.get(1).unwrap();
        record.stage = Stage::Interview;
        assert!(writer.update(record));
        assert_eq!(reader.get(1).unwrap().stage, Stage::Interview);

        assert!(reader.delete(1));
        assert!(writer.is_empty());
    }

    #[test]
    fn test_snapshot_is_detached_from_later_changes() {
        let scope = StoreScope::new();
        let handle = scope.handle();
        handle.add(acme());
        let snapshot = handle.list();
        handle.add(acme());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(handle.list().len(), 2);
    }

    #[test]
    fn test_try_access_after_scope_dropped() {
        let scope = StoreScope::new();
        let handle = scope.handle();
        assert!(handle.try_access().is_ok());
        drop(scope);
        assert_eq!(handle.try_access().err(), Some(StoreError::OutsideScope));
    }

    #[test]
    #[should_panic(expected = "outside of its StoreScope")]
    fn test_operation_outside_scope_panics() {
        let handle = StoreScope::new().handle();
        handle.add(acme());
    }
}
