use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use grantstore_application::AssignmentsStorage;
use grantstore_core::{AppError, AppResult, NonEmptyString};
use grantstore_domain::Assignment;


/// In-memory assignment storage implementation.
///
/// Mirrors the relational adapter's contract, including rejection of
/// duplicate `(item_name, user_id)` pairs, so tests exercise the same
/// failure surface without a database.
#[derive(Debug, Default)]
pub struct InMemoryAssignmentRepository {
    assignments: RwLock<HashMap<(String, String), Assignment>>,
    writes: AtomicU64,
}

impl InMemoryAssignmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assignments: RwLock::new(HashMap::new()),
            writes: AtomicU64::new(0),
        }
    }

    /// Returns how many mutating operations have reached storage.
    ///
    /// A short-circuited vacuous rename does not count.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl AssignmentsStorage for InMemoryAssignmentRepository {
    async fn get_all(&self) -> AppResult<HashMap<String, HashMap<String, Assignment>>> {
        let assignments = self.assignments.read().await;

        let mut grouped: HashMap<String, HashMap<String, Assignment>> = HashMap::new();
        for ((user_id, item_name), assignment) in assignments.iter() {
            grouped
                .entry(user_id.clone())
                .or_default()
                .insert(item_name.clone(), assignment.clone());
        }

        Ok(grouped)
    }

    async fn get_by_user_id(&self, user_id: &str) -> AppResult<HashMap<String, Assignment>> {
        let assignments = self.assignments.read().await;

        Ok(assignments
            .iter()
            .filter(|((stored_user_id, _), _)| stored_user_id == user_id)
            .map(|((_, item_name), assignment)| (item_name.clone(), assignment.clone()))
            .collect())
    }

    async fn get(&self, item_name: &str, user_id: &str) -> AppResult<Option<Assignment>> {
        let assignments = self.assignments.read().await;

        Ok(assignments
            .get(&(user_id.to_owned(), item_name.to_owned()))
            .cloned())
    }

    async fn add(&self, item_name: &str, user_id: &str) -> AppResult<()> {
        let assignment = Assignment::new(user_id, item_name, Utc::now().timestamp())?;
        let key = (user_id.to_owned(), item_name.to_owned());
        let mut assignments = self.assignments.write().await;

        if assignments.contains_key(&key) {
            return Err(AppError::Storage(format!(
                "assignment '{item_name}' already exists for user '{user_id}'"
            )));
        }

        assignments.insert(key, assignment);
        self.record_write();
        Ok(())
    }

    async fn has_item(&self, item_name: &str) -> AppResult<bool> {
        let assignments = self.assignments.read().await;

        Ok(assignments
            .keys()
            .any(|(_, stored_item_name)| stored_item_name == item_name))
    }

    async fn rename_item(&self, old_name: &str, new_name: &str) -> AppResult<()> {
        if old_name == new_name {
            return Ok(());
        }

        // Validate the target name before mutating anything so a failed
        // rename leaves every row in place.
        NonEmptyString::new(new_name)?;

        let mut assignments = self.assignments.write().await;

        let matching_keys: Vec<(String, String)> = assignments
            .keys()
            .filter(|(_, stored_item_name)| stored_item_name == old_name)
            .cloned()
            .collect();

        // A rename landing on an occupied pair fails the whole operation,
        // matching the relational adapter's composite key.
        for (user_id, _) in &matching_keys {
            if assignments.contains_key(&(user_id.clone(), new_name.to_owned())) {
                return Err(AppError::Storage(format!(
                    "assignment '{new_name}' already exists for user '{user_id}'"
                )));
            }
        }

        for key in matching_keys {
            if let Some(existing) = assignments.remove(&key) {
                let renamed = Assignment::new(key.0.clone(), new_name, existing.created_at())?;
                assignments.insert((key.0, new_name.to_owned()), renamed);
            }
        }

        self.record_write();
        Ok(())
    }

    async fn remove(&self, item_name: &str, user_id: &str) -> AppResult<()> {
        let mut assignments = self.assignments.write().await;
        assignments.remove(&(user_id.to_owned(), item_name.to_owned()));
        self.record_write();
        Ok(())
    }

    async fn remove_by_user_id(&self, user_id: &str) -> AppResult<()> {
        let mut assignments = self.assignments.write().await;
        assignments.retain(|(stored_user_id, _), _| stored_user_id != user_id);
        self.record_write();
        Ok(())
    }

    async fn remove_by_item_name(&self, item_name: &str) -> AppResult<()> {
        let mut assignments = self.assignments.write().await;
        assignments.retain(|(_, stored_item_name), _| stored_item_name != item_name);
        self.record_write();
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut assignments = self.assignments.write().await;
        assignments.clear();
        self.record_write();
        Ok(())
    }
}
