use std::collections::HashMap;

use async_trait::async_trait;
use grantstore_core::AppResult;
use grantstore_domain::Assignment;

/// Repository port for the RBAC assignment relation.
///
/// Every operation is a single request against the backing store; the port
/// keeps no state of its own. Storage failures surface as
/// [`grantstore_core::AppError::Storage`]; a missing row is a normal
/// outcome, never an error.
#[async_trait]
pub trait AssignmentsStorage: Send + Sync {
    /// Returns all assignments grouped by user, then keyed by item name.
    ///
    /// Users without assignments do not appear; there are no empty inner
    /// maps. Iteration order carries no guarantee.
    async fn get_all(&self) -> AppResult<HashMap<String, HashMap<String, Assignment>>>;

    /// Returns the assignments of one user keyed by item name.
    ///
    /// A user with no assignments yields an empty map.
    async fn get_by_user_id(&self, user_id: &str) -> AppResult<HashMap<String, Assignment>>;

    /// Looks up a single assignment by item name and user.
    async fn get(&self, item_name: &str, user_id: &str) -> AppResult<Option<Assignment>>;

    /// Inserts a new assignment stamped with the current Unix time.
    ///
    /// No existence pre-check and no upsert: a duplicate
    /// `(item_name, user_id)` pair is rejected by the schema's composite
    /// key and surfaces as a storage error.
    async fn add(&self, item_name: &str, user_id: &str) -> AppResult<()>;

    /// Returns whether at least one assignment references the item.
    ///
    /// Implementations fetch at most one row.
    async fn has_item(&self, item_name: &str) -> AppResult<bool>;

    /// Rewrites the item name on every assignment of `old_name`.
    ///
    /// A vacuous rename (`old_name == new_name`) returns before touching
    /// storage. Zero matching rows is success, as is any other count.
    async fn rename_item(&self, old_name: &str, new_name: &str) -> AppResult<()>;

    /// Deletes the assignment matching both keys, if any.
    async fn remove(&self, item_name: &str, user_id: &str) -> AppResult<()>;

    /// Deletes every assignment held by the user.
    async fn remove_by_user_id(&self, user_id: &str) -> AppResult<()>;

    /// Deletes every assignment referencing the item.
    async fn remove_by_item_name(&self, item_name: &str) -> AppResult<()>;

    /// Removes all assignments with truncate semantics.
    ///
    /// Leaves no residual state that would affect later inserts.
    async fn clear(&self) -> AppResult<()>;
}
