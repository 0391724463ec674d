use grantstore_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// A record that a user holds a permission or role item since some moment.
///
/// The `(item_name, user_id)` pair is unique within storage; `created_at`
/// is stamped by the store at insertion time, never by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    user_id: NonEmptyString,
    item_name: NonEmptyString,
    created_at: i64,
}

impl Assignment {
    /// Creates an assignment with validated identifiers.
    pub fn new(
        user_id: impl Into<String>,
        item_name: impl Into<String>,
        created_at: i64,
    ) -> AppResult<Self> {
        Ok(Self {
            user_id: NonEmptyString::new(user_id)?,
            item_name: NonEmptyString::new(item_name)?,
            created_at,
        })
    }

    /// Returns the identifier of the user holding the item.
    #[must_use]
    pub fn user_id(&self) -> &NonEmptyString {
        &self.user_id
    }

    /// Returns the name of the assigned permission or role item.
    #[must_use]
    pub fn item_name(&self) -> &NonEmptyString {
        &self.item_name
    }

    /// Returns the creation moment as Unix seconds.
    #[must_use]
    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}
