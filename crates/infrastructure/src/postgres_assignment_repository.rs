use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use grantstore_application::AssignmentsStorage;
use grantstore_core::{AppError, AppResult, TableName};
use grantstore_domain::Assignment;


/// PostgreSQL-backed storage for the RBAC assignment relation.
///
/// Holds only a connection pool and the validated assignment table name,
/// both fixed at construction. Every operation issues a single statement;
/// conflicting writes are serialized by the database, and the composite
/// primary key on `(user_id, item_name)` rejects duplicate pairs.
#[derive(Clone)]
pub struct PostgresAssignmentRepository {
    pool: PgPool,
    table: TableName,
}

impl PostgresAssignmentRepository {
    /// Creates a repository over the provided pool and assignment table.
    #[must_use]
    pub fn new(pool: PgPool, table: TableName) -> Self {
        Self { pool, table }
    }

    /// Returns the assignment table this repository reads and writes.
    #[must_use]
    pub fn table(&self) -> &TableName {
        &self.table
    }
}

/// Raw assignment row as stored. The one place storage columns become a
/// domain entity, so format changes stay local.
#[derive(Debug, FromRow)]
struct AssignmentRow {
    item_name: String,
    user_id: String,
    created_at: i64,
}

impl AssignmentRow {
    fn into_assignment(self) -> AppResult<Assignment> {
        Assignment::new(self.user_id, self.item_name, self.created_at)
            .map_err(|error| AppError::Storage(format!("invalid assignment row: {error}")))
    }
}

#[async_trait]
impl AssignmentsStorage for PostgresAssignmentRepository {
    async fn get_all(&self) -> AppResult<HashMap<String, HashMap<String, Assignment>>> {
        let statement = format!(
            "SELECT item_name, user_id, created_at FROM {}",
            self.table
        );
        let rows = sqlx::query_as::<_, AssignmentRow>(statement.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Storage(format!("failed to load assignments: {error}")))?;

        let mut assignments: HashMap<String, HashMap<String, Assignment>> = HashMap::new();
        for row in rows {
            let assignment = row.into_assignment()?;
            assignments
                .entry(assignment.user_id().as_str().to_owned())
                .or_default()
                .insert(assignment.item_name().as_str().to_owned(), assignment);
        }

        Ok(assignments)
    }

    async fn get_by_user_id(&self, user_id: &str) -> AppResult<HashMap<String, Assignment>> {
        let statement = format!(
            "SELECT item_name, user_id, created_at FROM {} WHERE user_id = $1",
            self.table
        );
        let rows = sqlx::query_as::<_, AssignmentRow>(statement.as_str())
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Storage(format!(
                    "failed to load assignments for user '{user_id}': {error}"
                ))
            })?;

        let mut assignments = HashMap::with_capacity(rows.len());
        for row in rows {
            let assignment = row.into_assignment()?;
            assignments.insert(assignment.item_name().as_str().to_owned(), assignment);
        }

        Ok(assignments)
    }

    async fn get(&self, item_name: &str, user_id: &str) -> AppResult<Option<Assignment>> {
        let statement = format!(
            "SELECT item_name, user_id, created_at FROM {} WHERE item_name = $1 AND user_id = $2",
            self.table
        );
        let row = sqlx::query_as::<_, AssignmentRow>(statement.as_str())
            .bind(item_name)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Storage(format!(
                    "failed to load assignment '{item_name}' for user '{user_id}': {error}"
                ))
            })?;

        row.map(AssignmentRow::into_assignment).transpose()
    }

    async fn add(&self, item_name: &str, user_id: &str) -> AppResult<()> {
        let statement = format!(
            "INSERT INTO {} (item_name, user_id, created_at) VALUES ($1, $2, $3)",
            self.table
        );
        sqlx::query(statement.as_str())
            .bind(item_name)
            .bind(user_id)
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Storage(format!(
                    "failed to add assignment '{item_name}' for user '{user_id}': {error}"
                ))
            })?;

        Ok(())
    }

    async fn has_item(&self, item_name: &str) -> AppResult<bool> {
        let statement = format!(
            "SELECT 1 AS present FROM {} WHERE item_name = $1 LIMIT 1",
            self.table
        );
        let row = sqlx::query(statement.as_str())
            .bind(item_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Storage(format!("failed to probe item '{item_name}': {error}"))
            })?;

        Ok(row.is_some())
    }

    async fn rename_item(&self, old_name: &str, new_name: &str) -> AppResult<()> {
        if old_name == new_name {
            return Ok(());
        }

        let statement = format!("UPDATE {} SET item_name = $1 WHERE item_name = $2", self.table);
        let result = sqlx::query(statement.as_str())
            .bind(new_name)
            .bind(old_name)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Storage(format!(
                    "failed to rename item '{old_name}' to '{new_name}': {error}"
                ))
            })?;

        debug!(
            old_name = old_name,
            new_name = new_name,
            rows = result.rows_affected(),
            "renamed assignment item"
        );

        Ok(())
    }

    async fn remove(&self, item_name: &str, user_id: &str) -> AppResult<()> {
        let statement = format!(
            "DELETE FROM {} WHERE item_name = $1 AND user_id = $2",
            self.table
        );
        sqlx::query(statement.as_str())
            .bind(item_name)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Storage(format!(
                    "failed to remove assignment '{item_name}' for user '{user_id}': {error}"
                ))
            })?;

        Ok(())
    }

    async fn remove_by_user_id(&self, user_id: &str) -> AppResult<()> {
        let statement = format!("DELETE FROM {} WHERE user_id = $1", self.table);
        sqlx::query(statement.as_str())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Storage(format!(
                    "failed to remove assignments for user '{user_id}': {error}"
                ))
            })?;

        Ok(())
    }

    async fn remove_by_item_name(&self, item_name: &str) -> AppResult<()> {
        let statement = format!("DELETE FROM {} WHERE item_name = $1", self.table);
        sqlx::query(statement.as_str())
            .bind(item_name)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Storage(format!(
                    "failed to remove assignments for item '{item_name}': {error}"
                ))
            })?;

        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let statement = format!("TRUNCATE TABLE {}", self.table);
        sqlx::query(statement.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Storage(format!("failed to clear assignment table: {error}"))
            })?;

        debug!(table = self.table.as_str(), "cleared assignment table");

        Ok(())
    }
}
