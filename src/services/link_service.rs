//! Membership bookkeeping for the many-to-many item kinds.
//!
//! Both sides of a link always change inside the caller's transaction;
//! nothing here relies on the row graph syncing itself.

use sqlx::{PgConnection, PgPool};

use crate::error::ApiError;

/// Item kinds that share membership semantics with users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Task,
    Goal,
    Habit,
}

impl ItemKind {
    fn join_table(self) -> &'static str {
        match self {
            ItemKind::Task => "user_tasks",
            ItemKind::Goal => "user_goals",
            ItemKind::Habit => "user_habits",
        }
    }

    fn item_column(self) -> &'static str {
        match self {
            ItemKind::Task => "task_id",
            ItemKind::Goal => "goal_id",
            ItemKind::Habit => "habit_id",
        }
    }
}

#[derive(Clone)]
pub struct LinkService {
    pool: PgPool,
}

impl LinkService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Link a user to an item. Idempotent: re-attaching an existing edge
    /// is a no-op, never a duplicate row.
    pub async fn attach(
        &self,
        conn: &mut PgConnection,
        kind: ItemKind,
        user_id: i64,
        item_id: i64,
    ) -> Result<(), ApiError> {
        let sql = format!(
            "INSERT INTO {} (user_id, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            kind.join_table(),
            kind.item_column()
        );
        sqlx::query(&sql)
            .bind(user_id)
            .bind(item_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Remove a single membership edge. The item itself is untouched.
    /// Returns whether an edge existed.
    pub async fn detach(
        &self,
        conn: &mut PgConnection,
        kind: ItemKind,
        user_id: i64,
        item_id: i64,
    ) -> Result<bool, ApiError> {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = $1 AND {} = $2",
            kind.join_table(),
            kind.item_column()
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(item_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Detach a user from every linked task/goal/habit and delete its
    /// notes. Shared items persist with their remaining members. The
    /// caller deletes the user row in the same transaction.
    pub async fn cascade_on_user_delete(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
    ) -> Result<(), ApiError> {
        for kind in [ItemKind::Task, ItemKind::Goal, ItemKind::Habit] {
            let sql = format!("DELETE FROM {} WHERE user_id = $1", kind.join_table());
            sqlx::query(&sql).bind(user_id).execute(&mut *conn).await?;
        }
        sqlx::query("DELETE FROM notes WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Remove every membership edge of an item so no dangling links
    /// remain. The caller deletes the item row in the same transaction.
    pub async fn cascade_on_item_delete(
        &self,
        conn: &mut PgConnection,
        kind: ItemKind,
        item_id: i64,
    ) -> Result<(), ApiError> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = $1",
            kind.join_table(),
            kind.item_column()
        );
        sqlx::query(&sql).bind(item_id).execute(&mut *conn).await?;
        Ok(())
    }

    /// Ids of the users linked to an item, in insertion order.
    pub async fn user_ids(&self, kind: ItemKind, item_id: i64) -> Result<Vec<i64>, ApiError> {
        let sql = format!(
            "SELECT user_id FROM {} WHERE {} = $1 ORDER BY user_id",
            kind.join_table(),
            kind.item_column()
        );
        let ids = sqlx::query_scalar::<_, i64>(&sql)
            .bind(item_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Ids of the items of one kind linked to a user.
    pub async fn item_ids(&self, kind: ItemKind, user_id: i64) -> Result<Vec<i64>, ApiError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = $1 ORDER BY {}",
            kind.item_column(),
            kind.join_table(),
            kind.item_column()
        );
        let ids = sqlx::query_scalar::<_, i64>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}
