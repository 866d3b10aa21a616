//! Task CRUD, filters, and user assignment.

use sqlx::PgPool;

use crate::database::models::task::{
    CreateTaskRequest, Task, TaskCategory, TaskResponse, TaskStatus, UpdateTaskRequest,
};
use crate::database::models::user::MessageResponse;
use crate::database::models::{parse_date, parse_optional_datetime};
use crate::error::ApiError;
use crate::services::link_service::{ItemKind, LinkService};

pub struct TaskService {
    pool: PgPool,
    links: LinkService,
}

impl TaskService {
    pub fn new(pool: PgPool, links: LinkService) -> Self {
        Self { pool, links }
    }

    async fn response(&self, task: &Task) -> Result<TaskResponse, ApiError> {
        let users = self.links.user_ids(ItemKind::Task, task.id).await?;
        Ok(TaskResponse::from_task(task, users))
    }

    async fn responses(&self, tasks: Vec<Task>) -> Result<Vec<TaskResponse>, ApiError> {
        let mut out = Vec::with_capacity(tasks.len());
        for task in &tasks {
            out.push(self.response(task).await?);
        }
        Ok(out)
    }

    /// Insert a task and link it to its creator in one transaction.
    pub async fn create(&self, owner: i64, req: CreateTaskRequest) -> Result<TaskResponse, ApiError> {
        let status = match req.status.as_deref() {
            Some(raw) => TaskStatus::parse(raw)?,
            None => TaskStatus::Pending,
        };
        let category = req.category.as_deref().map(TaskCategory::parse).transpose()?;
        let date_assigned = parse_optional_datetime("dateAssigned", &req.date_assigned)?;
        let date_due = parse_optional_datetime("dateDue", &req.date_due)?;

        let mut tx = self.pool.begin().await?;
        let task: Task = sqlx::query_as(
            r#"
            INSERT INTO tasks (title, description, date_assigned, date_due, status, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(date_assigned)
        .bind(date_due)
        .bind(status)
        .bind(category)
        .fetch_one(&mut *tx)
        .await?;
        self.links.attach(&mut tx, ItemKind::Task, owner, task.id).await?;
        tx.commit().await?;

        Ok(TaskResponse::from_task(&task, vec![owner]))
    }

    /// Tasks linked to the given user, in insertion order.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<TaskResponse>, ApiError> {
        let tasks: Vec<Task> = sqlx::query_as(
            r#"
            SELECT t.* FROM tasks t
            JOIN user_tasks ut ON ut.task_id = t.id
            WHERE ut.user_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        self.responses(tasks).await
    }

    pub async fn by_status(&self, raw: &str) -> Result<Vec<TaskResponse>, ApiError> {
        let status = TaskStatus::parse(raw)?;
        let tasks: Vec<Task> =
            sqlx::query_as("SELECT * FROM tasks WHERE status = $1 ORDER BY id")
                .bind(status)
                .fetch_all(&self.pool)
                .await?;
        self.responses(tasks).await
    }

    pub async fn by_category(&self, raw: &str) -> Result<Vec<TaskResponse>, ApiError> {
        let category = TaskCategory::parse(raw)?;
        let tasks: Vec<Task> =
            sqlx::query_as("SELECT * FROM tasks WHERE category = $1 ORDER BY id")
                .bind(category)
                .fetch_all(&self.pool)
                .await?;
        self.responses(tasks).await
    }

    pub async fn by_date_assigned(&self, raw: &str) -> Result<Vec<TaskResponse>, ApiError> {
        let day = parse_date("dateAssigned", raw)?;
        let tasks: Vec<Task> = sqlx::query_as(
            "SELECT * FROM tasks WHERE date_assigned IS NOT NULL AND (date_assigned AT TIME ZONE 'UTC')::date = $1 ORDER BY id",
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;
        self.responses(tasks).await
    }

    pub async fn by_date_due(&self, raw: &str) -> Result<Vec<TaskResponse>, ApiError> {
        let day = parse_date("dateDue", raw)?;
        let tasks: Vec<Task> = sqlx::query_as(
            "SELECT * FROM tasks WHERE date_due IS NOT NULL AND (date_due AT TIME ZONE 'UTC')::date = $1 ORDER BY id",
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;
        self.responses(tasks).await
    }

    pub async fn get(&self, id: i64) -> Result<TaskResponse, ApiError> {
        let task = self.fetch(id).await?;
        self.response(&task).await
    }

    /// Partial update. All enum and date fields are parsed before the
    /// row is touched, so an invalid payload leaves the task unchanged.
    pub async fn update(&self, id: i64, req: UpdateTaskRequest) -> Result<TaskResponse, ApiError> {
        let status = req.status.as_deref().map(TaskStatus::parse).transpose()?;
        let category = req.category.as_deref().map(TaskCategory::parse).transpose()?;
        let date_assigned = parse_optional_datetime("dateAssigned", &req.date_assigned)?;
        let date_due = parse_optional_datetime("dateDue", &req.date_due)?;

        self.fetch(id).await?;

        let task: Task = sqlx::query_as(
            r#"
            UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                date_assigned = COALESCE($4, date_assigned),
                date_due = COALESCE($5, date_due),
                status = COALESCE($6, status),
                category = COALESCE($7, category)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(date_assigned)
        .bind(date_due)
        .bind(status)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;

        self.response(&task).await
    }

    /// Delete a task and all of its membership edges.
    pub async fn delete(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.fetch(id).await?;

        let mut tx = self.pool.begin().await?;
        self.links
            .cascade_on_item_delete(&mut tx, ItemKind::Task, id)
            .await?;
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(MessageResponse::new("Task deleted"))
    }

    /// Link an additional user to a task. Idempotent.
    pub async fn assign_user(&self, task_id: i64, user_id: i64) -> Result<TaskResponse, ApiError> {
        let task = self.fetch(task_id).await?;
        self.ensure_user_exists(user_id).await?;

        let mut conn = self.pool.acquire().await?;
        self.links
            .attach(&mut conn, ItemKind::Task, user_id, task_id)
            .await?;

        self.response(&task).await
    }

    /// Remove a user's membership edge. The task itself is untouched.
    pub async fn unassign_user(&self, task_id: i64, user_id: i64) -> Result<TaskResponse, ApiError> {
        let task = self.fetch(task_id).await?;
        self.ensure_user_exists(user_id).await?;

        let mut conn = self.pool.acquire().await?;
        let removed = self
            .links
            .detach(&mut conn, ItemKind::Task, user_id, task_id)
            .await?;
        if !removed {
            return Err(ApiError::not_found("User is not assigned to this task"));
        }

        self.response(&task).await
    }

    async fn fetch(&self, id: i64) -> Result<Task, ApiError> {
        let task: Option<Task> = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        task.ok_or_else(|| ApiError::not_found("Task not found"))
    }

    async fn ensure_user_exists(&self, user_id: i64) -> Result<(), ApiError> {
        let user: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        user.map(|_| ())
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}
