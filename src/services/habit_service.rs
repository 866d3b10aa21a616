//! Habit CRUD and filters.

use sqlx::PgPool;

use crate::database::models::habit::{
    CreateHabitRequest, Habit, HabitDay, HabitResponse, HabitStatus, UpdateHabitRequest,
};
use crate::database::models::user::MessageResponse;
use crate::error::ApiError;
use crate::services::link_service::{ItemKind, LinkService};

pub struct HabitService {
    pool: PgPool,
    links: LinkService,
}

impl HabitService {
    pub fn new(pool: PgPool, links: LinkService) -> Self {
        Self { pool, links }
    }

    async fn response(&self, habit: &Habit) -> Result<HabitResponse, ApiError> {
        let users = self.links.user_ids(ItemKind::Habit, habit.id).await?;
        Ok(HabitResponse::from_habit(habit, users))
    }

    async fn responses(&self, habits: Vec<Habit>) -> Result<Vec<HabitResponse>, ApiError> {
        let mut out = Vec::with_capacity(habits.len());
        for habit in &habits {
            out.push(self.response(habit).await?);
        }
        Ok(out)
    }

    pub async fn create(&self, owner: i64, req: CreateHabitRequest) -> Result<HabitResponse, ApiError> {
        let status = match req.status.as_deref() {
            Some(raw) => HabitStatus::parse(raw)?,
            None => HabitStatus::Planned,
        };
        let days = HabitDay::parse_days(&req.habit_days)?;

        let mut tx = self.pool.begin().await?;
        let habit: Habit = sqlx::query_as(
            r#"
            INSERT INTO habits (title, color, status, habit_days)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.color)
        .bind(status)
        .bind(&days)
        .fetch_one(&mut *tx)
        .await?;
        self.links.attach(&mut tx, ItemKind::Habit, owner, habit.id).await?;
        tx.commit().await?;

        Ok(HabitResponse::from_habit(&habit, vec![owner]))
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<HabitResponse>, ApiError> {
        let habits: Vec<Habit> = sqlx::query_as(
            r#"
            SELECT h.* FROM habits h
            JOIN user_habits uh ON uh.habit_id = h.id
            WHERE uh.user_id = $1
            ORDER BY h.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        self.responses(habits).await
    }

    pub async fn by_status(&self, raw: &str) -> Result<Vec<HabitResponse>, ApiError> {
        let status = HabitStatus::parse(raw)?;
        let habits: Vec<Habit> =
            sqlx::query_as("SELECT * FROM habits WHERE status = $1 ORDER BY id")
                .bind(status)
                .fetch_all(&self.pool)
                .await?;
        self.responses(habits).await
    }

    /// Habits whose day set contains the given weekday.
    pub async fn by_day(&self, raw: &str) -> Result<Vec<HabitResponse>, ApiError> {
        let day = HabitDay::parse(raw)?;
        let habits: Vec<Habit> =
            sqlx::query_as("SELECT * FROM habits WHERE $1 = ANY(habit_days) ORDER BY id")
                .bind(day)
                .fetch_all(&self.pool)
                .await?;
        self.responses(habits).await
    }

    pub async fn get(&self, id: i64) -> Result<HabitResponse, ApiError> {
        let habit = self.fetch(id).await?;
        self.response(&habit).await
    }

    pub async fn update(&self, id: i64, req: UpdateHabitRequest) -> Result<HabitResponse, ApiError> {
        let status = req.status.as_deref().map(HabitStatus::parse).transpose()?;
        let days = match &req.habit_days {
            Some(raw) => Some(HabitDay::parse_days(raw)?),
            None => None,
        };

        self.fetch(id).await?;

        let habit: Habit = sqlx::query_as(
            r#"
            UPDATE habits SET
                title = COALESCE($2, title),
                color = COALESCE($3, color),
                status = COALESCE($4, status),
                habit_days = COALESCE($5, habit_days)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.color)
        .bind(status)
        .bind(&days)
        .fetch_one(&self.pool)
        .await?;

        self.response(&habit).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.fetch(id).await?;

        let mut tx = self.pool.begin().await?;
        self.links
            .cascade_on_item_delete(&mut tx, ItemKind::Habit, id)
            .await?;
        sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(MessageResponse::new("Habit deleted"))
    }

    async fn fetch(&self, id: i64) -> Result<Habit, ApiError> {
        let habit: Option<Habit> = sqlx::query_as("SELECT * FROM habits WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        habit.ok_or_else(|| ApiError::not_found("Habit not found"))
    }
}
