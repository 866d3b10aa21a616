//! Goal CRUD and filters.

use sqlx::PgPool;

use crate::database::models::goal::{
    CreateGoalRequest, Goal, GoalPeriod, GoalResponse, GoalStatus, UpdateGoalRequest,
};
use crate::database::models::user::MessageResponse;
use crate::error::ApiError;
use crate::services::link_service::{ItemKind, LinkService};

pub struct GoalService {
    pool: PgPool,
    links: LinkService,
}

impl GoalService {
    pub fn new(pool: PgPool, links: LinkService) -> Self {
        Self { pool, links }
    }

    async fn response(&self, goal: &Goal) -> Result<GoalResponse, ApiError> {
        let users = self.links.user_ids(ItemKind::Goal, goal.id).await?;
        Ok(GoalResponse::from_goal(goal, users))
    }

    async fn responses(&self, goals: Vec<Goal>) -> Result<Vec<GoalResponse>, ApiError> {
        let mut out = Vec::with_capacity(goals.len());
        for goal in &goals {
            out.push(self.response(goal).await?);
        }
        Ok(out)
    }

    pub async fn create(&self, owner: i64, req: CreateGoalRequest) -> Result<GoalResponse, ApiError> {
        let status = match req.status.as_deref() {
            Some(raw) => GoalStatus::parse(raw)?,
            None => GoalStatus::Planned,
        };
        let period = match req.period.as_deref() {
            Some(raw) => GoalPeriod::parse(raw)?,
            None => GoalPeriod::Weekly,
        };

        let mut tx = self.pool.begin().await?;
        let goal: Goal = sqlx::query_as(
            r#"
            INSERT INTO goals (title, description, status, goal_period)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(status)
        .bind(period)
        .fetch_one(&mut *tx)
        .await?;
        self.links.attach(&mut tx, ItemKind::Goal, owner, goal.id).await?;
        tx.commit().await?;

        Ok(GoalResponse::from_goal(&goal, vec![owner]))
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<GoalResponse>, ApiError> {
        let goals: Vec<Goal> = sqlx::query_as(
            r#"
            SELECT g.* FROM goals g
            JOIN user_goals ug ON ug.goal_id = g.id
            WHERE ug.user_id = $1
            ORDER BY g.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        self.responses(goals).await
    }

    pub async fn by_status(&self, raw: &str) -> Result<Vec<GoalResponse>, ApiError> {
        let status = GoalStatus::parse(raw)?;
        let goals: Vec<Goal> =
            sqlx::query_as("SELECT * FROM goals WHERE status = $1 ORDER BY id")
                .bind(status)
                .fetch_all(&self.pool)
                .await?;
        self.responses(goals).await
    }

    pub async fn by_period(&self, raw: &str) -> Result<Vec<GoalResponse>, ApiError> {
        let period = GoalPeriod::parse(raw)?;
        let goals: Vec<Goal> =
            sqlx::query_as("SELECT * FROM goals WHERE goal_period = $1 ORDER BY id")
                .bind(period)
                .fetch_all(&self.pool)
                .await?;
        self.responses(goals).await
    }

    pub async fn get(&self, id: i64) -> Result<GoalResponse, ApiError> {
        let goal = self.fetch(id).await?;
        self.response(&goal).await
    }

    pub async fn update(&self, id: i64, req: UpdateGoalRequest) -> Result<GoalResponse, ApiError> {
        let status = req.status.as_deref().map(GoalStatus::parse).transpose()?;
        let period = req.period.as_deref().map(GoalPeriod::parse).transpose()?;

        self.fetch(id).await?;

        let goal: Goal = sqlx::query_as(
            r#"
            UPDATE goals SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                goal_period = COALESCE($5, goal_period)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(status)
        .bind(period)
        .fetch_one(&self.pool)
        .await?;

        self.response(&goal).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse, ApiError> {
        self.fetch(id).await?;

        let mut tx = self.pool.begin().await?;
        self.links
            .cascade_on_item_delete(&mut tx, ItemKind::Goal, id)
            .await?;
        sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(MessageResponse::new("Goal deleted"))
    }

    async fn fetch(&self, id: i64) -> Result<Goal, ApiError> {
        let goal: Option<Goal> = sqlx::query_as("SELECT * FROM goals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        goal.ok_or_else(|| ApiError::not_found("Goal not found"))
    }
}
