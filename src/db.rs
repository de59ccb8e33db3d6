use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    models::User,
    store::{StoreError, UserStore},
};

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    PgPool::connect(database_url)
        .await
        .context("Failed to connect to DB")
}

pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query("SELECT id, first_name, last_name FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError> {
        let row = sqlx::query("SELECT id, first_name, last_name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(user_from_row)
            .ok_or(StoreError::NotFound(id))
    }

    async fn add_user(&self, user: User) -> Result<User, StoreError> {
        if user.id != 0 {
            return Err(StoreError::IdAssigned);
        }

        let row = sqlx::query(
            "INSERT INTO users (first_name, last_name) VALUES ($1, $2) \
             RETURNING id, first_name, last_name",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row))
    }

    async fn update_user(&self, user: User) -> Result<User, StoreError> {
        let row = sqlx::query(
            "UPDATE users SET first_name = $2, last_name = $3 WHERE id = $1 \
             RETURNING id, first_name, last_name",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(user_from_row)
            .ok_or(StoreError::NotFound(user.id))
    }

    async fn remove_user_by_id(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
