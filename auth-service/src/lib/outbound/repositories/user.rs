use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Transaction;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserRecord;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserStore;
use crate::domain::user::ports::UserUpdate;
use crate::user::errors::UserError;

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    admin: bool,
    removed: bool,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username).map_err(|e| {
            UserError::DatabaseError(format!("Stored username for user {} is invalid: {}", row.id, e))
        })?;

        Ok(UserRecord {
            id: UserId(row.id),
            username,
            password_hash: row.password,
            is_admin: row.admin,
            removed: row.removed,
        })
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password, admin, removed
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password, admin, removed
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password, admin)
            VALUES ($1, $2, $3)
            RETURNING id, username, password, admin, removed
            "#,
        )
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    tracing::warn!(username = %user.username, "Username already taken");
                }
            }
            UserError::from(e)
        })?;

        UserRecord::try_from(row)
    }

    async fn soft_delete(&self, id: UserId) -> Result<bool, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET removed = TRUE
            WHERE id = $1 AND admin = FALSE
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn begin_update(&self, id: UserId) -> Result<Box<dyn UserUpdate>, UserError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresUserUpdate { tx, id }))
    }
}

/// Pins one pooled connection until commit or rollback.
struct PostgresUserUpdate {
    tx: Transaction<'static, Postgres>,
    id: UserId,
}

#[async_trait]
impl UserUpdate for PostgresUserUpdate {
    async fn set_username(&mut self, username: &Username) -> Result<(), UserError> {
        sqlx::query("UPDATE users SET username = $1 WHERE id = $2")
            .bind(username.as_str())
            .bind(self.id.0)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn set_password_hash(&mut self, password_hash: &str) -> Result<(), UserError> {
        sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(self.id.0)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn set_admin(&mut self, is_admin: bool) -> Result<bool, UserError> {
        let result = sqlx::query("UPDATE users SET admin = $1 WHERE id = $2")
            .bind(is_admin)
            .bind(self.id.0)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> Result<(), UserError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), UserError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
