/**
 * PostgreSQL Storage Backend
 *
 * sqlx implementations of `UserStore` and `PostStore`. The schema lives in
 * `migrations/` and is applied by `connect` before the pool is handed out.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, UserCredentials, UserStore, UserUpdate};
use crate::backend::posts::store::PostStore;
use crate::backend::storage::StorageError;
use crate::shared::post::{Post, PostInput};
use crate::shared::user::User;

/// Create a connection pool and run migrations
///
/// # Arguments
/// * `database_url` - PostgreSQL connection URL
/// * `connect_timeout` - Upper bound on acquiring the first connection
///
/// # Returns
/// A migrated pool, or the connection/migration error
pub async fn connect(database_url: &str, connect_timeout: Duration) -> Result<PgPool, StorageError> {
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(connect_timeout)
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}

/// Row shape of the `users` table
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        self.into_credentials().user
    }

    fn into_credentials(self) -> UserCredentials {
        UserCredentials {
            user: User {
                id: self.id,
                username: self.username,
                is_admin: self.is_admin,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            password_hash: self.password_hash,
        }
    }
}

/// Row shape of the `posts` table
#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Translate a unique-constraint violation on insert into `Duplicate`
fn map_unique_violation(err: sqlx::Error, field: &'static str, value: &str) -> StorageError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StorageError::Duplicate {
                field,
                value: value.to_string(),
            };
        }
    }
    StorageError::Database(err)
}

/// `UserStore` over the `users` table
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at, updated_at
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .find_credentials(username)
            .await?
            .map(|credentials| credentials.user))
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_credentials))
    }

    async fn create(&self, user: NewUser) -> Result<User, StorageError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, password_hash, is_admin, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.is_admin())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username", user.username()))?;

        Ok(row.into_user())
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET password_hash = COALESCE($2::TEXT, password_hash),
                is_admin = COALESCE($3::BOOLEAN, is_admin),
                updated_at = $4
            WHERE id = $1
            RETURNING id, username, password_hash, is_admin, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(update.password_hash)
        .bind(update.is_admin)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// `PostStore` over the `posts` table
#[derive(Debug, Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn find_all(&self) -> Result<Vec<Post>, StorageError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StorageError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn create(&self, input: PostInput) -> Result<Post, StorageError> {
        let post = input.into_post(Utc::now());

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, title, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, input: PostInput) -> Result<Option<Post>, StorageError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = $2, content = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(input.title())
        .bind(input.content())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
