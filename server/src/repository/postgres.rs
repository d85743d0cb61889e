use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{EventRepository, RepositoryError, RepositoryResult};
use crate::models::{Event, EventInput};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS events (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        location TEXT,
        start_time TIMESTAMPTZ NOT NULL,
        end_time TIMESTAMPTZ NOT NULL,
        instagram_page TEXT
    )
"#;

/// `EventRepository` backed by a shared Postgres pool.
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
        _ => RepositoryError::Storage(err),
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, input: EventInput) -> RepositoryResult<Event> {
        let event: Event = sqlx::query_as(
            r#"
            INSERT INTO events (title, description, location, instagram_page, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title,
                COALESCE(description, '') AS description,
                COALESCE(location, '') AS location,
                start_time, end_time,
                COALESCE(instagram_page, '') AS instagram_page
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.location)
        .bind(&input.instagram_page)
        .bind(input.start_time)
        .bind(input.end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        debug!(id = event.id, "Inserted event row");
        Ok(event)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Event> {
        sqlx::query_as(
            r#"
            SELECT id, title,
                COALESCE(description, '') AS description,
                COALESCE(location, '') AS location,
                start_time, end_time,
                COALESCE(instagram_page, '') AS instagram_page
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound(id))
    }

    async fn all(&self) -> RepositoryResult<Vec<Event>> {
        let events = sqlx::query_as(
            r#"
            SELECT id, title,
                COALESCE(description, '') AS description,
                COALESCE(location, '') AS location,
                start_time, end_time,
                COALESCE(instagram_page, '') AS instagram_page
            FROM events
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn update(&self, id: i64, input: EventInput) -> RepositoryResult<Event> {
        // RETURNING yields no row when the WHERE clause matched nothing.
        sqlx::query_as(
            r#"
            UPDATE events
            SET title = $1, description = $2, location = $3,
                instagram_page = $4, start_time = $5, end_time = $6
            WHERE id = $7
            RETURNING id, title,
                COALESCE(description, '') AS description,
                COALESCE(location, '') AS location,
                start_time, end_time,
                COALESCE(instagram_page, '') AS instagram_page
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.location)
        .bind(&input.instagram_page)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::DeleteFailed(id));
        }
        Ok(())
    }

    async fn initialize(&self) -> RepositoryResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}
