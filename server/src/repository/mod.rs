//! Persistence for events.
//!
//! Every operation is a single round-trip to the store. Callers cancel an
//! operation by dropping its future; the Postgres implementation releases the
//! connection back to the pool when that happens.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Event, EventInput};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryEventRepository;
pub use postgres::PgEventRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("event {0} not found")]
    NotFound(i64),

    #[error("event already exists")]
    Conflict,

    #[error("delete of event {0} affected no rows")]
    DeleteFailed(i64),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Store-facing CRUD over events.
///
/// Mutating operations treat a write that touches zero rows as an error,
/// never as a silent success.
#[async_trait]
pub trait EventRepository: Send + Sync + 'static {
    /// Stores a new event and returns it with its assigned id.
    async fn create(&self, input: EventInput) -> RepositoryResult<Event>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Event>;

    /// Every stored event, in the store's scan order.
    async fn all(&self) -> RepositoryResult<Vec<Event>>;

    /// Replaces every field except `id`. Fails with `NotFound` when no row
    /// was written.
    async fn update(&self, id: i64, input: EventInput) -> RepositoryResult<Event>;

    /// Fails with `DeleteFailed` when no row was removed.
    async fn delete(&self, id: i64) -> RepositoryResult<()>;

    /// Idempotent schema setup. Not called while serving requests.
    async fn initialize(&self) -> RepositoryResult<()>;
}

pub type SharedRepository = Arc<dyn EventRepository>;
