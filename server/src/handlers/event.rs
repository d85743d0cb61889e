//! Handlers for the `/event` routes.
//!
//! Method gating happens in the router, so a handler only runs for its own
//! verb. Update and delete look the event up before writing; the lookup and
//! the write are separate round-trips, so a row removed in between surfaces
//! as a 500 from the write step rather than a 404.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use tracing::{info, instrument};

use crate::models::EventInput;
use crate::repository::{EventRepository, RepositoryError, SharedRepository};
use crate::utils::error::AppError;
use crate::utils::extract::{EventId, JsonBody};
use crate::utils::response::{empty_success, json};

#[instrument(skip_all)]
pub async fn list_events(State(repo): State<SharedRepository>) -> Result<Response, AppError> {
    info!("Listing events");
    let events = repo.all().await?;

    let response = json(StatusCode::OK, &events)?;
    info!(count = events.len(), "Events retrieved successfully");
    Ok(response)
}

#[instrument(skip_all)]
pub async fn create_event(
    State(repo): State<SharedRepository>,
    JsonBody(input): JsonBody<EventInput>,
) -> Result<Response, AppError> {
    input.validate()?;

    info!(title = %input.title, "Creating event");
    let created = repo.create(input).await?;

    let response = json(StatusCode::OK, &created)?;
    info!(id = created.id, "Event created successfully");
    Ok(response)
}

#[instrument(skip_all, fields(id = id))]
pub async fn get_event(
    State(repo): State<SharedRepository>,
    EventId(id): EventId,
) -> Result<Response, AppError> {
    info!("Getting event");
    let event = repo.get_by_id(id).await?;

    let response = json(StatusCode::OK, &event)?;
    info!("Event retrieved successfully");
    Ok(response)
}

#[instrument(skip_all, fields(id = id))]
pub async fn update_event(
    State(repo): State<SharedRepository>,
    EventId(id): EventId,
    JsonBody(input): JsonBody<EventInput>,
) -> Result<Response, AppError> {
    ensure_exists(repo.as_ref(), id).await?;

    info!("Updating event");
    let updated = repo
        .update(id, input)
        .await
        .map_err(AppError::write_failed("Update"))?;

    let response = json(StatusCode::OK, &updated)?;
    info!("Event updated successfully");
    Ok(response)
}

#[instrument(skip_all, fields(id = id))]
pub async fn delete_event(
    State(repo): State<SharedRepository>,
    EventId(id): EventId,
) -> Result<Response, AppError> {
    ensure_exists(repo.as_ref(), id).await?;

    info!("Deleting event");
    repo.delete(id)
        .await
        .map_err(AppError::write_failed("Delete"))?;

    info!("Event deleted successfully");
    Ok(empty_success())
}

/// Existence pre-check for update and delete. Missing rows become a 404
/// here so the write step only fails on races or store errors.
async fn ensure_exists(repo: &dyn EventRepository, id: i64) -> Result<(), AppError> {
    match repo.get_by_id(id).await {
        Ok(_) => Ok(()),
        Err(RepositoryError::NotFound(_)) => Err(AppError::NotFound(format!(
            "Event with id '{}' doesn't exist",
            id
        ))),
        Err(err) => Err(err.into()),
    }
}
