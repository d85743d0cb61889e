use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::SubsecRound;
use tokio::sync::RwLock;

use super::{EventRepository, RepositoryError, RepositoryResult};
use crate::models::{Event, EventInput};

#[derive(Default)]
struct State {
    last_id: i64,
    events: BTreeMap<i64, Event>,
}

/// `EventRepository` kept entirely in process memory.
///
/// Ids start at 1 and are never reused, mirroring a `BIGSERIAL` column.
/// Timestamps are truncated to microseconds, the precision `TIMESTAMPTZ` keeps.
#[derive(Default)]
pub struct InMemoryEventRepository {
    state: RwLock<State>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn stored(input: EventInput, id: i64) -> Event {
    let mut event = input.into_event(id);
    event.start_time = event.start_time.trunc_subsecs(6);
    event.end_time = event.end_time.trunc_subsecs(6);
    event
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, input: EventInput) -> RepositoryResult<Event> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let event = stored(input, state.last_id);
        state.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Event> {
        let state = self.state.read().await;
        state
            .events
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn all(&self) -> RepositoryResult<Vec<Event>> {
        let state = self.state.read().await;
        Ok(state.events.values().cloned().collect())
    }

    async fn update(&self, id: i64, input: EventInput) -> RepositoryResult<Event> {
        let mut state = self.state.write().await;
        let slot = state
            .events
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        *slot = stored(input, id);
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        match state.events.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::DeleteFailed(id)),
        }
    }

    async fn initialize(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Utc};
    use std::collections::BTreeSet;

    fn input(title: &str) -> EventInput {
        EventInput {
            title: title.to_string(),
            description: "Open air show".to_string(),
            location: "Parque Ibirapuera".to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 3, 9, 18, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 3, 9, 23, 0, 0).unwrap(),
            instagram_page: "ibirapuera".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(input("Launch")).await.unwrap();
        assert!(created.id > 0);

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, input("Launch").into_event(created.id));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found_everywhere() {
        let repo = InMemoryEventRepository::new();

        assert!(matches!(
            repo.get_by_id(42).await,
            Err(RepositoryError::NotFound(42))
        ));
        assert!(matches!(
            repo.update(42, input("Ghost")).await,
            Err(RepositoryError::NotFound(42))
        ));
        assert!(matches!(
            repo.delete(42).await,
            Err(RepositoryError::DeleteFailed(42))
        ));
    }

    #[tokio::test]
    async fn test_deleted_id_stays_gone() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(input("Short lived")).await.unwrap();

        repo.delete(created.id).await.unwrap();

        assert!(repo.delete(created.id).await.is_err());
        assert!(repo.update(created.id, input("Again")).await.is_err());
        assert!(repo.get_by_id(created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_id() {
        let repo = InMemoryEventRepository::new();
        let created = repo.create(input("Draft")).await.unwrap();

        let mut changed = input("Final");
        changed.location = "Centro".to_string();
        let updated = repo.update(created.id, changed.clone()).await.unwrap();

        assert_eq!(updated, changed.into_event(created.id));
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_all_lists_exactly_created_events() {
        let repo = InMemoryEventRepository::new();
        assert!(repo.all().await.unwrap().is_empty());

        let mut expected = BTreeSet::new();
        for title in ["a", "b", "c"] {
            expected.insert(repo.create(input(title)).await.unwrap().id);
        }

        let listed: BTreeSet<i64> = repo.all().await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn test_timestamps_keep_microsecond_precision() {
        let repo = InMemoryEventRepository::new();
        let mut precise = input("Precise");
        precise.start_time = Utc
            .with_ymd_and_hms(2024, 3, 9, 18, 0, 0)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();

        let created = repo.create(precise.clone()).await.unwrap();
        assert_eq!(created.start_time.nanosecond(), 123_456_000);

        let updated = repo.update(created.id, precise).await.unwrap();
        assert_eq!(updated.start_time.nanosecond(), 123_456_000);
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let repo = InMemoryEventRepository::new();
        let first = repo.create(input("first")).await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.create(input("second")).await.unwrap();
        assert!(second.id > first.id);
    }
}
