//! A live listing: debounced filter edits, page changes and retries in,
//! [`ListingState`] updates out.
//!
//! Every settled change starts a fresh load and cancels the one in flight,
//! so a stale response never overwrites a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::controller::{ListingController, ListingState};
use super::filters::ListingFilters;
use crate::catalog::CatalogError;
use crate::runtime::cancel::CancellationToken;
use crate::runtime::debounce::Debouncer;

#[derive(Debug)]
enum SessionCommand {
    Page(u32),
    Retry,
}

pub struct ListingSession {
    filters: Debouncer<ListingFilters>,
    commands: mpsc::Sender<SessionCommand>,
    states: watch::Receiver<ListingState>,
    handle: JoinHandle<()>,
}

impl ListingSession {
    /// Starts the session task and the initial load.
    pub fn spawn(controller: ListingController, debounce: Duration) -> Self {
        let (filters, settled) = Debouncer::new(controller.filters().clone(), debounce);
        let (commands, receiver) = mpsc::channel(16);
        let (state_tx, states) = watch::channel(ListingState::Loading);
        let handle = tokio::spawn(run(controller, settled, receiver, Arc::new(state_tx)));
        Self {
            filters,
            commands,
            states,
            handle,
        }
    }

    /// Feeds a raw edit; it takes effect once it settles.
    pub fn edit_filters(&mut self, filters: ListingFilters) {
        self.filters.push(filters);
    }

    pub async fn set_page(&self, page: u32) {
        let _ = self.commands.send(SessionCommand::Page(page)).await;
    }

    pub async fn retry(&self) {
        let _ = self.commands.send(SessionCommand::Retry).await;
    }

    pub fn states(&self) -> watch::Receiver<ListingState> {
        self.states.clone()
    }

    /// Waits for a state matching `predicate`, starting with the current one.
    pub async fn wait_for(&self, predicate: impl FnMut(&ListingState) -> bool) -> ListingState {
        let mut states = self.states.clone();
        let state = match states.wait_for(predicate).await {
            Ok(state) => state.clone(),
            Err(_) => ListingState::Failed(CatalogError::Cancelled),
        };
        state
    }

    pub async fn shutdown(self) {
        drop(self.filters);
        drop(self.commands);
        let _ = self.handle.await;
    }
}

async fn run(
    mut controller: ListingController,
    mut settled: watch::Receiver<ListingFilters>,
    mut commands: mpsc::Receiver<SessionCommand>,
    states: Arc<watch::Sender<ListingState>>,
) {
    let generation = Arc::new(AtomicU64::new(0));
    let mut current = start_load(&controller, &states, &generation);
    loop {
        tokio::select! {
            changed = settled.changed() => {
                if changed.is_err() {
                    break;
                }
                let filters = settled.borrow_and_update().clone();
                if !controller.set_filters(filters) {
                    continue;
                }
            }
            command = commands.recv() => match command {
                Some(SessionCommand::Page(page)) => controller.set_page(page),
                Some(SessionCommand::Retry) => debug!("Retry requested"),
                None => break,
            },
        }
        current.cancel();
        current = start_load(&controller, &states, &generation);
    }
    current.cancel();
    info!("Listing session closed");
}

/// Starts a load tagged with the next generation. Its result is published
/// only while that generation is still the latest.
fn start_load(
    controller: &ListingController,
    states: &Arc<watch::Sender<ListingState>>,
    generation: &Arc<AtomicU64>,
) -> CancellationToken {
    let token = CancellationToken::new();
    let snapshot = controller.clone();
    let states = Arc::clone(states);
    let latest = Arc::clone(generation);
    let cancel = token.clone();
    let mine = generation.fetch_add(1, Ordering::SeqCst) + 1;
    states.send_replace(ListingState::Loading);
    tokio::spawn(async move {
        let state = snapshot.load(&cancel).await;
        let published = states.send_if_modified(|current| {
            if cancel.is_cancelled() || latest.load(Ordering::SeqCst) != mine {
                return false;
            }
            *current = state;
            true
        });
        if !published {
            debug!(generation = mine, "Dropped superseded load");
        }
    });
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::{fixture_character, CatalogCall, MockCatalog, Operation};
    use crate::catalog::{CatalogApi, CharacterQuery, OneOrMany};
    use crate::model::{CharacterPage, CharacterRecord, LocationRecord};
    use crate::resolver::LocationPipeline;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use crate::runtime::debounce::DEFAULT_DEBOUNCE;

    fn session(mock: &MockCatalog) -> ListingSession {
        let controller = ListingController::new(LocationPipeline::new(Arc::new(mock.clone())));
        ListingSession::spawn(controller, DEFAULT_DEBOUNCE)
    }

    fn page_queries(mock: &MockCatalog) -> Vec<(u32, String)> {
        mock.calls()
            .into_iter()
            .filter_map(|c| match c {
                CatalogCall::CharactersPage(q) => Some((q.page, q.name)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_edits_load_once_from_page_one() {
        let mock = MockCatalog::new().with_characters([
            fixture_character(1, "Rick Sanchez", "Human", Some(1)),
            fixture_character(2, "Morty Smith", "Human", Some(1)),
        ]);
        let mut session = session(&mock);
        session.wait_for(|s| matches!(s, ListingState::Ready(_))).await;

        session.set_page(2).await;
        for typed in ["r", "ri", "rick"] {
            session.edit_filters(ListingFilters::new(typed, "", ""));
        }

        let state = session
            .wait_for(|s| {
                matches!(s, ListingState::Ready(r) if r.items().len() == 1 && r.items()[0].id == 1)
            })
            .await;
        assert_eq!(state.result().unwrap().total_pages(), 1);

        let queries = page_queries(&mock);
        assert_eq!(queries.first(), Some(&(1, String::new())));
        assert_eq!(queries.last(), Some(&(1, "rick".to_string())));
        assert!(queries.iter().all(|(_, name)| name != "r" && name != "ri"));

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_failure() {
        let mock = MockCatalog::new().with_character(fixture_character(1, "Rick", "Human", None));
        mock.on(Operation::CharactersPage).return_status(503);
        let session = session(&mock);

        let failed = session.wait_for(|s| matches!(s, ListingState::Failed(_))).await;
        assert!(failed.is_retryable());

        session.retry().await;
        let ready = session.wait_for(|s| matches!(s, ListingState::Ready(_))).await;
        assert_eq!(ready.result().unwrap().items().len(), 1);

        mock.verify();
        session.shutdown().await;
    }

    /// Delays character pages searched by `slow_name`.
    struct SlowCatalog {
        inner: MockCatalog,
        slow_name: &'static str,
        delay: Duration,
    }

    #[async_trait]
    impl CatalogApi for SlowCatalog {
        async fn character(&self, id: u32) -> Result<CharacterRecord, CatalogError> {
            self.inner.character(id).await
        }

        async fn characters_by_ids(
            &self,
            ids: &[u32],
        ) -> Result<OneOrMany<CharacterRecord>, CatalogError> {
            self.inner.characters_by_ids(ids).await
        }

        async fn characters_page(
            &self,
            query: &CharacterQuery,
        ) -> Result<CharacterPage, CatalogError> {
            if query.name == self.slow_name {
                tokio::time::sleep(self.delay).await;
            }
            self.inner.characters_page(query).await
        }

        async fn location(&self, id: u32) -> Result<LocationRecord, CatalogError> {
            self.inner.location(id).await
        }

        async fn search_locations(
            &self,
            name: &str,
        ) -> Result<Vec<LocationRecord>, CatalogError> {
            self.inner.search_locations(name).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_load_is_never_published() {
        let mock = MockCatalog::new().with_characters([
            fixture_character(1, "Rick Sanchez", "Human", Some(1)),
            fixture_character(2, "Morty Smith", "Human", Some(1)),
        ]);
        let catalog = SlowCatalog {
            inner: mock.clone(),
            slow_name: "rick",
            delay: Duration::from_secs(5),
        };
        let controller = ListingController::new(LocationPipeline::new(Arc::new(catalog)));
        let mut session = ListingSession::spawn(controller, DEFAULT_DEBOUNCE);
        session.wait_for(|s| matches!(s, ListingState::Ready(_))).await;

        let published = Arc::new(Mutex::new(Vec::new()));
        let mut states = session.states();
        states.mark_unchanged();
        let recorder = {
            let published = Arc::clone(&published);
            tokio::spawn(async move {
                while states.changed().await.is_ok() {
                    if let ListingState::Ready(result) = &*states.borrow_and_update() {
                        let ids: Vec<u32> = result.items().iter().map(|c| c.id).collect();
                        published.lock().unwrap().push(ids);
                    }
                }
            })
        };

        session.edit_filters(ListingFilters::new("rick", "", ""));
        tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(100)).await;
        assert_eq!(*session.states().borrow(), ListingState::Loading);

        session.edit_filters(ListingFilters::new("morty", "", ""));
        session
            .wait_for(|s| matches!(s, ListingState::Ready(r) if r.items().len() == 1))
            .await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(*published.lock().unwrap(), vec![vec![2]]);
        let last = session.states().borrow().clone();
        assert_eq!(last.result().unwrap().items()[0].id, 2);

        session.shutdown().await;
        recorder.abort();
    }
}
