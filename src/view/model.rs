use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::RecordSource;
use crate::config::ViewConfig;
use crate::core::{ColumnSet, DashboardError, MutationKey, Record, RecordId, Result, Validate};

use super::debounce::Debouncer;
use super::filter::SearchFilter;
use super::page::{Page, derive_page};
use super::query::QueryState;

/// State of the most recent fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Failed(String),
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// What happened to the response of one `load()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the collection; carries the record count.
    Applied(usize),
    /// A later `load()` was started before this one resolved.
    Superseded,
    /// The view was disposed; nothing was touched.
    Disposed,
}

struct ViewState<R> {
    collection: Vec<R>,
    fetch: FetchStatus,
    load_seq: u64,
    search_seq: u64,
    query: QueryState,
    mutations: HashMap<MutationKey, MutationStatus>,
    disposed: bool,
}

struct Shared<R> {
    state: Mutex<ViewState<R>>,
    columns: ColumnSet<R>,
    min_search_len: usize,
    revision: watch::Sender<u64>,
}

impl<R: Record> Shared<R> {
    fn read<T>(&self, f: impl FnOnce(&ViewState<R>) -> T) -> Result<T> {
        let state = self.state.lock()?;
        Ok(f(&state))
    }

    /// Runs `f` under the lock, then bumps the revision so renderers redraw.
    fn update<T>(&self, f: impl FnOnce(&mut ViewState<R>) -> T) -> Result<T> {
        let out = {
            let mut state = self.state.lock()?;
            f(&mut state)
        };
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
        Ok(out)
    }

    fn filtered_len(&self, state: &ViewState<R>) -> usize {
        SearchFilter::new(&state.query.debounced_search_term, self.min_search_len)
            .count(&state.collection, &self.columns)
    }

    fn apply_search(&self, seq: u64, term: String) -> Result<bool> {
        self.update(|s| {
            // a newer keystroke owns the timer now
            if s.disposed || s.search_seq != seq {
                return false;
            }
            let changed = s.query.apply_debounced(term);
            if changed {
                debug!(
                    resource = R::RESOURCE,
                    term = %s.query.debounced_search_term,
                    "search term settled"
                );
            }
            changed
        })
    }
}

/// Drops a mutation's transient status when it goes out of scope: `Pending`
/// if the `mutate` future was dropped before the backend answered, `Success`
/// once the follow-up reload has settled. Only failures stay in the map.
struct SettleGuard<'a, R: Record> {
    shared: &'a Shared<R>,
    key: Option<MutationKey>,
    expected: MutationStatus,
}

impl<R: Record> SettleGuard<'_, R> {
    fn disarm(&mut self) {
        self.key = None;
    }
}

impl<R: Record> Drop for SettleGuard<'_, R> {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        let expected = &self.expected;
        // another call may own the key by now; leave its status alone
        let cleared = self.shared.update(|s| {
            if s.mutations.get(&key) == Some(expected) {
                s.mutations.remove(&key);
                true
            } else {
                false
            }
        });
        if matches!(cleared, Ok(true)) && expected.is_pending() {
            debug!(resource = R::RESOURCE, %key, "mutation abandoned before completion");
        }
    }
}

/// Sorted, filtered, paginated view over one backend collection.
///
/// All methods take `&self`; the state lock is never held across an
/// `.await`, so loads and mutations may interleave freely on one task.
pub struct TableView<R: Record> {
    source: Arc<dyn RecordSource<R>>,
    shared: Arc<Shared<R>>,
    debouncer: Mutex<Debouncer>,
}

impl<R: Record> TableView<R> {
    pub fn new(source: Arc<dyn RecordSource<R>>, config: &ViewConfig) -> Self {
        Self::with_columns(source, R::columns(), config)
    }

    pub fn with_columns(
        source: Arc<dyn RecordSource<R>>,
        columns: ColumnSet<R>,
        config: &ViewConfig,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        let state = ViewState {
            collection: Vec::new(),
            fetch: FetchStatus::Idle,
            load_seq: 0,
            search_seq: 0,
            query: QueryState::new(config.page_size),
            mutations: HashMap::new(),
            disposed: false,
        };
        Self {
            source,
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                columns,
                min_search_len: config.min_search_len,
                revision,
            }),
            debouncer: Mutex::new(Debouncer::new(config.debounce)),
        }
    }

    pub fn columns(&self) -> &ColumnSet<R> {
        &self.shared.columns
    }

    /// Revision counter, bumped on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    /// Fetches the whole collection. Only the most recently started call
    /// may replace the cache; older responses are dropped.
    pub async fn load(&self) -> Result<LoadOutcome> {
        let ticket = self.shared.update(|s| {
            if s.disposed {
                return None;
            }
            s.load_seq += 1;
            s.fetch = FetchStatus::Loading;
            Some(s.load_seq)
        })?;
        let Some(ticket) = ticket else {
            return Ok(LoadOutcome::Disposed);
        };
        debug!(resource = R::RESOURCE, ticket, "fetching collection");

        let result = self.source.fetch_all().await;

        let shared = &self.shared;
        shared.update(|s| {
            if s.disposed {
                return Ok(LoadOutcome::Disposed);
            }
            if s.load_seq != ticket {
                warn!(
                    resource = R::RESOURCE,
                    ticket,
                    latest = s.load_seq,
                    "dropping superseded response"
                );
                return Ok(LoadOutcome::Superseded);
            }
            match result {
                Ok(records) => {
                    let count = records.len();
                    s.collection = records;
                    s.fetch = FetchStatus::Success;
                    let filtered = shared.filtered_len(s);
                    s.query.clamp_page(filtered);
                    debug!(resource = R::RESOURCE, ticket, count, "collection replaced");
                    Ok(LoadOutcome::Applied(count))
                }
                Err(err) => {
                    let message = err.to_string();
                    warn!(resource = R::RESOURCE, ticket, error = %message, "fetch failed");
                    s.fetch = FetchStatus::Error(message.clone());
                    Err(DashboardError::Fetch(message))
                }
            }
        })?
    }

    /// Echoes the raw term at once and applies it to filtering after the
    /// debounce window, provided no newer term arrives first.
    pub fn set_search_term(&self, term: &str) -> Result<()> {
        let seq = self.shared.update(|s| {
            s.query.search_term = term.to_string();
            s.search_seq += 1;
            s.search_seq
        })?;

        let shared = Arc::clone(&self.shared);
        let settled = term.to_string();
        self.debouncer.lock()?.schedule(move || {
            if let Err(err) = shared.apply_search(seq, settled) {
                warn!(resource = R::RESOURCE, error = %err, "could not apply search term");
            }
        });
        Ok(())
    }

    /// Applies a term right away, skipping the debounce window. Used when
    /// the user submits the search box explicitly.
    pub fn commit_search_term(&self, term: &str) -> Result<()> {
        self.debouncer.lock()?.cancel();
        self.shared.update(|s| {
            s.query.search_term = term.to_string();
            s.search_seq += 1;
            s.query.apply_debounced(term.to_string());
        })
    }

    pub fn set_sort(&self, key: &str) -> Result<()> {
        if !self
            .columns()
            .get_column(key)
            .is_some_and(|col| col.sortable)
        {
            return Err(DashboardError::ColumnNotFound(key.to_string()));
        }
        self.shared.update(|s| s.query.toggle_sort(key))
    }

    /// Returns the page index actually selected after clamping.
    pub fn set_page(&self, index: i64) -> Result<usize> {
        let shared = &self.shared;
        shared.update(|s| {
            let filtered = shared.filtered_len(s);
            s.query.set_page(index, filtered)
        })
    }

    pub fn next_page(&self) -> Result<usize> {
        let current = self.shared.read(|s| s.query.page_index)?;
        self.set_page(current as i64 + 1)
    }

    pub fn previous_page(&self) -> Result<usize> {
        let current = self.shared.read(|s| s.query.page_index)?;
        self.set_page(current as i64 - 1)
    }

    pub async fn create(&self, draft: R::Draft) -> Result<R> {
        self.ensure_writable()?;
        draft.validate()?;
        self.mutate(MutationKey::Create, self.source.create(&draft))
            .await
    }

    pub async fn update(&self, id: RecordId, draft: R::Draft) -> Result<R> {
        self.ensure_writable()?;
        draft.validate()?;
        self.mutate(MutationKey::Record(id.clone()), self.source.update(&id, &draft))
            .await
    }

    pub async fn delete(&self, id: RecordId) -> Result<()> {
        self.ensure_writable()?;
        self.mutate(MutationKey::Record(id.clone()), self.source.delete(&id))
            .await
    }

    fn ensure_writable(&self) -> Result<()> {
        if R::WRITABLE {
            Ok(())
        } else {
            Err(DashboardError::UnsupportedOperation(format!(
                "{} are read-only",
                R::RESOURCE
            )))
        }
    }

    /// Pessimistic write: the cache is only refreshed by a reload after the
    /// backend confirmed. A failed write leaves the cache as it was.
    async fn mutate<T>(
        &self,
        key: MutationKey,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let started = self.shared.update(|s| {
            if s.disposed {
                return Err(DashboardError::Disposed);
            }
            if s.mutations.get(&key).is_some_and(MutationStatus::is_pending) {
                return Err(DashboardError::MutationInFlight(key.clone()));
            }
            s.mutations.insert(key.clone(), MutationStatus::Pending);
            Ok(())
        })?;
        started?;
        info!(resource = R::RESOURCE, %key, "mutation started");
        let mut guard = SettleGuard {
            shared: &self.shared,
            key: Some(key.clone()),
            expected: MutationStatus::Pending,
        };

        match call.await {
            Ok(value) => {
                self.shared.update(|s| {
                    if !s.disposed {
                        s.mutations.insert(key.clone(), MutationStatus::Success);
                    }
                })?;
                guard.expected = MutationStatus::Success;
                info!(resource = R::RESOURCE, %key, "mutation confirmed, reloading");
                // a failed reload shows up as the fetch error banner
                if let Err(err) = self.load().await {
                    warn!(resource = R::RESOURCE, %key, error = %err, "reload after mutation failed");
                }
                drop(guard);
                Ok(value)
            }
            Err(err) => {
                guard.disarm();
                let message = err.to_string();
                warn!(resource = R::RESOURCE, %key, error = %message, "mutation failed");
                self.shared.update(|s| {
                    if !s.disposed {
                        s.mutations
                            .insert(key.clone(), MutationStatus::Failed(message.clone()));
                    }
                })?;
                Err(DashboardError::Mutation { key, message })
            }
        }
    }

    /// Forgets a finished mutation's status, e.g. once its error was shown.
    pub fn clear_mutation(&self, key: &MutationKey) -> Result<()> {
        self.shared.update(|s| {
            if !s.mutations.get(key).is_some_and(MutationStatus::is_pending) {
                s.mutations.remove(key);
            }
        })
    }

    /// Current page derived from the cached collection and query state.
    pub fn derived_page(&self) -> Result<Page<R>> {
        let shared = &self.shared;
        shared.read(|s| derive_page(&s.collection, &s.query, &shared.columns, shared.min_search_len))?
    }

    pub fn fetch_status(&self) -> Result<FetchStatus> {
        self.shared.read(|s| s.fetch.clone())
    }

    pub fn query(&self) -> Result<QueryState> {
        self.shared.read(|s| s.query.clone())
    }

    pub fn mutation_status(&self, key: &MutationKey) -> Result<MutationStatus> {
        self.shared
            .read(|s| s.mutations.get(key).cloned().unwrap_or_default())
    }

    pub fn is_row_pending(&self, id: &RecordId) -> bool {
        self.mutation_status(&MutationKey::Record(id.clone()))
            .is_ok_and(|status| status.is_pending())
    }

    /// Snapshot of the cached collection in fetch order.
    pub fn collection(&self) -> Result<Vec<R>> {
        self.shared.read(|s| s.collection.clone())
    }

    pub fn collection_len(&self) -> Result<usize> {
        self.shared.read(|s| s.collection.len())
    }

    /// Cancels the pending search timer and detaches in-flight requests.
    /// Idempotent; also run on drop.
    pub fn dispose(&self) {
        if let Ok(mut debouncer) = self.debouncer.lock() {
            debouncer.cancel();
        }
        let _ = self.shared.update(|s| {
            if !s.disposed {
                debug!(resource = R::RESOURCE, "view disposed");
            }
            s.disposed = true;
        });
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.read(|s| s.disposed).unwrap_or(true)
    }
}

impl<R: Record> Drop for TableView<R> {
    fn drop(&mut self) {
        self.dispose();
    }
}
