//! Session catalog cache
//!
//! This module memoizes the two remote collections the browser needs: the show
//! listing and the episode list of every show the user drilled into. Each
//! collection is fetched at most once per session. Concurrent requests for a
//! collection that is still being fetched share the pending request instead of
//! issuing a second one.

use crate::catalog::{CatalogSource, Episode, FetchError, Show, ShowId};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// A fetch that may be awaited by any number of callers.
type PendingFetch<T> = Shared<BoxFuture<'static, Result<Arc<[T]>, FetchError>>>;

/// Mutable part of the cache, guarded by a single lock.
///
/// The lock is never held across an `.await`.
struct CacheState {
    /// All shows, sorted by name. Only meaningful when `loaded` is set
    shows: Arc<[Show]>,
    /// Fetch-once guard for `shows`
    loaded: bool,
    /// The show listing request currently on the wire, if any
    shows_in_flight: Option<PendingFetch<Show>>,
    /// Presence of a key means its episodes were fetched, even if empty
    episodes_by_show: HashMap<ShowId, Arc<[Episode]>>,
    /// Episode requests currently on the wire
    episodes_in_flight: HashMap<ShowId, PendingFetch<Episode>>,
}

/// A memoizing, coalescing cache in front of a [`CatalogSource`]
///
/// Entries are only created by successful fetches and are never replaced. A
/// failed fetch leaves its key absent, so the next request retries.
pub struct CatalogCache<S> {
    /// The underlying catalog
    source: Arc<S>,
    state: Mutex<CacheState>,
}

impl<S> CatalogCache<S>
where
    S: CatalogSource,
{
    /// Creates an empty cache in front of the given source
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let source = TvMazeSource::new(SourceConfig::default())?;
    /// let cache = CatalogCache::new(source);
    /// let shows = cache.ensure_shows_loaded().await?;
    /// ```
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            state: Mutex::new(CacheState {
                shows: Arc::from(Vec::new()),
                loaded: false,
                shows_in_flight: None,
                episodes_by_show: HashMap::new(),
                episodes_in_flight: HashMap::new(),
            }),
        }
    }

    /// Returns the show listing, fetching it on first use
    ///
    /// Once loaded, the cached listing is returned without any I/O. The
    /// listing is sorted by name, ignoring case and accents, keeping server
    /// order for equal names.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the listing is not cached and the request
    /// fails. The cache stays unloaded in that case.
    pub async fn ensure_shows_loaded(&self) -> Result<Arc<[Show]>, FetchError> {
        let pending = {
            let mut state = self.lock();
            if state.loaded {
                tracing::debug!("show listing served from cache");
                return Ok(Arc::clone(&state.shows));
            }

            match state.shows_in_flight.clone() {
                Some(pending) => {
                    tracing::debug!("joining in-flight show listing request");
                    pending
                }
                None => {
                    let source = Arc::clone(&self.source);
                    let pending: PendingFetch<Show> = async move {
                        let mut shows = source.fetch_shows().await?;
                        sort_by_name(&mut shows);
                        Ok::<_, FetchError>(Arc::<[Show]>::from(shows))
                    }
                    .boxed()
                    .shared();
                    state.shows_in_flight = Some(pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut state = self.lock();
        if state
            .shows_in_flight
            .as_ref()
            .is_some_and(|current| current.ptr_eq(&pending))
        {
            state.shows_in_flight = None;
        }

        match result {
            Ok(shows) => {
                if !state.loaded {
                    tracing::info!(count = shows.len(), "show listing loaded");
                    state.shows = Arc::clone(&shows);
                    state.loaded = true;
                }
                Ok(Arc::clone(&state.shows))
            }
            Err(e) => {
                tracing::warn!(error = %e, "show listing fetch failed");
                Err(e)
            }
        }
    }

    /// Returns the episodes of a show, fetching them on first use
    ///
    /// Server order is preserved. An empty list is a valid, cached result.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the episodes are not cached and the request
    /// fails. No entry is written for the show in that case.
    pub async fn ensure_episodes_loaded(
        &self,
        show_id: ShowId,
    ) -> Result<Arc<[Episode]>, FetchError> {
        let pending = {
            let mut state = self.lock();
            if let Some(episodes) = state.episodes_by_show.get(&show_id) {
                tracing::debug!(%show_id, "episodes served from cache");
                return Ok(Arc::clone(episodes));
            }

            match state.episodes_in_flight.get(&show_id).cloned() {
                Some(pending) => {
                    tracing::debug!(%show_id, "joining in-flight episode request");
                    pending
                }
                None => {
                    let source = Arc::clone(&self.source);
                    let pending: PendingFetch<Episode> = async move {
                        let episodes = source.fetch_episodes(show_id).await?;
                        Ok::<_, FetchError>(Arc::<[Episode]>::from(episodes))
                    }
                    .boxed()
                    .shared();
                    state.episodes_in_flight.insert(show_id, pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut state = self.lock();
        if state
            .episodes_in_flight
            .get(&show_id)
            .is_some_and(|current| current.ptr_eq(&pending))
        {
            state.episodes_in_flight.remove(&show_id);
        }

        match result {
            Ok(episodes) => {
                let cached = state.episodes_by_show.entry(show_id).or_insert_with(|| {
                    tracing::info!(%show_id, count = episodes.len(), "episodes loaded");
                    episodes
                });
                Ok(Arc::clone(cached))
            }
            Err(e) => {
                tracing::warn!(%show_id, error = %e, "episode fetch failed");
                Err(e)
            }
        }
    }

    /// Whether the show listing has been fetched successfully
    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    /// The cached show listing, if it has been loaded
    pub fn shows(&self) -> Option<Arc<[Show]>> {
        let state = self.lock();
        state.loaded.then(|| Arc::clone(&state.shows))
    }

    /// The cached episodes of a show, if they have been loaded
    pub fn episodes(&self, show_id: ShowId) -> Option<Arc<[Episode]>> {
        self.lock().episodes_by_show.get(&show_id).map(Arc::clone)
    }

    /// Whether the loaded show listing contains the given show
    pub fn contains_show(&self, show_id: ShowId) -> bool {
        let state = self.lock();
        state.loaded && state.shows.iter().any(|s| s.id == show_id)
    }

    /// Returns the underlying catalog source
    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Every critical section leaves the state consistent, so a panic
        // elsewhere does not invalidate it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sorts shows alphabetically by name, ignoring case and accents
///
/// Names are compared by their base letters first, so "Élite" sorts between
/// "apple" and "Zoo". Names equal on base letters are ordered by their accented
/// form. The sort is stable: shows whose names only differ in case keep the
/// order the server delivered them in.
fn sort_by_name(shows: &mut [Show]) {
    shows.sort_by_cached_key(|s| collation_key(&s.name));
}

/// Sort key of a name: (lowercase base letters, lowercase full name).
fn collation_key(name: &str) -> (String, String) {
    let lower = name.to_lowercase();
    let base = lower.nfd().filter(|c| !is_combining_mark(*c)).collect();
    (base, lower)
}
