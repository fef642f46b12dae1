//! In-memory catalog source for tests.
//!
//! Counts every request so tests can assert the at-most-once guarantees, and
//! can be told to fail individual collections.

use super::{CatalogSource, Episode, EpisodeId, FetchError, Show, ShowId};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub(crate) struct MockSource {
    shows: Vec<Show>,
    episodes: HashMap<ShowId, Vec<Episode>>,
    fail_shows: AtomicBool,
    failing_episodes: Mutex<HashSet<ShowId>>,
    show_calls: AtomicUsize,
    episode_calls: Mutex<HashMap<ShowId, usize>>,
}

impl MockSource {
    pub fn new(shows: Vec<Show>) -> Self {
        Self {
            shows,
            ..Self::default()
        }
    }

    pub fn with_episodes(mut self, show_id: ShowId, episodes: Vec<Episode>) -> Self {
        self.episodes.insert(show_id, episodes);
        self
    }

    pub fn set_fail_shows(&self, fail: bool) {
        self.fail_shows.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_episodes(&self, show_id: ShowId, fail: bool) {
        let mut failing = self.failing_episodes.lock().unwrap();
        if fail {
            failing.insert(show_id);
        } else {
            failing.remove(&show_id);
        }
    }

    pub fn show_calls(&self) -> usize {
        self.show_calls.load(Ordering::SeqCst)
    }

    pub fn episode_calls(&self, show_id: ShowId) -> usize {
        self.episode_calls
            .lock()
            .unwrap()
            .get(&show_id)
            .copied()
            .unwrap_or(0)
    }
}

impl CatalogSource for MockSource {
    async fn fetch_shows(&self) -> Result<Vec<Show>, FetchError> {
        self.show_calls.fetch_add(1, Ordering::SeqCst);
        // Stay pending for one poll so concurrent callers overlap.
        tokio::task::yield_now().await;

        if self.fail_shows.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                status: 503,
                reason: "Service Unavailable".to_string(),
            });
        }
        Ok(self.shows.clone())
    }

    async fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, FetchError> {
        *self.episode_calls.lock().unwrap().entry(show_id).or_insert(0) += 1;
        tokio::task::yield_now().await;

        if self.failing_episodes.lock().unwrap().contains(&show_id) {
            return Err(FetchError::Request("connection reset".to_string()));
        }
        Ok(self.episodes.get(&show_id).cloned().unwrap_or_default())
    }
}

pub(crate) fn show(id: u64, name: &str) -> Show {
    Show {
        id: ShowId(id),
        name: name.to_string(),
        image: None,
        summary: None,
        genres: Vec::new(),
        status: "Ended".to_string(),
        rating: None,
        runtime: None,
    }
}

pub(crate) fn episode(id: u64, show_id: u64, season: u32, number: u32, name: &str) -> Episode {
    Episode {
        id: EpisodeId(id),
        show_id: ShowId(show_id),
        season,
        number,
        name: name.to_string(),
        image: None,
        summary: None,
        url: format!("https://www.tvmaze.com/episodes/{id}"),
    }
}
