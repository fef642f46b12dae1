//! Which show is open and which of its episodes is picked.

use crate::catalog::{EpisodeId, ShowId};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Picker value standing for "every episode of the show".
pub const ALL_EPISODES: &str = "all";

/// Errors that can occur when reading an episode picker value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The value is neither `all` nor an episode id
    #[error("Invalid episode selection: {0:?}")]
    InvalidEpisodeValue(String),
}

/// Episode picker selection within the current show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpisodeFilter {
    /// Show every episode
    #[default]
    All,
    /// Show only this episode
    Episode(EpisodeId),
}

impl fmt::Display for EpisodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeFilter::All => f.write_str(ALL_EPISODES),
            EpisodeFilter::Episode(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for EpisodeFilter {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value == ALL_EPISODES {
            return Ok(EpisodeFilter::All);
        }
        value
            .parse()
            .map(EpisodeFilter::Episode)
            .map_err(|_| SelectionError::InvalidEpisodeValue(s.to_string()))
    }
}

/// The browser's current selection
///
/// Whether the selected ids exist in the cache is checked by the view
/// controller before it calls in here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    current_show: Option<ShowId>,
    episode_filter: EpisodeFilter,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `show_id` the current show and resets the episode filter to `All`.
    pub fn select_show(&mut self, show_id: ShowId) {
        self.current_show = Some(show_id);
        self.episode_filter = EpisodeFilter::All;
    }

    /// Sets the episode filter. Unknown episode ids are accepted and simply
    /// match nothing.
    pub fn select_episode(&mut self, filter: EpisodeFilter) {
        self.episode_filter = filter;
    }

    /// Forgets the current show.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn current_show(&self) -> Option<ShowId> {
        self.current_show
    }

    pub fn episode_filter(&self) -> EpisodeFilter {
        self.episode_filter
    }
}
