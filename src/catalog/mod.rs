//! Data structures and traits for the remote show catalog.
//!
//! This module provides structures to represent shows and episodes with their
//! associated metadata (names, images, summaries, etc.), as well as the trait
//! a remote catalog has to implement so the cache can fill itself from it.

#[cfg(test)]
pub(crate) mod mock;
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::{DEFAULT_BASE_URL, SourceConfig, TvMazeSource};

use std::fmt;
use std::future::Future;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while fetching a collection from the catalog.
///
/// The error is cloneable so every caller waiting on a shared in-flight
/// fetch receives the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Request(String),

    /// The catalog answered with a non-success status code
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// Failed to parse the catalog's JSON response
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

/// Stable identifier of a show in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShowId(pub u64);

/// Stable identifier of an episode in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpisodeId(pub u64);

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShowId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ShowId)
    }
}

impl FromStr for EpisodeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(EpisodeId)
    }
}

/// A show as listed by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Show {
    /// Catalog identifier
    pub id: ShowId,
    /// The show's title
    pub name: String,
    /// URL of the medium sized poster, if the catalog has one
    pub image: Option<String>,
    /// Summary in HTML format
    pub summary: Option<String>,
    /// Genres in catalog order, possibly empty
    pub genres: Vec<String>,
    /// Running status, e.g. "Ended" or "Running"
    pub status: String,
    /// Average rating
    pub rating: Option<f64>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
}

/// A single episode of a show.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// Catalog identifier
    pub id: EpisodeId,
    /// The show this episode belongs to
    pub show_id: ShowId,
    /// The season number (0 for specials)
    pub season: u32,
    /// The episode number within the season
    pub number: u32,
    /// The episode title
    pub name: String,
    /// URL of the medium sized still, if the catalog has one
    pub image: Option<String>,
    /// Summary in HTML format
    pub summary: Option<String>,
    /// Link to the episode's page on the catalog website
    pub url: String,
}

/// Trait for remote catalogs the cache can be filled from.
///
/// Implementors perform exactly one request per call; memoization and request
/// coalescing are the cache's job, not the source's.
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetches the complete show collection in server order.
    fn fetch_shows(&self) -> impl Future<Output = Result<Vec<Show>, FetchError>> + Send;

    /// Fetches all episodes of the given show in server order.
    fn fetch_episodes(
        &self,
        show_id: ShowId,
    ) -> impl Future<Output = Result<Vec<Episode>, FetchError>> + Send;
}
