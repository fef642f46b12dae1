/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
/// Fields the browser does not use are left out; serde ignores them.
use serde::Deserialize;

/// A show from the `/shows` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: u64,
    /// The name of the TV show
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    /// "Running", "Ended", "To Be Determined", ... (may be null)
    pub status: Option<String>,
    pub runtime: Option<u32>,
    pub rating: Option<TvMazeRating>,
    pub image: Option<TvMazeImage>,
    /// Summary in HTML format (may be null)
    pub summary: Option<String>,
}

/// Rating object, `average` is null for unrated shows.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeRating {
    pub average: Option<f64>,
}

/// Image links. Only the medium size is shown by the browser.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    pub medium: Option<String>,
}

/// A single episode from the `/shows/{id}/episodes` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    pub id: u64,
    /// Link to the episode page on tvmaze.com
    #[serde(default)]
    pub url: String,
    /// Episode title (may be null for episodes without a title)
    pub name: Option<String>,
    /// Season number (0 for specials)
    pub season: u32,
    /// Episode number within the season (null for specials)
    pub number: Option<u32>,
    pub image: Option<TvMazeImage>,
    /// Episode summary in HTML format (may be null)
    pub summary: Option<String>,
}
