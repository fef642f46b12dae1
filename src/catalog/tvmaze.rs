/// TVMaze catalog source implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeShow};
use super::{CatalogSource, Episode, EpisodeId, FetchError, Show, ShowId};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default TVMaze API location.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// Connection settings for [`TvMazeSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// API root without trailing slash, e.g. `https://api.tvmaze.com`
    pub base_url: String,
    /// Overall timeout applied to every request
    pub timeout: Duration,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SourceConfig {
    /// Replaces the API root, stripping any trailing slashes.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replaces the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Catalog source for the TVMaze API.
///
/// Shows come from `GET /shows` (first page only), episodes from
/// `GET /shows/{id}/episodes`.
pub struct TvMazeSource {
    client: reqwest::Client,
    base_url: String,
}

impl TvMazeSource {
    /// Creates a TVMaze source with the given settings.
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// Converts a TVMaze show to our internal Show structure.
    fn convert_show(tvmaze_show: TvMazeShow) -> Show {
        Show {
            id: ShowId(tvmaze_show.id),
            name: tvmaze_show.name,
            image: tvmaze_show.image.and_then(|i| i.medium),
            summary: tvmaze_show.summary,
            genres: tvmaze_show.genres,
            status: tvmaze_show.status.unwrap_or_default(),
            rating: tvmaze_show.rating.and_then(|r| r.average),
            runtime: tvmaze_show.runtime,
        }
    }

    /// Converts a TVMaze episode to our internal Episode structure.
    ///
    /// The episode payload does not name its show, so the id of the show the
    /// request was made for is attached here.
    fn convert_episode(show_id: ShowId, tvmaze_episode: TvMazeEpisode) -> Episode {
        Episode {
            id: EpisodeId(tvmaze_episode.id),
            show_id,
            season: tvmaze_episode.season,
            number: tvmaze_episode.number.unwrap_or(0),
            name: tvmaze_episode.name.unwrap_or_else(|| "Unknown".to_string()),
            image: tvmaze_episode.image.and_then(|i| i.medium),
            summary: tvmaze_episode.summary,
            url: tvmaze_episode.url,
        }
    }

    /// Performs a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "requesting catalog collection");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        // Ensure request was successful
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

impl CatalogSource for TvMazeSource {
    async fn fetch_shows(&self) -> Result<Vec<Show>, FetchError> {
        let shows: Vec<TvMazeShow> = self.get_json("/shows").await?;
        Ok(shows.into_iter().map(Self::convert_show).collect())
    }

    async fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, FetchError> {
        let episodes: Vec<TvMazeEpisode> = self
            .get_json(&format!("/shows/{}/episodes", show_id))
            .await?;
        Ok(episodes
            .into_iter()
            .map(|e| Self::convert_episode(show_id, e))
            .collect())
    }
}
