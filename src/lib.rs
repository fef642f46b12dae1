//! catalog_browser - Browse a TV show catalog and drill down into episodes
//!
//! This library provides the core of a two-level catalog browser: a session
//! cache that fetches the show listing and each show's episodes at most once,
//! pure search functions over the cached data, and a view controller that
//! navigates between the listing and a show's episodes and hands everything
//! to a pluggable renderer.
//!
//! # Examples
//!
//! ```no_run
//! use catalog_browser::{
//!     DisplayCount, Episode, ErrorContext, FetchError, PickerEntry, Renderer, Show,
//!     SourceConfig, TvMazeSource, ViewController,
//! };
//!
//! struct Quiet;
//!
//! impl Renderer for Quiet {
//!     fn render_shows(&mut self, _: &[Show], count: DisplayCount) {
//!         println!("{count}");
//!     }
//!     fn render_episodes(&mut self, _: &Show, _: &[Episode], count: DisplayCount) {
//!         println!("{count}");
//!     }
//!     fn render_error(&mut self, _: ErrorContext, error: &FetchError) {
//!         eprintln!("{error}");
//!     }
//!     fn fill_show_picker(&mut self, _: &[PickerEntry]) {}
//!     fn fill_episode_picker(&mut self, _: &[PickerEntry]) {}
//! }
//!
//! # async fn run() -> Result<(), FetchError> {
//! let source = TvMazeSource::new(SourceConfig::default())?;
//! let mut controller = ViewController::new(source, Quiet);
//! controller.on_start().await;
//! controller.on_search("drama");
//! controller.on_pick_show("169").await;
//! controller.on_pick_episode("all");
//! controller.on_back().await;
//! # Ok(())
//! # }
//! ```

mod cache;
mod catalog;
mod controller;
mod picker;
mod search;
mod selection;

pub use cache::CatalogCache;
pub use catalog::{
    CatalogSource, DEFAULT_BASE_URL, Episode, EpisodeId, Show, ShowId, SourceConfig, TvMazeSource,
};
pub use controller::{
    CountedItems, DisplayCount, ErrorContext, Renderer, SessionState, View, ViewController,
};
pub use picker::{
    ALL_EPISODES_LABEL, PickerEntry, SHOW_PLACEHOLDER_LABEL, episode_code, episode_label,
    episode_picker_entries, show_picker_entries,
};
pub use search::{filter_episodes, filter_shows, select_episodes, strip_markup};
pub use selection::{ALL_EPISODES, EpisodeFilter, SelectionState};

// Re-export error types
pub use catalog::FetchError;
pub use selection::SelectionError;
