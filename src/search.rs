//! Free-text search over cached shows and episodes
//!
//! All functions here are pure. Filtering keeps the input order; the only
//! ordering the browser ever applies is the alphabetical sort of the show
//! listing when it is loaded.

use crate::catalog::{Episode, Show};
use crate::selection::EpisodeFilter;
use regex::Regex;
use std::sync::LazyLock;

/// Anything that looks like a tag: `<` up to the next `>`.
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

/// Removes every tag-like substring from `text`
///
/// Only used to match summaries against a query. Summaries are always handed
/// to the renderer with their markup intact.
///
/// # Examples
///
/// ```
/// use catalog_browser::strip_markup;
///
/// assert_eq!(strip_markup("<p>A <b>bold</b> move</p>"), "A bold move");
/// ```
pub fn strip_markup(text: &str) -> String {
    MARKUP_TAG.replace_all(text, "").into_owned()
}

/// Normalized form of a user query: trimmed and lowercased.
fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn contains_query(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn summary_matches(summary: Option<&str>, needle: &str) -> bool {
    summary.is_some_and(|s| contains_query(&strip_markup(s), needle))
}

/// Whether a single show matches an already normalized query.
fn show_matches(show: &Show, needle: &str) -> bool {
    contains_query(&show.name, needle)
        || contains_query(&show.genres.join(" "), needle)
        || summary_matches(show.summary.as_deref(), needle)
}

/// Whether a single episode matches an already normalized query.
fn episode_matches(episode: &Episode, needle: &str) -> bool {
    contains_query(&episode.name, needle) || summary_matches(episode.summary.as_deref(), needle)
}

/// Returns the shows whose name, genres or summary text contain `query`
///
/// Matching ignores case and surrounding whitespace in the query. Genres are
/// matched as one space-joined string, so a query may span two genres. An
/// empty query keeps every show.
pub fn filter_shows(shows: &[Show], query: &str) -> Vec<Show> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return shows.to_vec();
    }
    shows
        .iter()
        .filter(|s| show_matches(s, &needle))
        .cloned()
        .collect()
}

/// Returns the episodes whose name or summary text contain `query`
///
/// Same matching rules as [`filter_shows`].
pub fn filter_episodes(episodes: &[Episode], query: &str) -> Vec<Episode> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return episodes.to_vec();
    }
    episodes
        .iter()
        .filter(|e| episode_matches(e, &needle))
        .cloned()
        .collect()
}

/// Applies an episode picker selection to a show's episode list
///
/// `All` keeps the list. A specific id keeps the matching episode, or
/// nothing if the id is not part of the list.
pub fn select_episodes(episodes: &[Episode], filter: &EpisodeFilter) -> Vec<Episode> {
    match filter {
        EpisodeFilter::All => episodes.to_vec(),
        EpisodeFilter::Episode(id) => episodes.iter().filter(|e| e.id == *id).cloned().collect(),
    }
}
