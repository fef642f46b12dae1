//! View controller
//!
//! This module ties the cache, the search functions and the selection state
//! together into the two views of the browser: the show listing and the
//! episode drill-down of a single show. User input arrives as commands
//! (`on_select_show`, `on_back`, `on_search`, ...); output leaves through a
//! [`Renderer`].

use crate::cache::CatalogCache;
use crate::catalog::{CatalogSource, Episode, FetchError, Show, ShowId};
use crate::picker::{PickerEntry, episode_picker_entries, show_picker_entries};
use crate::search::{filter_episodes, filter_shows, select_episodes};
use crate::selection::{EpisodeFilter, SelectionState};
use std::fmt;

/// The view currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// All shows
    #[default]
    Listing,
    /// The episodes of one show
    Drilldown(ShowId),
}

/// What kind of items a [`DisplayCount`] counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountedItems {
    Shows,
    Episodes,
}

impl fmt::Display for CountedItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountedItems::Shows => f.write_str("shows"),
            CountedItems::Episodes => f.write_str("episodes"),
        }
    }
}

/// Number of displayed items against the size of the whole cached collection
///
/// Renders as `Displaying {shown} / {total} {shows|episodes}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCount {
    pub shown: usize,
    /// Size of the full cached collection, not of the filtered one
    pub total: usize,
    pub items: CountedItems,
}

impl DisplayCount {
    pub fn shows(shown: usize, total: usize) -> Self {
        Self {
            shown,
            total,
            items: CountedItems::Shows,
        }
    }

    pub fn episodes(shown: usize, total: usize) -> Self {
        Self {
            shown,
            total,
            items: CountedItems::Episodes,
        }
    }
}

impl fmt::Display for DisplayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Displaying {} / {} {}", self.shown, self.total, self.items)
    }
}

/// The operation a rendered error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    /// Loading the show listing failed
    Shows,
    /// Loading the episodes of a show failed
    Episodes(ShowId),
}

/// Output side of the browser
///
/// Implementors turn the lists handed to them into something visible. The
/// controller never inspects what a renderer does with them.
pub trait Renderer {
    /// Displays the (possibly filtered) show listing
    fn render_shows(&mut self, shows: &[Show], count: DisplayCount);

    /// Displays the (possibly filtered) episodes of `show`
    fn render_episodes(&mut self, show: &Show, episodes: &[Episode], count: DisplayCount);

    /// Displays a failed fetch in place of a list
    fn render_error(&mut self, context: ErrorContext, error: &FetchError);

    /// Populates the show picker. Called once per session.
    fn fill_show_picker(&mut self, entries: &[PickerEntry]);

    /// Populates the episode picker. Called on every drill-down, with only the
    /// `all` entry when the episodes could not be loaded.
    fn fill_episode_picker(&mut self, entries: &[PickerEntry]);
}

/// Everything the browser remembers during a session
pub struct SessionState<S> {
    cache: CatalogCache<S>,
    selection: SelectionState,
    /// Text of the search box, cleared whenever the view changes
    search_query: String,
    /// Fill-once guard of the show picker
    show_picker_filled: bool,
}

impl<S> SessionState<S>
where
    S: CatalogSource,
{
    pub fn new(cache: CatalogCache<S>) -> Self {
        Self {
            cache,
            selection: SelectionState::new(),
            search_query: String::new(),
            show_picker_filled: false,
        }
    }

    pub fn cache(&self) -> &CatalogCache<S> {
        &self.cache
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn show_picker_filled(&self) -> bool {
        self.show_picker_filled
    }
}

/// Drives navigation between the show listing and the episode drill-down
///
/// Fetch errors never escape a command: they are rendered through
/// [`Renderer::render_error`] and leave the cache untouched, so repeating the
/// navigation retries the fetch.
pub struct ViewController<S, R> {
    session: SessionState<S>,
    renderer: R,
    view: View,
}

impl<S, R> ViewController<S, R>
where
    S: CatalogSource,
    R: Renderer,
{
    /// Creates a controller with an empty session in front of `source`
    pub fn new(source: S, renderer: R) -> Self {
        Self::with_session(SessionState::new(CatalogCache::new(source)), renderer)
    }

    /// Creates a controller around an existing session
    pub fn with_session(session: SessionState<S>, renderer: R) -> Self {
        Self {
            session,
            renderer,
            view: View::Listing,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn session(&self) -> &SessionState<S> {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Shows the listing, loading the show collection if needed
    pub async fn on_start(&mut self) {
        self.enter_listing().await;
    }

    /// Opens the drill-down of a show
    ///
    /// Works from the listing as well as from another drill-down. Shows that
    /// are not part of the loaded listing are ignored.
    pub async fn on_select_show(&mut self, show_id: ShowId) {
        if !self.session.cache.contains_show(show_id) {
            tracing::warn!(%show_id, "ignoring selection of unknown show");
            return;
        }

        self.session.selection.select_show(show_id);
        self.session.search_query.clear();
        self.view = View::Drilldown(show_id);

        let result = self.session.cache.ensure_episodes_loaded(show_id).await;

        if !self.is_current(show_id) {
            tracing::debug!(%show_id, "discarding episodes of a show that is no longer open");
            return;
        }

        match result {
            Ok(episodes) => {
                self.renderer
                    .fill_episode_picker(&episode_picker_entries(&episodes));
                self.render_drilldown(show_id, &episodes);
            }
            Err(e) => {
                // Drop the previous show's entries; only "all" remains
                self.renderer.fill_episode_picker(&episode_picker_entries(&[]));
                self.renderer.render_error(ErrorContext::Episodes(show_id), &e);
            }
        }
    }

    /// Opens the drill-down for a show picker value
    ///
    /// The empty placeholder value does nothing.
    pub async fn on_pick_show(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match value.parse::<ShowId>() {
            Ok(show_id) => self.on_select_show(show_id).await,
            Err(_) => tracing::warn!(value, "ignoring invalid show picker value"),
        }
    }

    /// Returns to the show listing, clearing search text and selection
    pub async fn on_back(&mut self) {
        self.session.selection.clear();
        self.session.search_query.clear();
        self.enter_listing().await;
    }

    /// Filters the current view by `query`
    pub fn on_search(&mut self, query: &str) {
        self.session.search_query = query.to_string();

        match self.view {
            View::Listing => {
                if let Some(shows) = self.session.cache.shows() {
                    self.render_listing(&shows);
                }
            }
            View::Drilldown(show_id) => {
                if let Some(episodes) = self.session.cache.episodes(show_id) {
                    self.render_drilldown(show_id, &episodes);
                }
            }
        }
    }

    /// Restricts the drill-down to one episode, or back to all of them
    pub fn on_select_episode(&mut self, filter: EpisodeFilter) {
        let View::Drilldown(show_id) = self.view else {
            tracing::warn!(%filter, "ignoring episode selection outside of a drill-down");
            return;
        };

        self.session.selection.select_episode(filter);
        if let Some(episodes) = self.session.cache.episodes(show_id) {
            self.render_drilldown(show_id, &episodes);
        }
    }

    /// Applies an episode picker value (`all` or an episode id)
    pub fn on_pick_episode(&mut self, value: &str) {
        match value.parse::<EpisodeFilter>() {
            Ok(filter) => self.on_select_episode(filter),
            Err(e) => tracing::warn!(error = %e, "ignoring invalid episode picker value"),
        }
    }

    async fn enter_listing(&mut self) {
        self.view = View::Listing;

        match self.session.cache.ensure_shows_loaded().await {
            Ok(shows) => {
                if !self.session.show_picker_filled {
                    self.renderer.fill_show_picker(&show_picker_entries(&shows));
                    self.session.show_picker_filled = true;
                }
                self.render_listing(&shows);
            }
            Err(e) => self.renderer.render_error(ErrorContext::Shows, &e),
        }
    }

    fn render_listing(&mut self, shows: &[Show]) {
        let visible = filter_shows(shows, &self.session.search_query);
        let count = DisplayCount::shows(visible.len(), shows.len());
        self.renderer.render_shows(&visible, count);
    }

    fn render_drilldown(&mut self, show_id: ShowId, episodes: &[Episode]) {
        let Some(show) = self
            .session
            .cache
            .shows()
            .and_then(|shows| shows.iter().find(|s| s.id == show_id).cloned())
        else {
            return;
        };

        let selected = select_episodes(episodes, &self.session.selection.episode_filter());
        let visible = filter_episodes(&selected, &self.session.search_query);
        let count = DisplayCount::episodes(visible.len(), episodes.len());
        self.renderer.render_episodes(&show, &visible, count);
    }

    /// Whether results for `show_id` still belong on screen.
    fn is_current(&self, show_id: ShowId) -> bool {
        self.view == View::Drilldown(show_id)
            && self.session.selection.current_show() == Some(show_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EpisodeId;
    use crate::catalog::mock::{MockSource, episode, show};

    #[derive(Debug, Clone, PartialEq)]
    enum Rendered {
        Shows { names: Vec<String>, count: String },
        Episodes { show: String, ids: Vec<u64>, count: String },
        Error(ErrorContext),
        ShowPicker(Vec<PickerEntry>),
        EpisodePicker(Vec<PickerEntry>),
    }

    #[derive(Default)]
    struct RecordingRenderer {
        log: Vec<Rendered>,
    }

    impl RecordingRenderer {
        fn last(&self) -> &Rendered {
            self.log.last().expect("nothing rendered")
        }

        fn count(&self, pred: impl Fn(&Rendered) -> bool) -> usize {
            self.log.iter().filter(|r| pred(r)).count()
        }
    }

    impl Renderer for RecordingRenderer {
        fn render_shows(&mut self, shows: &[Show], count: DisplayCount) {
            self.log.push(Rendered::Shows {
                names: shows.iter().map(|s| s.name.clone()).collect(),
                count: count.to_string(),
            });
        }

        fn render_episodes(&mut self, show: &Show, episodes: &[Episode], count: DisplayCount) {
            self.log.push(Rendered::Episodes {
                show: show.name.clone(),
                ids: episodes.iter().map(|e| e.id.0).collect(),
                count: count.to_string(),
            });
        }

        fn render_error(&mut self, context: ErrorContext, _error: &FetchError) {
            self.log.push(Rendered::Error(context));
        }

        fn fill_show_picker(&mut self, entries: &[PickerEntry]) {
            self.log.push(Rendered::ShowPicker(entries.to_vec()));
        }

        fn fill_episode_picker(&mut self, entries: &[PickerEntry]) {
            self.log.push(Rendered::EpisodePicker(entries.to_vec()));
        }
    }

    fn source() -> MockSource {
        let breaking_bad = Show {
            genres: vec!["Drama".to_string()],
            summary: Some("<p>Chemistry</p>".to_string()),
            ..show(1, "Breaking Bad")
        };
        MockSource::new(vec![show(5, "lost"), breaking_bad, show(7, "Dark")])
            .with_episodes(
                ShowId(5),
                vec![episode(9, 5, 1, 3, "Pilot"), episode(10, 5, 1, 4, "Walkabout")],
            )
            .with_episodes(ShowId(7), vec![episode(70, 7, 1, 1, "Secrets")])
    }

    fn controller(source: MockSource) -> ViewController<MockSource, RecordingRenderer> {
        ViewController::new(source, RecordingRenderer::default())
    }

    fn show_calls(c: &ViewController<MockSource, RecordingRenderer>) -> usize {
        c.session().cache().source().show_calls()
    }

    fn episode_calls(c: &ViewController<MockSource, RecordingRenderer>, id: u64) -> usize {
        c.session().cache().source().episode_calls(ShowId(id))
    }

    #[test]
    fn test_display_count_format() {
        assert_eq!(DisplayCount::shows(3, 240).to_string(), "Displaying 3 / 240 shows");
        assert_eq!(DisplayCount::episodes(0, 62).to_string(), "Displaying 0 / 62 episodes");
    }

    #[tokio::test]
    async fn test_listing_loads_sorted_shows_once() {
        let mut c = controller(source());
        assert_eq!(c.view(), View::Listing);

        c.on_start().await;
        assert_eq!(
            c.renderer().last(),
            &Rendered::Shows {
                names: vec!["Breaking Bad".into(), "Dark".into(), "lost".into()],
                count: "Displaying 3 / 3 shows".into(),
            }
        );

        c.on_select_show(ShowId(5)).await;
        c.on_back().await;
        c.on_start().await;
        c.on_back().await;

        assert_eq!(show_calls(&c), 1);
        assert_eq!(c.renderer().count(|r| matches!(r, Rendered::ShowPicker(_))), 1);
        assert!(c.session().show_picker_filled());
    }

    #[tokio::test]
    async fn test_show_picker_entries() {
        let mut c = controller(source());
        c.on_start().await;

        let Rendered::ShowPicker(entries) = &c.renderer().log[0] else {
            panic!("show picker not filled first: {:?}", c.renderer().log);
        };
        assert!(entries[0].is_placeholder());
        let values: Vec<&str> = entries[1..].iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["1", "7", "5"]);
    }

    #[tokio::test]
    async fn test_drilldown_fills_episode_picker_and_renders_all() {
        let mut c = controller(source());
        c.on_start().await;
        c.on_select_show(ShowId(5)).await;

        assert_eq!(c.view(), View::Drilldown(ShowId(5)));
        assert_eq!(c.session().selection().current_show(), Some(ShowId(5)));
        assert_eq!(c.session().selection().episode_filter(), EpisodeFilter::All);

        let n = c.renderer().log.len();
        assert_eq!(
            c.renderer().log[n - 2],
            Rendered::EpisodePicker(vec![
                PickerEntry::new("all", "Show All Episodes"),
                PickerEntry::new("9", "S01E03 - Pilot"),
                PickerEntry::new("10", "S01E04 - Walkabout"),
            ])
        );
        assert_eq!(
            c.renderer().log[n - 1],
            Rendered::Episodes {
                show: "lost".into(),
                ids: vec![9, 10],
                count: "Displaying 2 / 2 episodes".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_episodes_fetched_once_per_show() {
        let mut c = controller(source());
        c.on_start().await;
        for _ in 0..3 {
            c.on_select_show(ShowId(5)).await;
            c.on_back().await;
        }
        // Switching between drill-downs directly
        c.on_select_show(ShowId(7)).await;
        c.on_select_show(ShowId(5)).await;
        c.on_select_show(ShowId(7)).await;

        assert_eq!(episode_calls(&c, 5), 1);
        assert_eq!(episode_calls(&c, 7), 1);
        assert_eq!(c.view(), View::Drilldown(ShowId(7)));
        // Every drill-down repopulates the episode picker
        assert_eq!(c.renderer().count(|r| matches!(r, Rendered::EpisodePicker(_))), 6);
    }

    #[tokio::test]
    async fn test_episode_fetch_failure_is_rendered_and_retried() {
        let source = source();
        source.set_fail_episodes(ShowId(7), true);
        let mut c = controller(source);
        c.on_start().await;

        c.on_select_show(ShowId(7)).await;
        assert_eq!(c.view(), View::Drilldown(ShowId(7)));
        assert_eq!(c.renderer().last(), &Rendered::Error(ErrorContext::Episodes(ShowId(7))));
        assert!(c.session().cache().episodes(ShowId(7)).is_none());

        c.on_back().await;
        c.session().cache().source().set_fail_episodes(ShowId(7), false);
        c.on_select_show(ShowId(7)).await;

        assert_eq!(episode_calls(&c, 7), 2);
        assert!(matches!(c.renderer().last(), Rendered::Episodes { ids, .. } if ids == &vec![70]));
    }

    #[tokio::test]
    async fn test_failed_drilldown_clears_episode_picker() {
        let source = source();
        source.set_fail_episodes(ShowId(7), true);
        let mut c = controller(source);
        c.on_start().await;
        c.on_select_show(ShowId(5)).await;

        // Switch straight from a loaded show to one that fails
        c.on_select_show(ShowId(7)).await;

        let n = c.renderer().log.len();
        assert_eq!(
            c.renderer().log[n - 2],
            Rendered::EpisodePicker(vec![PickerEntry::new("all", "Show All Episodes")])
        );
        assert_eq!(c.renderer().log[n - 1], Rendered::Error(ErrorContext::Episodes(ShowId(7))));
    }

    #[tokio::test]
    async fn test_show_fetch_failure_is_rendered_and_retried() {
        let source = source();
        source.set_fail_shows(true);
        let mut c = controller(source);

        c.on_start().await;
        assert_eq!(c.renderer().last(), &Rendered::Error(ErrorContext::Shows));
        assert!(!c.session().show_picker_filled());

        // Nothing is loaded, so no show can be opened yet
        c.on_select_show(ShowId(5)).await;
        assert_eq!(c.view(), View::Listing);

        c.session().cache().source().set_fail_shows(false);
        c.on_start().await;
        assert_eq!(show_calls(&c), 2);
        assert!(c.session().show_picker_filled());
        assert!(matches!(c.renderer().last(), Rendered::Shows { .. }));
    }

    #[tokio::test]
    async fn test_episode_selection() {
        let mut c = controller(source());
        c.on_start().await;
        c.on_select_show(ShowId(5)).await;

        c.on_pick_episode("9");
        assert!(matches!(c.renderer().last(), Rendered::Episodes { ids, count, .. }
            if ids == &vec![9] && count == "Displaying 1 / 2 episodes"));

        c.on_pick_episode("all");
        assert!(matches!(c.renderer().last(), Rendered::Episodes { ids, .. } if ids == &vec![9, 10]));

        // An id from another show matches nothing
        c.on_select_episode(EpisodeFilter::Episode(EpisodeId(70)));
        assert!(matches!(c.renderer().last(), Rendered::Episodes { ids, count, .. }
            if ids.is_empty() && count == "Displaying 0 / 2 episodes"));

        // Garbage is ignored
        let before = c.renderer().log.len();
        c.on_pick_episode("nine");
        assert_eq!(c.renderer().log.len(), before);
    }

    #[tokio::test]
    async fn test_search_in_listing_and_drilldown() {
        let mut c = controller(source());
        c.on_start().await;

        c.on_search("chemistry");
        assert_eq!(
            c.renderer().last(),
            &Rendered::Shows {
                names: vec!["Breaking Bad".into()],
                count: "Displaying 1 / 3 shows".into(),
            }
        );

        c.on_select_show(ShowId(5)).await;
        assert_eq!(c.session().search_query(), "");

        c.on_search("walk");
        assert!(matches!(c.renderer().last(), Rendered::Episodes { ids, count, .. }
            if ids == &vec![10] && count == "Displaying 1 / 2 episodes"));

        // Search composes with the episode picker
        c.on_pick_episode("9");
        assert!(matches!(c.renderer().last(), Rendered::Episodes { ids, .. } if ids.is_empty()));

        c.on_back().await;
        assert_eq!(c.session().search_query(), "");
        assert_eq!(c.session().selection().current_show(), None);
        assert!(matches!(c.renderer().last(), Rendered::Shows { names, .. } if names.len() == 3));
    }

    #[tokio::test]
    async fn test_pick_show_ignores_placeholder_and_unknown_ids() {
        let mut c = controller(source());
        c.on_start().await;
        let before = c.renderer().log.len();

        c.on_pick_show("").await;
        c.on_pick_show("abc").await;
        c.on_pick_show("999").await;
        assert_eq!(c.view(), View::Listing);
        assert_eq!(c.renderer().log.len(), before);

        c.on_pick_show("7").await;
        assert_eq!(c.view(), View::Drilldown(ShowId(7)));

        // The placeholder does not leave the current drill-down
        c.on_pick_show("").await;
        assert_eq!(c.view(), View::Drilldown(ShowId(7)));
        assert_eq!(episode_calls(&c, 7), 1);
    }

    #[tokio::test]
    async fn test_episode_selection_outside_drilldown_is_ignored() {
        let mut c = controller(source());
        c.on_start().await;
        let before = c.renderer().log.len();

        c.on_pick_episode("9");
        assert_eq!(c.renderer().log.len(), before);
        assert_eq!(c.session().selection().episode_filter(), EpisodeFilter::All);
    }
}
