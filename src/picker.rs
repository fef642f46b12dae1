//! Entries for the show and episode picker controls
//!
//! A picker entry pairs the value handed back to the view controller with the
//! label the user sees.

use crate::catalog::{Episode, Show};
use crate::selection::ALL_EPISODES;

/// Label of the first episode picker entry.
pub const ALL_EPISODES_LABEL: &str = "Show All Episodes";

/// Label of the placeholder entry heading the show picker.
pub const SHOW_PLACEHOLDER_LABEL: &str = "Select a show...";

/// One selectable option of a picker control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    /// Value reported back when the entry is chosen
    pub value: String,
    /// Text displayed for the entry
    pub label: String,
}

impl PickerEntry {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Whether this is the empty placeholder entry.
    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

/// Formats the season/episode code of an episode, e.g. `S01E03`
pub fn episode_code(episode: &Episode) -> String {
    format!("S{:02}E{:02}", episode.season, episode.number)
}

/// Formats the picker label of an episode, e.g. `S01E03 - Pilot`
pub fn episode_label(episode: &Episode) -> String {
    format!("{} - {}", episode_code(episode), episode.name)
}

/// Builds the show picker: a placeholder with an empty value, then one entry
/// per show labeled by name with the show id as value.
pub fn show_picker_entries(shows: &[Show]) -> Vec<PickerEntry> {
    std::iter::once(PickerEntry::new("", SHOW_PLACEHOLDER_LABEL))
        .chain(
            shows
                .iter()
                .map(|s| PickerEntry::new(s.id.to_string(), s.name.clone())),
        )
        .collect()
}

/// Builds the episode picker: an `all` entry, then one entry per episode.
pub fn episode_picker_entries(episodes: &[Episode]) -> Vec<PickerEntry> {
    std::iter::once(PickerEntry::new(ALL_EPISODES, ALL_EPISODES_LABEL))
        .chain(
            episodes
                .iter()
                .map(|e| PickerEntry::new(e.id.to_string(), episode_label(e))),
        )
        .collect()
}
