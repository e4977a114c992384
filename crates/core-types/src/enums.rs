use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three analytics sections shown on the organizer dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Overview,
    Events,
    Revenue,
}

impl Section {
    /// All sections in tab order.
    pub const ALL: [Section; 3] = [Section::Overview, Section::Events, Section::Revenue];

    /// Maps a tab index to its section. Unknown indices fall back to the overview.
    pub fn from_tab_index(index: usize) -> Self {
        match index {
            1 => Section::Events,
            2 => Section::Revenue,
            _ => Section::Overview,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Events => "Events",
            Section::Revenue => "Revenue",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The aggregation state of the dashboard, as read by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Carries the human-readable message to show next to the retry action.
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// Returns the failure message, if the last aggregation failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}
