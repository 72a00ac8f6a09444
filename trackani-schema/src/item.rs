use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog discriminator for a tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Anime,
    Manga,
}

impl ItemType {
    pub const ALL: [ItemType; 2] = [ItemType::Anime, ItemType::Manga];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Anime => "anime",
            ItemType::Manga => "manga",
        }
    }

    /// Status assigned to a new list entry when the caller supplies none.
    pub fn default_status(self) -> ListStatus {
        match self {
            ItemType::Anime => ListStatus::PlanToWatch,
            ItemType::Manga => ListStatus::PlanToRead,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("item type", s))
    }
}

/// Progress state of a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    Watching,
    Reading,
    Completed,
    PlanToWatch,
    PlanToRead,
    Dropped,
    OnHold,
}

impl ListStatus {
    pub const ALL: [ListStatus; 7] = [
        ListStatus::Watching,
        ListStatus::Reading,
        ListStatus::Completed,
        ListStatus::PlanToWatch,
        ListStatus::PlanToRead,
        ListStatus::Dropped,
        ListStatus::OnHold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListStatus::Watching => "watching",
            ListStatus::Reading => "reading",
            ListStatus::Completed => "completed",
            ListStatus::PlanToWatch => "plan_to_watch",
            ListStatus::PlanToRead => "plan_to_read",
            ListStatus::Dropped => "dropped",
            ListStatus::OnHold => "on_hold",
        }
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("list status", s))
    }
}

/// Returned when a string names no known enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}
