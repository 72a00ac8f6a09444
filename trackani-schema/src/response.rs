use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::item::ListStatus;
use crate::record::{Favorite, ListEntry};

/// Per-status entry counts. Statuses with no entries are absent.
pub type ListStats = BTreeMap<ListStatus, u64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedFavorite {
    pub message: String,
    pub favorite: Favorite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedListEntry {
    pub message: String,
    pub list_item: ListEntry,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCheck {
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Body of every error response: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
