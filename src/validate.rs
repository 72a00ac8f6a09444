//! Request validation.
//!
//! Raw bodies from `trackani_schema::request` are checked here and turned
//! into typed inputs. The store only ever receives these validated values, so
//! range and enum checks never reach SQL.

use crate::error::TrackaniError;
use trackani_schema::{
    AddFavoriteRequest, AddListEntryRequest, ItemType, ListStatus, UpdateListEntryRequest,
};

pub const MAX_NOTES_CHARS: usize = 500;
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

const MSG_KEY_REQUIRED: &str = "itemId and itemType are required";
const MSG_BAD_ITEM_TYPE: &str = "itemType must be anime or manga";

/// Identifies one catalog item within a user's records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub item_id: String,
    pub item_type: ItemType,
}

impl ItemKey {
    /// Key from URL path segments. An unknown item type can never match a
    /// stored record, so it yields `None` rather than an error.
    pub fn from_path(item_id: String, item_type: &str) -> Option<Self> {
        let item_type = item_type.parse().ok()?;
        Some(Self { item_id, item_type })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFavorite {
    pub(crate) key: ItemKey,
}

impl NewFavorite {
    pub fn key(&self) -> &ItemKey {
        &self.key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListEntry {
    pub(crate) key: ItemKey,
    pub(crate) status: ListStatus,
    pub(crate) progress: u32,
    pub(crate) rating: Option<u8>,
    pub(crate) notes: Option<String>,
}

impl NewListEntry {
    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    pub fn status(&self) -> ListStatus {
        self.status
    }
}

/// Partial update for a list entry. `None` leaves the stored value alone;
/// for `rating`/`notes`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEntryPatch {
    pub(crate) status: Option<ListStatus>,
    pub(crate) progress: Option<u32>,
    pub(crate) rating: Option<Option<u8>>,
    pub(crate) notes: Option<Option<String>>,
}

pub fn new_favorite(req: AddFavoriteRequest) -> Result<NewFavorite, TrackaniError> {
    let key = required_key(req.item_id, req.item_type)?;
    Ok(NewFavorite { key })
}

pub fn new_list_entry(req: AddListEntryRequest) -> Result<NewListEntry, TrackaniError> {
    let key = required_key(req.item_id, req.item_type)?;

    // An empty status string falls back to the default, like an absent one.
    let status = match req.status.filter(|s| !s.is_empty()) {
        Some(s) => status(&s)?,
        None => key.item_type.default_status(),
    };

    Ok(NewListEntry {
        status,
        progress: req.progress.map(progress).transpose()?.unwrap_or(0),
        rating: req.rating.map(rating).transpose()?,
        notes: req.notes.map(notes).transpose()?,
        key,
    })
}

pub fn list_entry_patch(req: UpdateListEntryRequest) -> Result<ListEntryPatch, TrackaniError> {
    Ok(ListEntryPatch {
        status: req.status.as_deref().map(status).transpose()?,
        progress: req.progress.map(progress).transpose()?,
        rating: req
            .rating
            .map(|r| r.map(rating).transpose())
            .transpose()?,
        notes: req.notes.map(|n| n.map(notes).transpose()).transpose()?,
    })
}

fn required_key(
    item_id: Option<String>,
    item_type: Option<String>,
) -> Result<ItemKey, TrackaniError> {
    let (Some(item_id), Some(item_type)) = (
        item_id.filter(|s| !s.is_empty()),
        item_type.filter(|s| !s.is_empty()),
    ) else {
        return Err(TrackaniError::Validation(MSG_KEY_REQUIRED.to_string()));
    };

    let item_type = item_type
        .parse::<ItemType>()
        .map_err(|_| TrackaniError::Validation(MSG_BAD_ITEM_TYPE.to_string()))?;

    Ok(ItemKey { item_id, item_type })
}

fn status(s: &str) -> Result<ListStatus, TrackaniError> {
    s.parse().map_err(|_| {
        let allowed: Vec<&str> = ListStatus::ALL.iter().map(|st| st.as_str()).collect();
        TrackaniError::Validation(format!("status must be one of: {}", allowed.join(", ")))
    })
}

fn progress(p: i64) -> Result<u32, TrackaniError> {
    if p < 0 {
        return Err(TrackaniError::Validation(
            "progress must be a non-negative integer".to_string(),
        ));
    }
    u32::try_from(p).map_err(|_| {
        TrackaniError::Validation(format!("progress must be at most {}", u32::MAX))
    })
}

fn rating(r: i64) -> Result<u8, TrackaniError> {
    u8::try_from(r)
        .ok()
        .filter(|r| RATING_RANGE.contains(r))
        .ok_or_else(|| TrackaniError::Validation("rating must be between 1 and 10".to_string()))
}

fn notes(n: String) -> Result<String, TrackaniError> {
    if n.chars().count() > MAX_NOTES_CHARS {
        return Err(TrackaniError::Validation(format!(
            "notes must be at most {MAX_NOTES_CHARS} characters"
        )));
    }
    Ok(n)
}
