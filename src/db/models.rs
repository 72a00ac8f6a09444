use crate::error::TrackaniError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trackani_schema::{Favorite, ListEntry};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbFavorite {
    pub id: i64,
    pub user_id: String,
    pub item_id: String,
    pub item_type: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbListEntry {
    pub id: i64,
    pub user_id: String,
    pub item_id: String,
    pub item_type: String,
    pub status: String,
    pub progress: i64,
    pub rating: Option<i64>,
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn corrupt(table: &str, id: i64, detail: impl std::fmt::Display) -> TrackaniError {
    TrackaniError::UnexpectedError(format!("invalid {table} row id={id}: {detail}"))
}

impl TryFrom<DbFavorite> for Favorite {
    type Error = TrackaniError;

    fn try_from(row: DbFavorite) -> Result<Self, Self::Error> {
        let item_type = row
            .item_type
            .parse()
            .map_err(|e| corrupt("favorites", row.id, e))?;

        Ok(Favorite {
            id: row.id,
            user_id: row.user_id,
            item_id: row.item_id,
            item_type,
            added_at: row.added_at,
        })
    }
}

impl TryFrom<DbListEntry> for ListEntry {
    type Error = TrackaniError;

    fn try_from(row: DbListEntry) -> Result<Self, Self::Error> {
        let id = row.id;
        let item_type = row
            .item_type
            .parse()
            .map_err(|e| corrupt("list_entries", id, e))?;
        let status = row
            .status
            .parse()
            .map_err(|e| corrupt("list_entries", id, e))?;
        let progress = u32::try_from(row.progress)
            .map_err(|_| corrupt("list_entries", id, format!("progress {}", row.progress)))?;
        let rating = row
            .rating
            .map(u8::try_from)
            .transpose()
            .map_err(|_| corrupt("list_entries", id, "rating out of range"))?;

        Ok(ListEntry {
            id,
            user_id: row.user_id,
            item_id: row.item_id,
            item_type,
            status,
            progress,
            rating,
            notes: row.notes,
            added_at: row.added_at,
            updated_at: row.updated_at,
        })
    }
}
