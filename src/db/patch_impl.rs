//! ListEntryUpdate -> DbPatchable implementation.
//!
//! This sits in the `db` module because it contains SQL/table knowledge.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use trackani_schema::ListStatus;

use crate::db::models::DbListEntry;
use crate::error::TrackaniError;
use crate::patches::{DbPatchable, ListEntryUpdate};
use crate::validate::ListEntryPatch;

#[async_trait]
impl DbPatchable for ListEntryUpdate {
    type Output = DbListEntry;

    async fn apply_patch(&self, pool: &SqlitePool) -> Result<DbListEntry, TrackaniError> {
        let ListEntryPatch {
            status,
            progress,
            rating,
            notes,
        } = self.patch.clone();

        let status_set = status.is_some();
        let progress_set = progress.is_some();
        let rating_set = rating.is_some();
        let notes_set = notes.is_some();
        // `updated_at` is stamped here on every update, even an empty one.
        let updated_at = Utc::now();

        let row = sqlx::query_as::<_, DbListEntry>(
            r#"
            UPDATE list_entries
            SET
                status = COALESCE(?, status),
                progress = COALESCE(?, progress),
                rating = CASE WHEN ? THEN ? ELSE rating END,
                notes = CASE WHEN ? THEN ? ELSE notes END,
                updated_at = ?
            WHERE user_id = ? AND item_id = ? AND item_type = ?
            RETURNING id, user_id, item_id, item_type, status, progress, rating, notes, added_at, updated_at
            "#,
        )
        .bind(status.map(ListStatus::as_str))
        .bind(progress.map(i64::from))
        .bind(rating_set)
        .bind(rating.flatten().map(i64::from))
        .bind(notes_set)
        .bind(notes.flatten())
        .bind(updated_at)
        .bind(self.user.as_str())
        .bind(self.key.item_id.as_str())
        .bind(self.key.item_type.as_str())
        .fetch_optional(pool)
        .await?;

        debug!(
            table = "list_entries",
            user_id = %self.user,
            item_id = %self.key.item_id,
            item_type = %self.key.item_type,
            found = row.is_some(),
            updated_at = %updated_at,
            status_set,
            progress_set,
            rating_set,
            notes_set,
            "db patch applied"
        );

        row.ok_or_else(|| TrackaniError::NotFound("Item not found in list".to_string()))
    }
}
