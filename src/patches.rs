//! Crate-private patch types shared between the DB actor and its callers.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::identity::UserId;
use crate::validate::{ItemKey, ListEntryPatch};

/// Abstraction for applying a patch envelope to the database.
#[async_trait]
pub trait DbPatchable {
    type Output;

    async fn apply_patch(&self, pool: &SqlitePool)
    -> Result<Self::Output, crate::error::TrackaniError>;
}

/// A validated partial update addressed to one of `user`'s list entries.
#[derive(Debug, Clone)]
pub struct ListEntryUpdate {
    pub user: UserId,
    pub key: ItemKey,
    pub patch: ListEntryPatch,
}
