use crate::db::models::{DbFavorite, DbListEntry};
use crate::db::schema::SQLITE_INIT;
use crate::error::TrackaniError;
use crate::identity::UserId;
use crate::patches::{DbPatchable, ListEntryUpdate};
use crate::validate::{ItemKey, ListEntryPatch, NewFavorite, NewListEntry};
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::{str::FromStr, time::Duration};
use tracing::info;
use trackani_schema::{Favorite, ItemType, ListEntry, ListStats, ListStatus};

/// Optional narrowing for [`DbActorHandle::list_entries`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub item_type: Option<ItemType>,
    pub status: Option<ListStatus>,
}

#[derive(Debug)]
pub enum DbActorMessage {
    /// All favorites of a user, newest first.
    ListFavorites(UserId, RpcReplyPort<Result<Vec<Favorite>, TrackaniError>>),

    /// Insert a favorite; duplicate key => `Conflict`.
    AddFavorite(
        UserId,
        NewFavorite,
        RpcReplyPort<Result<Favorite, TrackaniError>>,
    ),

    /// Delete a favorite and return it; missing => `NotFound`.
    RemoveFavorite(UserId, ItemKey, RpcReplyPort<Result<Favorite, TrackaniError>>),

    /// Presence check for a favorite.
    HasFavorite(UserId, ItemKey, RpcReplyPort<Result<bool, TrackaniError>>),

    /// List entries of a user, newest-updated first.
    ListEntries(
        UserId,
        ListFilter,
        RpcReplyPort<Result<Vec<ListEntry>, TrackaniError>>,
    ),

    /// Single list entry; missing => `NotFound`.
    GetEntry(UserId, ItemKey, RpcReplyPort<Result<ListEntry, TrackaniError>>),

    /// Insert a list entry; duplicate key => `Conflict`.
    AddEntry(
        UserId,
        NewListEntry,
        RpcReplyPort<Result<ListEntry, TrackaniError>>,
    ),

    /// Apply a partial update; missing => `NotFound`.
    UpdateEntry(ListEntryUpdate, RpcReplyPort<Result<ListEntry, TrackaniError>>),

    /// Delete a list entry and return it; missing => `NotFound`.
    RemoveEntry(UserId, ItemKey, RpcReplyPort<Result<ListEntry, TrackaniError>>),

    /// Per-status counts of a user's entries for one item type.
    Stats(UserId, ItemType, RpcReplyPort<Result<ListStats, TrackaniError>>),
}

/// Cloneable handle to the database actor.
///
/// Every method takes the authenticated user explicitly; no method can reach
/// another user's rows.
#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn list_favorites(&self, user: &UserId) -> Result<Vec<Favorite>, TrackaniError> {
        ractor::call!(self.actor, DbActorMessage::ListFavorites, user.clone()).map_err(|e| {
            TrackaniError::RactorError(format!("DbActor ListFavorites RPC failed: {e}"))
        })?
    }

    pub async fn add_favorite(
        &self,
        user: &UserId,
        favorite: NewFavorite,
    ) -> Result<Favorite, TrackaniError> {
        ractor::call!(
            self.actor,
            DbActorMessage::AddFavorite,
            user.clone(),
            favorite
        )
        .map_err(|e| TrackaniError::RactorError(format!("DbActor AddFavorite RPC failed: {e}")))?
    }

    pub async fn remove_favorite(
        &self,
        user: &UserId,
        key: ItemKey,
    ) -> Result<Favorite, TrackaniError> {
        ractor::call!(self.actor, DbActorMessage::RemoveFavorite, user.clone(), key).map_err(
            |e| TrackaniError::RactorError(format!("DbActor RemoveFavorite RPC failed: {e}")),
        )?
    }

    pub async fn has_favorite(&self, user: &UserId, key: ItemKey) -> Result<bool, TrackaniError> {
        ractor::call!(self.actor, DbActorMessage::HasFavorite, user.clone(), key).map_err(|e| {
            TrackaniError::RactorError(format!("DbActor HasFavorite RPC failed: {e}"))
        })?
    }

    pub async fn list_entries(
        &self,
        user: &UserId,
        filter: ListFilter,
    ) -> Result<Vec<ListEntry>, TrackaniError> {
        ractor::call!(self.actor, DbActorMessage::ListEntries, user.clone(), filter).map_err(
            |e| TrackaniError::RactorError(format!("DbActor ListEntries RPC failed: {e}")),
        )?
    }

    pub async fn get_entry(&self, user: &UserId, key: ItemKey) -> Result<ListEntry, TrackaniError> {
        ractor::call!(self.actor, DbActorMessage::GetEntry, user.clone(), key)
            .map_err(|e| TrackaniError::RactorError(format!("DbActor GetEntry RPC failed: {e}")))?
    }

    pub async fn add_entry(
        &self,
        user: &UserId,
        entry: NewListEntry,
    ) -> Result<ListEntry, TrackaniError> {
        ractor::call!(self.actor, DbActorMessage::AddEntry, user.clone(), entry)
            .map_err(|e| TrackaniError::RactorError(format!("DbActor AddEntry RPC failed: {e}")))?
    }

    pub async fn update_entry(
        &self,
        user: &UserId,
        key: ItemKey,
        patch: ListEntryPatch,
    ) -> Result<ListEntry, TrackaniError> {
        let update = ListEntryUpdate {
            user: user.clone(),
            key,
            patch,
        };
        ractor::call!(self.actor, DbActorMessage::UpdateEntry, update).map_err(|e| {
            TrackaniError::RactorError(format!("DbActor UpdateEntry RPC failed: {e}"))
        })?
    }

    pub async fn remove_entry(
        &self,
        user: &UserId,
        key: ItemKey,
    ) -> Result<ListEntry, TrackaniError> {
        ractor::call!(self.actor, DbActorMessage::RemoveEntry, user.clone(), key).map_err(|e| {
            TrackaniError::RactorError(format!("DbActor RemoveEntry RPC failed: {e}"))
        })?
    }

    pub async fn list_stats(
        &self,
        user: &UserId,
        item_type: ItemType,
    ) -> Result<ListStats, TrackaniError> {
        ractor::call!(self.actor, DbActorMessage::Stats, user.clone(), item_type)
            .map_err(|e| TrackaniError::RactorError(format!("DbActor Stats RPC failed: {e}")))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let pool = &state.pool;
        match message {
            DbActorMessage::ListFavorites(user, reply) => {
                let _ = reply.send(self.list_favorites(pool, &user).await);
            }
            DbActorMessage::AddFavorite(user, favorite, reply) => {
                let _ = reply.send(self.add_favorite(pool, &user, favorite).await);
            }
            DbActorMessage::RemoveFavorite(user, key, reply) => {
                let _ = reply.send(self.remove_favorite(pool, &user, &key).await);
            }
            DbActorMessage::HasFavorite(user, key, reply) => {
                let _ = reply.send(self.has_favorite(pool, &user, &key).await);
            }
            DbActorMessage::ListEntries(user, filter, reply) => {
                let _ = reply.send(self.list_entries(pool, &user, filter).await);
            }
            DbActorMessage::GetEntry(user, key, reply) => {
                let _ = reply.send(self.get_entry(pool, &user, &key).await);
            }
            DbActorMessage::AddEntry(user, entry, reply) => {
                let _ = reply.send(self.add_entry(pool, &user, entry).await);
            }
            DbActorMessage::UpdateEntry(update, reply) => {
                let res = update
                    .apply_patch(pool)
                    .await
                    .and_then(ListEntry::try_from);
                let _ = reply.send(res);
            }
            DbActorMessage::RemoveEntry(user, key, reply) => {
                let _ = reply.send(self.remove_entry(pool, &user, &key).await);
            }
            DbActorMessage::Stats(user, item_type, reply) => {
                let _ = reply.send(self.list_stats(pool, &user, item_type).await);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn list_favorites(
        &self,
        pool: &SqlitePool,
        user: &UserId,
    ) -> Result<Vec<Favorite>, TrackaniError> {
        let rows = sqlx::query_as::<_, DbFavorite>(
            r#"
        SELECT id, user_id, item_id, item_type, added_at
        FROM favorites
        WHERE user_id = ?
        ORDER BY added_at DESC, id DESC
        "#,
        )
        .bind(user.as_str())
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(Favorite::try_from).collect()
    }

    async fn add_favorite(
        &self,
        pool: &SqlitePool,
        user: &UserId,
        favorite: NewFavorite,
    ) -> Result<Favorite, TrackaniError> {
        let now = Utc::now();
        let ItemKey { item_id, item_type } = favorite.key;

        let row = sqlx::query_as::<_, DbFavorite>(
            r#"
        INSERT INTO favorites (user_id, item_id, item_type, added_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, item_id, item_type, added_at
        "#,
        )
        .bind(user.as_str())
        .bind(item_id)
        .bind(item_type.as_str())
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(|e| conflict_or(e, "Already in favorites"))?;

        Favorite::try_from(row)
    }

    async fn remove_favorite(
        &self,
        pool: &SqlitePool,
        user: &UserId,
        key: &ItemKey,
    ) -> Result<Favorite, TrackaniError> {
        let row = sqlx::query_as::<_, DbFavorite>(
            r#"
        DELETE FROM favorites
        WHERE user_id = ? AND item_id = ? AND item_type = ?
        RETURNING id, user_id, item_id, item_type, added_at
        "#,
        )
        .bind(user.as_str())
        .bind(key.item_id.as_str())
        .bind(key.item_type.as_str())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| TrackaniError::NotFound("Favorite not found".to_string()))?;

        Favorite::try_from(row)
    }

    async fn has_favorite(
        &self,
        pool: &SqlitePool,
        user: &UserId,
        key: &ItemKey,
    ) -> Result<bool, TrackaniError> {
        let exists: bool = sqlx::query_scalar(
            r#"
        SELECT EXISTS(
            SELECT 1 FROM favorites
            WHERE user_id = ? AND item_id = ? AND item_type = ?
        )
        "#,
        )
        .bind(user.as_str())
        .bind(key.item_id.as_str())
        .bind(key.item_type.as_str())
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    async fn list_entries(
        &self,
        pool: &SqlitePool,
        user: &UserId,
        filter: ListFilter,
    ) -> Result<Vec<ListEntry>, TrackaniError> {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT id, user_id, item_id, item_type, status, progress, rating, notes, added_at, updated_at \
             FROM list_entries WHERE user_id = ",
        );
        qb.push_bind(user.as_str());
        if let Some(item_type) = filter.item_type {
            qb.push(" AND item_type = ").push_bind(item_type.as_str());
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        qb.push(" ORDER BY updated_at DESC, id DESC");

        let rows = qb.build_query_as::<DbListEntry>().fetch_all(pool).await?;

        rows.into_iter().map(ListEntry::try_from).collect()
    }

    async fn get_entry(
        &self,
        pool: &SqlitePool,
        user: &UserId,
        key: &ItemKey,
    ) -> Result<ListEntry, TrackaniError> {
        let row = sqlx::query_as::<_, DbListEntry>(
            r#"
        SELECT id, user_id, item_id, item_type, status, progress, rating, notes, added_at, updated_at
        FROM list_entries
        WHERE user_id = ? AND item_id = ? AND item_type = ?
        "#,
        )
        .bind(user.as_str())
        .bind(key.item_id.as_str())
        .bind(key.item_type.as_str())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| TrackaniError::NotFound("Item not found in list".to_string()))?;

        ListEntry::try_from(row)
    }

    async fn add_entry(
        &self,
        pool: &SqlitePool,
        user: &UserId,
        entry: NewListEntry,
    ) -> Result<ListEntry, TrackaniError> {
        let now = Utc::now();
        let NewListEntry {
            key: ItemKey { item_id, item_type },
            status,
            progress,
            rating,
            notes,
        } = entry;

        let row = sqlx::query_as::<_, DbListEntry>(
            r#"
        INSERT INTO list_entries (
            user_id, item_id, item_type, status, progress, rating, notes, added_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, item_id, item_type, status, progress, rating, notes, added_at, updated_at
        "#,
        )
        .bind(user.as_str())
        .bind(item_id)
        .bind(item_type.as_str())
        .bind(status.as_str())
        .bind(i64::from(progress))
        .bind(rating.map(i64::from))
        .bind(notes)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(|e| conflict_or(e, "Item already in list"))?;

        ListEntry::try_from(row)
    }

    async fn remove_entry(
        &self,
        pool: &SqlitePool,
        user: &UserId,
        key: &ItemKey,
    ) -> Result<ListEntry, TrackaniError> {
        let row = sqlx::query_as::<_, DbListEntry>(
            r#"
        DELETE FROM list_entries
        WHERE user_id = ? AND item_id = ? AND item_type = ?
        RETURNING id, user_id, item_id, item_type, status, progress, rating, notes, added_at, updated_at
        "#,
        )
        .bind(user.as_str())
        .bind(key.item_id.as_str())
        .bind(key.item_type.as_str())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| TrackaniError::NotFound("Item not found in list".to_string()))?;

        ListEntry::try_from(row)
    }

    async fn list_stats(
        &self,
        pool: &SqlitePool,
        user: &UserId,
        item_type: ItemType,
    ) -> Result<ListStats, TrackaniError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
        SELECT status, COUNT(*) AS count
        FROM list_entries
        WHERE user_id = ? AND item_type = ?
        GROUP BY status
        "#,
        )
        .bind(user.as_str())
        .bind(item_type.as_str())
        .fetch_all(pool)
        .await?;

        rows.into_iter()
            .map(|(status, count)| -> Result<(ListStatus, u64), TrackaniError> {
                let status = status.parse::<ListStatus>().map_err(|e| {
                    TrackaniError::UnexpectedError(format!("invalid status in list_entries: {e}"))
                })?;
                let count = u64::try_from(count).map_err(|_| {
                    TrackaniError::UnexpectedError(format!("negative count {count} for {status}"))
                })?;
                Ok((status, count))
            })
            .collect()
    }
}

/// Maps a unique-key violation to `Conflict`; everything else stays a database error.
fn conflict_or(err: sqlx::Error, conflict_message: &str) -> TrackaniError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            TrackaniError::Conflict(conflict_message.to_string())
        }
        other => TrackaniError::DatabaseError(other),
    }
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, TrackaniError> {
    let (actor, _jh) = Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .map_err(|e| TrackaniError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), TrackaniError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
