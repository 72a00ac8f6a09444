use crate::db::ListFilter;
use crate::error::TrackaniError;
use crate::identity::UserId;
use crate::server::guards::auth::RequireUser;
use crate::server::router::TrackaniState;
use crate::utils::logging::debug_record;
use crate::validate::{self, ItemKey};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use tracing::info;
use trackani_schema::{
    AddListEntryRequest, ItemType, ListEntry, ListQuery, ListStats, ListStatus, RemovedListEntry,
    UpdateListEntryRequest,
};

const MSG_NOT_IN_LIST: &str = "Item not found in list";
/// Fixed segment of the stats route. An entry may still use it as its item id.
const STATS_SEGMENT: &str = "stats";

pub fn router() -> Router<TrackaniState> {
    Router::new()
        .route("/list", get(list_entries).post(add_entry))
        .route(
            "/list/stats/{item_type}",
            get(list_stats)
                .patch(update_stats_named_entry)
                .delete(remove_stats_named_entry),
        )
        .route(
            "/list/{item_id}/{item_type}",
            get(get_entry).patch(update_entry).delete(remove_entry),
        )
}

fn path_key(item_id: String, item_type: &str) -> Result<ItemKey, TrackaniError> {
    ItemKey::from_path(item_id, item_type)
        .ok_or_else(|| TrackaniError::NotFound(MSG_NOT_IN_LIST.to_string()))
}

/// GET /api/list?itemType=&status=
///
/// Filter values that name no known type or status match nothing.
pub async fn list_entries(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ListEntry>>, TrackaniError> {
    let Query(query) = query?;
    let item_type = query.item_type.filter(|s| !s.is_empty());
    let status = query.status.filter(|s| !s.is_empty());

    let filter = ListFilter {
        item_type: match item_type.as_deref().map(str::parse::<ItemType>) {
            Some(Ok(t)) => Some(t),
            Some(Err(_)) => return Ok(Json(Vec::new())),
            None => None,
        },
        status: match status.as_deref().map(str::parse::<ListStatus>) {
            Some(Ok(s)) => Some(s),
            Some(Err(_)) => return Ok(Json(Vec::new())),
            None => None,
        },
    };

    let entries = state.db.list_entries(&user, filter).await?;
    Ok(Json(entries))
}

/// GET /api/list/stats/{item_type}
pub async fn list_stats(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ListStats>, TrackaniError> {
    let Path(item_type) = path?;
    let Ok(item_type) = item_type.parse::<ItemType>() else {
        return Ok(Json(ListStats::new()));
    };
    let stats = state.db.list_stats(&user, item_type).await?;
    Ok(Json(stats))
}

/// GET /api/list/{item_id}/{item_type}
pub async fn get_entry(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<ListEntry>, TrackaniError> {
    let Path((item_id, item_type)) = path?;
    let key = path_key(item_id, &item_type)?;
    let entry = state.db.get_entry(&user, key).await?;
    Ok(Json(entry))
}

/// POST /api/list
pub async fn add_entry(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    payload: Result<Json<AddListEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ListEntry>), TrackaniError> {
    let Json(body) = payload?;
    let new = validate::new_list_entry(body)?;

    let entry = state.db.add_entry(&user, new).await?;
    debug_record("List", "Created record", &entry);
    info!(
        user_id = %user,
        item_id = %entry.item_id,
        item_type = %entry.item_type,
        status = %entry.status,
        "List entry added"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PATCH /api/list/{item_id}/{item_type}
pub async fn update_entry(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    path: Result<Path<(String, String)>, PathRejection>,
    payload: Result<Json<UpdateListEntryRequest>, JsonRejection>,
) -> Result<Json<ListEntry>, TrackaniError> {
    let Path((item_id, item_type)) = path?;
    apply_update(&state, &user, item_id, &item_type, payload).await
}

/// PATCH /api/list/stats/{item_type}, for an entry whose item id is `stats`.
pub async fn update_stats_named_entry(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateListEntryRequest>, JsonRejection>,
) -> Result<Json<ListEntry>, TrackaniError> {
    let Path(item_type) = path?;
    apply_update(&state, &user, STATS_SEGMENT.to_string(), &item_type, payload).await
}

/// Body is validated before the key is looked up, so an invalid field is a
/// 400 whether or not the entry exists, and the stored entry is untouched.
async fn apply_update(
    state: &TrackaniState,
    user: &UserId,
    item_id: String,
    item_type: &str,
    payload: Result<Json<UpdateListEntryRequest>, JsonRejection>,
) -> Result<Json<ListEntry>, TrackaniError> {
    let Json(body) = payload?;
    let patch = validate::list_entry_patch(body)?;
    let key = path_key(item_id, item_type)?;

    let entry = state.db.update_entry(user, key, patch).await?;
    info!(
        user_id = %user,
        item_id = %entry.item_id,
        item_type = %entry.item_type,
        status = %entry.status,
        progress = entry.progress,
        "List entry updated"
    );
    Ok(Json(entry))
}

/// DELETE /api/list/{item_id}/{item_type}
pub async fn remove_entry(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<RemovedListEntry>, TrackaniError> {
    let Path((item_id, item_type)) = path?;
    apply_remove(&state, &user, item_id, &item_type).await
}

/// DELETE /api/list/stats/{item_type}, for an entry whose item id is `stats`.
pub async fn remove_stats_named_entry(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<RemovedListEntry>, TrackaniError> {
    let Path(item_type) = path?;
    apply_remove(&state, &user, STATS_SEGMENT.to_string(), &item_type).await
}

async fn apply_remove(
    state: &TrackaniState,
    user: &UserId,
    item_id: String,
    item_type: &str,
) -> Result<Json<RemovedListEntry>, TrackaniError> {
    let key = path_key(item_id, item_type)?;

    let entry = state.db.remove_entry(user, key).await?;
    info!(
        user_id = %user,
        item_id = %entry.item_id,
        item_type = %entry.item_type,
        "List entry removed"
    );
    Ok(Json(RemovedListEntry {
        message: "Removed from list".to_string(),
        list_item: entry,
    }))
}
