use crate::error::TrackaniError;
use crate::server::guards::auth::RequireUser;
use crate::server::router::TrackaniState;
use crate::utils::logging::debug_record;
use crate::validate::{self, ItemKey};
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::{delete, get},
};
use tracing::info;
use trackani_schema::{AddFavoriteRequest, Favorite, FavoriteCheck, RemovedFavorite};

pub fn router() -> Router<TrackaniState> {
    Router::new()
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/{item_id}/{item_type}", delete(remove_favorite))
        .route(
            "/favorites/check/{item_id}/{item_type}",
            get(check_favorite),
        )
}

/// GET /api/favorites
pub async fn list_favorites(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<Favorite>>, TrackaniError> {
    let favorites = state.db.list_favorites(&user).await?;
    Ok(Json(favorites))
}

/// POST /api/favorites
pub async fn add_favorite(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    payload: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Favorite>), TrackaniError> {
    let Json(body) = payload?;
    let new = validate::new_favorite(body)?;

    let favorite = state.db.add_favorite(&user, new).await?;
    debug_record("Favorites", "Created record", &favorite);
    info!(
        user_id = %user,
        item_id = %favorite.item_id,
        item_type = %favorite.item_type,
        "Favorite added"
    );
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /api/favorites/{item_id}/{item_type}
pub async fn remove_favorite(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<RemovedFavorite>, TrackaniError> {
    let Path((item_id, item_type)) = path?;
    let key = ItemKey::from_path(item_id, &item_type)
        .ok_or_else(|| TrackaniError::NotFound("Favorite not found".to_string()))?;

    let favorite = state.db.remove_favorite(&user, key).await?;
    info!(
        user_id = %user,
        item_id = %favorite.item_id,
        item_type = %favorite.item_type,
        "Favorite removed"
    );
    Ok(Json(RemovedFavorite {
        message: "Removed from favorites".to_string(),
        favorite,
    }))
}

/// GET /api/favorites/check/{item_id}/{item_type}
pub async fn check_favorite(
    State(state): State<TrackaniState>,
    RequireUser(user): RequireUser,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<FavoriteCheck>, TrackaniError> {
    let Path((item_id, item_type)) = path?;
    let is_favorite = match ItemKey::from_path(item_id, &item_type) {
        Some(key) => state.db.has_favorite(&user, key).await?,
        None => false,
    };
    Ok(Json(FavoriteCheck { is_favorite }))
}
