use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error as ThisError;
use trackani_schema::ErrorBody;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum TrackaniError {
    /// Missing field, unknown enum value or out-of-range number in a request.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A record already exists for the (user, item id, item type) key.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl TrackaniError {
    pub fn status(&self) -> StatusCode {
        match self {
            TrackaniError::Validation(_) | TrackaniError::Conflict(_) => StatusCode::BAD_REQUEST,
            TrackaniError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackaniError::DatabaseError(_)
            | TrackaniError::RactorError(_)
            | TrackaniError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TrackaniError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match self {
            TrackaniError::Validation(message)
            | TrackaniError::Conflict(message)
            | TrackaniError::NotFound(message) => ErrorBody::new(message),

            internal @ (TrackaniError::DatabaseError(_)
            | TrackaniError::RactorError(_)
            | TrackaniError::UnexpectedError(_)) => {
                error!(error = %internal, "request failed with internal error");
                ErrorBody::new("An internal server error occurred.")
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for TrackaniError {
    fn from(rejection: JsonRejection) -> Self {
        TrackaniError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for TrackaniError {
    fn from(rejection: PathRejection) -> Self {
        TrackaniError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for TrackaniError {
    fn from(rejection: QueryRejection) -> Self {
        TrackaniError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: TrackaniError) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn client_errors_carry_their_message() {
        let (status, body) = body_of(TrackaniError::Conflict("Already in favorites".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"error":"Already in favorites"}"#);

        let (status, body) = body_of(TrackaniError::NotFound("Favorite not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, r#"{"error":"Favorite not found"}"#);
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let (status, body) =
            body_of(TrackaniError::UnexpectedError("bad row in list_entries".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"An internal server error occurred."}"#);
    }
}
