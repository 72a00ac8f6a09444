use crate::error::IdentityError;
use crate::identity::UserId;
use crate::server::router::TrackaniState;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;
use trackani_schema::ErrorBody;

/// Resolves `Authorization: Bearer <token>` to the calling user.
///
/// Handlers take this as an argument; the wrapped [`UserId`] is the only
/// identity that ever reaches the store.
#[derive(Debug, Clone)]
pub struct RequireUser(pub UserId);

impl FromRequestParts<TrackaniState> for RequireUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &TrackaniState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth) = parts.headers.typed_get::<Authorization<Bearer>>() else {
            return Err(AuthError::MissingToken);
        };
        let token = auth.token();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        match state.identity.verify(token).await {
            Ok(user) => Ok(RequireUser(user)),
            Err(IdentityError::Rejected(status)) => {
                warn!(%status, "Bearer token rejected by identity provider");
                Err(AuthError::InvalidToken)
            }
            Err(e) => {
                warn!(error = %e, "Bearer token verification failed");
                Err(AuthError::VerificationFailed)
            }
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    /// No header, or a scheme other than Bearer.
    MissingToken,
    /// Identity provider refused the token (expired, revoked, bad signature).
    InvalidToken,
    /// Identity provider could not be asked or answered nonsense.
    VerificationFailed,
}

impl AuthError {
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "No authorization token provided",
            AuthError::InvalidToken => "Invalid or expired token",
            AuthError::VerificationFailed => "Authentication failed",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(ErrorBody::new(self.reason()))).into_response()
    }
}
