//! Caller identity extractor.
//!
//! Authentication and role resolution happen upstream (API gateway /
//! session service); by the time a request reaches this service the
//! gateway has verified the session and forwards the caller's user ID in
//! the `x-pawlink-user` header. This extractor only parses that header --
//! it performs no credential checks of its own.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use pawlink_core::error::CoreError;
use pawlink_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the authenticated caller's user ID.
pub const USER_ID_HEADER: &str = "x-pawlink-user";

/// The authenticated caller. Rejects with 401 if the gateway header is
/// missing or malformed.
///
/// ```ignore
/// async fn submit(Identity(user_id): Identity) -> AppResult<Json<()>> {
///     // user_id is the verified caller here
///     Ok(Json(()))
/// }
/// ```
pub struct Identity(pub DbId);

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<DbId>().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing or invalid {USER_ID_HEADER} header"
                )))
            })?;
        Ok(Identity(user_id))
    }
}
