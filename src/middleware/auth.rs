use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use sea_orm::EntityTrait;

use crate::AppState;
use crate::entities::session;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::verify_token;

/// Extract and validate the JWT from the Authorization header, then check
/// the backing session row still exists. A logged-out token verifies fine
/// cryptographically but has no session row, so it is rejected here.
///
/// The header is extracted as an `Option` so that a missing or non-Bearer
/// header is our 401, not the extractor's built-in 400.
pub async fn auth_middleware(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let TypedHeader(auth) = auth.ok_or_else(|| {
        AppError::Unauthorized("Missing Bearer token in Authorization header".to_string())
    })?;

    let claims = verify_token(auth.token(), &state.config.jwt_secret)?;

    let session = session::Entity::find_by_id(claims.jti)
        .one(state.db.as_ref())
        .await?;
    if session.is_none() {
        return Err(AppError::Unauthorized(
            "Session is no longer valid".to_string(),
        ));
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
