use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::{Value, json};

use crate::AppState;
use crate::clients::here::ProviderResponse;
use crate::error::{AppError, AppResult};
use crate::utils::geo::Coordinate;

const NEARBY_QUERY_LIMIT: u32 = 20;
const PROPERTY_TYPE: &str = "hotel";

/// GET /properties?at=LAT,LON — discover hotels around a coordinate.
///
/// `at` must be the only query parameter; validation settles before any
/// provider call is made.
pub async fn nearby_places(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<Value>> {
    let at = require_at_param(&params)?;
    let coordinate = Coordinate::parse(at)?;

    match state
        .places
        .discover(coordinate, NEARBY_QUERY_LIMIT, PROPERTY_TYPE)
        .await
    {
        ProviderResponse::Ok(payload) => Ok(Json(json!({
            "message": {
                "coordinate": coordinate,
                "query_limit": NEARBY_QUERY_LIMIT,
            },
            "result": payload,
        }))),
        ProviderResponse::ClientError { status, reason } => {
            tracing::debug!(status, "provider rejected discover request");
            Err(AppError::BadRequest(reason.unwrap_or_else(|| {
                "The place provider rejected the supplied coordinate".to_string()
            })))
        }
        ProviderResponse::ServerError(status) => {
            tracing::warn!(status, "provider error during discover");
            Err(AppError::UpstreamUnavailable(
                "The place provider is currently unavailable, please retry shortly".to_string(),
            ))
        }
        ProviderResponse::ConnectionFailure => Err(AppError::UpstreamUnavailable(
            "Could not reach the place provider".to_string(),
        )),
    }
}

fn require_at_param(params: &HashMap<String, String>) -> Result<&str, AppError> {
    let at = params.get("at").ok_or_else(|| {
        AppError::BadRequest(
            "Missing required query parameter 'at' (format: ?at=LAT,LON)".to_string(),
        )
    })?;

    if params.len() > 1 {
        return Err(AppError::BadRequest(
            "'at' is the only accepted query parameter".to_string(),
        ));
    }

    Ok(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn accepts_single_at_param() {
        let params = params(&[("at", "45,45")]);
        assert_eq!(require_at_param(&params).unwrap(), "45,45");
    }

    #[test]
    fn rejects_missing_at_param() {
        assert!(require_at_param(&params(&[])).is_err());
        assert!(require_at_param(&params(&[("q", "hotel")])).is_err());
    }

    #[test]
    fn rejects_extra_params() {
        let params = params(&[("at", "45,45"), ("extra", "x")]);
        assert!(require_at_param(&params).is_err());
    }
}
