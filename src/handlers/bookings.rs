use std::sync::LazyLock;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use regex::Regex;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::AppState;
use crate::clients::here::ProviderResponse;
use crate::entities::booking;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;

/// Shape of a provider place id, e.g. here:pds:place:528u1hcg-8447fa…
static PLACE_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^here:pds:place:[0-9A-Za-z]+-[0-9A-Za-z]+$").unwrap()
});

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub place_id: String,
    pub place_title: Option<String>,
    pub time_booked: DateTime<Utc>,
    pub cost: Option<f64>,
}

impl From<booking::Model> for BookingResponse {
    fn from(b: booking::Model) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            place_id: b.place_id,
            place_title: b.place_title,
            time_booked: b.time_booked.with_timezone(&Utc),
            cost: b.cost,
        }
    }
}

/// POST /bookings — book a place for the authenticated caller.
///
/// The place id is confirmed against the provider before anything is
/// persisted; a booking never references an id the provider has not
/// answered 200 for.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<Value>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    let place_id = validate_booking_payload(&payload)?;

    let place = match state.places.lookup(place_id).await {
        ProviderResponse::Ok(place) => place,
        failure => return Err(lookup_error(place_id, failure)),
    };

    let title = place
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string);

    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(claims.sub),
        place_id: Set(place_id.to_string()),
        place_title: Set(title),
        cost: Set(None),
        ..Default::default()
    };

    // A persistence failure propagates as AppError::Db, never disguised
    // as a provider failure
    let booking = new_booking.insert(state.db.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// GET /properties/{property_id}/bookings — booking history for a place.
///
/// Existing bookings are returned regardless of current provider state:
/// history outlives place availability. The provider is only consulted to
/// tell an unused id apart from an invalid one.
pub async fn place_bookings(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> AppResult<Json<Value>> {
    if !PLACE_ID_PATTERN.is_match(&property_id) {
        return Err(AppError::BadRequest(format!(
            "'{}' is not a valid place id",
            property_id
        )));
    }

    let bookings = booking::Entity::find()
        .filter(booking::Column::PlaceId.eq(&property_id))
        .all(state.db.as_ref())
        .await?;

    if !bookings.is_empty() {
        let result: Vec<BookingResponse> =
            bookings.into_iter().map(BookingResponse::from).collect();
        return Ok(Json(json!({ "result": result })));
    }

    match state.places.lookup(&property_id).await {
        ProviderResponse::Ok(_) => Ok(Json(json!({
            "message": format!("No booking was found for the place {}", property_id),
            "result": [],
        }))),
        failure => Err(lookup_error(&property_id, failure)),
    }
}

/// Canonical mapping of a failed place lookup, shared by booking creation
/// and booking history. 400/404 mean the id is invalid; any other client
/// error (e.g. a rejected API key) is not the caller's fault.
fn lookup_error(place_id: &str, response: ProviderResponse) -> AppError {
    match response {
        // Callers consume the 200 payload before reaching here
        ProviderResponse::Ok(_) => {
            AppError::Internal("successful lookup passed to lookup_error".to_string())
        }
        ProviderResponse::ClientError {
            status: 400 | 404, ..
        } => AppError::NotFound(format!("No place with id {} was found", place_id)),
        ProviderResponse::ClientError { status, .. } => {
            tracing::warn!(status, "provider rejected lookup request");
            AppError::UpstreamUnavailable("The place provider rejected the request".to_string())
        }
        ProviderResponse::ServerError(status) => {
            tracing::warn!(status, "provider error during lookup");
            AppError::UpstreamUnavailable(
                "The place provider is currently unavailable, please retry shortly".to_string(),
            )
        }
        ProviderResponse::ConnectionFailure => {
            AppError::UpstreamUnavailable("Could not reach the place provider".to_string())
        }
    }
}

/// The booking payload must be an object holding exactly one field,
/// `place_id`, with a non-empty string value.
fn validate_booking_payload(payload: &Value) -> Result<&str, AppError> {
    let object = payload
        .as_object()
        .ok_or_else(|| AppError::BadRequest("Expected a JSON object".to_string()))?;

    let place_id = object
        .get("place_id")
        .ok_or_else(|| AppError::BadRequest("Missing required field 'place_id'".to_string()))?;

    if object.len() > 1 {
        return Err(AppError::BadRequest(
            "'place_id' is the only accepted field".to_string(),
        ));
    }

    let place_id = place_id
        .as_str()
        .ok_or_else(|| AppError::BadRequest("'place_id' must be a string".to_string()))?;

    if place_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "'place_id' must not be empty".to_string(),
        ));
    }

    Ok(place_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_payload() {
        let payload = json!({"place_id": "here:pds:place:abc-def"});
        assert_eq!(
            validate_booking_payload(&payload).unwrap(),
            "here:pds:place:abc-def"
        );
    }

    #[test]
    fn rejects_missing_place_id() {
        assert!(validate_booking_payload(&json!({})).is_err());
        assert!(validate_booking_payload(&json!({"id": "x"})).is_err());
    }

    #[test]
    fn rejects_empty_place_id() {
        assert!(validate_booking_payload(&json!({"place_id": ""})).is_err());
        assert!(validate_booking_payload(&json!({"place_id": "   "})).is_err());
    }

    #[test]
    fn rejects_extra_fields() {
        let payload = json!({"place_id": "here:pds:place:abc-def", "cost": 10});
        assert!(validate_booking_payload(&payload).is_err());
    }

    #[test]
    fn rejects_non_string_place_id() {
        assert!(validate_booking_payload(&json!({"place_id": 42})).is_err());
        assert!(validate_booking_payload(&json!({"place_id": null})).is_err());
        assert!(validate_booking_payload(&json!("place_id")).is_err());
    }

    #[test]
    fn lookup_error_maps_invalid_ids_to_not_found() {
        for status in [400, 404] {
            let err = lookup_error(
                "here:pds:place:abc-def",
                ProviderResponse::ClientError {
                    status,
                    reason: None,
                },
            );
            assert!(matches!(err, AppError::NotFound(_)), "status {}", status);
        }
    }

    #[test]
    fn lookup_error_maps_other_client_errors_upstream() {
        // A provider 429 or rejected API key is not the caller's fault
        for status in [401, 403, 429] {
            let err = lookup_error(
                "here:pds:place:abc-def",
                ProviderResponse::ClientError {
                    status,
                    reason: None,
                },
            );
            assert!(
                matches!(err, AppError::UpstreamUnavailable(_)),
                "status {}",
                status
            );
        }
    }

    #[test]
    fn lookup_error_maps_provider_faults_upstream() {
        assert!(matches!(
            lookup_error("here:pds:place:abc-def", ProviderResponse::ServerError(503)),
            AppError::UpstreamUnavailable(_)
        ));
        assert!(matches!(
            lookup_error("here:pds:place:abc-def", ProviderResponse::ConnectionFailure),
            AppError::UpstreamUnavailable(_)
        ));
    }

    #[test]
    fn place_id_pattern_matches_provider_ids() {
        assert!(PLACE_ID_PATTERN.is_match("here:pds:place:528u1hcg-8447fa2f08874b1a9a4c22304bcf331b"));
        assert!(!PLACE_ID_PATTERN.is_match("here:pds:place:528u1hcg"));
        assert!(!PLACE_ID_PATTERN.is_match("osm:node:12345-67890"));
        assert!(!PLACE_ID_PATTERN.is_match("here:pds:place:abc-def; DROP TABLE booking"));
        assert!(!PLACE_ID_PATTERN.is_match(""));
    }
}
