use serde_json::Value;

use crate::config::Config;
use crate::utils::geo::Coordinate;

/// Canonical classification of a provider call. Every handler consumes this
/// instead of raw HTTP statuses, so the provider contract is interpreted in
/// exactly one place.
#[derive(Debug)]
pub enum ProviderResponse {
    /// HTTP 200 with the parsed JSON payload.
    Ok(Value),
    /// 4xx; `reason` is the provider-supplied explanation when one exists.
    ClientError { status: u16, reason: Option<String> },
    /// 5xx, or any status outside the documented contract.
    ServerError(u16),
    /// Network-level failure, no response received.
    ConnectionFailure,
}

/// Client for the HERE discover/lookup endpoints. The API key and base URLs
/// are injected from configuration; nothing here reads ambient state.
///
/// Calls carry no retry or timeout policy: one failed provider call becomes
/// one failed API response.
#[derive(Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    api_key: String,
    discover_url: String,
    lookup_url: String,
}

impl PlacesClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("hotel-booking-backend/0.1")
                .build()
                .expect("Failed to build HTTP client"),
            api_key: config.here_api_key.clone(),
            discover_url: config.here_discover_url.clone(),
            lookup_url: config.here_lookup_url.clone(),
        }
    }

    /// Search for places around a coordinate.
    pub async fn discover(&self, at: Coordinate, limit: u32, keyword: &str) -> ProviderResponse {
        let request = self.http.get(&self.discover_url).query(&[
            ("at", format!("{},{}", at.lat, at.lon)),
            ("limit", limit.to_string()),
            ("q", keyword.to_string()),
            ("apiKey", self.api_key.clone()),
        ]);

        self.execute(request).await
    }

    /// Direct lookup of a place by its provider-issued id.
    pub async fn lookup(&self, place_id: &str) -> ProviderResponse {
        let request = self.http.get(&self.lookup_url).query(&[
            ("id", place_id.to_string()),
            ("apiKey", self.api_key.clone()),
        ]);

        self.execute(request).await
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> ProviderResponse {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("place provider unreachable: {}", e);
                return ProviderResponse::ConnectionFailure;
            }
        };

        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        classify(status, body)
    }
}

pub fn classify(status: u16, body: Value) -> ProviderResponse {
    match status {
        200 => ProviderResponse::Ok(body),
        400..=499 => ProviderResponse::ClientError {
            status,
            reason: error_reason(&body),
        },
        _ => ProviderResponse::ServerError(status),
    }
}

/// Pull the human-readable explanation out of a provider error body.
/// HERE error payloads carry an "action" hint; older shapes only a "title".
fn error_reason(body: &Value) -> Option<String> {
    body.get("action")
        .or_else(|| body.get("title"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_success() {
        let payload = json!({"items": [{"title": "Hotel Mercure"}]});
        match classify(200, payload.clone()) {
            ProviderResponse::Ok(body) => assert_eq!(body, payload),
            other => panic!("expected Ok, got {:?}", other),
        }
    }

    #[test]
    fn classifies_client_error_with_action() {
        let body = json!({
            "status": 400,
            "title": "Coordinates out of range",
            "action": "Supply a latitude between -90 and 90"
        });
        match classify(400, body) {
            ProviderResponse::ClientError { status, reason } => {
                assert_eq!(status, 400);
                assert_eq!(
                    reason.as_deref(),
                    Some("Supply a latitude between -90 and 90")
                );
            }
            other => panic!("expected ClientError, got {:?}", other),
        }
    }

    #[test]
    fn falls_back_to_title_when_action_missing() {
        let body = json!({"status": 404, "title": "Not found"});
        match classify(404, body) {
            ProviderResponse::ClientError { status, reason } => {
                assert_eq!(status, 404);
                assert_eq!(reason.as_deref(), Some("Not found"));
            }
            other => panic!("expected ClientError, got {:?}", other),
        }
    }

    #[test]
    fn classifies_client_error_without_reason() {
        match classify(429, Value::Null) {
            ProviderResponse::ClientError { status, reason } => {
                assert_eq!(status, 429);
                assert!(reason.is_none());
            }
            other => panic!("expected ClientError, got {:?}", other),
        }
    }

    #[test]
    fn classifies_server_errors() {
        assert!(matches!(
            classify(500, Value::Null),
            ProviderResponse::ServerError(500)
        ));
        assert!(matches!(
            classify(503, Value::Null),
            ProviderResponse::ServerError(503)
        ));
    }

    #[test]
    fn treats_unexpected_statuses_as_provider_faults() {
        assert!(matches!(
            classify(302, Value::Null),
            ProviderResponse::ServerError(302)
        ));
    }
}
