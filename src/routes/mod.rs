use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::AppState;
use crate::handlers::{auth, bookings, places};
use crate::middleware::auth::auth_middleware;
use crate::middleware::rate_limit::{create_public_governor, create_user_governor};

pub fn create_router(state: AppState) -> Router {
    // IP-based governor for anonymous routes
    let public_governor = create_public_governor();
    // Per-user governor for authenticated routes
    let user_governor = create_user_governor();

    // Account routes (anonymous)
    let account_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Place discovery and booking history (anonymous)
    let place_routes = Router::new()
        .route("/properties", get(places::nearby_places))
        .route(
            "/properties/{property_id}/bookings",
            get(bookings::place_bookings),
        )
        .layer(public_governor);

    // Routes requiring a valid, unrevoked token
    let authed_routes = Router::new()
        .route("/bookings", post(bookings::create_booking))
        .route("/logout", post(auth::logout))
        .layer(user_governor)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(account_routes)
        .merge(place_routes)
        .merge(authed_routes)
        .with_state(state)
}
