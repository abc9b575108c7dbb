use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{admin, auth, booking, catalog};
use crate::middleware::auth::{auth_middleware, require_admin, require_staff};
use crate::middleware::rate_limit::create_public_governor;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // IP-based governor for unauthenticated routes
    let public_governor = create_public_governor();

    // Public routes
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Catalog routes (listing open; movie creation checks staff in-handler
    // because it shares the path with the open listing)
    let catalog_routes = Router::new()
        .route("/movies", get(catalog::list_movies).post(catalog::create_movie))
        .route("/theaters", get(catalog::list_theaters))
        .route("/shows", get(catalog::list_shows))
        .layer(public_governor);

    // Booking routes (requires auth, any role)
    let booking_routes = Router::new()
        .route("/", post(booking::create_booking))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Staff routes (admin or theater manager; analytics scope is decided
    // per-role inside the handler)
    let staff_routes = Router::new()
        .route("/analytics", get(admin::analytics))
        .layer(middleware::from_fn(require_staff))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Superuser routes
    let superuser_routes = Router::new()
        .route("/create-theater-admin", post(admin::create_theater_admin))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", catalog_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/admin", staff_routes)
        .nest("/api/admin", superuser_routes)
        .with_state(state)
}
