// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, destination, event, gallery, review, umkm},
    state::AppState,
    utils::auth::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public read routes per resource, with write routes merged in behind the
///   auth (and, where needed, admin) middleware.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool + config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let destination_routes = Router::new()
        .route("/", get(destination::list_destinations))
        .route("/{id}", get(destination::get_destination))
        .route("/{id}/reviews", get(review::list_reviews))
        // Any logged-in user may review
        .merge(
            Router::new()
                .route("/{id}/reviews", post(review::create_review))
                .layer(auth_layer.clone()),
        )
        // Content management is admin-only
        .merge(
            Router::new()
                .route("/", post(destination::create_destination))
                .route(
                    "/{id}",
                    put(destination::update_destination)
                        .delete(destination::delete_destination),
                )
                .layer(middleware::from_fn(admin_middleware))
                .layer(auth_layer.clone()),
        );

    // Review edits/deletes check author-or-admin in the handler
    let review_routes = Router::new()
        .route(
            "/{id}",
            put(review::update_review).delete(review::delete_review),
        )
        .layer(auth_layer.clone());

    let event_routes = Router::new()
        .route("/", get(event::list_events))
        .route("/{id}", get(event::get_event))
        .merge(
            Router::new()
                .route("/", post(event::create_event))
                .route("/{id}", put(event::update_event).delete(event::delete_event))
                .layer(middleware::from_fn(admin_middleware))
                .layer(auth_layer.clone()),
        );

    // UMKM writes are open to any logged-in user; ownership is checked in the
    // handlers so admins can moderate
    let umkm_routes = Router::new()
        .route("/", get(umkm::list_umkm))
        .route("/{id}", get(umkm::get_umkm))
        .merge(
            Router::new()
                .route("/", post(umkm::create_umkm))
                .route("/{id}", put(umkm::update_umkm).delete(umkm::delete_umkm))
                .layer(auth_layer.clone()),
        );

    let gallery_routes = Router::new()
        .route("/", get(gallery::list_gallery))
        .route("/{id}", get(gallery::get_gallery_item))
        .merge(
            Router::new()
                .route("/", post(gallery::create_gallery_item))
                .route(
                    "/{id}",
                    put(gallery::update_gallery_item).delete(gallery::delete_gallery_item),
                )
                .layer(middleware::from_fn(admin_middleware))
                .layer(auth_layer.clone()),
        );

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(auth_layer);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/destinations", destination_routes)
        .nest("/api/reviews", review_routes)
        .nest("/api/events", event_routes)
        .nest("/api/umkm", umkm_routes)
        .nest("/api/gallery", gallery_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
