use axum::{
    Router,
    routing::{get, post, put},
};

pub mod dreams;
pub mod system;
pub mod users;

/// Endpoints reachable without a bearer token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/api/dreams", get(dreams::list_dreams))
        .route("/api/dreams/coordinates", post(dreams::coordinates))
        .route("/api/dreams/:id", get(dreams::get_dream))
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
}

/// Endpoints that require an authenticated [`crate::context::UserContext`].
pub fn protected_router() -> Router {
    Router::new()
        .route("/api/dreams", post(dreams::create_dream))
        .route(
            "/api/dreams/:id",
            put(dreams::update_dream)
                .patch(dreams::set_dream_done)
                .delete(dreams::delete_dream),
        )
}
