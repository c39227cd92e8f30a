mod entry;
mod games;
mod health;
mod matches;
mod persons;

use axum::Router;
use axum::middleware;

use crate::error::{self, AppError};
use crate::state::AppState;

pub use games::{GAMES_URL, game_url};
pub use matches::{MATCHES_URL, match_url};
pub use persons::{PERSONS_URL, person_url};

/// Build the complete application router.
///
/// Structure:
/// - `GET /` — API entry point
/// - `GET/POST /games/`, `GET/PUT/DELETE /games/{game_id}/`, `GET /games/{game_id}/matches/`
/// - `GET/POST /persons/`, `GET/PUT/DELETE /persons/{person_id}/`
/// - `GET/POST /matches/`, `GET/PUT/DELETE /matches/{match_id}/`
/// - `GET /health` — plain JSON health check with database connectivity
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(entry::router())
        .merge(games::router())
        .merge(persons::router())
        .merge(matches::router())
        .merge(health::router())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(fallback)
        .layer(middleware::from_fn(error::attach_resource_url))
}

async fn fallback() -> AppError {
    AppError::not_found("Not found", "No such resource")
}

async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}
