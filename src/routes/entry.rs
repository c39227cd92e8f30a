use axum::Router;
use axum::routing::get;

use crate::mason::{LINK_RELATIONS_URL, Mason, MasonBuilder, NAMESPACE};
use crate::state::AppState;

use super::{GAMES_URL, MATCHES_URL, PERSONS_URL};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(entry_point))
}

/// `GET /` — links to every top-level collection.
async fn entry_point() -> Mason {
    let mut body = MasonBuilder::new();
    body.add_namespace(NAMESPACE, LINK_RELATIONS_URL)
        .add_control(&format!("{NAMESPACE}:games-all"), GAMES_URL)
        .add_control(&format!("{NAMESPACE}:persons-all"), PERSONS_URL)
        .add_control(&format!("{NAMESPACE}:matches-all"), MATCHES_URL);
    Mason::ok(body)
}
