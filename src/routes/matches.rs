use axum::Router;
use axum::extract::State;
use axum::routing::get;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, QueryOrder};
use serde::Deserialize;

use crate::entities::game_match;
use crate::error::AppError;
use crate::extract::{ItemId, MasonJson, MaybeItemId};
use crate::mason::{LINK_RELATIONS_URL, MATCH_PROFILE, Mason, MasonBuilder, NAMESPACE};
use crate::schema;
use crate::state::AppState;

use super::games::{find_game, game_url};
use super::persons::{find_person, person_url};

pub const MATCHES_URL: &str = "/matches/";

#[must_use]
pub fn match_url(match_id: i32) -> String {
    format!("/matches/{match_id}/")
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(MATCHES_URL, get(list_matches).post(create_match))
        .route(
            "/matches/{match_id}/",
            get(get_match).put(update_match).delete(delete_match),
        )
}

#[derive(Debug, Deserialize)]
struct MatchDocument {
    game_id: i32,
    person_id: i32,
    score: f64,
}

/// Collection entry for a match: its fields plus `self` and `profile`.
pub(super) fn summary(record: &game_match::Model) -> MasonBuilder {
    let mut item = MasonBuilder::new();
    item.put("game_id", record.game_id)
        .put("person_id", record.person_id)
        .put("score", record.score)
        .add_control("self", match_url(record.id))
        .add_control("profile", MATCH_PROFILE);
    item
}

/// `GET /matches/`
async fn list_matches(State(state): State<AppState>) -> Result<Mason, AppError> {
    let recorded = game_match::Entity::find()
        .order_by_asc(game_match::Column::Id)
        .all(&state.db)
        .await?;

    let mut body = MasonBuilder::collection();
    for record in &recorded {
        body.push_item(summary(record));
    }

    body.add_control("self", MATCHES_URL)
        .add_control_post(
            &format!("{NAMESPACE}:add-match"),
            "Record a new match",
            MATCHES_URL,
            schema::game_match(),
        )
        .add_namespace(NAMESPACE, LINK_RELATIONS_URL);

    Ok(Mason::ok(body))
}

/// `POST /matches/` — the referenced game and person must already exist.
///
/// The lookup is repeated by the foreign keys at write time, so a game or
/// person removed in between still answers `400`.
async fn create_match(
    State(state): State<AppState>,
    body: MasonJson,
) -> Result<Mason, AppError> {
    let doc: MatchDocument = schema::conform(body.non_empty()?, &schema::game_match())?;
    check_references(&state.db, &doc).await?;

    let active = game_match::ActiveModel {
        game_id: ActiveValue::Set(doc.game_id),
        person_id: ActiveValue::Set(doc.person_id),
        score: ActiveValue::Set(doc.score),
        ..Default::default()
    };
    let record = active.insert(&state.db).await.map_err(AppError::from_write)?;

    tracing::info!(
        match_id = record.id,
        game_id = record.game_id,
        person_id = record.person_id,
        "match recorded"
    );
    Ok(Mason::created(match_url(record.id)))
}

/// `GET /matches/{match_id}/`
async fn get_match(
    State(state): State<AppState>,
    ItemId(match_id): ItemId,
) -> Result<Mason, AppError> {
    let record = find_match(&state.db, match_id)
        .await?
        .ok_or_else(match_not_found)?;

    let mut body = MasonBuilder::new();
    body.put("game_id", record.game_id)
        .put("person_id", record.person_id)
        .put("score", record.score)
        .add_control("self", match_url(match_id))
        .add_control("profile", MATCH_PROFILE)
        .add_control(&format!("{NAMESPACE}:matches-all"), MATCHES_URL)
        .add_control(&format!("{NAMESPACE}:game"), game_url(record.game_id))
        .add_control(&format!("{NAMESPACE}:person"), person_url(record.person_id))
        .add_control_put("Edit this match", match_url(match_id), schema::game_match())
        .add_control_delete("Delete this match", match_url(match_id))
        .add_namespace(NAMESPACE, LINK_RELATIONS_URL);

    Ok(Mason::ok(body))
}

/// `PUT /matches/{match_id}/` — schema, existence, then references.
async fn update_match(
    State(state): State<AppState>,
    MaybeItemId(match_id): MaybeItemId,
    body: MasonJson,
) -> Result<Mason, AppError> {
    let doc: MatchDocument = schema::conform(body.into_inner(), &schema::game_match())?;

    let unexisting = || AppError::not_found("Unexisting", "The match does not exist");
    let match_id = match_id.ok_or_else(unexisting)?;
    let record = find_match(&state.db, match_id)
        .await?
        .ok_or_else(unexisting)?;

    check_references(&state.db, &doc).await?;

    let mut active: game_match::ActiveModel = record.into();
    active.game_id = ActiveValue::Set(doc.game_id);
    active.person_id = ActiveValue::Set(doc.person_id);
    active.score = ActiveValue::Set(doc.score);
    active.update(&state.db).await.map_err(AppError::from_write)?;

    tracing::info!(match_id, "match updated");
    Ok(Mason::no_content())
}

/// `DELETE /matches/{match_id}/`
async fn delete_match(
    State(state): State<AppState>,
    ItemId(match_id): ItemId,
) -> Result<Mason, AppError> {
    find_match(&state.db, match_id)
        .await?
        .ok_or_else(match_not_found)?;

    game_match::Entity::delete_by_id(match_id)
        .exec(&state.db)
        .await?;

    tracing::info!(match_id, "match deleted");
    Ok(Mason::no_content())
}

async fn check_references(db: &DatabaseConnection, doc: &MatchDocument) -> Result<(), AppError> {
    if find_game(db, doc.game_id).await?.is_none() {
        return Err(AppError::bad_request(
            "Invalid reference",
            format!("Game with id {} does not exist", doc.game_id),
        ));
    }
    if find_person(db, doc.person_id).await?.is_none() {
        return Err(AppError::bad_request(
            "Invalid reference",
            format!("Person with id {} does not exist", doc.person_id),
        ));
    }
    Ok(())
}

async fn find_match(
    db: &DatabaseConnection,
    match_id: i32,
) -> Result<Option<game_match::Model>, AppError> {
    Ok(game_match::Entity::find_by_id(match_id).one(db).await?)
}

fn match_not_found() -> AppError {
    AppError::not_found("Not found", "Match not found")
}
