use axum::Router;
use axum::extract::State;
use axum::routing::get;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Deserialize;

use crate::entities::{game, game_match};
use crate::error::AppError;
use crate::extract::{ItemId, MasonJson, MaybeItemId};
use crate::mason::{GAME_PROFILE, LINK_RELATIONS_URL, Mason, MasonBuilder, NAMESPACE};
use crate::schema;
use crate::state::AppState;

use super::matches;

pub const GAMES_URL: &str = "/games/";

#[must_use]
pub fn game_url(game_id: i32) -> String {
    format!("/games/{game_id}/")
}

fn game_matches_url(game_id: i32) -> String {
    format!("/games/{game_id}/matches/")
}

/// Game routes: the collection, single games, and the matches recorded for a game.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(GAMES_URL, get(list_games).post(create_game))
        .route(
            "/games/{game_id}/",
            get(get_game).put(update_game).delete(delete_game),
        )
        .route("/games/{game_id}/matches/", get(list_game_matches))
}

#[derive(Debug, Deserialize)]
struct GameDocument {
    name: String,
    score_type: i32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /games/` — every stored game, each with `self` and `profile` controls.
async fn list_games(State(state): State<AppState>) -> Result<Mason, AppError> {
    let games = game::Entity::find()
        .order_by_asc(game::Column::Id)
        .all(&state.db)
        .await?;

    let mut body = MasonBuilder::collection();
    for game in &games {
        let mut item = MasonBuilder::new();
        item.put("name", game.name.as_str())
            .put("score_type", game.score_type)
            .add_control("self", game_url(game.id))
            .add_control("profile", GAME_PROFILE);
        body.push_item(item);
    }

    body.add_control("self", GAMES_URL);
    add_control_add_game(&mut body);
    body.add_namespace(NAMESPACE, LINK_RELATIONS_URL);

    Ok(Mason::ok(body))
}

/// `POST /games/` — create a game; answers `201` with its `Location`.
async fn create_game(
    State(state): State<AppState>,
    body: MasonJson,
) -> Result<Mason, AppError> {
    let doc: GameDocument = schema::conform(body.non_empty()?, &schema::game())?;

    let active = game::ActiveModel {
        name: ActiveValue::Set(doc.name.clone()),
        score_type: ActiveValue::Set(doc.score_type),
        ..Default::default()
    };

    let game = active.insert(&state.db).await.map_err(|err| {
        AppError::from_db(err, || {
            tracing::debug!(name = %doc.name, "game name already taken");
            AppError::conflict(
                "Already exists",
                format!("Game with name {} already exists", doc.name),
            )
        })
    })?;

    tracing::info!(game_id = game.id, name = %game.name, "game created");
    Ok(Mason::created(game_url(game.id)))
}

/// `GET /games/{game_id}/`
async fn get_game(
    State(state): State<AppState>,
    ItemId(game_id): ItemId,
) -> Result<Mason, AppError> {
    let game = find_game(&state.db, game_id).await?.ok_or_else(game_not_found)?;

    let mut body = MasonBuilder::new();
    body.put("name", game.name.as_str())
        .put("score_type", game.score_type)
        .add_control("self", game_url(game_id))
        .add_control("profile", GAME_PROFILE)
        .add_control(&format!("{NAMESPACE}:games-all"), GAMES_URL)
        .add_control(&format!("{NAMESPACE}:matches-of"), game_matches_url(game_id))
        .add_control_put("Edit this game", game_url(game_id), schema::game())
        .add_control_delete("Delete this game", game_url(game_id))
        .add_namespace(NAMESPACE, LINK_RELATIONS_URL);

    Ok(Mason::ok(body))
}

/// `PUT /games/{game_id}/` — replace name and score type.
///
/// The body is validated before the game is looked up, so an invalid document
/// answers `400` even for ids that do not exist or do not parse.
async fn update_game(
    State(state): State<AppState>,
    MaybeItemId(game_id): MaybeItemId,
    body: MasonJson,
) -> Result<Mason, AppError> {
    let doc: GameDocument = schema::conform(body.into_inner(), &schema::game())?;

    let unexisting = || AppError::not_found("Unexisting", "The game does not exist");
    let game_id = game_id.ok_or_else(unexisting)?;
    let game = find_game(&state.db, game_id)
        .await?
        .ok_or_else(unexisting)?;

    let mut active: game::ActiveModel = game.into();
    active.name = ActiveValue::Set(doc.name);
    active.score_type = ActiveValue::Set(doc.score_type);

    let txn = state.db.begin().await?;
    match active.update(&txn).await {
        Ok(game) => {
            txn.commit().await?;
            tracing::info!(game_id, name = %game.name, "game updated");
            Ok(Mason::no_content())
        }
        Err(err) => {
            txn.rollback().await?;
            Err(AppError::from_db(err, || {
                AppError::conflict(
                    "Handle taken",
                    "PUT failed due to the game name being already taken",
                )
            }))
        }
    }
}

/// `DELETE /games/{game_id}/` — also removes the game's matches.
async fn delete_game(
    State(state): State<AppState>,
    ItemId(game_id): ItemId,
) -> Result<Mason, AppError> {
    find_game(&state.db, game_id).await?.ok_or_else(game_not_found)?;

    game::Entity::delete_by_id(game_id).exec(&state.db).await?;

    tracing::info!(game_id, "game deleted");
    Ok(Mason::no_content())
}

/// `GET /games/{game_id}/matches/` — matches recorded for one game.
async fn list_game_matches(
    State(state): State<AppState>,
    ItemId(game_id): ItemId,
) -> Result<Mason, AppError> {
    find_game(&state.db, game_id).await?.ok_or_else(game_not_found)?;

    let recorded = game_match::Entity::find()
        .filter(game_match::Column::GameId.eq(game_id))
        .order_by_asc(game_match::Column::Id)
        .all(&state.db)
        .await?;

    let mut body = MasonBuilder::collection();
    for record in &recorded {
        body.push_item(matches::summary(record));
    }

    body.add_control("self", game_matches_url(game_id))
        .add_control("up", game_url(game_id))
        .add_namespace(NAMESPACE, LINK_RELATIONS_URL);

    Ok(Mason::ok(body))
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn add_control_add_game(body: &mut MasonBuilder) {
    body.add_control_post(
        &format!("{NAMESPACE}:add-game"),
        "Add a new game",
        GAMES_URL,
        schema::game(),
    );
}

pub(super) async fn find_game(
    db: &DatabaseConnection,
    game_id: i32,
) -> Result<Option<game::Model>, AppError> {
    Ok(game::Entity::find_by_id(game_id).one(db).await?)
}

fn game_not_found() -> AppError {
    AppError::not_found("Not found", "Game not found")
}
