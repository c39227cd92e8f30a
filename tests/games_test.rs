mod common;

use axum::http::{StatusCode, header};
use serde_json::json;

use gamescores_api::mason::MASON;

// ─────────────────────────────────────────────────────────────────────────────
// Collection: GET /games/
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_games_empty() {
    let app = common::test_app().await;

    let res = common::get(&app, "/games/").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.header(header::CONTENT_TYPE), MASON);
    let v = res.json();
    assert_eq!(v["items"], json!([]));
    assert_eq!(v["@controls"]["self"]["href"], "/games/");
    assert_eq!(v["@namespaces"]["gamsco"]["name"], "/gamescores/link-relations/");
}

#[tokio::test]
async fn list_games_returns_every_game_with_controls() {
    let app = common::test_app().await;
    for (name, score_type) in [("Chess", 1), ("Go", 2), ("Darts", 3)] {
        common::create(&app, "/games/", &json!({ "name": name, "score_type": score_type })).await;
    }

    let v = common::get(&app, "/games/").await.json();

    let items = v["items"].as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 3);
    for item in &items {
        assert!(item["@controls"]["self"]["href"].is_string());
        assert_eq!(item["@controls"]["profile"]["href"], "/profiles/game/");
    }
    assert_eq!(items[1]["name"], "Go");
    assert_eq!(items[1]["score_type"], 2);
}

#[tokio::test]
async fn list_games_advertises_add_game() {
    let app = common::test_app().await;

    let v = common::get(&app, "/games/").await.json();

    let add = &v["@controls"]["gamsco:add-game"];
    assert_eq!(add["href"], "/games/");
    assert_eq!(add["method"], "POST");
    assert_eq!(add["encoding"], "json");
    assert_eq!(add["schema"]["required"], json!(["name", "score_type"]));
}

// ─────────────────────────────────────────────────────────────────────────────
// Collection: POST /games/
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_game_then_fetch_by_location() {
    let app = common::test_app().await;

    let res = common::post_json(&app, "/games/", &json!({ "name": "Chess", "score_type": 1 })).await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.header(header::LOCATION), "/games/1/");
    assert_eq!(res.header(header::CONTENT_TYPE), MASON);
    assert!(res.body.is_empty());

    let item = common::get(&app, "/games/1/").await;
    assert_eq!(item.status, StatusCode::OK);
    let v = item.json();
    assert_eq!(v["name"], "Chess");
    assert_eq!(v["score_type"], 1);
}

#[tokio::test]
async fn create_duplicate_game_conflicts() {
    let app = common::test_app().await;
    let body = json!({ "name": "Chess", "score_type": 1 });
    common::create(&app, "/games/", &body).await;

    let res = common::post_json(&app, "/games/", &json!({ "name": "Chess", "score_type": 9 })).await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.header(header::CONTENT_TYPE), MASON);
    let v = res.json();
    assert_eq!(v["@error"]["@message"], "Already exists");
    assert_eq!(v["@error"]["@messages"][0], "Game with name Chess already exists");
    assert_eq!(v["resource_url"], "/games/");

    // Existing row untouched
    let stored = common::get(&app, "/games/1/").await.json();
    assert_eq!(stored["score_type"], 1);
    let all = common::get(&app, "/games/").await.json();
    assert_eq!(all["items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn create_game_without_json_is_415() {
    let app = common::test_app().await;

    let res = common::send_raw(&app, "POST", "/games/", "text/plain", "name=Chess").await;

    assert_eq!(res.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(res.json()["@error"]["@message"], "Wrong content type");
}

#[tokio::test]
async fn create_game_with_empty_body_is_415() {
    let app = common::test_app().await;

    let missing = common::request(&app, "POST", "/games/").await;
    let empty = common::post_json(&app, "/games/", &json!({})).await;

    assert_eq!(missing.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(empty.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn create_game_failing_schema_is_400() {
    let app = common::test_app().await;

    let missing = common::post_json(&app, "/games/", &json!({ "name": "Chess" })).await;
    let wrong_type =
        common::post_json(&app, "/games/", &json!({ "name": "Chess", "score_type": "high" })).await;

    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    let v = missing.json();
    assert_eq!(v["@error"]["@message"], "Invalid JSON document");
    assert_eq!(v["@error"]["@messages"][0], "'score_type' is a required property");

    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_game_with_overlong_name_is_400() {
    let app = common::test_app().await;

    let res = common::post_json(&app, "/games/", &json!({ "name": "x".repeat(129), "score_type": 1 })).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["@error"]["@message"], "Invalid JSON document");
    assert_eq!(common::get(&app, "/games/").await.json()["items"], json!([]));
}

#[tokio::test]
async fn create_game_accepts_whole_float_score_type() {
    let app = common::test_app().await;

    let res = common::post_json(&app, "/games/", &json!({ "name": "Chess", "score_type": 1.0 })).await;

    assert_eq!(res.status, StatusCode::CREATED);
    let v = common::get(&app, "/games/1/").await.json();
    assert_eq!(v["score_type"], 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Item: GET /games/{id}/
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_game_has_item_controls() {
    let app = common::test_app().await;
    let location = common::create(&app, "/games/", &json!({ "name": "Go", "score_type": 2 })).await;

    let v = common::get(&app, &location).await.json();

    let controls = &v["@controls"];
    assert_eq!(controls["self"]["href"], location);
    assert_eq!(controls["profile"]["href"], "/profiles/game/");
    assert_eq!(controls["gamsco:games-all"]["href"], "/games/");
    assert_eq!(controls["gamsco:matches-of"]["href"], format!("{location}matches/"));
    assert_eq!(controls["edit"]["method"], "PUT");
    assert_eq!(controls["edit"]["href"], location);
    assert_eq!(controls["gamsco:delete"]["method"], "DELETE");
    assert!(v["@namespaces"]["gamsco"].is_object());
}

#[tokio::test]
async fn get_missing_game_is_404() {
    let app = common::test_app().await;

    let res = common::get(&app, "/games/42/").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.header(header::CONTENT_TYPE), MASON);
    let v = res.json();
    assert_eq!(v["resource_url"], "/games/42/");
    assert_eq!(v["@error"]["@message"], "Not found");
    assert_eq!(v["@controls"]["profile"]["href"], "/profiles/error/");
}

#[tokio::test]
async fn get_game_with_non_numeric_id_is_404() {
    let app = common::test_app().await;

    let res = common::get(&app, "/games/chess/").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

// ─────────────────────────────────────────────────────────────────────────────
// Item: PUT /games/{id}/
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_game_success() {
    let app = common::test_app().await;
    let location = common::create(&app, "/games/", &json!({ "name": "Chess", "score_type": 1 })).await;

    let res = common::put_json(&app, &location, &json!({ "name": "Blitz", "score_type": 4 })).await;

    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_empty());
    let v = common::get(&app, &location).await.json();
    assert_eq!(v["name"], "Blitz");
    assert_eq!(v["score_type"], 4);
}

#[tokio::test]
async fn update_missing_game_is_404() {
    let app = common::test_app().await;

    let res = common::put_json(&app, "/games/7/", &json!({ "name": "Chess", "score_type": 1 })).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["@error"]["@message"], "Unexisting");
}

#[tokio::test]
async fn update_validates_before_existence() {
    let app = common::test_app().await;

    let res = common::put_json(&app, "/games/7/", &json!({ "name": "Chess" })).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["@error"]["@message"], "Invalid JSON document");
}

#[tokio::test]
async fn update_with_non_numeric_id_validates_first() {
    let app = common::test_app().await;

    let invalid = common::put_json(&app, "/games/chess/", &json!({ "name": "Chess" })).await;
    let valid = common::put_json(&app, "/games/chess/", &json!({ "name": "Chess", "score_type": 1 })).await;

    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.json()["@error"]["@message"], "Invalid JSON document");
    assert_eq!(valid.status, StatusCode::NOT_FOUND);
    assert_eq!(valid.json()["@error"]["@message"], "Unexisting");
}

#[tokio::test]
async fn update_with_overlong_name_is_400() {
    let app = common::test_app().await;
    let location = common::create(&app, "/games/", &json!({ "name": "Chess", "score_type": 1 })).await;

    let res = common::put_json(&app, &location, &json!({ "name": "x".repeat(129), "score_type": 1 })).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(common::get(&app, &location).await.json()["name"], "Chess");
}

#[tokio::test]
async fn update_to_taken_name_conflicts_and_rolls_back() {
    let app = common::test_app().await;
    common::create(&app, "/games/", &json!({ "name": "Chess", "score_type": 1 })).await;
    let go = common::create(&app, "/games/", &json!({ "name": "Go", "score_type": 2 })).await;

    let res = common::put_json(&app, &go, &json!({ "name": "Chess", "score_type": 5 })).await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.json()["@error"]["@message"], "Handle taken");

    let v = common::get(&app, &go).await.json();
    assert_eq!(v["name"], "Go");
    assert_eq!(v["score_type"], 2);
}

#[tokio::test]
async fn update_keeping_own_name_succeeds() {
    let app = common::test_app().await;
    let location = common::create(&app, "/games/", &json!({ "name": "Chess", "score_type": 1 })).await;

    let res = common::put_json(&app, &location, &json!({ "name": "Chess", "score_type": 2 })).await;

    assert_eq!(res.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn update_without_json_is_415() {
    let app = common::test_app().await;
    let location = common::create(&app, "/games/", &json!({ "name": "Chess", "score_type": 1 })).await;

    let res = common::request(&app, "PUT", &location).await;

    assert_eq!(res.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// ─────────────────────────────────────────────────────────────────────────────
// Item: DELETE /games/{id}/
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_twice_is_204_then_404() {
    let app = common::test_app().await;
    let location = common::create(&app, "/games/", &json!({ "name": "Chess", "score_type": 1 })).await;

    let first = common::delete(&app, &location).await;
    let second = common::delete(&app, &location).await;

    assert_eq!(first.status, StatusCode::NO_CONTENT);
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert_eq!(common::get(&app, &location).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_name_can_be_reused() {
    let app = common::test_app().await;
    let body = json!({ "name": "Chess", "score_type": 1 });
    let location = common::create(&app, "/games/", &body).await;
    common::delete(&app, &location).await;

    let res = common::post_json(&app, "/games/", &body).await;

    assert_eq!(res.status, StatusCode::CREATED);
}
