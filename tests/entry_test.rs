mod common;

use axum::http::{StatusCode, header};

use gamescores_api::mason::MASON;

#[tokio::test]
async fn entry_point_links_collections() {
    let app = common::test_app().await;

    let res = common::get(&app, "/").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.header(header::CONTENT_TYPE), MASON);
    let v = res.json();
    assert_eq!(v["@controls"]["gamsco:games-all"]["href"], "/games/");
    assert_eq!(v["@controls"]["gamsco:persons-all"]["href"], "/persons/");
    assert_eq!(v["@controls"]["gamsco:matches-all"]["href"], "/matches/");
}

#[tokio::test]
async fn health_reports_database() {
    let app = common::test_app().await;

    let res = common::get(&app, "/health").await;

    assert_eq!(res.status, StatusCode::OK);
    let v = res.json();
    assert_eq!(v["status"], "healthy");
    assert_eq!(v["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(v["database"]["connected"], true);
}

#[tokio::test]
async fn unknown_route_is_mason_404() {
    let app = common::test_app().await;

    let res = common::get(&app, "/nonexistent").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.header(header::CONTENT_TYPE), MASON);
    assert_eq!(res.json()["resource_url"], "/nonexistent");
}

#[tokio::test]
async fn unsupported_method_is_mason_405() {
    let app = common::test_app().await;

    let collection = common::request(&app, "PATCH", "/games/").await;
    let item = common::request(&app, "POST", "/persons/1/").await;

    assert_eq!(collection.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(collection.header(header::CONTENT_TYPE), MASON);
    let v = collection.json();
    assert_eq!(v["resource_url"], "/games/");
    assert_eq!(v["@error"]["@message"], "Method not allowed");
    assert_eq!(v["@controls"]["profile"]["href"], "/profiles/error/");

    assert_eq!(item.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(item.header(header::CONTENT_TYPE), MASON);
}
