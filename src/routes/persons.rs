use axum::Router;
use axum::extract::State;
use axum::routing::get;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, QueryOrder, TransactionTrait,
};
use serde::Deserialize;

use crate::entities::person;
use crate::error::AppError;
use crate::extract::{ItemId, MasonJson, MaybeItemId};
use crate::mason::{LINK_RELATIONS_URL, Mason, MasonBuilder, NAMESPACE, PERSON_PROFILE};
use crate::schema;
use crate::state::AppState;

pub const PERSONS_URL: &str = "/persons/";

#[must_use]
pub fn person_url(person_id: i32) -> String {
    format!("/persons/{person_id}/")
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(PERSONS_URL, get(list_persons).post(create_person))
        .route(
            "/persons/{person_id}/",
            get(get_person).put(update_person).delete(delete_person),
        )
}

#[derive(Debug, Deserialize)]
struct PersonDocument {
    name: String,
}

/// `GET /persons/`
async fn list_persons(State(state): State<AppState>) -> Result<Mason, AppError> {
    let persons = person::Entity::find()
        .order_by_asc(person::Column::Id)
        .all(&state.db)
        .await?;

    let mut body = MasonBuilder::collection();
    for person in &persons {
        let mut item = MasonBuilder::new();
        item.put("name", person.name.as_str())
            .add_control("self", person_url(person.id))
            .add_control("profile", PERSON_PROFILE);
        body.push_item(item);
    }

    body.add_control("self", PERSONS_URL)
        .add_control_post(
            &format!("{NAMESPACE}:add-person"),
            "Add a new person",
            PERSONS_URL,
            schema::person(),
        )
        .add_namespace(NAMESPACE, LINK_RELATIONS_URL);

    Ok(Mason::ok(body))
}

/// `POST /persons/`
async fn create_person(
    State(state): State<AppState>,
    body: MasonJson,
) -> Result<Mason, AppError> {
    let doc: PersonDocument = schema::conform(body.non_empty()?, &schema::person())?;

    let active = person::ActiveModel {
        name: ActiveValue::Set(doc.name.clone()),
        ..Default::default()
    };

    let person = active.insert(&state.db).await.map_err(|err| {
        AppError::from_db(err, || {
            AppError::conflict(
                "Already exists",
                format!("Person with name {} already exists", doc.name),
            )
        })
    })?;

    tracing::info!(person_id = person.id, name = %person.name, "person created");
    Ok(Mason::created(person_url(person.id)))
}

/// `GET /persons/{person_id}/`
async fn get_person(
    State(state): State<AppState>,
    ItemId(person_id): ItemId,
) -> Result<Mason, AppError> {
    let person = find_person(&state.db, person_id)
        .await?
        .ok_or_else(person_not_found)?;

    let mut body = MasonBuilder::new();
    body.put("name", person.name.as_str())
        .add_control("self", person_url(person_id))
        .add_control("profile", PERSON_PROFILE)
        .add_control(&format!("{NAMESPACE}:persons-all"), PERSONS_URL)
        .add_control_put("Edit this person", person_url(person_id), schema::person())
        .add_control_delete("Delete this person", person_url(person_id))
        .add_namespace(NAMESPACE, LINK_RELATIONS_URL);

    Ok(Mason::ok(body))
}

/// `PUT /persons/{person_id}/` — schema first, then existence, then the write.
async fn update_person(
    State(state): State<AppState>,
    MaybeItemId(person_id): MaybeItemId,
    body: MasonJson,
) -> Result<Mason, AppError> {
    let doc: PersonDocument = schema::conform(body.into_inner(), &schema::person())?;

    let unexisting = || AppError::not_found("Unexisting", "The person does not exist");
    let person_id = person_id.ok_or_else(unexisting)?;
    let person = find_person(&state.db, person_id)
        .await?
        .ok_or_else(unexisting)?;

    let mut active: person::ActiveModel = person.into();
    active.name = ActiveValue::Set(doc.name);

    let txn = state.db.begin().await?;
    if let Err(err) = active.update(&txn).await {
        txn.rollback().await?;
        return Err(AppError::from_db(err, || {
            AppError::conflict(
                "Handle taken",
                "PUT failed due to the person name being already taken",
            )
        }));
    }
    txn.commit().await?;

    tracing::info!(person_id, "person updated");
    Ok(Mason::no_content())
}

/// `DELETE /persons/{person_id}/` — the person's matches go with it.
async fn delete_person(
    State(state): State<AppState>,
    ItemId(person_id): ItemId,
) -> Result<Mason, AppError> {
    find_person(&state.db, person_id)
        .await?
        .ok_or_else(person_not_found)?;

    person::Entity::delete_by_id(person_id)
        .exec(&state.db)
        .await?;

    tracing::info!(person_id, "person deleted");
    Ok(Mason::no_content())
}

pub(super) async fn find_person(
    db: &DatabaseConnection,
    person_id: i32,
) -> Result<Option<person::Model>, AppError> {
    Ok(person::Entity::find_by_id(person_id).one(db).await?)
}

fn person_not_found() -> AppError {
    AppError::not_found("Not found", "Person not found")
}
