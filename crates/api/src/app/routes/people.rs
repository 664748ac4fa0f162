use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use geocore_core::PersonId;

use crate::app::dto::{CreatePersonRequest, OutputQuery, PersonResponse, UpdatePersonRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

type Services = Extension<Arc<AppServices>>;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_people).post(create_person))
        .route(
            "/:id",
            get(get_person)
                .post(create_person_with_id)
                .put(replace_person)
                .patch(patch_person)
                .delete(delete_person),
        )
        .route("/:id/age", get(person_age))
        .route("/:id/salary", get(person_salary))
}

fn person_id(path: Result<Path<String>, PathRejection>) -> Result<PersonId, ApiError> {
    let Path(raw) = path?;
    Ok(raw.parse::<PersonId>()?)
}

pub async fn list_people(Extension(services): Services) -> Json<Vec<PersonResponse>> {
    Json(
        services
            .find_all()
            .into_iter()
            .map(PersonResponse::from)
            .collect(),
    )
}

pub async fn get_person(
    Extension(services): Services,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<PersonResponse>, ApiError> {
    let id = person_id(path)?;
    Ok(Json(services.get(id)?.into()))
}

pub async fn create_person(
    Extension(services): Services,
    body: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<Json<PersonResponse>, ApiError> {
    let Json(body) = body?;
    let new = body.validate(services.today())?;

    let person = services.create(new.name, new.birth_date, new.admission_date)?;
    Ok(Json(person.into()))
}

pub async fn create_person_with_id(
    Extension(services): Services,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<Json<PersonResponse>, ApiError> {
    let id = person_id(path)?;
    let Json(body) = body?;
    let new = body.validate(services.today())?;

    let person = services.create_with_id(id, new.name, new.birth_date, new.admission_date)?;
    Ok(Json(person.into()))
}

pub async fn replace_person(
    Extension(services): Services,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<Json<PersonResponse>, ApiError> {
    let id = person_id(path)?;
    let Json(body) = body?;
    let new = body.validate(services.today())?;

    let person = services.update(id, new.name, new.birth_date, new.admission_date)?;
    Ok(Json(person.into()))
}

pub async fn patch_person(
    Extension(services): Services,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdatePersonRequest>, JsonRejection>,
) -> Result<Json<PersonResponse>, ApiError> {
    let id = person_id(path)?;
    let Json(body) = body?;
    let patch = body.validate(services.today())?;

    let person = services.update_partial(id, patch)?;
    Ok(Json(person.into()))
}

pub async fn delete_person(
    Extension(services): Services,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = person_id(path)?;
    services.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn person_age(
    Extension(services): Services,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<OutputQuery>, QueryRejection>,
) -> Result<Json<i64>, ApiError> {
    let id = person_id(path)?;
    let Query(query) = query?;
    // An unknown person is reported before a missing `output`.
    services.get(id)?;
    let output = query.require()?;

    Ok(Json(services.calculate_age(id, &output)?))
}

pub async fn person_salary(
    Extension(services): Services,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<OutputQuery>, QueryRejection>,
) -> Result<Json<f64>, ApiError> {
    let id = person_id(path)?;
    let Query(query) = query?;
    // An unknown person is reported before a missing `output`.
    services.get(id)?;
    let output = query.require()?;

    Ok(Json(services.calculate_salary(id, &output)?))
}
