//! Form HTTP Routes
//!
//! - `GET  /cities`               - all cities
//! - `GET  /schools?cityId=<id>`  - schools of one city, `[]` when unknown
//! - `GET  /form`                 - the form schema
//! - `POST /submit`               - authoritative validation of a submission

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::errors::{ApiError, ApiResult};
use crate::reference::{City, School};
use crate::schema::FormSchema;
use crate::service::{FormService, SubmitResponse};

/// Form routes with the shared service as state
pub fn form_routes(service: Arc<FormService>) -> Router {
    Router::new()
        .route("/cities", get(cities_handler))
        .route("/schools", get(schools_handler))
        .route("/form", get(form_handler))
        .route("/submit", post(submit_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct SchoolsQuery {
    #[serde(rename = "cityId")]
    pub city_id: Option<String>,
}

async fn cities_handler(State(service): State<Arc<FormService>>) -> Json<Vec<City>> {
    Json(service.cities().to_vec())
}

async fn schools_handler(
    State(service): State<Arc<FormService>>,
    Query(query): Query<SchoolsQuery>,
) -> ApiResult<Json<Vec<School>>> {
    let city_id = query
        .city_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingParam("cityId"))?;

    Ok(Json(service.schools(&city_id)))
}

async fn form_handler(State(service): State<Arc<FormService>>) -> Json<FormSchema> {
    Json(service.form().clone())
}

async fn submit_handler(
    State(service): State<Arc<FormService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<SubmitResponse>> {
    let Json(body) = payload.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "unreadable submission body");
        ApiError::InvalidBody(rejection.body_text())
    })?;

    let data = match body {
        Value::Object(map) => map,
        other => {
            warn!(kind = json_kind(&other), "submission body is not an object");
            return Err(ApiError::InvalidBody("expected a JSON object".to_string()));
        }
    };

    let response = service.submit(&data);
    if response.success {
        return Ok(Json(response));
    }
    Err(ApiError::Validation(response.errors.unwrap_or_default()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
