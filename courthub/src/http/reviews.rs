use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use super::{
    error::ApiResult,
    extract::{Authenticated, Payload},
};
use crate::{
    hub::Hub,
    models::{NewReview, ReviewPatch, ReviewView},
    workflows::reviews,
};

pub async fn list_for_equipment(
    State(hub): State<Hub>,
    Path(equipment_id): Path<String>,
) -> ApiResult<Json<Vec<ReviewView>>> {
    Ok(Json(reviews::list_for_equipment(hub.store(), &equipment_id).await?))
}

pub async fn create(
    State(hub): State<Hub>,
    Authenticated(actor): Authenticated,
    Payload(payload): Payload<NewReview>,
) -> ApiResult<(StatusCode, Json<ReviewView>)> {
    let review = reviews::create(hub.store(), &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update(
    State(hub): State<Hub>,
    Authenticated(actor): Authenticated,
    Path(id): Path<String>,
    Payload(patch): Payload<ReviewPatch>,
) -> ApiResult<Json<ReviewView>> {
    Ok(Json(reviews::update(hub.store(), &actor, &id, patch).await?))
}

pub async fn delete(
    State(hub): State<Hub>,
    Authenticated(actor): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    reviews::delete(hub.store(), &actor, &id).await?;
    Ok(Json(json!({ "message": "Review removed successfully" })))
}
