use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use super::{
    error::ApiResult,
    extract::{Authenticated, Filters, Payload},
};
use crate::{
    hub::Hub,
    models::{NewPost, Post, PostPatch, PostView},
    workflows::posting::{self, PostQuery},
};

pub async fn list(State(hub): State<Hub>, Filters(query): Filters<PostQuery>) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(posting::list(hub.store(), query).await?))
}

pub async fn get(State(hub): State<Hub>, Path(id): Path<String>) -> ApiResult<Json<PostView>> {
    Ok(Json(posting::get(hub.store(), &id).await?))
}

pub async fn create(
    State(hub): State<Hub>,
    Authenticated(actor): Authenticated,
    Payload(payload): Payload<NewPost>,
) -> ApiResult<(StatusCode, Json<PostView>)> {
    let post = posting::create(hub.store(), &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update(
    State(hub): State<Hub>,
    Authenticated(actor): Authenticated,
    Path(id): Path<String>,
    Payload(patch): Payload<PostPatch>,
) -> ApiResult<Json<Post>> {
    Ok(Json(posting::update(hub.store(), &actor, &id, patch).await?))
}

pub async fn delete(
    State(hub): State<Hub>,
    Authenticated(actor): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    posting::delete(hub.store(), &actor, &id).await?;
    Ok(Json(json!({ "message": "Post removed successfully" })))
}
