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
    models::{Comment, CommentPatch, CommentView, NewComment},
    workflows::discussion,
};

pub async fn list_for_post(State(hub): State<Hub>, Path(post_id): Path<String>) -> ApiResult<Json<Vec<CommentView>>> {
    Ok(Json(discussion::list_for_post(hub.store(), &post_id).await?))
}

pub async fn create(
    State(hub): State<Hub>,
    Authenticated(actor): Authenticated,
    Payload(payload): Payload<NewComment>,
) -> ApiResult<(StatusCode, Json<CommentView>)> {
    let comment = discussion::create(hub.store(), &actor, payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update(
    State(hub): State<Hub>,
    Authenticated(actor): Authenticated,
    Path(id): Path<String>,
    Payload(patch): Payload<CommentPatch>,
) -> ApiResult<Json<Comment>> {
    Ok(Json(discussion::update(hub.store(), &actor, &id, patch).await?))
}

pub async fn delete(
    State(hub): State<Hub>,
    Authenticated(actor): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    discussion::delete(hub.store(), &actor, &id).await?;
    Ok(Json(json!({ "message": "Comment removed successfully" })))
}
