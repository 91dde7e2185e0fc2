use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use super::{
    error::ApiResult,
    extract::{Admin, Authenticated, Payload},
};
use crate::{
    hub::Hub,
    models::{NewUser, UserPatch, UserProfile, user::Credentials},
    workflows::accounts::{self, Session},
};

pub async fn register(State(hub): State<Hub>, Payload(payload): Payload<NewUser>) -> ApiResult<(StatusCode, Json<Session>)> {
    let session = accounts::register(hub.store(), hub.tokens(), payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn login(State(hub): State<Hub>, Payload(credentials): Payload<Credentials>) -> ApiResult<Json<Session>> {
    Ok(Json(accounts::login(hub.store(), hub.tokens(), credentials).await?))
}

pub async fn list(State(hub): State<Hub>, _admin: Admin) -> ApiResult<Json<Vec<UserProfile>>> {
    Ok(Json(accounts::list(hub.store()).await?))
}

pub async fn get(State(hub): State<Hub>, _user: Authenticated, Path(id): Path<String>) -> ApiResult<Json<UserProfile>> {
    Ok(Json(accounts::get(hub.store(), &id).await?))
}

pub async fn update(
    State(hub): State<Hub>,
    Authenticated(actor): Authenticated,
    Path(id): Path<String>,
    Payload(patch): Payload<UserPatch>,
) -> ApiResult<Json<UserProfile>> {
    Ok(Json(accounts::update(hub.store(), &actor, &id, patch).await?))
}

pub async fn delete(State(hub): State<Hub>, _admin: Admin, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    accounts::delete(hub.store(), &id).await?;
    Ok(Json(json!({ "message": "User removed successfully" })))
}
