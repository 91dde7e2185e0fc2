use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use super::{
    error::ApiResult,
    extract::{Admin, Filters, Payload},
};
use crate::{
    hub::Hub,
    models::{Equipment, EquipmentPatch, NewEquipment},
    workflows::catalogue::{self, CatalogueQuery},
};

pub async fn list(State(hub): State<Hub>, Filters(query): Filters<CatalogueQuery>) -> ApiResult<Json<Vec<Equipment>>> {
    Ok(Json(catalogue::list(hub.store(), query).await?))
}

pub async fn get(State(hub): State<Hub>, Path(id): Path<String>) -> ApiResult<Json<Equipment>> {
    Ok(Json(catalogue::get(hub.store(), &id).await?))
}

pub async fn create(
    State(hub): State<Hub>,
    _admin: Admin,
    Payload(payload): Payload<NewEquipment>,
) -> ApiResult<(StatusCode, Json<Equipment>)> {
    let equipment = catalogue::create(hub.store(), payload).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

pub async fn update(
    State(hub): State<Hub>,
    _admin: Admin,
    Path(id): Path<String>,
    Payload(patch): Payload<EquipmentPatch>,
) -> ApiResult<Json<Equipment>> {
    Ok(Json(catalogue::update(hub.store(), &id, patch).await?))
}

pub async fn delete(State(hub): State<Hub>, _admin: Admin, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    catalogue::delete(hub.store(), &id).await?;
    Ok(Json(json!({ "message": "Equipment removed successfully" })))
}
