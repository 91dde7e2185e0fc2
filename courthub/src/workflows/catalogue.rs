//! Equipment catalogue management.

use chrono::Utc;
use serde::Deserialize;

use crate::{
    errors::{HubError, HubResult},
    filters::{NumericRange, TextMatcher, parse_numeric_bound},
    id::generate_entity_id,
    models::{Equipment, EquipmentPatch, NewEquipment},
    store::Store,
};

/// Catalogue listing filters, as received on the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// Lists equipment matching every given filter, newest first. An unknown
/// `type` matches nothing.
pub async fn list(store: &Store, query: CatalogueQuery) -> HubResult<Vec<Equipment>> {
    let name = TextMatcher::new(query.search.as_deref())?;
    let price = NumericRange {
        min: parse_numeric_bound("minPrice", query.min_price.as_deref())?,
        max: parse_numeric_bound("maxPrice", query.max_price.as_deref())?,
    };
    let kind = query
        .kind
        .map(|kind| kind.trim().to_ascii_lowercase())
        .filter(|kind| !kind.is_empty());

    let mut items: Vec<Equipment> = store
        .list::<Equipment>()
        .await?
        .into_iter()
        .filter(|item| kind.as_deref().is_none_or(|kind| item.kind.as_str() == kind))
        .filter(|item| name.as_ref().is_none_or(|name| name.matches(&item.name)))
        .filter(|item| price.contains(item.price))
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(items)
}

pub async fn get(store: &Store, id: &str) -> HubResult<Equipment> {
    store
        .get::<Equipment>(id)
        .await?
        .ok_or(HubError::not_found("Equipment"))
}

pub async fn create(store: &Store, payload: NewEquipment) -> HubResult<Equipment> {
    let equipment = payload.into_record(generate_entity_id(), Utc::now())?;
    store.insert(&equipment).await?;
    log::info!("added equipment {} ({})", equipment.id, equipment.name);
    Ok(equipment)
}

/// Applies a partial update. The stored rating aggregates always win over
/// the copy read here.
pub async fn update(store: &Store, id: &str, patch: EquipmentPatch) -> HubResult<Equipment> {
    let current = get(store, id).await?;
    let patch = patch.validate()?;
    let mut next = current.clone();
    next.apply(patch, Utc::now());
    store.replace(&current, &next).await?;
    get(store, id).await
}

/// Removes the item. Its reviews and the posts pointing at it are kept.
pub async fn delete(store: &Store, id: &str) -> HubResult<()> {
    let equipment = get(store, id).await?;
    store.delete(&equipment).await?;
    log::info!("removed equipment {}", equipment.id);
    Ok(())
}
