//! Equipment reviews. Every successful mutation is followed by a rating
//! recompute of the reviewed item.

use chrono::Utc;

use super::{
    aggregates::recompute_rating,
    ownership::{Action, authorize},
    populate::Populator,
};
use crate::{
    auth::Actor,
    errors::{HubError, HubResult, StoreError},
    id::generate_entity_id,
    models::{Equipment, NewReview, Review, ReviewPatch, ReviewView, review::review_uniqueness},
    store::Store,
};

const ALREADY_REVIEWED: &str = "You have already reviewed this equipment";

async fn load(store: &Store, id: &str) -> HubResult<Review> {
    store.get::<Review>(id).await?.ok_or(HubError::not_found("Review"))
}

async fn render(store: &Store, review: &Review) -> HubResult<ReviewView> {
    let author = Populator::new(store).user(&review.user).await?;
    Ok(review.view(author))
}

/// Reviews of one item, newest first, authors populated.
pub async fn list_for_equipment(store: &Store, equipment_id: &str) -> HubResult<Vec<ReviewView>> {
    let mut reviews = store.list_by_reference::<Review>("equipment", equipment_id).await?;
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut populator = Populator::new(store);
    let mut views = Vec::with_capacity(reviews.len());
    for review in &reviews {
        let author = populator.user(&review.user).await?;
        views.push(review.view(author));
    }
    Ok(views)
}

/// Creates the actor's single review of an item.
///
/// The existence check answers the common case; the insert claims the
/// (user, equipment) key atomically, so a concurrent duplicate loses with
/// the same conflict instead of a second review.
pub async fn create(store: &Store, actor: &Actor, payload: NewReview) -> HubResult<ReviewView> {
    let valid = payload.validate()?;
    if store.get::<Equipment>(&valid.equipment).await?.is_none() {
        return Err(HubError::not_found("Equipment"));
    }
    let uniqueness = review_uniqueness(&actor.id, &valid.equipment);
    if store.find_unique::<Review>(&uniqueness).await?.is_some() {
        return Err(HubError::conflict(ALREADY_REVIEWED));
    }

    let review = valid.into_record(generate_entity_id(), actor.id.clone(), Utc::now());
    store.insert(&review).await.map_err(|err| match err {
        StoreError::UniqueConstraintViolation { .. } => HubError::conflict(ALREADY_REVIEWED),
        other => other.into(),
    })?;
    recompute_after(store, &review.equipment).await?;
    render(store, &review).await
}

/// Author-only update of star, text and title.
pub async fn update(store: &Store, actor: &Actor, id: &str, patch: ReviewPatch) -> HubResult<ReviewView> {
    let current = load(store, id).await?;
    authorize(actor, &current.user, Action::Update, "review")?;
    let patch = patch.validate()?;

    let mut next = current.clone();
    next.apply(patch, Utc::now());
    store.replace(&current, &next).await?;
    recompute_after(store, &next.equipment).await?;
    render(store, &next).await
}

/// Author or admin delete; the item's rating is rebuilt without it.
pub async fn delete(store: &Store, actor: &Actor, id: &str) -> HubResult<()> {
    let review = load(store, id).await?;
    authorize(actor, &review.user, Action::Delete, "review")?;

    let equipment_id = review.equipment.clone();
    store.delete(&review).await?;
    recompute_after(store, &equipment_id).await?;
    Ok(())
}

async fn recompute_after(store: &Store, equipment_id: &str) -> HubResult<()> {
    recompute_rating(store, equipment_id).await.inspect_err(|err| {
        log::warn!("review saved but rating of {equipment_id} not recomputed: {err}");
    })?;
    Ok(())
}
