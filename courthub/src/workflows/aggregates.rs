//! Denormalized counters kept on equipment and posts.
//!
//! Ratings are rebuilt from the full review set after every review mutation.
//! Comment counts move by one, atomically, on comment create and delete.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::{
    errors::{HubResult, StoreError},
    models::{Equipment, Post, Review},
    store::{Store, UPDATED_AT},
};

const COMMENT_COUNT: &str = "commentCount";

/// Rating aggregate written onto an equipment document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_reviews: u64,
}

/// Mean of `stars` rounded to one decimal, or zero for no reviews.
pub fn summarize<I>(stars: I) -> RatingSummary
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = stars
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), star| (sum + u64::from(star), count + 1));
    if count == 0 {
        return RatingSummary {
            average_rating: 0.0,
            total_reviews: 0,
        };
    }
    let mean = sum as f64 / count as f64;
    RatingSummary {
        average_rating: (mean * 10.0).round() / 10.0,
        total_reviews: count,
    }
}

/// Rebuilds `averageRating` and `totalReviews` for one equipment item.
///
/// Reads every review then writes the result; two concurrent recomputes can
/// interleave and leave the older result in place. Returns `None` when the
/// equipment no longer exists.
pub async fn recompute_rating(store: &Store, equipment_id: &str) -> HubResult<Option<RatingSummary>> {
    recompute_rating_at(store, equipment_id, Utc::now()).await
}

pub(crate) async fn recompute_rating_at(
    store: &Store,
    equipment_id: &str,
    now: DateTime<Utc>,
) -> HubResult<Option<RatingSummary>> {
    let reviews = store.list_by_reference::<Review>("equipment", equipment_id).await?;
    let summary = summarize(reviews.iter().map(|review| review.star));
    let fields: [(&str, Value); 3] = [
        ("averageRating", json!(summary.average_rating)),
        ("totalReviews", json!(summary.total_reviews)),
        (UPDATED_AT, serde_json::to_value(now).map_err(StoreError::from)?),
    ];
    if !store.set_fields::<Equipment>(equipment_id, &fields).await? {
        log::warn!("skipped rating recompute: equipment {equipment_id} no longer exists");
        return Ok(None);
    }
    log::debug!(
        "equipment {equipment_id} rating is now {} over {} reviews",
        summary.average_rating,
        summary.total_reviews
    );
    Ok(Some(summary))
}

/// Bumps the parent post's comment count. Returns the new count, or `None`
/// when the post is gone.
pub async fn comment_added(store: &Store, post_id: &str) -> HubResult<Option<u64>> {
    move_comment_count(store, post_id, 1).await
}

/// Lowers the parent post's comment count, never below zero.
pub async fn comment_removed(store: &Store, post_id: &str) -> HubResult<Option<u64>> {
    move_comment_count(store, post_id, -1).await
}

async fn move_comment_count(store: &Store, post_id: &str, delta: i64) -> HubResult<Option<u64>> {
    let count = store
        .adjust_counter::<Post>(post_id, COMMENT_COUNT, delta, Utc::now())
        .await?;
    match count {
        Some(count) => {
            log::debug!("post {post_id} comment count moved by {delta} to {count}");
            Ok(Some(u64::try_from(count).unwrap_or_default()))
        }
        None => {
            log::warn!("comment count not adjusted: post {post_id} no longer exists");
            Ok(None)
        }
    }
}
