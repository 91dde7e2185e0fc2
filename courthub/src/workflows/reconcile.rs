//! Offline repair of denormalized counters.
//!
//! Rebuilds every equipment rating and every post comment count from the
//! underlying review and comment collections, reporting the rows that had
//! drifted.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::aggregates::summarize;
use crate::{
    errors::HubResult,
    models::{Comment, Equipment, Post, Review},
    store::{Store, UPDATED_AT},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Drift {
    pub collection: &'static str,
    pub id: String,
    pub field: &'static str,
    pub stored: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub equipment_checked: usize,
    pub posts_checked: usize,
    pub drift: Vec<Drift>,
    pub applied: bool,
}

/// Scans every item and post. With `dry_run` the drift is only reported.
pub async fn reconcile(store: &Store, dry_run: bool) -> HubResult<ReconcileReport> {
    let mut report = ReconcileReport {
        applied: !dry_run,
        ..ReconcileReport::default()
    };
    let now = json!(Utc::now());

    for equipment in store.list::<Equipment>().await? {
        report.equipment_checked += 1;
        let reviews = store.list_by_reference::<Review>("equipment", &equipment.id).await?;
        let actual = summarize(reviews.iter().map(|review| review.star));
        let before = report.drift.len();

        if actual.average_rating != equipment.average_rating {
            report.drift.push(Drift {
                collection: "equipment",
                id: equipment.id.clone(),
                field: "averageRating",
                stored: equipment.average_rating,
                actual: actual.average_rating,
            });
        }
        if actual.total_reviews != equipment.total_reviews {
            report.drift.push(Drift {
                collection: "equipment",
                id: equipment.id.clone(),
                field: "totalReviews",
                stored: equipment.total_reviews as f64,
                actual: actual.total_reviews as f64,
            });
        }

        if report.drift.len() > before && !dry_run {
            store
                .set_fields::<Equipment>(
                    &equipment.id,
                    &[
                        ("averageRating", json!(actual.average_rating)),
                        ("totalReviews", json!(actual.total_reviews)),
                        (UPDATED_AT, now.clone()),
                    ],
                )
                .await?;
        }
    }

    for post in store.list::<Post>().await? {
        report.posts_checked += 1;
        let actual = store.list_by_reference::<Comment>("post", &post.id).await?.len() as u64;
        if actual == post.comment_count {
            continue;
        }
        report.drift.push(Drift {
            collection: "posts",
            id: post.id.clone(),
            field: "commentCount",
            stored: post.comment_count as f64,
            actual: actual as f64,
        });
        if !dry_run {
            store
                .set_fields::<Post>(&post.id, &[("commentCount", json!(actual)), (UPDATED_AT, now.clone())])
                .await?;
        }
    }

    for drift in &report.drift {
        log::warn!(
            "{} {} {} drifted: stored {} actual {}",
            drift.collection,
            drift.id,
            drift.field,
            drift.stored,
            drift.actual
        );
    }
    log::info!(
        "reconcile checked {} equipment and {} posts, {} drifted fields{}",
        report.equipment_checked,
        report.posts_checked,
        report.drift.len(),
        if dry_run { " (dry run)" } else { "" }
    );
    Ok(report)
}
