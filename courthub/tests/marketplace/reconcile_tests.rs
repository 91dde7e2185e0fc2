use serde_json::json;

use super::support::*;

#[tokio::test]
async fn clean_store_reports_no_drift() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Astrox 99", "racket", 219.0).await;
    write_review(&store, &alice, &racket.id, 4).await;
    let post = seed_post(&store, &alice, "Hello", None).await;
    write_comment(&store, &alice, &post.id, "first").await;

    let report = workflows::reconcile(&store, true).await.unwrap();
    assert_eq!(report.equipment_checked, 1);
    assert_eq!(report.posts_checked, 1);
    assert!(report.drift.is_empty());
}

#[tokio::test]
async fn drift_is_reported_then_repaired() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Nanoflare 1000Z", "racket", 249.0).await;
    write_review(&store, &alice, &racket.id, 5).await;
    let post = seed_post(&store, &alice, "Review thread", None).await;
    write_comment(&store, &alice, &post.id, "great").await;

    store
        .set_fields::<Equipment>(&racket.id, &[("averageRating", json!(1.0)), ("totalReviews", json!(7))])
        .await
        .unwrap();
    store
        .set_fields::<Post>(&post.id, &[("commentCount", json!(9))])
        .await
        .unwrap();

    let stamped_before = equipment(&store, &racket.id).await.updated_at;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let dry = workflows::reconcile(&store, true).await.unwrap();
    assert!(!dry.applied);
    assert_eq!(dry.drift.len(), 3);
    let untouched = equipment(&store, &racket.id).await;
    assert_eq!(untouched.total_reviews, 7);
    assert_eq!(untouched.updated_at, stamped_before);

    let fixed = workflows::reconcile(&store, false).await.unwrap();
    assert!(fixed.applied);
    assert_eq!(fixed.drift.len(), 3);
    let comment_drift = fixed
        .drift
        .iter()
        .find(|drift| drift.field == "commentCount")
        .expect("comment drift");
    assert_eq!((comment_drift.stored, comment_drift.actual), (9.0, 1.0));

    let item = equipment(&store, &racket.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (5.0, 1));
    assert!(item.updated_at > stamped_before);
    assert_eq!(comment_count(&store, &post.id).await, 1);
    let repaired = store.get::<Post>(&post.id).await.unwrap().unwrap();
    assert!(repaired.updated_at > post.updated_at);
    assert!(workflows::reconcile(&store, true).await.unwrap().drift.is_empty());
}
