use super::support::*;

fn forbidden_message(err: HubError) -> String {
    match err {
        HubError::Forbidden { message } => message.into_owned(),
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[tokio::test]
async fn only_the_author_may_edit_a_post() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let bob = seed_user(&store, "Bob", Role::User).await;
    let admin = seed_user(&store, "Admin", Role::Admin).await;
    let post = seed_post(&store, &alice, "Doubles rotation", None).await;

    let patch = || PostPatch {
        content: Some("rewritten".to_string()),
        ..Default::default()
    };
    let err = posting::update(&store, &bob, &post.id, patch()).await.unwrap_err();
    assert_eq!(forbidden_message(err), "Not authorized to update this post");

    let err = posting::update(&store, &admin, &post.id, patch()).await.unwrap_err();
    assert_eq!(forbidden_message(err), "Not authorized to update this post");

    let stored = store.get::<Post>(&post.id).await.unwrap().unwrap();
    assert_eq!(stored.content, "Doubles rotation body");
}

#[tokio::test]
async fn admin_may_delete_any_post_but_strangers_may_not() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let bob = seed_user(&store, "Bob", Role::User).await;
    let admin = seed_user(&store, "Admin", Role::Admin).await;
    let post = seed_post(&store, &alice, "Spam?", None).await;

    let err = posting::delete(&store, &bob, &post.id).await.unwrap_err();
    assert_eq!(forbidden_message(err), "Not authorized to delete this post");

    posting::delete(&store, &admin, &post.id).await.expect("admin delete");
    assert!(matches!(
        posting::get(&store, &post.id).await.unwrap_err(),
        HubError::NotFound { entity: "Post" }
    ));
}

#[tokio::test]
async fn stranger_cannot_delete_comment_and_count_is_unchanged() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let bob = seed_user(&store, "Bob", Role::User).await;
    let admin = seed_user(&store, "Admin", Role::Admin).await;
    let post = seed_post(&store, &alice, "Net play", None).await;
    let comment = write_comment(&store, &alice, &post.id, "Keep the racket up").await;

    let err = discussion::delete(&store, &bob, &comment).await.unwrap_err();
    assert_eq!(forbidden_message(err), "Not authorized to delete this comment");
    assert_eq!(comment_count(&store, &post.id).await, 1);

    let err = discussion::update(
        &store,
        &admin,
        &comment,
        CommentPatch {
            text: Some("edited by admin".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(forbidden_message(err), "Not authorized to update this comment");

    discussion::delete(&store, &admin, &comment).await.expect("admin delete");
    assert_eq!(comment_count(&store, &post.id).await, 0);
}

#[tokio::test]
async fn stranger_cannot_touch_a_review() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let bob = seed_user(&store, "Bob", Role::User).await;
    let racket = seed_equipment(&store, "Astrox 100ZZ", "racket", 259.0).await;
    let review = write_review(&store, &alice, &racket.id, 5).await;

    let err = reviews::update(
        &store,
        &bob,
        &review,
        ReviewPatch {
            star: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(forbidden_message(err), "Not authorized to update this review");

    let err = reviews::delete(&store, &bob, &review).await.unwrap_err();
    assert_eq!(forbidden_message(err), "Not authorized to delete this review");

    let item = equipment(&store, &racket.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (5.0, 1));
}

#[tokio::test]
async fn missing_targets_are_not_found_before_ownership() {
    let store = Store::memory();
    let bob = seed_user(&store, "Bob", Role::User).await;
    assert!(matches!(
        posting::delete(&store, &bob, "ghost").await.unwrap_err(),
        HubError::NotFound { entity: "Post" }
    ));
    assert!(matches!(
        discussion::delete(&store, &bob, "ghost").await.unwrap_err(),
        HubError::NotFound { entity: "Comment" }
    ));
    assert!(matches!(
        reviews::delete(&store, &bob, "ghost").await.unwrap_err(),
        HubError::NotFound { entity: "Review" }
    ));
}
