use super::support::*;

#[tokio::test]
async fn comment_count_tracks_creates_and_deletes() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let bob = seed_user(&store, "Bob", Role::User).await;
    let post = seed_post(&store, &alice, "Best shuttle for humid halls?", None).await;
    assert_eq!(post.comment_count, 0);

    let first = write_comment(&store, &bob, &post.id, "Try feather shuttles rated 77").await;
    write_comment(&store, &alice, &post.id, "Thanks!").await;
    assert_eq!(comment_count(&store, &post.id).await, 2);

    discussion::delete(&store, &bob, &first).await.expect("delete comment");
    assert_eq!(comment_count(&store, &post.id).await, 1);

    let listed = discussion::list_for_post(&store, &post.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].text, "Thanks!");
}

#[tokio::test]
async fn editing_a_comment_leaves_the_count_alone() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let post = seed_post(&store, &alice, "Grip thickness", None).await;
    let comment = write_comment(&store, &alice, &post.id, "I use two overgrips").await;

    let updated = discussion::update(
        &store,
        &alice,
        &comment,
        CommentPatch {
            text: Some("I use one towel grip".to_string()),
        },
    )
    .await
    .expect("update comment");
    assert_eq!(updated.text, "I use one towel grip");
    assert_eq!(comment_count(&store, &post.id).await, 1);
}

#[tokio::test]
async fn post_edit_does_not_reset_comment_count() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let post = seed_post(&store, &alice, "String tension", None).await;
    write_comment(&store, &alice, &post.id, "24 lbs").await;

    let updated = posting::update(
        &store,
        &alice,
        &post.id,
        PostPatch {
            title: Some("String tension for beginners".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("update post");
    assert_eq!(updated.title, "String tension for beginners");
    assert_eq!(updated.comment_count, 1);
}

#[tokio::test]
async fn counter_never_goes_negative() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let post = seed_post(&store, &alice, "Footwork drills", None).await;

    let decremented = workflows::aggregates::comment_removed(&store, &post.id).await.unwrap();
    assert_eq!(decremented, Some(0));
    assert_eq!(comment_count(&store, &post.id).await, 0);
}

#[tokio::test]
async fn comment_on_missing_post_is_not_found() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let err = discussion::create(
        &store,
        &alice,
        NewComment {
            post: Some("nope".to_string()),
            text: Some("hello".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, HubError::NotFound { entity: "Post" }));
    assert!(store.list::<Comment>().await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_comment_is_rejected() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let post = seed_post(&store, &alice, "Smash speed", None).await;
    let err = discussion::create(
        &store,
        &alice,
        NewComment {
            post: Some(post.id.clone()),
            text: Some("   ".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, HubError::Validation(_)));
    assert_eq!(comment_count(&store, &post.id).await, 0);
}
