use super::support::*;

#[tokio::test]
async fn rating_follows_review_lifecycle() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let bob = seed_user(&store, "Bob", Role::User).await;
    let racket = seed_equipment(&store, "Astrox 99", "racket", 219.0).await;
    assert_eq!(racket.average_rating, 0.0);
    assert_eq!(racket.total_reviews, 0);

    write_review(&store, &alice, &racket.id, 4).await;
    let item = equipment(&store, &racket.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (4.0, 1));

    let bobs = write_review(&store, &bob, &racket.id, 2).await;
    let item = equipment(&store, &racket.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (3.0, 2));

    reviews::update(
        &store,
        &bob,
        &bobs,
        ReviewPatch {
            star: Some(5),
            ..Default::default()
        },
    )
    .await
    .expect("update review");
    let item = equipment(&store, &racket.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (4.5, 2));

    reviews::delete(&store, &bob, &bobs).await.expect("delete review");
    let item = equipment(&store, &racket.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (4.0, 1));
}

#[tokio::test]
async fn deleting_first_review_leaves_the_remaining_one() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let bob = seed_user(&store, "Bob", Role::User).await;
    let racket = seed_equipment(&store, "Arcsaber 11", "racket", 209.0).await;

    let alices = write_review(&store, &alice, &racket.id, 4).await;
    write_review(&store, &bob, &racket.id, 2).await;
    let item = equipment(&store, &racket.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (3.0, 2));

    reviews::delete(&store, &alice, &alices).await.expect("delete review");
    let item = equipment(&store, &racket.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (2.0, 1));
}

#[tokio::test]
async fn rating_rounds_to_one_decimal() {
    let store = Store::memory();
    let racket = seed_equipment(&store, "Nanoflare 800", "racket", 199.0).await;
    for star in [5, 4, 4] {
        let reviewer = seed_user(&store, "Reviewer", Role::User).await;
        write_review(&store, &reviewer, &racket.id, star).await;
    }
    let item = equipment(&store, &racket.id).await;
    assert_eq!(item.average_rating, 4.3);
    assert_eq!(item.total_reviews, 3);
}

#[tokio::test]
async fn deleting_last_review_resets_rating() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let shoes = seed_equipment(&store, "Power Cushion 65", "shoes", 120.0).await;
    let review = write_review(&store, &alice, &shoes.id, 3).await;

    reviews::delete(&store, &alice, &review).await.expect("delete review");
    let item = equipment(&store, &shoes.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (0.0, 0));
}

#[tokio::test]
async fn second_review_by_same_user_is_rejected() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Astrox 88D", "racket", 189.0).await;
    write_review(&store, &alice, &racket.id, 5).await;

    let err = reviews::create(
        &store,
        &alice,
        NewReview {
            star: Some(1),
            equipment: Some(racket.id.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    match err {
        HubError::Conflict { message } => assert_eq!(message, "You have already reviewed this equipment"),
        other => panic!("unexpected error: {other:?}"),
    }

    let item = equipment(&store, &racket.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (5.0, 1));
}

#[tokio::test]
async fn duplicate_review_insert_is_refused_by_the_store() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Arcsaber 11", "racket", 179.0).await;
    write_review(&store, &alice, &racket.id, 4).await;

    let now = Utc::now();
    let racing = Review {
        id: generate_entity_id(),
        star: 1,
        user: alice.id.clone(),
        equipment: racket.id.clone(),
        text: None,
        title: None,
        created_at: now,
        updated_at: now,
    };
    let err = store.insert(&racing).await.unwrap_err();
    assert!(matches!(err, courthub::StoreError::UniqueConstraintViolation { .. }));
    assert!(store.get::<Review>(&racing.id).await.unwrap().is_none());
}

#[tokio::test]
async fn user_may_review_again_after_deleting() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Thruster F", "racket", 160.0).await;
    let first = write_review(&store, &alice, &racket.id, 2).await;
    reviews::delete(&store, &alice, &first).await.expect("delete review");

    write_review(&store, &alice, &racket.id, 5).await;
    let item = equipment(&store, &racket.id).await;
    assert_eq!((item.average_rating, item.total_reviews), (5.0, 1));
}

#[tokio::test]
async fn review_of_missing_equipment_is_not_found() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let err = reviews::create(
        &store,
        &alice,
        NewReview {
            star: Some(4),
            equipment: Some("missing".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, HubError::NotFound { entity: "Equipment" }));
}

#[tokio::test]
async fn out_of_range_star_is_a_validation_error() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Duora 10", "racket", 150.0).await;
    for star in [0, 6] {
        let err = reviews::create(
            &store,
            &alice,
            NewReview {
                star: Some(star),
                equipment: Some(racket.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HubError::Validation(_)), "star {star}");
    }
    assert!(reviews::list_for_equipment(&store, &racket.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn catalogue_edit_keeps_rating() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Astrox 77", "racket", 170.0).await;
    write_review(&store, &alice, &racket.id, 4).await;

    let updated = catalogue::update(
        &store,
        &racket.id,
        EquipmentPatch {
            price: Some(149.0),
            ..Default::default()
        },
    )
    .await
    .expect("update equipment");
    assert_eq!(updated.price, 149.0);
    assert_eq!((updated.average_rating, updated.total_reviews), (4.0, 1));
}

#[tokio::test]
async fn review_listing_populates_authors_and_nulls_dangling_ones() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Voltric Z", "racket", 140.0).await;
    write_review(&store, &alice, &racket.id, 4).await;

    let listed = reviews::list_for_equipment(&store, &racket.id).await.unwrap();
    assert_eq!(listed[0].user.as_ref().map(|user| user.name.as_str()), Some("Alice"));

    workflows::accounts::delete(&store, &alice.id).await.expect("delete user");
    let listed = reviews::list_for_equipment(&store, &racket.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].user.is_none());
}
