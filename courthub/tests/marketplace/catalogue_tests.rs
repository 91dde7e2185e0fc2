use super::support::*;

fn query(kind: Option<&str>, search: Option<&str>, min: Option<&str>, max: Option<&str>) -> catalogue::CatalogueQuery {
    catalogue::CatalogueQuery {
        kind: kind.map(str::to_string),
        search: search.map(str::to_string),
        min_price: min.map(str::to_string),
        max_price: max.map(str::to_string),
    }
}

async fn names(store: &Store, query: catalogue::CatalogueQuery) -> Vec<String> {
    let mut names: Vec<String> = catalogue::list(store, query)
        .await
        .expect("list catalogue")
        .into_iter()
        .map(|item| item.name)
        .collect();
    names.sort();
    names
}

async fn seeded() -> Store {
    let store = Store::memory();
    seed_equipment(&store, "Astrox 99 Pro", "racket", 230.0).await;
    seed_equipment(&store, "Nanoflare 700", "racket", 150.0).await;
    seed_equipment(&store, "Aerosensa 50", "shuttlecock", 35.0).await;
    seed_equipment(&store, "BG80 (200m)", "string", 90.0).await;
    store
}

#[tokio::test]
async fn filters_combine() {
    let store = seeded().await;
    assert_eq!(names(&store, query(None, None, None, None)).await.len(), 4);
    assert_eq!(
        names(&store, query(Some("racket"), None, None, None)).await,
        vec!["Astrox 99 Pro", "Nanoflare 700"]
    );
    assert_eq!(
        names(&store, query(Some("RACKET"), None, Some("100"), Some("200"))).await,
        vec!["Nanoflare 700"]
    );
    assert_eq!(names(&store, query(None, Some("astrox"), None, None)).await, vec!["Astrox 99 Pro"]);
    assert_eq!(names(&store, query(Some("string"), None, None, None)).await, vec!["BG80 (200m)"]);
}

#[tokio::test]
async fn search_is_literal() {
    let store = seeded().await;
    assert_eq!(names(&store, query(None, Some("(200m)"), None, None)).await, vec!["BG80 (200m)"]);
    assert!(names(&store, query(None, Some(".*"), None, None)).await.is_empty());
}

#[tokio::test]
async fn unknown_type_matches_nothing() {
    let store = seeded().await;
    assert!(names(&store, query(Some("trampoline"), None, None, None)).await.is_empty());
}

#[tokio::test]
async fn price_bounds_are_inclusive_and_checked() {
    let store = seeded().await;
    assert_eq!(
        names(&store, query(None, None, Some("90"), Some("150"))).await,
        vec!["BG80 (200m)", "Nanoflare 700"]
    );
    let err = catalogue::list(&store, query(None, None, Some("cheap"), None)).await.unwrap_err();
    assert!(matches!(err, HubError::Validation(_)));
}

#[tokio::test]
async fn listing_is_newest_first() {
    let store = Store::memory();
    let older = seed_equipment(&store, "Old Bag", "bag", 40.0).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = seed_equipment(&store, "New Bag", "bag", 60.0).await;

    let listed = catalogue::list(&store, catalogue::CatalogueQuery::default()).await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);
}

#[tokio::test]
async fn invalid_equipment_is_rejected_with_every_issue() {
    let store = Store::memory();
    let err = catalogue::create(
        &store,
        NewEquipment {
            kind: Some("trampoline".to_string()),
            price: Some(-1.0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    match err {
        HubError::Validation(validation) => {
            let fields: Vec<&str> = validation.issues.iter().map(|issue| issue.field.as_str()).collect();
            assert!(fields.contains(&"name"));
            assert!(fields.contains(&"type"));
            assert!(fields.contains(&"price"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.list::<Equipment>().await.unwrap().is_empty());
}

#[tokio::test]
async fn posts_filter_by_equipment_and_search() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Astrox 99", "racket", 219.0).await;
    seed_post(&store, &alice, "Astrox 99 tension", Some(&racket.id)).await;
    seed_post(&store, &alice, "Club night", None).await;

    let by_item = posting::list(
        &store,
        posting::PostQuery {
            equipment: Some(racket.id.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_item.len(), 1);
    let linked = by_item[0].equipment.as_ref().expect("equipment populated");
    assert_eq!(linked.name, "Astrox 99");
    assert_eq!(linked.price, None);

    let searched = posting::list(
        &store,
        posting::PostQuery {
            search: Some("NIGHT body".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].title, "Club night");

    let detail = posting::get(&store, &by_item[0].id).await.unwrap();
    assert_eq!(detail.equipment.and_then(|item| item.price), Some(219.0));
    assert_eq!(detail.user.map(|user| user.name), Some("Alice".to_string()));
}

#[tokio::test]
async fn post_with_removed_equipment_populates_null() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Arcsaber 7", "racket", 130.0).await;
    let post = seed_post(&store, &alice, "Selling my Arcsaber", Some(&racket.id)).await;

    catalogue::delete(&store, &racket.id).await.expect("delete equipment");
    let view = posting::get(&store, &post.id).await.unwrap();
    assert!(view.equipment.is_none());
    assert!(view.user.is_some());
}

#[tokio::test]
async fn clearing_equipment_on_a_post() {
    let store = Store::memory();
    let alice = seed_user(&store, "Alice", Role::User).await;
    let racket = seed_equipment(&store, "Arcsaber 2", "racket", 90.0).await;
    let post = seed_post(&store, &alice, "Beginner racket", Some(&racket.id)).await;

    let updated = posting::update(
        &store,
        &alice,
        &post.id,
        PostPatch {
            equipment: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.equipment, None);

    let linked = posting::list(
        &store,
        posting::PostQuery {
            equipment: Some(racket.id.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(linked.is_empty());
}
