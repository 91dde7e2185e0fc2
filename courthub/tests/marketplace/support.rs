pub(crate) use chrono::Utc;
pub(crate) use courthub::{
    HubError, Store,
    auth::Actor,
    id::generate_entity_id,
    models::{
        Comment, CommentPatch, Equipment, EquipmentPatch, NewComment, NewEquipment, NewPost, NewReview, Post,
        PostPatch, Review, ReviewPatch, Role, User,
    },
    workflows::{self, catalogue, discussion, posting, reviews},
};

/// Stores a user record directly; the password hash is never checked here.
pub(crate) async fn seed_user(store: &Store, name: &str, role: Role) -> Actor {
    let now = Utc::now();
    let id = generate_entity_id();
    let user = User {
        id: id.clone(),
        user_id: format!("{}-{}", name.to_lowercase(), &id[..6]),
        email: format!("{}-{}@club.test", name.to_lowercase(), id),
        name: name.to_string(),
        password: "unused".to_string(),
        role,
        created_at: now,
        updated_at: now,
    };
    store.insert(&user).await.expect("insert user");
    Actor::from(&user)
}

pub(crate) async fn seed_equipment(store: &Store, name: &str, kind: &str, price: f64) -> Equipment {
    catalogue::create(
        store,
        NewEquipment {
            name: Some(name.to_string()),
            kind: Some(kind.to_string()),
            price: Some(price),
            brand: Some("Yonex".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("create equipment")
}

pub(crate) async fn seed_post(store: &Store, actor: &Actor, title: &str, equipment: Option<&str>) -> Post {
    let view = posting::create(
        store,
        actor,
        NewPost {
            title: Some(title.to_string()),
            content: Some(format!("{title} body")),
            equipment: equipment.map(str::to_string),
        },
    )
    .await
    .expect("create post");
    store.get::<Post>(&view.id).await.expect("load post").expect("post exists")
}

pub(crate) async fn write_review(store: &Store, actor: &Actor, equipment_id: &str, star: i64) -> String {
    reviews::create(
        store,
        actor,
        NewReview {
            star: Some(star),
            equipment: Some(equipment_id.to_string()),
            text: Some("Solid frame".to_string()),
            title: None,
        },
    )
    .await
    .expect("create review")
    .id
}

pub(crate) async fn write_comment(store: &Store, actor: &Actor, post_id: &str, text: &str) -> String {
    discussion::create(
        store,
        actor,
        NewComment {
            post: Some(post_id.to_string()),
            text: Some(text.to_string()),
        },
    )
    .await
    .expect("create comment")
    .id
}

pub(crate) async fn equipment(store: &Store, id: &str) -> Equipment {
    store.get::<Equipment>(id).await.expect("load equipment").expect("equipment exists")
}

pub(crate) async fn comment_count(store: &Store, post_id: &str) -> u64 {
    store
        .get::<Post>(post_id)
        .await
        .expect("load post")
        .expect("post exists")
        .comment_count
}
