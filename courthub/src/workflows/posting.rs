//! Discussion posts.

use chrono::Utc;
use serde::Deserialize;

use super::{
    ownership::{Action, authorize},
    populate::Populator,
};
use crate::{
    auth::Actor,
    errors::{HubError, HubResult},
    filters::TextMatcher,
    id::generate_entity_id,
    models::{NewPost, Post, PostPatch, PostView},
    store::Store,
};

#[derive(Debug, Default, Deserialize)]
pub struct PostQuery {
    /// Matched against title and content.
    pub search: Option<String>,
    pub equipment: Option<String>,
}

async fn load(store: &Store, id: &str) -> HubResult<Post> {
    store.get::<Post>(id).await?.ok_or(HubError::not_found("Post"))
}

async fn render(populator: &mut Populator<'_>, post: &Post, with_price: bool) -> HubResult<PostView> {
    let author = populator.user(&post.user).await?;
    let equipment = populator.equipment(post.equipment.as_deref(), with_price).await?;
    Ok(post.view(author, equipment))
}

/// Lists posts, newest first, with author and equipment populated.
pub async fn list(store: &Store, query: PostQuery) -> HubResult<Vec<PostView>> {
    let matcher = TextMatcher::new(query.search.as_deref())?;
    let equipment = query.equipment.as_deref().map(str::trim).filter(|id| !id.is_empty());

    let candidates = match equipment {
        Some(equipment_id) => store.list_by_reference::<Post>("equipment", equipment_id).await?,
        None => store.list::<Post>().await?,
    };
    let mut posts: Vec<Post> = candidates
        .into_iter()
        .filter(|post| {
            matcher
                .as_ref()
                .is_none_or(|matcher| matcher.matches(&post.title) || matcher.matches(&post.content))
        })
        .collect();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut populator = Populator::new(store);
    let mut views = Vec::with_capacity(posts.len());
    for post in &posts {
        views.push(render(&mut populator, post, false).await?);
    }
    Ok(views)
}

/// One post; the populated equipment also carries its price.
pub async fn get(store: &Store, id: &str) -> HubResult<PostView> {
    let post = load(store, id).await?;
    render(&mut Populator::new(store), &post, true).await
}

pub async fn create(store: &Store, actor: &Actor, payload: NewPost) -> HubResult<PostView> {
    let post = payload.into_record(generate_entity_id(), actor.id.clone(), Utc::now())?;
    store.insert(&post).await?;
    log::info!("user {} published post {}", actor.id, post.id);
    render(&mut Populator::new(store), &post, false).await
}

/// Author-only update of title, content and linked equipment. The comment
/// count is left as stored.
pub async fn update(store: &Store, actor: &Actor, id: &str, patch: PostPatch) -> HubResult<Post> {
    let current = load(store, id).await?;
    authorize(actor, &current.user, Action::Update, "post")?;
    let patch = patch.validate()?;

    let mut next = current.clone();
    next.apply(patch, Utc::now());
    store.replace(&current, &next).await?;
    load(store, id).await
}

/// Author or admin delete. Comments on the post are kept.
pub async fn delete(store: &Store, actor: &Actor, id: &str) -> HubResult<()> {
    let post = load(store, id).await?;
    authorize(actor, &post.user, Action::Delete, "post")?;
    store.delete(&post).await?;
    log::info!("post {} removed by {}", post.id, actor.id);
    Ok(())
}
