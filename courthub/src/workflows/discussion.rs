//! Comments on posts, kept in step with each post's comment count.

use chrono::Utc;

use super::{
    aggregates::{comment_added, comment_removed},
    ownership::{Action, authorize},
    populate::Populator,
};
use crate::{
    auth::Actor,
    errors::{HubError, HubResult},
    id::generate_entity_id,
    models::{Comment, CommentPatch, CommentView, NewComment, Post},
    store::Store,
};

async fn load(store: &Store, id: &str) -> HubResult<Comment> {
    store.get::<Comment>(id).await?.ok_or(HubError::not_found("Comment"))
}

/// Comments of a post, newest first, authors populated.
pub async fn list_for_post(store: &Store, post_id: &str) -> HubResult<Vec<CommentView>> {
    let mut comments = store.list_by_reference::<Comment>("post", post_id).await?;
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut populator = Populator::new(store);
    let mut views = Vec::with_capacity(comments.len());
    for comment in &comments {
        let author = populator.user(&comment.user).await?;
        views.push(comment.view(author));
    }
    Ok(views)
}

/// Adds a comment to an existing post and bumps its comment count.
pub async fn create(store: &Store, actor: &Actor, payload: NewComment) -> HubResult<CommentView> {
    let valid = payload.validate()?;
    if store.get::<Post>(&valid.post).await?.is_none() {
        return Err(HubError::not_found("Post"));
    }

    let comment = valid.into_record(generate_entity_id(), actor.id.clone(), Utc::now());
    store.insert(&comment).await?;
    comment_added(store, &comment.post).await.inspect_err(|err| {
        log::warn!("comment {} stored but post {} count not raised: {err}", comment.id, comment.post);
    })?;

    let author = Populator::new(store).user(&comment.user).await?;
    Ok(comment.view(author))
}

/// Author-only text edit. Leaves the comment count alone.
pub async fn update(store: &Store, actor: &Actor, id: &str, patch: CommentPatch) -> HubResult<Comment> {
    let current = load(store, id).await?;
    authorize(actor, &current.user, Action::Update, "comment")?;
    let text = patch.validate()?;

    let mut next = current.clone();
    if let Some(text) = text {
        next.text = text;
    }
    next.updated_at = Utc::now();
    store.replace(&current, &next).await?;
    Ok(next)
}

/// Author or admin delete. The parent's count drops first (never below
/// zero), then the comment goes.
pub async fn delete(store: &Store, actor: &Actor, id: &str) -> HubResult<()> {
    let comment = load(store, id).await?;
    authorize(actor, &comment.user, Action::Delete, "comment")?;

    comment_removed(store, &comment.post).await?;
    if !store.delete(&comment).await? {
        log::warn!("comment {} vanished before delete; post {} count may need reconcile", comment.id, comment.post);
    }
    Ok(())
}
