use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EquipmentSummary, FieldChecks, UserSummary};
use crate::{
    errors::ValidationResult,
    types::{DocumentModel, Reference},
};

pub const MAX_TITLE_LEN: usize = 200;

/// A discussion thread. `comment_count` mirrors the number of live comments.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub equipment: Option<String>,
    pub user: String,
    #[serde(default)]
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentModel for Post {
    const COLLECTION: &'static str = "posts";
    const DERIVED_FIELDS: &'static [&'static str] = &["commentCount"];

    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Vec<Reference> {
        let mut references = vec![Reference::new("user", self.user.clone())];
        if let Some(equipment) = &self.equipment {
            references.push(Reference::new("equipment", equipment.clone()));
        }
        references
    }
}

impl Post {
    pub fn apply(&mut self, patch: ValidPostPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(equipment) = patch.equipment {
            self.equipment = equipment;
        }
        self.updated_at = now;
    }

    pub fn view(&self, author: Option<UserSummary>, equipment: Option<EquipmentSummary>) -> PostView {
        PostView {
            id: self.id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            equipment,
            user: author,
            comment_count: self.comment_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Post with author and equipment populated. A reference whose target no
/// longer exists populates as `null`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub equipment: Option<EquipmentSummary>,
    pub user: Option<UserSummary>,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Default)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub equipment: Option<String>,
}

impl NewPost {
    pub fn into_record(self, id: String, user_id: String, now: DateTime<Utc>) -> ValidationResult<Post> {
        let mut checks = FieldChecks::default();
        let title = checks.required_text("title", self.title, "Post title is required");
        checks.max_chars("title", title.as_deref(), MAX_TITLE_LEN, "Title cannot exceed 200 characters");
        let content = checks.required_text("content", self.content, "Post content is required");
        let equipment = checks.optional_text(self.equipment);
        checks.finish()?;

        Ok(Post {
            id,
            title: title.unwrap_or_default(),
            content: content.unwrap_or_default(),
            equipment,
            user: user_id,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Post update. Blank `title` / `content` keep the current value; an
/// explicit `null` equipment detaches the post from the catalogue.
#[derive(Deserialize, Debug, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub equipment: Option<Option<String>>,
}

#[derive(Debug, Default, PartialEq)]
pub struct ValidPostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub equipment: Option<Option<String>>,
}

impl PostPatch {
    pub fn validate(self) -> ValidationResult<ValidPostPatch> {
        let mut checks = FieldChecks::default();
        let title = super::non_blank(self.title);
        checks.max_chars("title", title.as_deref(), MAX_TITLE_LEN, "Title cannot exceed 200 characters");
        let content = super::non_blank(self.content);
        let equipment = self.equipment.map(|equipment| checks.optional_text(equipment));
        checks.finish()?;
        Ok(ValidPostPatch {
            title,
            content,
            equipment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_starts_without_comments() {
        let post = NewPost {
            title: Some("Best string tension?".to_string()),
            content: Some("I play doubles at 26 lbs.".to_string()),
            equipment: Some(String::new()),
        }
        .into_record("p1".to_string(), "u1".to_string(), Utc::now())
        .unwrap();
        assert_eq!(post.comment_count, 0);
        assert_eq!(post.equipment, None);
        assert_eq!(post.references(), vec![Reference::new("user", "u1")]);
    }

    #[test]
    fn title_limit_is_enforced() {
        let err = NewPost {
            title: Some("t".repeat(MAX_TITLE_LEN + 1)),
            content: Some("body".to_string()),
            equipment: None,
        }
        .into_record("p1".to_string(), "u1".to_string(), Utc::now())
        .unwrap_err();
        assert_eq!(err.issues[0].message, "Title cannot exceed 200 characters");
    }

    #[test]
    fn patch_blank_title_keeps_current() {
        let mut post = NewPost {
            title: Some("Original".to_string()),
            content: Some("Body".to_string()),
            equipment: Some("eq1".to_string()),
        }
        .into_record("p1".to_string(), "u1".to_string(), Utc::now())
        .unwrap();
        let patch: PostPatch = serde_json::from_str(r#"{"title": "  ", "equipment": null}"#).unwrap();
        post.apply(patch.validate().unwrap(), Utc::now());
        assert_eq!(post.title, "Original");
        assert_eq!(post.equipment, None);
    }
}
