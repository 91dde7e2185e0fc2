use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FieldChecks, UserSummary};
use crate::{
    errors::ValidationResult,
    types::{DocumentModel, Reference},
};

pub const MAX_TEXT_LEN: usize = 1000;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post: String,
    pub user: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentModel for Comment {
    const COLLECTION: &'static str = "comments";

    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new("post", self.post.clone()),
            Reference::new("user", self.user.clone()),
        ]
    }
}

impl Comment {
    pub fn view(&self, author: Option<UserSummary>) -> CommentView {
        CommentView {
            id: self.id.clone(),
            post: self.post.clone(),
            user: author,
            text: self.text.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub post: String,
    pub user: Option<UserSummary>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Default)]
pub struct NewComment {
    pub post: Option<String>,
    pub text: Option<String>,
}

/// Comment payload after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidComment {
    pub post: String,
    pub text: String,
}

impl NewComment {
    pub fn validate(self) -> ValidationResult<ValidComment> {
        let mut checks = FieldChecks::default();
        let post = checks.required_text("post", self.post, "Post reference is required");
        let text = checks.required_text("text", self.text, "Comment text is required");
        check_text(&mut checks, text.as_deref());
        checks.finish()?;
        Ok(ValidComment {
            post: post.unwrap_or_default(),
            text: text.unwrap_or_default(),
        })
    }
}

impl ValidComment {
    pub fn into_record(self, id: String, user_id: String, now: DateTime<Utc>) -> Comment {
        Comment {
            id,
            post: self.post,
            user: user_id,
            text: self.text,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Comment update; a blank `text` keeps the current one.
#[derive(Deserialize, Debug, Default)]
pub struct CommentPatch {
    pub text: Option<String>,
}

impl CommentPatch {
    pub fn validate(self) -> ValidationResult<Option<String>> {
        let mut checks = FieldChecks::default();
        let text = super::non_blank(self.text);
        check_text(&mut checks, text.as_deref());
        checks.finish()?;
        Ok(text)
    }
}

fn check_text(checks: &mut FieldChecks, text: Option<&str>) {
    checks.max_chars("text", text, MAX_TEXT_LEN, "Comment cannot exceed 1000 characters");
}
