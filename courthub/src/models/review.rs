use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FieldChecks, UserSummary};
use crate::{
    errors::ValidationResult,
    types::{DocumentModel, Reference, UniqueValue},
};

pub const MIN_STAR: i64 = 1;
pub const MAX_STAR: i64 = 5;
pub const MAX_TEXT_LEN: usize = 500;
pub const MAX_TITLE_LEN: usize = 100;

/// One user's rating of one catalogue item. At most one per
/// (user, equipment) pair.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub star: u8,
    pub user: String,
    pub equipment: String,
    pub text: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentModel for Review {
    const COLLECTION: &'static str = "reviews";

    fn id(&self) -> &str {
        &self.id
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new("equipment", self.equipment.clone()),
            Reference::new("user", self.user.clone()),
        ]
    }

    fn unique_values(&self) -> Vec<UniqueValue> {
        vec![review_uniqueness(&self.user, &self.equipment)]
    }
}

/// The compound key that allows a single review per user and item.
pub fn review_uniqueness(user_id: &str, equipment_id: &str) -> UniqueValue {
    UniqueValue::compound(
        vec!["user", "equipment"],
        vec![user_id.to_string(), equipment_id.to_string()],
    )
}

impl Review {
    pub fn apply(&mut self, patch: ValidReviewPatch, now: DateTime<Utc>) {
        if let Some(star) = patch.star {
            self.star = star;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        self.updated_at = now;
    }

    pub fn view(&self, author: Option<UserSummary>) -> ReviewView {
        ReviewView {
            id: self.id.clone(),
            star: self.star,
            user: author,
            equipment: self.equipment.clone(),
            text: self.text.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Review with its author populated; `user` is `null` once the author is gone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: String,
    pub star: u8,
    pub user: Option<UserSummary>,
    pub equipment: String,
    pub text: Option<String>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Default)]
pub struct NewReview {
    pub star: Option<i64>,
    pub equipment: Option<String>,
    pub text: Option<String>,
    pub title: Option<String>,
}

/// Review payload after validation, before the author is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReview {
    pub star: u8,
    pub equipment: String,
    pub text: Option<String>,
    pub title: Option<String>,
}

impl NewReview {
    pub fn validate(self) -> ValidationResult<ValidReview> {
        let mut checks = FieldChecks::default();
        let star = match self.star {
            Some(star) => check_star(&mut checks, star),
            None => {
                checks.push("star", "validation.required", "Rating is required");
                None
            }
        };
        let equipment = checks.required_text("equipment", self.equipment, "Equipment reference is required");
        let text = checks.optional_text(self.text);
        let title = checks.optional_text(self.title);
        check_lengths(&mut checks, text.as_deref(), title.as_deref());
        checks.finish()?;

        Ok(ValidReview {
            star: star.unwrap_or_default(),
            equipment: equipment.unwrap_or_default(),
            text,
            title,
        })
    }
}

impl ValidReview {
    pub fn into_record(self, id: String, user_id: String, now: DateTime<Utc>) -> Review {
        Review {
            id,
            star: self.star,
            user: user_id,
            equipment: self.equipment,
            text: self.text,
            title: self.title,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial review update. An explicit `null` or blank string clears `text`
/// or `title`.
#[derive(Deserialize, Debug, Default)]
pub struct ReviewPatch {
    pub star: Option<i64>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub title: Option<Option<String>>,
}

#[derive(Debug, Default, PartialEq)]
pub struct ValidReviewPatch {
    pub star: Option<u8>,
    pub text: Option<Option<String>>,
    pub title: Option<Option<String>>,
}

impl ReviewPatch {
    pub fn validate(self) -> ValidationResult<ValidReviewPatch> {
        let mut checks = FieldChecks::default();
        let star = self.star.and_then(|star| check_star(&mut checks, star));
        let text = self.text.map(|text| checks.optional_text(text));
        let title = self.title.map(|title| checks.optional_text(title));
        check_lengths(
            &mut checks,
            text.as_ref().and_then(|text| text.as_deref()),
            title.as_ref().and_then(|title| title.as_deref()),
        );
        checks.finish()?;
        Ok(ValidReviewPatch { star, text, title })
    }
}

fn check_star(checks: &mut FieldChecks, star: i64) -> Option<u8> {
    if star < MIN_STAR {
        checks.push("star", "validation.range", "Rating must be at least 1");
        None
    } else if star > MAX_STAR {
        checks.push("star", "validation.range", "Rating cannot exceed 5");
        None
    } else {
        u8::try_from(star).ok()
    }
}

fn check_lengths(checks: &mut FieldChecks, text: Option<&str>, title: Option<&str>) {
    checks.max_chars("text", text, MAX_TEXT_LEN, "Review cannot exceed 500 characters");
    checks.max_chars("title", title, MAX_TITLE_LEN, "Review title cannot exceed 100 characters");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_must_be_between_one_and_five() {
        for star in [0, 6, -3] {
            let err = NewReview {
                star: Some(star),
                equipment: Some("eq1".to_string()),
                ..Default::default()
            }
            .validate()
            .unwrap_err();
            assert_eq!(err.issues[0].code, "validation.range");
        }
        let ok = NewReview {
            star: Some(5),
            equipment: Some("eq1".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(ok.star, 5);
    }

    #[test]
    fn missing_star_and_equipment_are_reported() {
        let err = NewReview::default().validate().unwrap_err();
        let messages: Vec<_> = err.issues.iter().map(|issue| issue.message.as_str()).collect();
        assert_eq!(messages, vec!["Rating is required", "Equipment reference is required"]);
    }

    #[test]
    fn long_title_is_rejected() {
        let err = NewReview {
            star: Some(3),
            equipment: Some("eq1".to_string()),
            title: Some("x".repeat(MAX_TITLE_LEN + 1)),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.issues[0].field, "title");
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let patch: ReviewPatch = serde_json::from_str(r#"{"text": null}"#).unwrap();
        let patch = patch.validate().unwrap();
        assert_eq!(patch.text, Some(None));
        assert_eq!(patch.title, None);
        assert_eq!(patch.star, None);
    }

    #[test]
    fn references_and_uniqueness() {
        let review = ValidReview {
            star: 4,
            equipment: "eq1".to_string(),
            text: None,
            title: None,
        }
        .into_record("r1".to_string(), "u1".to_string(), Utc::now());
        assert_eq!(review.references()[0], Reference::new("equipment", "eq1"));
        let unique = &review.unique_values()[0];
        assert_eq!(unique.fields, vec!["user", "equipment"]);
        assert_eq!(unique.values, vec!["u1".to_string(), "eq1".to_string()]);
    }
}
