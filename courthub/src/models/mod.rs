//! Typed documents and the request payloads that build them.
//!
//! Every payload is validated when it is turned into a record, so a value of
//! one of these types always satisfies the field rules (required fields,
//! enumerations, numeric ranges, length limits).

pub mod comment;
pub mod equipment;
pub mod post;
pub mod review;
pub mod user;

pub use comment::{Comment, CommentPatch, CommentView, NewComment};
pub use equipment::{Equipment, EquipmentPatch, EquipmentSummary, EquipmentType, NewEquipment};
pub use post::{NewPost, Post, PostPatch, PostView};
pub use review::{NewReview, Review, ReviewPatch, ReviewView};
pub use user::{NewUser, Role, User, UserPatch, UserProfile, UserSummary};

use serde::{Deserialize, Deserializer};

use crate::errors::{ValidationError, ValidationIssue, ValidationResult};

/// Accumulates field issues while a payload is being converted.
#[derive(Debug, Default)]
pub(crate) struct FieldChecks {
    issues: Vec<ValidationIssue>,
}

impl FieldChecks {
    pub(crate) fn push(&mut self, field: &str, code: &str, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(field, code, message));
    }

    /// Trims the value and reports it missing when absent or blank.
    pub(crate) fn required_text(&mut self, field: &str, value: Option<String>, message: &str) -> Option<String> {
        match value.map(|raw| raw.trim().to_string()) {
            Some(text) if !text.is_empty() => Some(text),
            _ => {
                self.push(field, "validation.required", message);
                None
            }
        }
    }

    /// Trims an optional value; blank collapses to `None`.
    pub(crate) fn optional_text(&mut self, value: Option<String>) -> Option<String> {
        value
            .map(|raw| raw.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    pub(crate) fn max_chars(&mut self, field: &str, value: Option<&str>, max: usize, message: &str) {
        if let Some(text) = value
            && text.chars().count() > max
        {
            self.push(field, "validation.length", message);
        }
    }

    pub(crate) fn finish(self) -> ValidationResult<()> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.issues))
        }
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in patch payloads.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Keeps the current value when a patch carries a blank string.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_flags_blank() {
        let mut checks = FieldChecks::default();
        assert_eq!(
            checks.required_text("name", Some("  Astrox 99 ".to_string()), "Name is required"),
            Some("Astrox 99".to_string())
        );
        assert_eq!(checks.required_text("brand", Some("   ".to_string()), "Brand is required"), None);
        assert_eq!(checks.required_text("title", None, "Title is required"), None);
        let err = checks.finish().unwrap_err();
        assert_eq!(err.issues.len(), 2);
        assert_eq!(err.issues[0].field, "brand");
        assert_eq!(err.issues[1].code, "validation.required");
    }

    #[test]
    fn max_chars_counts_characters_not_bytes() {
        let mut checks = FieldChecks::default();
        checks.max_chars("text", Some("ééé"), 3, "too long");
        assert!(checks.finish().is_ok());

        let mut checks = FieldChecks::default();
        checks.max_chars("text", Some("abcd"), 3, "too long");
        assert!(checks.finish().is_err());
    }

    #[test]
    fn non_blank_drops_whitespace() {
        assert_eq!(non_blank(Some(" \t".to_string())), None);
        assert_eq!(non_blank(Some(" ok ".to_string())), Some("ok".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
