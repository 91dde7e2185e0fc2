use std::borrow::Cow;

use thiserror::Error;

/// Error type returned by the document store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Target document was not found when performing a mutation.
    #[error("document not found")]
    NotFound { entity_id: Option<String> },

    /// Unique key already claimed by another document.
    #[error("unique constraint violation: fields {fields:?} with values {values:?} already exist on entity '{existing_entity_id}'")]
    UniqueConstraintViolation {
        fields: Vec<String>,
        values: Vec<String>,
        existing_entity_id: String,
    },

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

/// Collection of validation issues encountered while building a record.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    /// Human readable summary joining every issue message.
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Failure taxonomy shared by every workflow.
#[derive(Debug, Error)]
pub enum HubError {
    /// Referenced entity is absent.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{}", .0.summary())]
    Validation(#[from] ValidationError),

    /// Duplicate email, duplicate review and similar clashes.
    #[error("{message}")]
    Conflict { message: Cow<'static, str> },

    /// Requester is known but may not perform the mutation.
    #[error("{message}")]
    Forbidden { message: Cow<'static, str> },

    /// Requester could not be identified.
    #[error("{message}")]
    Unauthorized { message: Cow<'static, str> },

    #[error(transparent)]
    Store(StoreError),
}

impl HubError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict { message: message.into() }
    }

    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    /// Internal failure wrapping a message rather than a store error.
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Store(StoreError::Other { message: message.into() })
    }
}

impl From<StoreError> for HubError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueConstraintViolation { fields, .. } => {
                HubError::conflict(format!("duplicate value for {}", fields.join(", ")))
            }
            other => HubError::Store(other),
        }
    }
}

pub type HubResult<T> = Result<T, HubError>;
