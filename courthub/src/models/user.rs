use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FieldChecks;
use crate::{
    errors::ValidationResult,
    types::{DocumentModel, UniqueValue},
    validators::is_valid_email,
};

/// Minimum length of a plain-text password.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// A registered account. `password` holds the argon2 PHC string, never the
/// plain secret.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentModel for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }

    fn unique_values(&self) -> Vec<UniqueValue> {
        vec![
            UniqueValue::single("email", self.email.to_lowercase()),
            UniqueValue::single("userId", self.user_id.clone()),
        ]
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Client-facing view of a user; the password hash never leaves the store.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author details embedded in posts, comments and reviews.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Registration payload. A requested role is ignored; admins are promoted
/// out of band.
#[derive(Deserialize, Debug, Default)]
pub struct NewUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Registration payload after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(self) -> ValidationResult<ValidRegistration> {
        let mut checks = FieldChecks::default();
        let email = checks
            .required_text("email", self.email, "Email is required")
            .map(|email| email.to_lowercase());
        check_email(&mut checks, email.as_deref());
        let name = checks.required_text("name", self.name, "Name is required");
        let password = match self.password {
            Some(password) if !password.is_empty() => Some(password),
            _ => {
                checks.push("password", "validation.required", "Password is required");
                None
            }
        };
        check_password(&mut checks, password.as_deref());
        checks.finish()?;

        Ok(ValidRegistration {
            email: email.unwrap_or_default(),
            name: name.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
    }
}

/// Login payload.
#[derive(Deserialize, Debug, Default)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Profile update. Blank values keep the current field.
#[derive(Deserialize, Debug, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile update after validation; `password` is still plain text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidUserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    pub fn validate(self) -> ValidationResult<ValidUserPatch> {
        let mut checks = FieldChecks::default();
        let name = super::non_blank(self.name);
        let email = super::non_blank(self.email).map(|email| email.to_lowercase());
        check_email(&mut checks, email.as_deref());
        let password = self.password.filter(|password| !password.is_empty());
        check_password(&mut checks, password.as_deref());
        checks.finish()?;
        Ok(ValidUserPatch { name, email, password })
    }
}

fn check_email(checks: &mut FieldChecks, email: Option<&str>) {
    if let Some(email) = email
        && !is_valid_email(email)
    {
        checks.push("email", "validation.email", "Please enter a valid email");
    }
}

fn check_password(checks: &mut FieldChecks, password: Option<&str>) {
    if let Some(password) = password
        && password.chars().count() < MIN_PASSWORD_LEN
    {
        checks.push(
            "password",
            "validation.length",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
}
