//! Registration, login and profile management.

use chrono::Utc;
use serde::Serialize;

use super::ownership::{Action, authorize};
use crate::{
    auth::{Actor, TokenIssuer, hash_password, verify_password},
    errors::{HubError, HubResult, StoreError},
    id::{generate_entity_id, generate_user_handle},
    models::{NewUser, Role, User, UserPatch, UserProfile, user::Credentials},
    store::Store,
    types::UniqueValue,
};

const USER_EXISTS: &str = "User already exists";
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Profile plus a fresh bearer token, returned by register and login.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl Session {
    fn open(user: &User, tokens: &TokenIssuer) -> HubResult<Self> {
        Ok(Self {
            id: user.id.clone(),
            user_id: user.user_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            token: tokens.issue(&user.id)?,
        })
    }
}

async fn find_by_email(store: &Store, email: &str) -> HubResult<Option<User>> {
    let value = UniqueValue::single("email", email.trim().to_lowercase());
    match store.find_unique::<User>(&value).await? {
        Some(id) => Ok(store.get::<User>(&id).await?),
        None => Ok(None),
    }
}

async fn load(store: &Store, id: &str) -> HubResult<User> {
    store.get::<User>(id).await?.ok_or(HubError::not_found("User"))
}

fn email_taken(err: StoreError) -> HubError {
    match err {
        StoreError::UniqueConstraintViolation { .. } => HubError::conflict(USER_EXISTS),
        other => other.into(),
    }
}

/// Creates a `user`-role account. Any role in the payload is ignored.
pub async fn register(store: &Store, tokens: &TokenIssuer, payload: NewUser) -> HubResult<Session> {
    let valid = payload.validate()?;
    if find_by_email(store, &valid.email).await?.is_some() {
        return Err(HubError::conflict(USER_EXISTS));
    }

    let now = Utc::now();
    let user = User {
        id: generate_entity_id(),
        user_id: generate_user_handle(&valid.email, now),
        password: hash_password(&valid.password)?,
        email: valid.email,
        name: valid.name,
        role: Role::User,
        created_at: now,
        updated_at: now,
    };
    store.insert(&user).await.map_err(email_taken)?;
    log::info!("registered user {} ({})", user.id, user.user_id);
    Session::open(&user, tokens)
}

pub async fn login(store: &Store, tokens: &TokenIssuer, credentials: Credentials) -> HubResult<Session> {
    let user = find_by_email(store, &credentials.email).await?;
    match user {
        Some(user) if verify_password(&credentials.password, &user.password) => Session::open(&user, tokens),
        _ => Err(HubError::unauthorized(BAD_CREDENTIALS)),
    }
}

/// Resolves a bearer token to the user it was issued for.
pub async fn authenticate(store: &Store, tokens: &TokenIssuer, token: &str) -> HubResult<Actor> {
    let claims = tokens.verify(token)?;
    match store.get::<User>(&claims.id).await? {
        Some(user) => Ok(Actor::from(&user)),
        None => Err(HubError::unauthorized("Not authorized, token failed")),
    }
}

/// Every account, newest first.
pub async fn list(store: &Store) -> HubResult<Vec<UserProfile>> {
    let mut users = store.list::<User>().await?;
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(users.iter().map(User::profile).collect())
}

pub async fn get(store: &Store, id: &str) -> HubResult<UserProfile> {
    Ok(load(store, id).await?.profile())
}

/// Updates name, email or password. Allowed for the user themself and for
/// admins.
pub async fn update(store: &Store, actor: &Actor, id: &str, patch: UserPatch) -> HubResult<UserProfile> {
    let current = load(store, id).await?;
    if !actor.is_admin() {
        authorize(actor, &current.id, Action::Update, "user")?;
    }
    let patch = patch.validate()?;

    let mut next = current.clone();
    if let Some(name) = patch.name {
        next.name = name;
    }
    if let Some(email) = patch.email
        && email != current.email
    {
        if find_by_email(store, &email).await?.is_some() {
            return Err(HubError::conflict(USER_EXISTS));
        }
        next.email = email;
    }
    if let Some(password) = patch.password {
        next.password = hash_password(&password)?;
    }
    next.updated_at = Utc::now();

    store.replace(&current, &next).await.map_err(email_taken)?;
    Ok(next.profile())
}

/// Removes the account. Posts, comments and reviews it wrote are kept.
pub async fn delete(store: &Store, id: &str) -> HubResult<()> {
    let user = load(store, id).await?;
    store.delete(&user).await?;
    log::info!("deleted user {}", user.id);
    Ok(())
}

/// Grants the admin role to the account registered under `email`.
pub async fn promote(store: &Store, email: &str) -> HubResult<UserProfile> {
    let current = find_by_email(store, email).await?.ok_or(HubError::not_found("User"))?;
    if current.is_admin() {
        return Ok(current.profile());
    }
    let mut next = current.clone();
    next.role = Role::Admin;
    next.updated_at = Utc::now();
    store.replace(&current, &next).await?;
    log::info!("promoted user {} to admin", next.id);
    Ok(next.profile())
}
