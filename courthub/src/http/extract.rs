//! Request extractors: JSON bodies and query strings with the crate's error
//! body, plus bearer-token identities.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::{
    auth::Actor,
    errors::HubError,
    hub::Hub,
    workflows::accounts,
};

/// JSON body whose rejection renders as a validation error.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Payload(value))
    }
}

/// Query string whose rejection renders as a validation error.
#[derive(Debug)]
pub struct Filters<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for Filters<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Filters(value))
    }
}

/// Any signed-in user.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Actor);

/// A signed-in user holding the admin role.
#[derive(Debug, Clone)]
pub struct Admin(pub Actor);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<Hub> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, hub: &Hub) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(HubError::unauthorized("Not authorized, no token"))?;
        let actor = accounts::authenticate(hub.store(), hub.tokens(), token).await?;
        Ok(Authenticated(actor))
    }
}

#[axum::async_trait]
impl FromRequestParts<Hub> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, hub: &Hub) -> Result<Self, Self::Rejection> {
        let Authenticated(actor) = Authenticated::from_request_parts(parts, hub).await?;
        if !actor.is_admin() {
            return Err(HubError::forbidden("Not authorized as an admin").into());
        }
        Ok(Admin(actor))
    }
}
