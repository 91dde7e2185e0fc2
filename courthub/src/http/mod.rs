//! HTTP surface.
//!
//! JSON over axum. Handlers are thin: they extract the identity and the
//! payload, call one workflow and serialize its result.

mod catalogue;
mod comments;
mod error;
mod extract;
mod posts;
mod reviews;
mod users;

pub use error::{ApiError, ApiResult};
pub use extract::{Admin, Authenticated, Filters, Payload};

use std::{future::Future, time::Instant};

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::hub::Hub;

/// Builds the application router around a hub.
pub fn router(hub: Hub) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .route("/api/users", get(users::list))
        .route("/api/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route("/api/catalogue", get(catalogue::list).post(catalogue::create))
        .route(
            "/api/catalogue/:id",
            get(catalogue::get).put(catalogue::update).delete(catalogue::delete),
        )
        .route("/api/posts", get(posts::list).post(posts::create))
        .route("/api/posts/:id", get(posts::get).put(posts::update).delete(posts::delete))
        .route("/api/comments", post(comments::create))
        .route("/api/comments/post/:post_id", get(comments::list_for_post))
        .route("/api/comments/:id", put(comments::update).delete(comments::delete))
        .route("/api/reviews", post(reviews::create))
        .route("/api/reviews/equipment/:equipment_id", get(reviews::list_for_equipment))
        .route("/api/reviews/:id", put(reviews::update).delete(reviews::delete))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(hub)
}

/// Serves `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr().context("Listener has no local address")?;
    log::info!("listening on http://{address}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;
    log::info!("server stopped");
    Ok(())
}

async fn banner() -> Json<Value> {
    Json(json!({
        "message": "CourtHub API",
        "endpoints": {
            "users": "/api/users",
            "catalogue": "/api/catalogue",
            "posts": "/api/posts",
            "comments": "/api/comments",
            "reviews": "/api/reviews",
        }
    }))
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Route not found" }))).into_response()
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    log::info!(
        "{method} {path} -> {} in {}ms",
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
