use actix_web::{Either, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitewatch::Registry;
use tracing::debug;

use crate::error::ApiError;

macros_utils::routes! {
    route add_route,
    route status_route,
    route delete_route,
}

/// Body of `POST /add`, as JSON or a urlencoded form
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    url: Option<String>,
    /// Seconds between checks, a number or a numeric string
    interval: Option<Value>,
}

/// Body of `POST /delete`
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    url: Option<String>,
}

#[derive(Serialize)]
struct Success {
    success: bool,
}

const SUCCESS: Success = Success { success: true };

fn interval_secs(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Register a URL to monitor
#[post("/add")]
pub async fn add_route(
    registry: web::Data<Registry>,
    body: Either<web::Json<AddRequest>, web::Form<AddRequest>>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    let url = request.url.filter(|url| !url.trim().is_empty());
    let interval = request.interval.as_ref().and_then(interval_secs);
    let (Some(url), Some(interval)) = (url, interval) else {
        return Err(ApiError::InvalidInput("A url and a whole number interval are required".into()));
    };

    registry.add(&url, interval)?;
    Ok(HttpResponse::Ok().json(SUCCESS))
}

/// Current state of every monitor, in the order they were added
#[get("/status")]
pub async fn status_route(registry: web::Data<Registry>) -> HttpResponse {
    HttpResponse::Ok().json(registry.snapshot())
}

/// Stop monitoring a URL.
///
/// Always succeeds: unknown URLs, missing or unreadable bodies are ignored.
#[post("/delete")]
pub async fn delete_route(
    registry: web::Data<Registry>,
    body: Option<Either<web::Json<DeleteRequest>, web::Form<DeleteRequest>>>,
) -> HttpResponse {
    if let Some(url) = body.and_then(|body| body.into_inner().url) {
        if let Err(e) = registry.remove(&url) {
            debug!(error = %e, "delete ignored");
        }
    }

    HttpResponse::Ok().json(SUCCESS)
}
