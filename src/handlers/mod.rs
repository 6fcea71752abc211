use axum::response::Response;
use serde::Serialize;

use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod artists;
pub mod shows;
pub mod venues;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

#[derive(Serialize)]
struct HomePayload {
    service: &'static str,
    links: [&'static str; 3],
}

pub async fn index() -> Response {
    let payload = HomePayload {
        service: "fyyur",
        links: ["/venues", "/artists", "/shows"],
    };

    success(payload, "Welcome to Fyyur")
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "fyyur-api",
    };

    success(payload, "Health check successful")
}

pub async fn not_found() -> AppError {
    AppError::NotFound("The requested page does not exist".to_string())
}

/// Path ids that are not positive integers name nothing.
pub(crate) fn parse_id(raw: &str, kind: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::NotFound(format!("{} '{}' was not found", kind, raw)))
}
