//! Response envelope shared by every endpoint.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// Renders a status code as the envelope's status label, e.g.
/// `HTTP_202_ACCEPTED`.
pub fn status_label(status: StatusCode) -> String {
    let reason = status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_uppercase()
        .replace([' ', '-'], "_");

    format!("HTTP_{}_{}", status.as_u16(), reason)
}

/// Body shape of every response: `{ "status": ..., "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T) -> Response {
        let body = ApiResponse {
            status: status_label(status),
            data,
        };

        (status, Json(body)).into_response()
    }

    pub fn ok(data: T) -> Response {
        Self::new(StatusCode::OK, data)
    }
}

/// 202 with an empty data object; accepted updates never echo the record.
pub fn accepted() -> Response {
    ApiResponse::new(StatusCode::ACCEPTED, json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(StatusCode::OK), "HTTP_200_OK");
        assert_eq!(status_label(StatusCode::ACCEPTED), "HTTP_202_ACCEPTED");
        assert_eq!(status_label(StatusCode::NOT_FOUND), "HTTP_404_NOT_FOUND");
        assert_eq!(
            status_label(StatusCode::BAD_REQUEST),
            "HTTP_400_BAD_REQUEST"
        );
        assert_eq!(
            status_label(StatusCode::UNAUTHORIZED),
            "HTTP_401_UNAUTHORIZED"
        );
        assert_eq!(status_label(StatusCode::FORBIDDEN), "HTTP_403_FORBIDDEN");
    }
}
