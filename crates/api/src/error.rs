//! Mapping of application errors to HTTP responses.
//!
//! Not-found errors are answered with a plain-text body; every other error
//! carries a JSON body `{ "error": <code>, "message": <text> }`. Details of
//! server errors are only logged.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tally_db::RepositoryError;
use tally_shared::AppError;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if let AppError::NotFound(message) = error {
            return (status, message).into_response();
        }

        let message = if error.is_server_error() {
            tracing::error!(error = %error, "Request failed");
            "An error occurred".to_string()
        } else {
            tracing::debug!(error = %error, "Request rejected");
            error.message().to_string()
        };

        (
            status,
            Json(json!({
                "error": error.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_is_plain_text() {
        let response =
            ApiError::from(RepositoryError::not_found("Expense", 42)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(
            response.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );
        assert_eq!(body_of(response).await, "Expense 42 is not found");
    }

    #[tokio::test]
    async fn test_missing_documents_body() {
        let response =
            ApiError::from(RepositoryError::DocumentsNotFound(vec![1, 2])).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await, "Documents [1, 2] are not found");
    }

    #[tokio::test]
    async fn test_validation_is_json() {
        let response =
            ApiError::from(AppError::Validation("title must not be blank".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(
            body,
            json!({ "error": "VALIDATION_ERROR", "message": "title must not be blank" })
        );
    }

    #[tokio::test]
    async fn test_conflict_is_json() {
        let response = ApiError::from(RepositoryError::StaleVersion {
            entity: "Invoice",
            id: 3,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(body["error"], "CONFLICT");
        assert_eq!(body["message"], "Invoice 3 has been modified concurrently");
    }

    #[tokio::test]
    async fn test_server_error_hides_details() {
        let response =
            ApiError::from(AppError::Database("connection refused".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(
            body,
            json!({ "error": "DATABASE_ERROR", "message": "An error occurred" })
        );
    }
}
