use axum::body::Body;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;

#[derive(Debug)]
pub enum Error {
    Database,
    NotFound,
    Validation(String),
    RateLimited(&'static str),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound,
            other => {
                tracing::error!("database error: {:?}", other);
                Error::Database
            }
        }
    }
}

impl From<validator::ValidationError> for Error {
    fn from(err: validator::ValidationError) -> Self {
        Error::Validation(err.code.into_owned())
    }
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::Database => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            Error::Validation(code) => (StatusCode::BAD_REQUEST, code),
            Error::RateLimited(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.to_string()),
        };

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(
                serde_json::to_string(&json!({ "error": message })).unwrap(),
            ))
            .unwrap()
    }
}
