use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing vote field")]
    MissingVote,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingVote => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}
