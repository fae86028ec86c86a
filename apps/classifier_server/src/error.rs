//! Error types for the server

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use classifier::ClassifyError;
use thiserror::Error;

use crate::page::{self, View};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Classify(ClassifyError::ModelLoad(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Classify(ClassifyError::ImageDecode(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServerError::Classify(ClassifyError::Inference(_) | ClassifyError::Session(_))
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        let view = match self {
            ServerError::Classify(ClassifyError::ModelLoad(_)) => {
                tracing::error!(error = %message, "Upload refused, model unavailable");
                View::Fatal(message)
            }
            _ => {
                tracing::warn!(status = %self.status_code(), error = %message, "Upload failed");
                View::Error(message)
            }
        };

        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(page::render(&view))
    }
}

impl From<actix_multipart::MultipartError> for ServerError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        ServerError::BadRequest(format!("malformed upload: {e}"))
    }
}

impl From<actix_web::error::BlockingError> for ServerError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        ServerError::Internal(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

impl From<classifier::ModelLoadError> for ServerError {
    fn from(e: classifier::ModelLoadError) -> Self {
        ServerError::Classify(e.into())
    }
}

impl From<classifier::ImageDecodeError> for ServerError {
    fn from(e: classifier::ImageDecodeError) -> Self {
        ServerError::Classify(e.into())
    }
}

impl From<classifier::InferenceError> for ServerError {
    fn from(e: classifier::InferenceError) -> Self {
        ServerError::Classify(e.into())
    }
}
