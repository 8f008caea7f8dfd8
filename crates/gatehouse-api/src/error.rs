//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use gatehouse_core::{Error, wire::ErrorBody};
use thiserror::Error;

/// Shown instead of the real cause of an [`Error::Internal`].
pub const INTERNAL_MESSAGE: &str = "Server error, please retry.";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Registry(#[from] Error),

  /// A registry error on the login route; rendered with `loginSuccess: false`.
  #[error(transparent)]
  Login(Error),

  #[error("invalid request body: {0}")]
  Body(#[from] JsonRejection),
}

fn status_code(err: &Error) -> StatusCode {
  match err {
    Error::BadRequest(_) => StatusCode::BAD_REQUEST,
    Error::Conflict { .. } => StatusCode::CONFLICT,
    Error::Forbidden { .. } => StatusCode::FORBIDDEN,
    Error::Unauthorized => StatusCode::UNAUTHORIZED,
    Error::NotFound => StatusCode::NOT_FOUND,
    Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

fn message(err: &Error) -> String {
  match err {
    Error::Internal(source) => {
      tracing::error!(error = %source, "request failed");
      INTERNAL_MESSAGE.to_string()
    }
    other => other.to_string(),
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Registry(e) => (status_code(e), ErrorBody {
        message:         message(e),
        approval_status: e.status(),
        login_success:   None,
      }),
      ApiError::Login(e) => (status_code(e), ErrorBody {
        message:         message(e),
        approval_status: e.status(),
        login_success:   Some(false),
      }),
      ApiError::Body(rejection) => (StatusCode::BAD_REQUEST, ErrorBody {
        message:         rejection.body_text(),
        approval_status: None,
        login_success:   None,
      }),
    };
    (status, Json(body)).into_response()
  }
}
