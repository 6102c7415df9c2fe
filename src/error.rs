//! Convenience types for lib specific error handling

use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("Authorization header format must be Bearer {{token}}")]
  MalformedHeader,
  #[error("No token provided")]
  MissingToken,
  #[error("Could not request auth service")]
  Unavailable(#[source] reqwest::Error),
  #[error("Auth service rejected the token with status {status}")]
  Rejected { status: StatusCode, body: Bytes },
}

impl Error {
  /// Status code sent back to the caller.
  #[must_use]
  pub fn status(&self) -> StatusCode {
    match self {
      Self::MalformedHeader | Self::MissingToken => StatusCode::BAD_REQUEST,
      Self::Unavailable(_) => StatusCode::BAD_GATEWAY,
      Self::Rejected { status, .. } => *status,
    }
  }

  /// Body sent back to the caller. A rejection forwards the auth service's
  /// body byte for byte.
  #[must_use]
  pub fn body(&self) -> Bytes {
    match self {
      Self::Rejected { body, .. } => body.clone(),
      other => Bytes::from(other.to_string()),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    let mut response = (status, self.body()).into_response();
    let headers = response.headers_mut();
    headers.insert(
      header::CONTENT_TYPE,
      HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
  }
}

/// Convenience type for Results
pub type Result<T> = std::result::Result<T, Error>;
