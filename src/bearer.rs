use axum::http::{header::AUTHORIZATION, HeaderMap};
use headers::authorization::Bearer;
use headers::{Authorization, HeaderMapExt};

use crate::error::{Error, Result};

/// Pulls the bearer token out of the `Authorization` header.
///
/// Returns `Ok(None)` when there is no header or the header is empty, and
/// `Error::MalformedHeader` when it is set to anything other than
/// `Bearer <token>` with exactly one non-empty credential.
pub fn from_auth_header(headers: &HeaderMap) -> Result<Option<String>> {
  match headers.get(AUTHORIZATION) {
    None => return Ok(None),
    Some(value) if value.is_empty() => return Ok(None),
    Some(_) => {}
  }

  let auth = headers
    .typed_try_get::<Authorization<Bearer>>()
    .map_err(|_| Error::MalformedHeader)?
    .ok_or(Error::MalformedHeader)?;

  let token = auth.token().trim();
  if token.is_empty() || token.contains(char::is_whitespace) {
    return Err(Error::MalformedHeader);
  }

  Ok(Some(token.to_owned()))
}
