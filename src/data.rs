use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::util::deserialize_lenient_string;

/// Path appended to the configured endpoint for the verification call.
pub const TOKENINFO_PATH: &str = "/tokeninfo";

/// Body posted to the tokeninfo endpoint.
#[derive(Debug, Serialize)]
pub struct TokenInfoRequest<'a> {
  pub id_token: &'a str,
}

/// Claims returned by the tokeninfo endpoint.
///
/// Example of a successful response:
/// {
///   "user_id": "auth0|abc123",
///   "email": "a@b.com",
///   "email_verified": "true",
///   "clientID": "cid",
///   "picture": "https://s.gravatar.com/avatar/abc.png",
///   "nickname": "nick",
///   "name": "A B"
/// }
///
/// Every field is a string, `email_verified` included. Fields that are
/// missing, `null` or not a string come out as `""`.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
  #[serde(default, deserialize_with = "deserialize_lenient_string")]
  pub user_id: String,
  #[serde(default, deserialize_with = "deserialize_lenient_string")]
  pub email: String,
  #[serde(default, deserialize_with = "deserialize_lenient_string")]
  pub email_verified: String,
  #[serde(rename = "clientID", default, deserialize_with = "deserialize_lenient_string")]
  pub client_id: String,
  #[serde(default, deserialize_with = "deserialize_lenient_string")]
  pub picture: String,
  #[serde(default, deserialize_with = "deserialize_lenient_string")]
  pub nickname: String,
  #[serde(default, deserialize_with = "deserialize_lenient_string")]
  pub name: String,
}

impl TokenInfo {
  /// Decodes a tokeninfo response body without ever failing.
  ///
  /// Anything that is not a JSON object yields `TokenInfo::default()`.
  /// Inside an object, each field is decoded on its own, so one bad field
  /// does not wipe out the others.
  #[must_use]
  pub fn from_slice_lenient(buf: &[u8]) -> Self {
    let object = match serde_json::from_slice::<Map<String, Value>>(buf) {
      Ok(object) => object,
      Err(e) => {
        tracing::debug!(error = %e, "tokeninfo body is not a JSON object, using empty claims");
        return Self::default();
      }
    };

    Self::deserialize(Value::Object(object)).unwrap_or_else(|e| {
      tracing::debug!(error = %e, "tokeninfo body could not be decoded, using empty claims");
      Self::default()
    })
  }

  /// `email_verified` is sent as a string; only `"true"` counts.
  #[must_use]
  pub fn is_email_verified(&self) -> bool {
    self.email_verified == "true"
  }
}

/// Per-request store of verified claims, keyed by the middleware's context key.
///
/// The middleware puts one of these into the request extensions; handlers
/// further down the chain read it back with `request.extensions()` or axum's
/// `Extension<RequestContext>` extractor.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
  values: HashMap<String, TokenInfo>,
}

impl RequestContext {
  #[must_use]
  pub fn get(&self, key: &str) -> Option<&TokenInfo> {
    self.values.get(key)
  }

  /// Stores `info` under `key`, replacing what was there.
  pub fn insert(&mut self, key: impl Into<String>, info: TokenInfo) -> Option<TokenInfo> {
    self.values.insert(key.into(), info)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.values.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::{RequestContext, TokenInfo, TokenInfoRequest};

  #[test]
  fn should_decode_full_body() {
    let body = br#"{"user_id":"abc123","email":"a@b.com","email_verified":"true","clientID":"cid","picture":"","nickname":"nick","name":"A B"}"#;
    let info = TokenInfo::from_slice_lenient(body);

    assert_eq!(info.user_id, "abc123");
    assert_eq!(info.email, "a@b.com");
    assert_eq!(info.email_verified, "true");
    assert_eq!(info.client_id, "cid");
    assert_eq!(info.picture, "");
    assert_eq!(info.nickname, "nick");
    assert_eq!(info.name, "A B");
    assert!(info.is_email_verified());
  }

  #[test]
  fn should_default_missing_fields() {
    let info = TokenInfo::from_slice_lenient(br#"{"user_id":"x"}"#);

    assert_eq!(
      info,
      TokenInfo {
        user_id: "x".to_owned(),
        ..TokenInfo::default()
      }
    );
  }

  #[test]
  fn should_blank_mistyped_fields_only() {
    let body = br#"{"user_id":42,"email":"a@b.com","email_verified":true,"picture":null,"nickname":{"a":[1,2]},"name":["A"],"extra":"ignored"}"#;
    let info = TokenInfo::from_slice_lenient(body);

    assert_eq!(info.user_id, "");
    assert_eq!(info.email, "a@b.com");
    assert_eq!(info.email_verified, "");
    assert!(!info.is_email_verified());
    assert_eq!(info.picture, "");
    assert_eq!(info.nickname, "");
    assert_eq!(info.name, "");
  }

  #[test]
  fn should_not_fail_on_garbage() {
    let bodies: [&[u8]; 6] = [b"", b"not json", br#"["abc","a@b.com"]"#, br#""abc""#, b"null", br#"{"user_id":"x""#];
    for body in bodies {
      assert_eq!(TokenInfo::from_slice_lenient(body), TokenInfo::default());
    }
  }

  #[test]
  fn should_serialize_request_body() {
    let body = serde_json::to_string(&TokenInfoRequest { id_token: "abc" }).unwrap();
    assert_eq!(body, r#"{"id_token":"abc"}"#);
  }

  #[test]
  fn should_replace_value_under_same_key() {
    let mut ctx = RequestContext::default();
    assert!(ctx.is_empty());

    ctx.insert("user", TokenInfo { user_id: "a".to_owned(), ..TokenInfo::default() });
    let previous = ctx.insert("user", TokenInfo { user_id: "b".to_owned(), ..TokenInfo::default() });

    assert_eq!(previous.map(|info| info.user_id), Some("a".to_owned()));
    assert_eq!(ctx.len(), 1);
    assert_eq!(ctx.get("user").map(|info| info.user_id.as_str()), Some("b"));
    assert!(ctx.get("other").is_none());
  }
}
