use serde::{Deserialize, Serialize};

/// Settings for a [`TokenValidator`](crate::TokenValidator).
///
/// Nothing is checked at construction time; a blank `endpoint` only shows up
/// as a failed verification call once requests come in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
  /// Base URL of the identity provider, e.g. `https://tenant.auth0.com`.
  /// `/tokeninfo` is appended verbatim.
  pub endpoint: String,
  /// Key under which the verified claims land in the [`RequestContext`](crate::RequestContext).
  pub context_key: String,
}

impl Options {
  #[must_use]
  pub fn new(endpoint: impl Into<String>, context_key: impl Into<String>) -> Self {
    Self {
      endpoint: endpoint.into(),
      context_key: context_key.into(),
    }
  }
}
