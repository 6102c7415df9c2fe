use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

use crate::data::{TokenInfo, TokenInfoRequest, TOKENINFO_PATH};
use crate::error::{Error, Result};

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Talks to the identity provider's tokeninfo endpoint.
#[derive(Debug, Clone)]
pub struct TokenInfoClient {
  url: String,
  http_client: Client,
}

impl TokenInfoClient {
  /// `endpoint` is the provider base URL; `/tokeninfo` is appended as is.
  #[must_use]
  pub fn new(endpoint: &str) -> Self {
    Self::with_http_client(endpoint, Client::new())
  }

  #[must_use]
  pub fn with_http_client(endpoint: &str, http_client: Client) -> Self {
    Self {
      url: format!("{endpoint}{TOKENINFO_PATH}"),
      http_client,
    }
  }

  #[must_use]
  pub fn url(&self) -> &str {
    &self.url
  }

  /// Asks the provider whether `token` is valid and returns its claims.
  ///
  /// Only a 200 counts as success. Any other status comes back as
  /// `Error::Rejected` carrying the provider's status and body untouched.
  /// The claims are decoded with [`TokenInfo::from_slice_lenient`].
  pub async fn token_info(&self, token: &str) -> Result<TokenInfo> {
    tracing::debug!(url = %self.url, "requesting tokeninfo");

    let res = self
      .http_client
      .post(&self.url)
      .header(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))
      .json(&TokenInfoRequest { id_token: token })
      .send()
      .await
      .map_err(Error::Unavailable)?;

    let status = res.status();
    if status != StatusCode::OK {
      let body = res.bytes().await.unwrap_or_default();
      return Err(Error::Rejected { status, body });
    }

    let buf = match res.bytes().await {
      Ok(buf) => buf,
      Err(e) => {
        tracing::debug!(error = %e, "failed to read tokeninfo body, using empty claims");
        return Ok(TokenInfo::default());
      }
    };

    Ok(TokenInfo::from_slice_lenient(&buf))
  }
}
