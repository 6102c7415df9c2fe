use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::{Request as AxumRequest, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::bearer;
use crate::client::TokenInfoClient;
use crate::data::{RequestContext, TokenInfo};
use crate::error::{Error, Result};
use crate::options::Options;

///
/// Validates the bearer token of each request against the tokeninfo endpoint
/// and stores the returned claims in the request's [`RequestContext`].
///
/// Cheap to clone; clones share the options and the HTTP connection pool.
///
#[derive(Debug, Clone)]
pub struct TokenValidator {
  inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
  options: Options,
  client: TokenInfoClient,
}

impl TokenValidator {
  #[must_use]
  pub fn new(options: Options) -> Self {
    let client = TokenInfoClient::new(&options.endpoint);
    Self::from_parts(options, client)
  }

  /// Same as [`TokenValidator::new`] but sends the verification calls
  /// through `http_client`, e.g. one built with a timeout or custom TLS roots.
  #[must_use]
  pub fn with_http_client(options: Options, http_client: reqwest::Client) -> Self {
    let client = TokenInfoClient::with_http_client(&options.endpoint, http_client);
    Self::from_parts(options, client)
  }

  fn from_parts(options: Options, client: TokenInfoClient) -> Self {
    Self {
      inner: Arc::new(Inner { options, client }),
    }
  }

  #[must_use]
  pub fn options(&self) -> &Options {
    &self.inner.options
  }

  #[must_use]
  pub fn context_key(&self) -> &str {
    &self.inner.options.context_key
  }

  ///
  /// Extract the token, verify it remotely and store the claims in `req`.
  /// Returns a copy of the stored claims.
  ///
  pub async fn authenticate<B>(&self, req: &mut Request<B>) -> Result<TokenInfo> {
    let token = match bearer::from_auth_header(req.headers()) {
      Ok(Some(token)) => token,
      Ok(None) => {
        tracing::debug!("request without bearer token");
        return Err(Error::MissingToken);
      }
      Err(e) => {
        tracing::debug!("malformed authorization header");
        return Err(e);
      }
    };

    let info = match self.inner.client.token_info(&token).await {
      Ok(info) => info,
      Err(Error::Unavailable(e)) => {
        tracing::warn!(error = %e, url = %self.inner.client.url(), "tokeninfo request failed");
        return Err(Error::Unavailable(e));
      }
      Err(e) => {
        tracing::warn!(status = %e.status(), "tokeninfo rejected the token");
        return Err(e);
      }
    };

    let key = self.context_key();
    let extensions = req.extensions_mut();
    if let Some(ctx) = extensions.get_mut::<RequestContext>() {
      ctx.insert(key, info.clone());
    } else {
      let mut ctx = RequestContext::default();
      ctx.insert(key, info.clone());
      extensions.insert(ctx);
    }

    Ok(info)
  }

  ///
  /// Run the middleware around `next`.
  ///
  /// `next` is called exactly once, with the request carrying the claims, when
  /// the token checks out. On any failure the error response is returned and
  /// `next` is dropped without being called.
  ///
  pub async fn handle<B, N, Fut>(&self, mut req: Request<B>, next: N) -> Response
  where
    N: FnOnce(Request<B>) -> Fut,
    Fut: Future<Output = Response>,
  {
    match self.authenticate(&mut req).await {
      Ok(_) => next(req).await,
      Err(e) => e.into_response(),
    }
  }
}

/// Middleware fn for `axum::middleware::from_fn_with_state`.
///
/// ```ignore
/// let validator = TokenValidator::new(Options::new("https://tenant.auth0.com", "user"));
/// let app = Router::new()
///   .route("/me", get(me))
///   .layer(axum::middleware::from_fn_with_state(validator, token_validator_middleware));
/// ```
pub async fn token_validator_middleware(
  State(validator): State<TokenValidator>,
  req: AxumRequest,
  next: Next,
) -> Response {
  validator.handle(req, |req| next.run(req)).await
}

impl<S> Layer<S> for TokenValidator {
  type Service = TokenValidatorService<S>;

  fn layer(&self, inner: S) -> Self::Service {
    TokenValidatorService {
      validator: self.clone(),
      inner,
    }
  }
}

/// Tower service produced by layering a [`TokenValidator`].
#[derive(Debug, Clone)]
pub struct TokenValidatorService<S> {
  validator: TokenValidator,
  inner: S,
}

impl<S, B> Service<Request<B>> for TokenValidatorService<S>
where
  S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
  S::Future: Send + 'static,
  B: Send + 'static,
{
  type Response = Response;
  type Error = S::Error;
  type Future = BoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

  fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
    self.inner.poll_ready(cx)
  }

  fn call(&mut self, mut req: Request<B>) -> Self::Future {
    // the clone is not ready yet, keep the one that was polled
    let clone = self.inner.clone();
    let mut inner = std::mem::replace(&mut self.inner, clone);
    let validator = self.validator.clone();

    Box::pin(async move {
      match validator.authenticate(&mut req).await {
        Ok(_) => inner.call(req).await,
        Err(e) => Ok(e.into_response()),
      }
    })
  }
}
