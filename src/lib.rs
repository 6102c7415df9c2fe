#![forbid(unsafe_code)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::perf)]
#![deny(clippy::match_like_matches_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

//! Bearer token middleware backed by a remote `tokeninfo` endpoint.
//!
//! Every request's `Authorization: Bearer <token>` is posted to
//! `{endpoint}/tokeninfo`. A 200 answer is decoded into [`TokenInfo`] and put
//! into the request's [`RequestContext`] under the configured key before the
//! next handler runs; anything else ends the request with an error response.

mod bearer;
mod client;
mod data;
mod error;
mod middleware;
mod options;
mod util;

#[cfg(test)]
pub(crate) mod test_helper;

pub use bearer::from_auth_header;
pub use client::TokenInfoClient;
pub use data::{RequestContext, TokenInfo, TokenInfoRequest, TOKENINFO_PATH};
pub use error::{Error, Result};
pub use middleware::{token_validator_middleware, TokenValidator, TokenValidatorService};
pub use options::Options;
