//! Bearer-token authentication for the `/v1` API.
//!
//! Handlers take a [`BearerAuth`] argument; extraction fails with a 403
//! envelope before the handler body (and therefore any service) runs.

use std::fmt;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{error, warn};
use zeroize::Zeroizing;

use crate::domain::Error;

/// Legacy numeric rejection code kept for existing clients.
pub const AUTH_REJECTION_CODE: u32 = 10306;
const AUTH_REJECTION_MESSAGE: &str = "There is no authorization";
const AUTH_REJECTION_DETAIL: &str = "Missing or invalid Bearer token";

/// Configured API secret. Wiped from memory on drop.
#[derive(Clone)]
pub struct ApiToken(Zeroizing<String>);

impl ApiToken {
    /// Wrap a secret. Returns `None` for an empty token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = Zeroizing::new(token.into());
        (!token.is_empty()).then_some(Self(token))
    }

    /// Compare a presented token without short-circuiting on the first
    /// differing byte. Both sides are hashed first so lengths never leak.
    pub fn matches(&self, presented: &str) -> bool {
        let expected = Sha256::digest(self.0.as_bytes());
        let actual = Sha256::digest(presented.as_bytes());
        expected
            .iter()
            .zip(actual.iter())
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiToken").field(&"[redacted]").finish()
    }
}

/// Proof that the request carried the configured bearer token.
#[derive(Debug, Clone, Copy)]
pub struct BearerAuth;

fn rejection() -> Error {
    Error::forbidden(AUTH_REJECTION_MESSAGE).with_details(json!({
        "code": AUTH_REJECTION_CODE,
        "detail": AUTH_REJECTION_DETAIL,
    }))
}

fn presented_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

fn authorise(req: &HttpRequest) -> Result<BearerAuth, Error> {
    let Some(expected) = req.app_data::<web::Data<ApiToken>>() else {
        error!("no API token registered; rejecting request");
        return Err(Error::internal("API token not configured"));
    };
    match presented_token(req) {
        Some(token) if expected.matches(token) => Ok(BearerAuth),
        presented => {
            warn!(
                path = %req.path(),
                header_present = presented.is_some(),
                "rejected request with missing or invalid bearer token"
            );
            Err(rejection())
        }
    }
}

impl FromRequest for BearerAuth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorise(req).map_err(actix_web::Error::from))
    }
}
