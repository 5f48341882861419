//! Bearer token authentication.

use std::collections::HashSet;
use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

const BEARER_SCHEME: &str = "bearer";

/// Accepted bearer tokens for authenticated routes.
#[derive(Clone, Debug, Default)]
pub struct BearerAuth {
    tokens: Arc<HashSet<String>>,
}

impl BearerAuth {
    /// Accept any of the given tokens. Blank tokens are ignored.
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tokens = tokens
            .into_iter()
            .map(|token| Into::<String>::into(token).trim().to_string())
            .filter(|token| !token.is_empty())
            .collect();
        Self {
            tokens: Arc::new(tokens),
        }
    }

    /// Number of accepted tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Check the `Authorization` header of a request.
    pub fn verify(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidHeader)?;

        let (scheme, token) = value.trim().split_once(' ').ok_or(AuthError::InvalidHeader)?;
        if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
            return Err(AuthError::InvalidHeader);
        }

        // Compare against every accepted token without short-circuiting.
        let candidate = token.trim().as_bytes();
        let matched = self
            .tokens
            .iter()
            .fold(false, |found, known| found | constant_time_eq(known.as_bytes(), candidate));
        if matched {
            Ok(())
        } else {
            Err(AuthError::UnknownToken)
        }
    }
}

/// Compare two byte strings in time independent of where they differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Reasons a request failed authentication.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No credentials supplied
    #[error("missing authorization header")]
    MissingHeader,
    /// Header present but not `Bearer <token>`
    #[error("invalid authorization header")]
    InvalidHeader,
    /// Token not in the accepted set
    #[error("unknown bearer token")]
    UnknownToken,
}
