//! Caller identity for mutating operations.
//!
//! Identity is established outside the post service; the service only sees a
//! [`Caller`] value handed to each mutating call.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Who is issuing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(Principal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
}

impl Caller {
    pub fn authenticated(name: impl Into<String>) -> Self {
        Self::Authenticated(Principal { name: name.into() })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::Authenticated(_))
    }

    /// Label used in logs.
    pub fn actor_label(&self) -> &str {
        match self {
            Caller::Anonymous => "anonymous",
            Caller::Authenticated(principal) => principal.name.as_str(),
        }
    }
}

/// A named bearer token, stored as its SHA-256 digest.
#[derive(Debug, Clone)]
pub struct TokenCredential {
    pub name: String,
    pub digest: Vec<u8>,
}

/// Resolves bearer tokens against configured credentials.
#[derive(Debug, Clone, Default)]
pub struct TokenAuthenticator {
    credentials: Vec<TokenCredential>,
}

impl TokenAuthenticator {
    pub fn new(credentials: Vec<TokenCredential>) -> Self {
        Self { credentials }
    }

    pub fn hash_token(token: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hasher.finalize().to_vec()
    }

    /// Unknown or missing tokens resolve to [`Caller::Anonymous`].
    pub fn authenticate(&self, token: Option<&str>) -> Caller {
        let Some(token) = token.filter(|token| !token.is_empty()) else {
            return Caller::Anonymous;
        };

        let hashed = Self::hash_token(token);
        self.credentials
            .iter()
            .find(|credential| credential.digest.ct_eq(&hashed).unwrap_u8() == 1)
            .map(|credential| Caller::authenticated(credential.name.clone()))
            .unwrap_or(Caller::Anonymous)
    }
}
