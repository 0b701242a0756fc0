//! Identity collaborator interface.
//!
//! The core never logs anyone in. It asks a `TokenProvider` for a bearer
//! token before each remote call:
//! - `StaticToken`: a fixed token, for mocked identities and tests
//! - `CredentialStore`: a token kept in the OS keychain via keyring

pub mod credentials;

use anyhow::Result;

pub use credentials::CredentialStore;

/// Source of the bearer token attached to every request.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Result<String>;
}

/// A token fixed at construction time.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
