use anyhow::{Context, Result};
use keyring::Entry;

use super::TokenProvider;

const SERVICE_NAME: &str = "larder";

/// Bearer token stored in the OS keychain under a username.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    username: String,
}

impl CredentialStore {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &self.username).context("Failed to create keyring entry")
    }

    /// Store the token in the OS keychain
    pub fn store(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .context("Failed to store token in keychain")
    }

    /// Delete the stored token
    pub fn delete(&self) -> Result<()> {
        self.entry()?
            .delete_credential()
            .context("Failed to delete token from keychain")
    }

    /// Check if a token exists for this username
    pub fn has_token(&self) -> bool {
        self.entry().map(|e| e.get_password().is_ok()).unwrap_or(false)
    }
}

impl TokenProvider for CredentialStore {
    fn bearer_token(&self) -> Result<String> {
        self.entry()?
            .get_password()
            .with_context(|| format!("No token stored for {}", self.username))
    }
}
