//! Bearer-token sources.

use std::path::PathBuf;
use std::sync::Arc;

use crm_core::config::auth::AuthConfig;
use crm_core::error::AppError;
use crm_core::result::AppResult;
use crm_core::traits::CredentialProvider;

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    /// A provider that always returns `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// A provider that never supplies a token.
    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> AppResult<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every request.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    /// Read from `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvToken {
    fn bearer_token(&self) -> AppResult<Option<String>> {
        Ok(std::env::var(&self.var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

/// Reads the token from a file on every request.
///
/// A missing file means "no token"; any other read error is reported.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    /// Read from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for TokenFile {
    fn bearer_token(&self) -> AppResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                crm_core::ErrorKind::Storage,
                format!("Failed to read token file '{}': {e}", self.path.display()),
                e,
            )),
        }
    }
}

/// Tries each provider in order and returns the first token found.
#[derive(Debug, Default)]
pub struct ChainedCredentials {
    providers: Vec<Arc<dyn CredentialProvider>>,
}

impl ChainedCredentials {
    /// Build the chain described by the `[auth]` config section.
    pub fn from_config(config: &AuthConfig) -> Self {
        let mut providers: Vec<Arc<dyn CredentialProvider>> = Vec::new();
        if let Some(token) = config.token.as_ref().filter(|t| !t.is_empty()) {
            providers.push(Arc::new(StaticToken::new(token.clone())));
        }
        if let Some(var) = &config.token_env {
            providers.push(Arc::new(EnvToken::new(var.clone())));
        }
        if let Some(path) = &config.token_file {
            providers.push(Arc::new(TokenFile::new(path.clone())));
        }
        Self { providers }
    }
}

impl CredentialProvider for ChainedCredentials {
    fn bearer_token(&self) -> AppResult<Option<String>> {
        for provider in &self.providers {
            if let Some(token) = provider.bearer_token()? {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }
}
