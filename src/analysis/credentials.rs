use std::env;

use async_trait::async_trait;

use crate::analysis::{
    error::{AnalysisError, no_credential},
    types::DEFAULT_CREDENTIAL_ENV,
};

/// Bearer token for the completion provider. Never blank once constructed.
#[derive(Clone)]
pub struct ResolvedCredential {
    token: String,
}

impl ResolvedCredential {
    pub fn new(token: impl Into<String>) -> Result<Self, AnalysisError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(no_credential("credential token cannot be empty"));
        }
        Ok(Self { token })
    }

    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Yields the credential for one provider call. Resolved fresh per call, never cached.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn resolve(&self) -> Result<ResolvedCredential, AnalysisError>;
}

pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CREDENTIAL_ENV)
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn resolve(&self) -> Result<ResolvedCredential, AnalysisError> {
        let token = env::var(&self.var).map_err(|_| {
            no_credential(format!(
                "missing credential environment variable {}",
                self.var
            ))
        })?;

        ResolvedCredential::new(token).map_err(|_| {
            no_credential(format!(
                "credential environment variable {} is blank",
                self.var
            ))
        })
    }
}

/// Caller-supplied token for a single request.
pub struct StaticCredentialProvider {
    token: String,
}

impl StaticCredentialProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn resolve(&self) -> Result<ResolvedCredential, AnalysisError> {
        ResolvedCredential::new(self.token.clone())
    }
}
