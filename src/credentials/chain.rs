// ABOUTME: Ordered credential provider chain built from a CredentialSpec.
// ABOUTME: Tries explicit, shared-profile and environment providers in turn.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use aws_config::Region;
use aws_config::default_provider::credentials::DefaultCredentialsChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_runtime::env_config::file::EnvConfigFiles;
use aws_credential_types::Credentials;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_codedeploy::error::DisplayErrorContext;
use nonempty::NonEmpty;
use thiserror::Error;
use tracing::{debug, info};

use super::environment::{self, DEFAULT_ENV_PREFIX};
use super::spec::{CredentialMode, CredentialSpec, ExplicitCredentials};

const EXPLICIT_PROVIDER: &str = "Explicit";
const DEFAULT_CHAIN_PROVIDER: &str = "DefaultChain";

/// One way of obtaining credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStrategy {
    Explicit(ExplicitCredentials),
    SharedProfile { profile: Option<String> },
    Environment { prefix: String },
}

impl CredentialStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            CredentialStrategy::Explicit(_) => "explicit",
            CredentialStrategy::SharedProfile { .. } => "shared",
            CredentialStrategy::Environment { .. } => "environment",
        }
    }
}

/// Ordered strategies selected by `spec.mode`.
///
/// Explicit key material is only attempted when present. The result is local
/// to the caller; nothing is registered globally.
pub fn strategies(spec: &CredentialSpec) -> Vec<CredentialStrategy> {
    let mut chain = Vec::with_capacity(3);

    if spec.mode.includes_explicit()
        && let Some(explicit) = &spec.explicit
    {
        chain.push(CredentialStrategy::Explicit(explicit.clone()));
    }

    if spec.mode.includes_shared() {
        chain.push(CredentialStrategy::SharedProfile {
            profile: spec.shared.clone(),
        });
    }

    if spec.mode.includes_environment() {
        chain.push(CredentialStrategy::Environment {
            prefix: spec
                .environment
                .clone()
                .unwrap_or_else(|| DEFAULT_ENV_PREFIX.to_string()),
        });
    }

    chain
}

/// A provider that was attempted and produced no credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: &'static str,
    pub reason: String,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential mode `{0}` selects no provider (missing explicit key material?)")]
    NoProviders(CredentialMode),

    #[error("no credential provider produced credentials ({})", join_failures(.failures))]
    Exhausted { failures: NonEmpty<ProviderFailure> },

    #[error("default credential chain failed: {0}")]
    DefaultChain(String),
}

fn join_failures(failures: &NonEmpty<ProviderFailure>) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Credentials produced by the chain, plus which provider supplied them.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    credentials: Credentials,
    source: &'static str,
}

impl ResolvedCredentials {
    pub fn new(credentials: Credentials, source: &'static str) -> Self {
        Self {
            credentials,
            source,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Name of the provider that supplied the credentials.
    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn access_key_id(&self) -> &str {
        self.credentials.access_key_id()
    }

    pub fn secret_access_key(&self) -> &str {
        self.credentials.secret_access_key()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.credentials.session_token()
    }
}

/// Where environment variables are read from.
#[derive(Debug, Clone, Default)]
pub enum EnvLookup {
    #[default]
    Process,
    Fixed(Arc<HashMap<String, String>>),
}

impl EnvLookup {
    pub fn fixed<K: Into<String>, V: Into<String>>(vars: impl IntoIterator<Item = (K, V)>) -> Self {
        EnvLookup::Fixed(Arc::new(
            vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ))
    }

    pub fn get(&self, name: &str) -> Option<String> {
        match self {
            EnvLookup::Process => std::env::var(name).ok(),
            EnvLookup::Fixed(vars) => vars.get(name).cloned(),
        }
    }
}

/// Resolves a [`CredentialSpec`] to one active credential set.
#[derive(Debug, Clone, Default)]
pub struct CredentialChainResolver {
    profile_files: Option<EnvConfigFiles>,
    env: EnvLookup,
}

impl CredentialChainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read shared profiles from these files instead of `~/.aws`.
    pub fn with_profile_files(mut self, files: EnvConfigFiles) -> Self {
        self.profile_files = Some(files);
        self
    }

    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Resolve credentials; `None` means no `awsCredentials` block was given
    /// and the SDK's default provider chain for `region` is used.
    pub async fn resolve(
        &self,
        spec: Option<&CredentialSpec>,
        region: &str,
    ) -> Result<ResolvedCredentials, CredentialError> {
        let Some(spec) = spec else {
            return self.resolve_default(region).await;
        };

        let chain = strategies(spec);
        let mut failures = Vec::new();

        for strategy in &chain {
            debug!(provider = strategy.name(), "attempting credential provider");
            match self.attempt(strategy).await {
                Ok(credentials) => {
                    info!(provider = strategy.name(), "resolved credentials");
                    return Ok(credentials);
                }
                Err(reason) => {
                    debug!(provider = strategy.name(), %reason, "credential provider failed");
                    failures.push(ProviderFailure {
                        provider: strategy.name(),
                        reason,
                    });
                }
            }
        }

        match NonEmpty::from_vec(failures) {
            Some(failures) => Err(CredentialError::Exhausted { failures }),
            None => Err(CredentialError::NoProviders(spec.mode)),
        }
    }

    async fn attempt(&self, strategy: &CredentialStrategy) -> Result<ResolvedCredentials, String> {
        match strategy {
            CredentialStrategy::Explicit(explicit) => self.explicit(explicit),
            CredentialStrategy::SharedProfile { profile } => {
                self.shared_profile(profile.as_deref()).await
            }
            CredentialStrategy::Environment { prefix } => {
                environment::load(prefix, |name| self.env.get(name))
                    .map(|c| ResolvedCredentials::new(c, environment::PROVIDER_NAME))
            }
        }
    }

    fn explicit(&self, explicit: &ExplicitCredentials) -> Result<ResolvedCredentials, String> {
        let lookup = |name: &str| self.env.get(name);
        let access_key = explicit
            .access_key_id
            .resolve_with(lookup)
            .map_err(|e| e.to_string())?;
        let secret_key = explicit
            .secret_access_key
            .resolve_with(lookup)
            .map_err(|e| e.to_string())?;
        let session_token = explicit
            .session_token
            .as_ref()
            .map(|token| token.resolve_with(lookup))
            .transpose()
            .map_err(|e| e.to_string())?;

        if access_key.is_empty() || secret_key.is_empty() {
            return Err("explicit key pair is incomplete".to_string());
        }

        Ok(ResolvedCredentials::new(
            Credentials::new(access_key, secret_key, session_token, None, EXPLICIT_PROVIDER),
            EXPLICIT_PROVIDER,
        ))
    }

    async fn shared_profile(&self, profile: Option<&str>) -> Result<ResolvedCredentials, String> {
        let mut builder = ProfileFileCredentialsProvider::builder();
        if let Some(profile) = profile {
            builder = builder.profile_name(profile);
        }
        if let Some(files) = &self.profile_files {
            builder = builder.profile_files(files.clone());
        }

        builder
            .build()
            .provide_credentials()
            .await
            .map(|c| ResolvedCredentials::new(c, "SharedProfile"))
            .map_err(|e| DisplayErrorContext(e).to_string())
    }

    async fn resolve_default(&self, region: &str) -> Result<ResolvedCredentials, CredentialError> {
        debug!(region, "using default credential provider chain");
        let chain = DefaultCredentialsChain::builder()
            .region(Region::new(region.to_string()))
            .build()
            .await;

        chain
            .provide_credentials()
            .await
            .map(|c| ResolvedCredentials::new(c, DEFAULT_CHAIN_PROVIDER))
            .map_err(|e| CredentialError::DefaultChain(DisplayErrorContext(e).to_string()))
    }
}
