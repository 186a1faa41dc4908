// ABOUTME: Cloud credential selection and resolution.
// ABOUTME: Builds an ordered provider chain from config and resolves it once.

mod chain;
mod environment;
mod spec;

pub use chain::{
    CredentialChainResolver, CredentialError, CredentialStrategy, EnvLookup, ProviderFailure,
    ResolvedCredentials, strategies,
};
pub use environment::DEFAULT_ENV_PREFIX;
pub use spec::{CredentialMode, CredentialSpec, ExplicitCredentials};
