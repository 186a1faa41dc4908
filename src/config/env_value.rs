// ABOUTME: Configuration values that may be read from the process environment.
// ABOUTME: Keeps secrets such as access keys out of committed config files.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A config value given literally or as a reference to an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("environment variable {0} is not set")]
pub struct UnresolvedEnvValue(pub String);

impl EnvValue {
    pub fn literal(value: impl Into<String>) -> Self {
        EnvValue::Literal(value.into())
    }

    /// Resolve using a custom variable lookup.
    pub fn resolve_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String, UnresolvedEnvValue> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => lookup(var)
                .or_else(|| default.clone())
                .ok_or_else(|| UnresolvedEnvValue(var.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_resolves_to_itself() {
        let value = EnvValue::literal("AKIDEXAMPLE");
        assert_eq!(value.resolve_with(|_| None).unwrap(), "AKIDEXAMPLE");
    }

    #[test]
    fn env_reference_uses_lookup_then_default() {
        let value = EnvValue::FromEnv {
            var: "DEPLOY_SECRET".to_string(),
            default: Some("fallback".to_string()),
        };
        assert_eq!(
            value
                .resolve_with(|v| (v == "DEPLOY_SECRET").then(|| "s3cr3t".to_string()))
                .unwrap(),
            "s3cr3t"
        );
        assert_eq!(value.resolve_with(|_| None).unwrap(), "fallback");
    }

    #[test]
    fn missing_env_reference_without_default_fails() {
        let value = EnvValue::FromEnv {
            var: "DEPLOY_SECRET".to_string(),
            default: None,
        };
        let err = value.resolve_with(|_| None).unwrap_err();
        assert_eq!(err, UnresolvedEnvValue("DEPLOY_SECRET".to_string()));
    }

    #[test]
    fn parses_both_yaml_shapes() {
        let literal: EnvValue = serde_yaml::from_str("plain").unwrap();
        assert_eq!(literal, EnvValue::literal("plain"));

        let reference: EnvValue = serde_yaml::from_str("{env: SECRET}").unwrap();
        assert_eq!(
            reference,
            EnvValue::FromEnv {
                var: "SECRET".to_string(),
                default: None
            }
        );
    }
}
