// ABOUTME: Credentials read from prefixed environment variables.
// ABOUTME: Looks up {PREFIX}_ACCESS_KEY_ID, _SECRET_ACCESS_KEY and _SESSION_TOKEN.

use aws_credential_types::Credentials;

pub const DEFAULT_ENV_PREFIX: &str = "AWS";

pub(crate) const PROVIDER_NAME: &str = "Environment";

/// Load credentials for `prefix` using `lookup` for variable access.
pub(crate) fn load(
    prefix: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, String> {
    let var = |suffix: &str| format!("{prefix}_{suffix}");
    let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

    let access_key_name = var("ACCESS_KEY_ID");
    let secret_key_name = var("SECRET_ACCESS_KEY");

    let access_key = non_empty(&access_key_name)
        .ok_or_else(|| format!("environment variable {access_key_name} is not set"))?;
    let secret_key = non_empty(&secret_key_name)
        .ok_or_else(|| format!("environment variable {secret_key_name} is not set"))?;
    let session_token = non_empty(&var("SESSION_TOKEN"));

    Ok(Credentials::new(
        access_key,
        secret_key,
        session_token,
        None,
        PROVIDER_NAME,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_prefixed_variables() {
        let creds = load(
            "DEPLOY",
            lookup(&[
                ("DEPLOY_ACCESS_KEY_ID", "AKID"),
                ("DEPLOY_SECRET_ACCESS_KEY", "SECRET"),
                ("DEPLOY_SESSION_TOKEN", "TOKEN"),
            ]),
        )
        .unwrap();
        assert_eq!(creds.access_key_id(), "AKID");
        assert_eq!(creds.secret_access_key(), "SECRET");
        assert_eq!(creds.session_token(), Some("TOKEN"));
    }

    #[test]
    fn missing_secret_is_reported_by_name() {
        let err = load("AWS", lookup(&[("AWS_ACCESS_KEY_ID", "AKID")])).unwrap_err();
        assert!(err.contains("AWS_SECRET_ACCESS_KEY"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let err = load(
            "AWS",
            lookup(&[("AWS_ACCESS_KEY_ID", ""), ("AWS_SECRET_ACCESS_KEY", "x")]),
        )
        .unwrap_err();
        assert!(err.contains("AWS_ACCESS_KEY_ID"));
    }
}
