// ABOUTME: Bucket location parsing for `bucket[/prefix]` strings.
// ABOUTME: Splits on the first slash and joins prefixes with object names.

use std::fmt;

/// A bucket name plus an optional key prefix used as a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketLocation {
    name: String,
    prefix: String,
}

impl BucketLocation {
    /// Split `bucket[/prefix]` on the first `/`.
    ///
    /// The prefix is empty when there is no slash. Empty prefix segments are
    /// dropped, so keys never start with `/` or contain `//`. The name is
    /// empty for inputs such as `/app`; callers must reject that.
    pub fn parse(value: &str) -> Self {
        match value.split_once('/') {
            Some((name, prefix)) => Self {
                name: name.to_string(),
                prefix: normalize_prefix(prefix),
            },
            None => Self {
                name: value.to_string(),
                prefix: String::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Object key for `object` under this location's prefix.
    pub fn key_for(&self, object: &str) -> String {
        join_key(&self.prefix, object)
    }
}

impl fmt::Display for BucketLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.name, self.prefix)
        }
    }
}

/// Join a key prefix and an object name with `/`, without a leading separator
/// when the prefix is empty.
pub fn join_key(prefix: &str, object: &str) -> String {
    let prefix = normalize_prefix(prefix);
    if prefix.is_empty() {
        object.to_string()
    } else {
        format!("{prefix}/{object}")
    }
}

fn normalize_prefix(prefix: &str) -> String {
    prefix
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
