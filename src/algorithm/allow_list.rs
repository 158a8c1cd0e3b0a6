//! Ordered, grow-only allow-list of algorithm names

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::defaults::ENV_LIST_SEPARATOR;

/// Algorithm names considered acceptable without an expected-failure marker
///
/// Order is preserved. Entries are only ever appended, never removed.
/// Deserializes from an array of names or from one comma-separated string,
/// the form environment variables carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum AllowListRepr {
    Names(Vec<String>),
    Joined(String),
}

impl<'de> Deserialize<'de> for AllowList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match AllowListRepr::deserialize(deserializer)? {
            AllowListRepr::Names(names) => Self::new(names),
            AllowListRepr::Joined(joined) => Self::new(
                joined
                    .split(ENV_LIST_SEPARATOR)
                    .map(str::trim)
                    .filter(|name| !name.is_empty()),
            ),
        })
    }
}

impl AllowList {
    /// Create an allow-list from names, dropping repeats
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for name in names {
            list.insert(name);
        }
        list
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Append a name; returns `false` if it was already present
    pub fn insert<S: Into<String>>(&mut self, name: S) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.0.push(name);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
