//! Canonical parameter encoding.
//!
//! The provider signs the `key=value&...` string built from the request
//! parameters sorted by key, with blank values left out and every pair
//! form-urlencoded (space as `+`). Both sides must produce the exact same
//! bytes or the signature check fails, so this module is the single place
//! that builds that string.

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

/// Mapping of provider parameter names to values.
///
/// Keys are unique; inserting an existing key replaces its value. Ordering is
/// byte-wise on the key, which is the order the provider sorts by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: BTreeMap<String, String>,
}

impl ParameterSet {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter. Empty keys are ignored.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        if !key.is_empty() {
            self.entries.insert(key, value.into());
        }
        self
    }

    /// Inserts a parameter only when a value is present.
    pub fn insert_optional(
        &mut self,
        key: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in canonical (byte-wise key) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes this set into its canonical payload.
    pub fn encode(&self) -> CanonicalPayload {
        encode(self)
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

/// The exact byte sequence a signature is computed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPayload(String);

impl CanonicalPayload {
    #[cfg(test)]
    pub(crate) fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes a parameter set canonically.
///
/// Blank values are dropped, the rest are emitted in byte-wise key order as
/// form-urlencoded `key=value` pairs joined by `&`. An empty set yields an
/// empty payload; rejecting that is the caller's job.
pub fn encode(params: &ParameterSet) -> CanonicalPayload {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter().filter(|(_, value)| !value.is_empty()) {
        serializer.append_pair(key, value);
    }
    CanonicalPayload(serializer.finish())
}

/// Parses a canonical (or any form-urlencoded) string back into pairs.
pub fn decode(payload: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(payload.as_bytes())
        .into_owned()
        .collect()
}
