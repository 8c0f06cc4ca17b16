//! Structured key/value fields attached to loggers and records.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A set of string fields. Keys are unique; later inserts win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSet {
    inner: BTreeMap<String, String>,
}

/// A single field option applied to a [`FieldSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    key: String,
    value: String,
}

/// Build a string field.
pub fn str(key: impl Into<String>, value: impl Into<String>) -> Field {
    Field {
        key: key.into(),
        value: value.into(),
    }
}

impl Field {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Return a new set with `other` applied on top of `self`.
    pub fn merged(&self, other: &FieldSet) -> FieldSet {
        let mut out = self.clone();
        for (k, v) in &other.inner {
            out.inner.insert(k.clone(), v.clone());
        }
        out
    }

    /// JSON object encoding carried through the engine to the formatter.
    pub(crate) fn to_json(&self) -> String {
        serde_json::to_string(&self.inner).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<Field> for FieldSet {
    fn from(field: Field) -> Self {
        let mut set = FieldSet::new();
        set.insert(field.key, field.value);
        set
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for field in iter {
            set.insert(field.key, field.value);
        }
        set
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl<const N: usize> From<[Field; N]> for FieldSet {
    fn from(fields: [Field; N]) -> Self {
        fields.into_iter().collect()
    }
}

impl From<Vec<Field>> for FieldSet {
    fn from(fields: Vec<Field>) -> Self {
        fields.into_iter().collect()
    }
}

/// logfmt rendering: `a=1 b="two words"`.
impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}=", k)?;
            write_logfmt_value(f, v)?;
        }
        Ok(())
    }
}

pub(crate) fn write_logfmt_value(w: &mut dyn fmt::Write, value: &str) -> fmt::Result {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '=' || c == '"' || c.is_control());
    if needs_quotes {
        write!(w, "{:?}", value)
    } else {
        w.write_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_on_collision() {
        let base: FieldSet = [str("route", "/a"), str("request_id", "1")].into();
        let extra: FieldSet = [str("route", "/b")].into();

        let merged = base.merged(&extra);
        assert_eq!(merged.get("route"), Some("/b"));
        assert_eq!(merged.get("request_id"), Some("1"));
        assert_eq!(base.get("route"), Some("/a"));
    }

    #[test]
    fn test_last_write_wins() {
        let set: FieldSet = [str("k", "1"), str("k", "2")].into();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("k"), Some("2"));
    }

    #[test]
    fn test_logfmt_quotes_when_needed() {
        let set: FieldSet = [str("a", "plain"), str("b", "two words"), str("c", "")].into();
        assert_eq!(set.to_string(), r#"a=plain b="two words" c="""#);
    }

    #[test]
    fn test_json_encoding() {
        let set: FieldSet = vec![("route", "/x")].into_iter().collect();
        assert_eq!(set.to_json(), r#"{"route":"/x"}"#);
    }
}
