//! Filter to query-string serialization for list requests.
//!
//! # Design
//! Structured filters keep their entries in a `BTreeMap`, so the rendered
//! query string is ordered by key and identical filters always produce
//! identical URLs. Entries whose value is absent are kept in the map (a
//! caller may clear a key) but are never rendered.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// A list filter as callers express it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// An already-encoded query string, with or without its leading `?`.
    Raw(String),
    /// Key to scalar value; `None` values are omitted.
    Fields(BTreeMap<String, Option<String>>),
}

impl Filter {
    pub fn raw(query: impl Into<String>) -> Self {
        Filter::Raw(query.into())
    }

    pub fn fields() -> Self {
        Filter::Fields(BTreeMap::new())
    }

    /// Set `key` to `value`. Turns a raw filter into a structured one.
    pub fn with(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key.into(), Some(value.to_string()))
    }

    /// Record `key` as present but without a value.
    pub fn without(self, key: impl Into<String>) -> Self {
        self.insert(key.into(), None)
    }

    fn insert(self, key: String, value: Option<String>) -> Self {
        let mut entries = match self {
            Filter::Fields(entries) => entries,
            Filter::Raw(_) => BTreeMap::new(),
        };
        entries.insert(key, value);
        Filter::Fields(entries)
    }
}

/// Render a filter as a query string, including the leading `?`.
///
/// Returns an empty string when there is nothing to send.
pub fn build(filter: Option<&Filter>) -> String {
    match filter {
        None => String::new(),
        Some(Filter::Raw(query)) => {
            let query = query.trim_start_matches('?');
            if query.is_empty() {
                String::new()
            } else {
                format!("?{query}")
            }
        }
        Some(Filter::Fields(entries)) => {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            let mut any = false;
            for (key, value) in entries {
                if let Some(value) = value {
                    serializer.append_pair(key, value);
                    any = true;
                }
            }
            if any {
                format!("?{}", serializer.finish())
            } else {
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_filter_is_empty() {
        assert_eq!(build(None), "");
    }

    #[test]
    fn raw_filter_is_prefixed() {
        assert_eq!(build(Some(&Filter::raw("tags=edge&size=10"))), "?tags=edge&size=10");
        assert_eq!(build(Some(&Filter::raw("?size=10"))), "?size=10");
        assert_eq!(build(Some(&Filter::raw(""))), "");
    }

    #[test]
    fn structured_filter_is_ordered_by_key() {
        let filter = Filter::fields().with("b", 2).with("a", 1);
        assert_eq!(build(Some(&filter)), "?a=1&b=2");
    }

    #[test]
    fn absent_values_are_omitted() {
        assert_eq!(build(Some(&Filter::fields().without("a"))), "");
        let filter = Filter::fields().with("size", 5).without("offset");
        assert_eq!(build(Some(&filter)), "?size=5");
    }

    #[test]
    fn values_are_form_encoded() {
        let filter = Filter::fields().with("offset", "AB==");
        assert_eq!(build(Some(&filter)), "?offset=AB%3D%3D");
    }

    #[test]
    fn with_on_raw_starts_fresh() {
        let filter = Filter::raw("ignored=1").with("size", 3);
        assert_eq!(build(Some(&filter)), "?size=3");
    }
}
