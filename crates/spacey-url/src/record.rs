// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The legacy URL record returned by `url.parse()`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Keys every legacy URL record carries, in the order Node prints them.
pub const RECORD_KEYS: [&str; 12] = [
    "protocol", "slashes", "auth", "host", "port", "hostname", "hash", "search", "query",
    "pathname", "path", "href",
];

/// A single decoded query value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// Key occurred once
    Single(String),
    /// Key occurred several times, values in order of appearance
    Multiple(Vec<String>),
}

impl QueryValue {
    /// All values, in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

/// The `query` field: raw text, or decoded pairs when `parseQueryString` is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Query {
    /// Search string without its leading `?`
    Raw(String),
    /// Decoded `key -> value(s)` mapping
    Parsed(BTreeMap<String, QueryValue>),
}

impl Query {
    /// Raw query text, if this is the raw form
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(raw) => Some(raw),
            Self::Parsed(_) => None,
        }
    }

    /// Decoded mapping, if this is the parsed form
    pub fn as_parsed(&self) -> Option<&BTreeMap<String, QueryValue>> {
        match self {
            Self::Raw(_) => None,
            Self::Parsed(map) => Some(map),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Raw(raw) => Value::String(raw.clone()),
            Self::Parsed(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| {
                        let value = match value {
                            QueryValue::Single(v) => Value::String(v.clone()),
                            QueryValue::Multiple(vs) => {
                                Value::Array(vs.iter().cloned().map(Value::String).collect())
                            }
                        };
                        (key.clone(), value)
                    })
                    .collect(),
            ),
        }
    }
}

/// Parsed URL object (legacy API)
///
/// Every field is independently nullable. A record produced by
/// [`parse`](crate::parse) never holds an empty string, except for `host` and
/// `hostname` of `file:` URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyUrl {
    /// Scheme including the trailing colon (e.g., "https:")
    pub protocol: Option<String>,
    /// Whether `//` followed the scheme
    pub slashes: Option<bool>,
    /// Userinfo (`user:pass`)
    pub auth: Option<String>,
    /// Host including port
    pub host: Option<String>,
    /// Port as written
    pub port: Option<String>,
    /// Host without port, IPv6 brackets removed
    pub hostname: Option<String>,
    /// Fragment with `#`
    pub hash: Option<String>,
    /// Query string with `?`
    pub search: Option<String>,
    /// Query string without `?`, or its decoded pairs
    pub query: Option<Query>,
    /// Path without search
    pub pathname: Option<String>,
    /// Pathname plus search
    pub path: Option<String>,
    /// Full serialization
    pub href: Option<String>,
}

impl LegacyUrl {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the record names a protocol
    pub fn is_absolute(&self) -> bool {
        self.protocol.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Serialize this record again from its atomic fields
    ///
    /// Unlike the stored `href`, this reflects any mutation made since parsing.
    pub fn to_href(&self) -> String {
        crate::format::format_record(self)
    }

    /// Convert to a JSON object with every legacy key present
    pub fn to_value(&self) -> Value {
        fn string(field: &Option<String>) -> Value {
            field.clone().map(Value::String).unwrap_or(Value::Null)
        }

        let mut obj = Map::new();

        obj.insert("protocol".to_string(), string(&self.protocol));
        obj.insert(
            "slashes".to_string(),
            self.slashes.map(Value::Bool).unwrap_or(Value::Null),
        );
        obj.insert("auth".to_string(), string(&self.auth));
        obj.insert("host".to_string(), string(&self.host));
        obj.insert("port".to_string(), string(&self.port));
        obj.insert("hostname".to_string(), string(&self.hostname));
        obj.insert("hash".to_string(), string(&self.hash));
        obj.insert("search".to_string(), string(&self.search));
        obj.insert(
            "query".to_string(),
            self.query.as_ref().map(Query::to_value).unwrap_or(Value::Null),
        );
        obj.insert("pathname".to_string(), string(&self.pathname));
        obj.insert("path".to_string(), string(&self.path));
        obj.insert("href".to_string(), string(&self.href));

        Value::Object(obj)
    }

    /// JSON text of [`to_value`](Self::to_value)
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl fmt::Display for LegacyUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_href())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_value_has_every_key() {
        let value = LegacyUrl::new().to_value();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), RECORD_KEYS.len());
        for key in RECORD_KEYS {
            assert_eq!(obj.get(key), Some(&Value::Null), "{key}");
        }
    }

    #[test]
    fn test_query_forms_serialize_untagged() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), QueryValue::from("1"));
        map.insert(
            "b".to_string(),
            QueryValue::Multiple(vec!["2".to_string(), "3".to_string()]),
        );

        let parsed = serde_json::to_string(&Query::Parsed(map)).unwrap();
        assert_eq!(parsed, r#"{"a":"1","b":["2","3"]}"#);

        let raw: Query = serde_json::from_str(r#""a=1""#).unwrap();
        assert_eq!(raw.as_raw(), Some("a=1"));
    }

    #[test]
    fn test_display_uses_atomic_fields() {
        let mut url = LegacyUrl::new();
        url.protocol = Some("http:".to_string());
        url.slashes = Some(true);
        url.host = Some("example.com".to_string());
        url.pathname = Some("/a".to_string());
        url.href = Some("http://stale/".to_string());

        assert_eq!(url.to_string(), "http://example.com/a");
        assert!(url.is_absolute());
    }
}
