// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `application/x-www-form-urlencoded` codec used for `query`

use crate::record::QueryValue;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use url::form_urlencoded;

/// Parse a query string (without `?`) into a mapping
///
/// Repeated keys collect their values in order of appearance.
pub fn parse(qs: &str) -> BTreeMap<String, QueryValue> {
    let mut result: BTreeMap<String, QueryValue> = BTreeMap::new();

    for (key, value) in form_urlencoded::parse(qs.as_bytes()) {
        let value = value.into_owned();
        match result.entry(key.into_owned()) {
            Entry::Vacant(entry) => {
                entry.insert(QueryValue::Single(value));
            }
            Entry::Occupied(mut entry) => {
                let mut values = match entry.insert(QueryValue::Multiple(Vec::new())) {
                    QueryValue::Single(first) => vec![first],
                    QueryValue::Multiple(values) => values,
                };
                values.push(value);
                entry.insert(QueryValue::Multiple(values));
            }
        }
    }

    result
}

/// Stringify a mapping into a query string (without `?`)
pub fn stringify(obj: &BTreeMap<String, QueryValue>) -> String {
    let mut parts = Vec::new();

    for (key, value) in obj {
        let encoded_key = escape(key);
        for value in value.values() {
            parts.push(format!("{}={}", encoded_key, escape(value)));
        }
    }

    parts.join("&")
}

/// Percent-encode a string the way `querystring.escape` does
pub fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' | '!' | '\'' | '(' | ')'
            | '*' => result.push(c),
            _ => {
                let mut buf = [0; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let result = parse("foo=bar&baz=qux");
        assert_eq!(result.get("foo"), Some(&QueryValue::from("bar")));
        assert_eq!(result.get("baz"), Some(&QueryValue::from("qux")));
    }

    #[test]
    fn test_parse_multiple_values() {
        let result = parse("foo=bar&foo=baz&foo=qux");
        assert_eq!(
            result.get("foo"),
            Some(&QueryValue::Multiple(vec![
                "bar".to_string(),
                "baz".to_string(),
                "qux".to_string()
            ]))
        );
    }

    #[test]
    fn test_parse_decodes() {
        let result = parse("query=size:10&a+b=c%20d&empty");
        assert_eq!(result.get("query"), Some(&QueryValue::from("size:10")));
        assert_eq!(result.get("a b"), Some(&QueryValue::from("c d")));
        assert_eq!(result.get("empty"), Some(&QueryValue::from("")));
    }

    #[test]
    fn test_stringify() {
        let mut obj = BTreeMap::new();
        obj.insert("foo".to_string(), QueryValue::from("bar baz"));
        obj.insert(
            "list".to_string(),
            QueryValue::Multiple(vec!["1".to_string(), "2".to_string()]),
        );

        assert_eq!(stringify(&obj), "foo=bar%20baz&list=1&list=2");
    }

    #[test]
    fn test_escape_special() {
        assert_eq!(escape("hello world"), "hello%20world");
        assert_eq!(escape("it's (ok)*!"), "it's%20(ok)*!");
        assert_eq!(escape("a&b=c"), "a%26b%3Dc");
        assert_eq!(escape("é"), "%C3%A9");
    }
}
