// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Derive the legacy record from a strict parse and the recorded quirks

use crate::adapter::StrictParse;
use crate::decode::{decode_component, escape_pathname, safe_decode};
use crate::format::format_record;
use crate::options::ParseOptions;
use crate::querystring;
use crate::quirks::{QuirkContext, is_slashed_scheme};
use crate::record::{LegacyUrl, Query};

/// Build the legacy record for a successful strict parse
pub fn reconcile(parsed: &StrictParse, context: &QuirkContext, options: ParseOptions) -> LegacyUrl {
    let record = &parsed.record;
    let input = parsed.input.as_str();
    let prefix = context.prefix();
    let placeholder = record.has_placeholder_host();

    let mut host = if placeholder {
        String::new()
    } else {
        record.host.clone()
    };
    let hostname = if placeholder {
        String::new()
    } else {
        record.hostname.replace(['[', ']'], "")
    };
    let mut protocol = if parsed.direct {
        record.protocol.clone()
    } else {
        prefix.to_string()
    };

    let mut search = record.search.replace('\\', "%5C");
    let mut hash = record.hash.replace('\\', "%5C");

    // Lone delimiters: "http://x/?" and "http://x/#"
    let mut hash_split = input.split('#');
    if search.is_empty() && hash_split.next().is_some_and(|head| head.contains('?')) {
        search = "?".to_string();
    }
    if hash.is_empty() && hash_split.next() == Some("") {
        hash = "#".to_string();
    }

    let query = if options.parse_query_string {
        let raw = record.search.strip_prefix('?').unwrap_or(&record.search);
        Query::Parsed(querystring::parse(raw))
    } else {
        Query::Raw(search.strip_prefix('?').unwrap_or(&search).to_string())
    };

    let decoded = safe_decode(&record.pathname);
    let escaped = if protocol.eq_ignore_ascii_case("javascript:") {
        decoded
    } else {
        escape_pathname(&decoded)
    };
    let mut pathname = if parsed.stripped_slash {
        format!("/{escaped}")
    } else {
        escaped
    };

    // "#abc" must not come back as "about:blank#abc"
    if protocol == "about:" && pathname == "blank" {
        protocol.clear();
        pathname.clear();
    }

    // The strict parser invented a leading '/' for a partial url (www.example.com)
    if !parsed.direct && !input.starts_with('/') {
        if let Some(rest) = pathname.strip_prefix('/') {
            pathname = rest.to_string();
        }
    }

    // ...or a root path for an opaque scheme
    if !prefix.is_empty()
        && !is_slashed_scheme(prefix)
        && !input.ends_with('/')
        && pathname == "/"
    {
        pathname.clear();
    }

    // A padded authority that was read as a path (`//h:80/x`)
    if let Some(original) = &context.padded_port {
        if record.port.is_empty() {
            pathname = pathname.replacen(&format!(":{original}00"), &format!(":{original}"), 1);
        }
    }

    let path = format!("{pathname}{search}");

    let auth = [
        decode_component(&record.username),
        decode_component(&record.password),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(":");

    let mut port = record.port.clone();
    if let Some(original) = &context.padded_port {
        if !port.is_empty() {
            let bare = host.rsplit_once(':').map_or(host.as_str(), |(bare, _)| bare);
            host = format!("{bare}:{original}");
            port = original.clone();
        }
    }

    let mut url = LegacyUrl {
        protocol: Some(protocol),
        slashes: Some(context.slashes && !parsed.stripped_slash),
        auth: Some(auth),
        host: Some(host),
        port: Some(port),
        hostname: Some(hostname),
        hash: Some(hash),
        search: Some(search),
        query: Some(query),
        pathname: Some(pathname),
        path: Some(path),
        href: None,
    };

    url.href = Some(if parsed.stripped_slash {
        format!(
            "{}{}{}",
            url.pathname.as_deref().unwrap_or(""),
            url.search.as_deref().unwrap_or(""),
            url.hash.as_deref().unwrap_or("")
        )
    } else {
        format_record(&url)
    });

    normalize_empty(url)
}

/// Record for input the strict parser rejected outright: only the scheme
pub fn degraded(context: &QuirkContext) -> LegacyUrl {
    let prefix = context.protocol_prefix.clone().filter(|p| !p.is_empty());
    LegacyUrl {
        protocol: prefix.clone(),
        href: prefix,
        ..LegacyUrl::default()
    }
}

/// Empty values become `None`, except the host of a `file:` URL
fn normalize_empty(url: LegacyUrl) -> LegacyUrl {
    fn present(field: Option<String>) -> Option<String> {
        field.filter(|value| !value.is_empty())
    }

    let is_file = url.href.as_deref().is_some_and(|href| href.starts_with("file"));
    let host_field = |field: Option<String>| if is_file { field } else { present(field) };

    LegacyUrl {
        protocol: present(url.protocol),
        slashes: url.slashes.filter(|slashes| *slashes),
        auth: present(url.auth),
        host: host_field(url.host),
        port: present(url.port),
        hostname: host_field(url.hostname),
        hash: present(url.hash),
        search: present(url.search),
        query: url.query.filter(|query| !matches!(query, Query::Raw(raw) if raw.is_empty())),
        pathname: present(url.pathname),
        path: present(url.path),
        href: present(url.href),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{StrictOutcome, strict_parse};
    use crate::quirks::preprocess;
    use crate::strict::WhatwgParser;

    fn reconcile_str(input: &str, options: ParseOptions) -> LegacyUrl {
        let state = preprocess(input);
        match strict_parse(&WhatwgParser, &state, options) {
            StrictOutcome::Parsed(parsed) => reconcile(&parsed, &state.context, options),
            StrictOutcome::Degraded => degraded(&state.context),
        }
    }

    #[test]
    fn test_lone_delimiters_survive() {
        let url = reconcile_str("http://example.com/?", ParseOptions::new());
        assert_eq!(url.search.as_deref(), Some("?"));
        assert_eq!(url.query, None);
        assert_eq!(url.href.as_deref(), Some("http://example.com/?"));

        let url = reconcile_str("http://example.com/#", ParseOptions::new());
        assert_eq!(url.hash.as_deref(), Some("#"));
        assert_eq!(url.href.as_deref(), Some("http://example.com/#"));
    }

    #[test]
    fn test_backslashes_in_query_are_escaped() {
        let url = reconcile_str(r"http://a.com/b?c\d#e\f", ParseOptions::new());
        assert_eq!(url.pathname.as_deref(), Some("/b"));
        assert_eq!(url.search.as_deref(), Some("?c%5Cd"));
        assert_eq!(url.hash.as_deref(), Some("#e%5Cf"));
    }

    #[test]
    fn test_partial_url_drops_invented_slash() {
        let url = reconcile_str("www.example.com", ParseOptions::new());
        assert_eq!(url.protocol, None);
        assert_eq!(url.host, None);
        assert_eq!(url.pathname.as_deref(), Some("www.example.com"));
        assert_eq!(url.href.as_deref(), Some("www.example.com"));
    }

    #[test]
    fn test_opaque_scheme_has_no_root_path() {
        let url = reconcile_str("mailto:user@example.com", ParseOptions::new());
        assert_eq!(url.protocol.as_deref(), Some("mailto:"));
        assert_eq!(url.slashes, None);
        assert_eq!(url.auth.as_deref(), Some("user"));
        assert_eq!(url.host.as_deref(), Some("example.com"));
        assert_eq!(url.pathname, None);
        assert_eq!(url.path, None);
        assert_eq!(url.href.as_deref(), Some("mailto:user@example.com"));
    }

    #[test]
    fn test_file_url_keeps_empty_host() {
        let url = reconcile_str("file:///etc/passwd", ParseOptions::new());
        assert_eq!(url.protocol.as_deref(), Some("file:"));
        assert_eq!(url.slashes, Some(true));
        assert_eq!(url.host.as_deref(), Some(""));
        assert_eq!(url.hostname.as_deref(), Some(""));
        assert_eq!(url.pathname.as_deref(), Some("/etc/passwd"));
        assert_eq!(url.href.as_deref(), Some("file:///etc/passwd"));
    }

    #[test]
    fn test_stripped_slash_href_bypasses_format() {
        let url = reconcile_str("//some_url?a#b", ParseOptions::new());
        assert_eq!(url.slashes, None);
        assert_eq!(url.pathname.as_deref(), Some("//some_url"));
        assert_eq!(url.href.as_deref(), Some("//some_url?a#b"));
    }

    #[test]
    fn test_port_padding_undone_in_path() {
        let url = reconcile_str("//h:80/x", ParseOptions::new());
        assert_eq!(url.port, None);
        assert_eq!(url.pathname.as_deref(), Some("//h:80/x"));
        assert_eq!(url.href.as_deref(), Some("//h:80/x"));

        let url = reconcile_str("//h:443", ParseOptions::new());
        assert_eq!(url.pathname.as_deref(), Some("//h:443"));
        assert_eq!(url.href.as_deref(), Some("//h:443"));

        let url = reconcile_str("//h:80/x", ParseOptions::new().with_slashes_denote_host(true));
        assert_eq!(url.host.as_deref(), Some("h:80"));
        assert_eq!(url.port.as_deref(), Some("80"));
        assert_eq!(url.pathname.as_deref(), Some("/x"));
        assert_eq!(url.href.as_deref(), Some("//h:80/x"));
    }

    #[test]
    fn test_ipv6_hostname_loses_brackets() {
        let url = reconcile_str("http://[::1]:8080", ParseOptions::new());
        assert_eq!(url.host.as_deref(), Some("[::1]:8080"));
        assert_eq!(url.hostname.as_deref(), Some("::1"));
        assert_eq!(url.port.as_deref(), Some("8080"));
        assert_eq!(url.pathname.as_deref(), Some("/"));
        assert_eq!(url.href.as_deref(), Some("http://[::1]:8080/"));
    }

    #[test]
    fn test_parsed_query_is_always_present() {
        let options = ParseOptions::new().with_query_string(true);
        let url = reconcile_str("http://example.com", options);
        assert_eq!(url.query, Some(Query::Parsed(Default::default())));
    }

    #[test]
    fn test_degraded_keeps_scheme() {
        let url = reconcile_str("foo:", ParseOptions::new());
        assert_eq!(url.protocol.as_deref(), Some("foo:"));
        assert_eq!(url.href.as_deref(), Some("foo:"));
        assert_eq!(url.pathname, None);
    }
}
