// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Legacy `url.resolve()`
//!
//! Resolution itself is delegated to the strict parser. What happens here is
//! bookkeeping around it: schemes the strict parser would mangle (opaque
//! schemes, `file:///C:/` style prefixes) are cut off before resolving and
//! glued back on afterwards.

use crate::format::format_record;
use crate::input::UrlLike;
use crate::pipeline::LegacyUrlParser;
use crate::quirks::is_slashed_scheme;
use crate::strict::{PLACEHOLDER_ORIGIN, PLACEHOLDER_SCHEME, StrictParser};
use regex::{NoExpand, Regex};
use std::sync::LazyLock;
use tracing::debug;

/// `scheme:///` plus an optional drive letter (`file:///C:/`)
static RESOLVE_PROTOCOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z0-9.+-]*:///)([a-z0-9.+-]:/*)?").expect("resolve pattern is valid")
});

/// Scheme-relative reference with a host (`//host/...`)
static AUTHORITY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//[^/]").expect("authority pattern is valid"));

/// `scheme://` at the start of a strictly resolved URL
static EMITTED_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z][a-z0-9.+-]*://").expect("scheme pattern is valid")
});

/// Scheme of a resolved URL, without its colon
static RESOLVED_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z][a-z0-9.+-]*):").expect("scheme pattern is valid")
});

/// Resolve `reference` against `base` the way the legacy API does
pub(crate) fn resolve<P: StrictParser>(
    parser: &LegacyUrlParser<P>,
    base: UrlLike<'_>,
    reference: &str,
) -> String {
    let (mut from, parsed_from) = match base {
        UrlLike::Str(base) => (base.to_string(), parser.parse(base)),
        UrlLike::Record(record) => (format_record(record), record.clone()),
    };
    let parsed_to = parser.parse(reference);
    let mut to = reference.to_string();
    let mut prefix = String::new();

    let from_protocol = parsed_from.protocol.as_deref().unwrap_or("");
    let to_protocol = parsed_to.protocol.as_deref().unwrap_or("");
    let from_slashes = parsed_from.slashes == Some(true);
    let to_slashes = parsed_to.slashes == Some(true);

    // Opaque base, e.g. foo:a/b
    if !from_protocol.is_empty() && !from_slashes {
        prefix = from_protocol.to_string();
        from = strip_scheme(&from, from_protocol).to_string();
        if to.starts_with('/') || from.starts_with('/') {
            prefix.push('/');
        }
    }

    if !prefix.is_empty() && !to_protocol.is_empty() {
        prefix.clear();
        if !to_slashes {
            prefix = to_protocol.to_string();
            to = strip_scheme(&to, to_protocol).to_string();
        }
    }

    // scheme:/// bases, with or without a drive letter
    if to_protocol.is_empty() {
        if let Some(found) = RESOLVE_PROTOCOL.find(&from) {
            prefix = found.as_str().to_string();
            from = from[found.end()..].to_string();
            if AUTHORITY_REF.is_match(&to) {
                prefix.pop();
            }
        }
    }

    if !prefix.is_empty() {
        debug!(%prefix, base = %from, reference = %to, "resolving url without its scheme");
    }

    let root = format!("{PLACEHOLDER_ORIGIN}/");
    let strict = parser.strict();
    let base_href = strict
        .parse(&from, Some(&root))
        .map(|record| record.href)
        .unwrap_or(root);
    let mut resolved = match strict.parse(&to, Some(&base_href)) {
        Ok(record) => record
            .href
            .strip_prefix(PLACEHOLDER_ORIGIN)
            .map_or(record.href.clone(), str::to_string),
        Err(e) => {
            debug!(base = %base_href, error = %e, "strict resolution failed");
            return reference.to_string();
        }
    };

    let mut actual_protocol = if to_protocol.is_empty() {
        from_protocol.to_string()
    } else {
        to_protocol.to_string()
    };
    if from_slashes || to_slashes {
        actual_protocol.push_str("//");
    }
    if !prefix.is_empty() {
        resolved = EMITTED_SCHEME.replace(&resolved, "").into_owned();
    } else if !actual_protocol.is_empty() {
        resolved = EMITTED_SCHEME
            .replace(&resolved, NoExpand(&actual_protocol))
            .into_owned();
    } else if let Some(rest) = resolved
        .strip_prefix(PLACEHOLDER_SCHEME)
        .filter(|rest| rest.starts_with("//"))
    {
        // Neither side had a scheme: "//host" came back under the placeholder's
        resolved = rest.to_string();
    }

    // Drop a trailing slash neither input asked for
    let slashed = RESOLVED_SCHEME
        .captures(&resolved)
        .is_some_and(|caps| is_slashed_scheme(&caps[1]));
    if !slashed
        && !to.contains('.')
        && !from.ends_with('/')
        && !to.ends_with('/')
        && resolved.ends_with('/')
    {
        resolved.pop();
    }

    if prefix.is_empty() {
        resolved
    } else {
        let rest = resolved.strip_prefix('/').unwrap_or(&resolved);
        format!("{prefix}{rest}")
    }
}

/// `s` without a leading `scheme` (compared case-insensitively)
fn strip_scheme<'a>(s: &'a str, scheme: &str) -> &'a str {
    match s.get(..scheme.len()) {
        Some(head) if head.eq_ignore_ascii_case(scheme) => &s[scheme.len()..],
        _ => s,
    }
}
