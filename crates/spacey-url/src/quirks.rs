// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Input rewriting that lets the strict parser accept legacy URLs
//!
//! Each [`QuirkRule`] is a pure `state -> state` function. Rules run in
//! order and record what they changed in the [`QuirkContext`], which the
//! reconciler later uses to undo the rewrites.

use crate::decode::safe_decode;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::trace;

/// Schemes whose URLs carry a `//` authority
pub const SLASHED_SCHEMES: [&str; 5] = ["http", "https", "ftp", "gopher", "file"];

/// `scheme:` followed by up to three slashes and the remainder
static PROTOCOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^([a-z0-9.+-]*:)(/{0,3})(.*)$").expect("protocol pattern is valid")
});

/// Optional `scheme:` followed by `//`
static LEADING_SLASHES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9.+-]*:)?//").expect("slashes pattern is valid")
});

/// Bracketed IPv6 literal, optionally behind `scheme:` and up to two slashes
static IPV6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(?:[a-z0-9.+-]*:/{0,2})?\[.*\]$").expect("ipv6 pattern is valid")
});

/// Whether `scheme` (with or without its colon) is one of [`SLASHED_SCHEMES`]
pub fn is_slashed_scheme(scheme: &str) -> bool {
    let name = scheme.strip_suffix(':').unwrap_or(scheme);
    SLASHED_SCHEMES
        .iter()
        .any(|slashed| slashed.eq_ignore_ascii_case(name))
}

/// What the preprocessor changed, threaded through to the reconciler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuirkContext {
    /// `//` followed the scheme (or opened the input)
    pub slashes: bool,
    /// Scheme text stripped before strict parsing, to be restored
    pub protocol_prefix: Option<String>,
    /// Authority port as written, when it was padded with `00`
    pub padded_port: Option<String>,
    /// Names of the rules that changed the input, in order
    pub applied: Vec<&'static str>,
}

impl QuirkContext {
    /// The recorded scheme prefix, empty when none was recorded
    pub fn prefix(&self) -> &str {
        self.protocol_prefix.as_deref().unwrap_or("")
    }
}

/// Input under rewrite plus the record of rewrites so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuirkState {
    /// The (rewritten) URL string
    pub input: String,
    /// Rewrites applied so far
    pub context: QuirkContext,
}

impl QuirkState {
    /// Start from a raw input
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            context: QuirkContext::default(),
        }
    }
}

/// A named rewrite step
#[derive(Debug, Clone, Copy)]
pub struct QuirkRule {
    /// Rule name, recorded in [`QuirkContext::applied`]
    pub name: &'static str,
    /// The rewrite
    pub apply: fn(QuirkState) -> QuirkState,
}

/// The preprocessing rules, in application order
pub const RULES: &[QuirkRule] = &[
    QuirkRule {
        name: "decode",
        apply: decode,
    },
    QuirkRule {
        name: "strip-whitespace",
        apply: strip_whitespace,
    },
    QuirkRule {
        name: "fold-backslashes",
        apply: fold_backslashes,
    },
    QuirkRule {
        name: "ipv6-trailing-slash",
        apply: ipv6_trailing_slash,
    },
    QuirkRule {
        name: "scheme-prefix",
        apply: scheme_prefix,
    },
    QuirkRule {
        name: "port-padding",
        apply: port_padding,
    },
];

/// Run every rule over `raw`
pub fn preprocess(raw: &str) -> QuirkState {
    RULES.iter().fold(QuirkState::new(raw), |state, rule| {
        let before = state.input.clone();
        let mut next = (rule.apply)(state);
        if next.input != before {
            trace!(rule = rule.name, input = %next.input, "applied url quirk");
            next.context.applied.push(rule.name);
        }
        next
    })
}

fn decode(mut state: QuirkState) -> QuirkState {
    state.input = safe_decode(&state.input);
    state
}

fn strip_whitespace(mut state: QuirkState) -> QuirkState {
    state.input = state
        .input
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .replace(['\t', '\n', '\r'], "");
    state
}

/// Backslashes become slashes, but only before the first `?`/`#` that is not
/// the very first character.
fn fold_backslashes(mut state: QuirkState) -> QuirkState {
    let boundary = state
        .input
        .char_indices()
        .skip(1)
        .find(|(_, c)| matches!(c, '#' | '?'))
        .map(|(i, _)| i);

    state.input = match boundary {
        Some(i) => format!("{}{}", state.input[..i].replace('\\', "/"), &state.input[i..]),
        None => state.input.replace('\\', "/"),
    };
    state
}

fn ipv6_trailing_slash(mut state: QuirkState) -> QuirkState {
    if IPV6.is_match(&state.input) && !state.input.ends_with('/') {
        state.input.push('/');
    }
    state
}

fn scheme_prefix(mut state: QuirkState) -> QuirkState {
    state.context.slashes = LEADING_SLASHES.is_match(&state.input);

    // javascript: URLs are opaque and go to the strict parser untouched
    if state.input.starts_with("javascript") {
        return state;
    }

    let Some(caps) = PROTOCOL.captures(&state.input) else {
        return state;
    };
    let scheme = caps[1].to_string();
    let slash_run = caps[2].to_string();
    let rest = caps[3].to_string();
    let slashed = is_slashed_scheme(&scheme);

    if !slashed {
        state.context.protocol_prefix = Some(scheme.clone());
        state.input = format!("{slash_run}{rest}");
    }

    match slash_run.len() {
        0 => {
            state.context.slashes = false;
            if slashed {
                state.context.protocol_prefix = Some(scheme);
                state.input = rest;
            } else {
                state.input = format!("//{rest}");
            }
        }
        1 | 3 => {
            state.context.protocol_prefix = Some(scheme);
            state.input = format!("/{rest}");
        }
        _ => {}
    }

    state
}

/// Pad a short authority port with `00` so the strict parser cannot drop it
/// as the scheme's default port.
fn port_padding(mut state: QuirkState) -> QuirkState {
    let Some(range) = authority_port(&state.input) else {
        return state;
    };
    let digits = state.input[range.clone()].to_string();

    let fits = (2..=3).contains(&digits.len())
        && digits.parse::<u32>().is_ok_and(|port| port * 100 <= u32::from(u16::MAX));
    if fits {
        state.input.insert_str(range.end, "00");
        state.context.padded_port = Some(digits);
    }
    state
}

/// Byte range of the port digits in the input's authority, if any
fn authority_port(input: &str) -> Option<Range<usize>> {
    let start = LEADING_SLASHES.find(input)?.end();
    let end = input[start..]
        .find(['/', '?', '#'])
        .map_or(input.len(), |i| start + i);

    let authority = &input[start..end];
    let host_start = authority.rfind('@').map_or(0, |i| i + 1);
    let colon = authority[host_start..].rfind(':')?;
    let digits = &authority[host_start + colon + 1..];

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(start + host_start + colon + 1..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slashed_schemes() {
        assert!(is_slashed_scheme("http:"));
        assert!(is_slashed_scheme("HTTPS:"));
        assert!(is_slashed_scheme("file"));
        assert!(!is_slashed_scheme("mailto:"));
        assert!(!is_slashed_scheme(":"));
        assert!(!is_slashed_scheme("profile:"));
    }

    #[test]
    fn test_plain_url_untouched() {
        let state = preprocess("https://www.w.org/a?b#c");
        assert_eq!(state.input, "https://www.w.org/a?b#c");
        assert!(state.context.slashes);
        assert_eq!(state.context.protocol_prefix, None);
        assert!(state.context.applied.is_empty());
    }

    #[test]
    fn test_whitespace_is_stripped() {
        let state = preprocess("     \t  http://a.com/b\nc\n\t");
        assert_eq!(state.input, "http://a.com/bc");
        assert_eq!(state.context.applied, vec!["strip-whitespace"]);
    }

    #[test]
    fn test_backslashes_fold_before_query_only() {
        assert_eq!(preprocess(r"http:\\a\b?c\d").input, r"http://a/b?c\d");
        assert_eq!(preprocess(r"http:\\a\b#c\d").input, r"http://a/b#c\d");
        // a leading '?' does not count as the boundary
        assert_eq!(preprocess(r"?a\b").input, "?a/b");
    }

    #[test]
    fn test_ipv6_gets_trailing_slash() {
        assert_eq!(preprocess("http://[::1]").input, "http://[::1]/");
        assert_eq!(preprocess("http://[::1]/").input, "http://[::1]/");
        assert_eq!(preprocess("[::1]").input, "[::1]/");
    }

    #[test]
    fn test_opaque_scheme_is_prefixed() {
        let state = preprocess("mailto:user@example.com");
        assert_eq!(state.input, "//user@example.com");
        assert_eq!(state.context.prefix(), "mailto:");
        assert!(!state.context.slashes);
    }

    #[test]
    fn test_opaque_scheme_keeps_case() {
        let state = preprocess("FOO://bar");
        assert_eq!(state.input, "//bar");
        assert_eq!(state.context.prefix(), "FOO:");
        assert!(state.context.slashes);
    }

    #[test]
    fn test_slashed_scheme_without_slashes() {
        let state = preprocess("http:g");
        assert_eq!(state.input, "g");
        assert_eq!(state.context.prefix(), "http:");
        assert!(!state.context.slashes);
    }

    #[test]
    fn test_one_and_three_slashes() {
        let state = preprocess("file:///etc/passwd");
        assert_eq!(state.input, "/etc/passwd");
        assert_eq!(state.context.prefix(), "file:");
        assert!(state.context.slashes);

        let state = preprocess("f:/a");
        assert_eq!(state.input, "/a");
        assert_eq!(state.context.prefix(), "f:");
        assert!(!state.context.slashes);
    }

    #[test]
    fn test_javascript_is_opaque() {
        let state = preprocess("javascript:alert('hello');");
        assert_eq!(state.input, "javascript:alert('hello');");
        assert_eq!(state.context.protocol_prefix, None);
    }

    #[test]
    fn test_port_padding_targets_authority() {
        let state = preprocess("http://hello:80@hello:80/");
        assert_eq!(state.input, "http://hello:80@hello:8000/");
        assert_eq!(state.context.padded_port.as_deref(), Some("80"));

        let state = preprocess("https://hello:443/");
        assert_eq!(state.input, "https://hello:44300/");

        // path segments and long ports are left alone
        assert_eq!(preprocess("/:42").context.padded_port, None);
        assert_eq!(preprocess("http://example.com/:42").input, "http://example.com/:42");
        assert_eq!(preprocess("http://a:8080/").input, "http://a:8080/");
        assert_eq!(preprocess("http://a:999/").input, "http://a:999/");
        assert_eq!(preprocess("http://[::1]/").context.padded_port, None);
    }
}
