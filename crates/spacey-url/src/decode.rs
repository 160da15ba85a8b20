// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Percent decoding helpers
//!
//! The legacy API never fails on malformed escapes: a sequence that cannot be
//! decoded is handed through unchanged. [`decode_unicode`] reports the failure,
//! [`safe_decode`] swallows it.

use crate::error::{Result, UrlError};
use std::borrow::Cow;

/// Characters the legacy parser always escapes inside a pathname.
const AUTO_ESCAPE: &[(char, &str)] = &[
    ('"', "%22"),
    ('\'', "%27"),
    ('<', "%3C"),
    ('>', "%3E"),
    (' ', "%20"),
    ('^', "%5E"),
    ('`', "%60"),
    ('{', "%7B"),
    ('|', "%7C"),
    ('}', "%7D"),
];

/// Decode percent-encoded UTF-8 sequences that spell non-ASCII characters.
///
/// Escapes of ASCII bytes (`%20`, `%25`, `%3F`, ...) are left alone: they
/// carry meaning for the URL grammar and must survive the strict parser.
pub fn decode_unicode(input: &str) -> Result<String> {
    if !input.contains('%') {
        return Ok(input.to_string());
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match escaped_byte(bytes, i) {
            Some(byte) if !byte.is_ascii() => {
                out.push(byte);
                i += 3;
            }
            _ => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| UrlError::decode_failure(input))
}

/// [`decode_unicode`], falling back to the input on malformed sequences
pub fn safe_decode(input: &str) -> String {
    decode_unicode(input).unwrap_or_else(|_| input.to_string())
}

/// Fully decode a URL component (userinfo), falling back to the input
pub fn decode_component(input: &str) -> String {
    urlencoding::decode(input)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| input.to_string())
}

/// Escape the characters the legacy parser never leaves raw in a pathname
pub fn escape_pathname(pathname: &str) -> String {
    let mut result = String::with_capacity(pathname.len());

    for c in pathname.chars() {
        match AUTO_ESCAPE.iter().find(|(raw, _)| *raw == c) {
            Some((_, escaped)) => result.push_str(escaped),
            None => result.push(c),
        }
    }

    result
}

fn escaped_byte(bytes: &[u8], i: usize) -> Option<u8> {
    if bytes.get(i) != Some(&b'%') {
        return None;
    }
    let hi = char::from(*bytes.get(i + 1)?).to_digit(16)?;
    let lo = char::from(*bytes.get(i + 2)?).to_digit(16)?;
    u8::try_from(hi * 16 + lo).ok()
}
