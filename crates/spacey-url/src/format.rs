// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Serialize a legacy URL record back into a string

use crate::querystring;
use crate::quirks::is_slashed_scheme;
use crate::record::{LegacyUrl, Query};

/// Build a URL string from the atomic fields of `url`
///
/// `path` and `href` are ignored. `query` is only consulted when `search`
/// is absent.
pub fn format_record(url: &LegacyUrl) -> String {
    let mut protocol = field(&url.protocol).to_string();
    let mut pathname = field(&url.pathname).to_string();
    let mut hash = field(&url.hash).to_string();

    let auth = match field(&url.auth) {
        "" => String::new(),
        auth => format!("{}@", escape_auth(auth)),
    };

    let mut host = if !field(&url.host).is_empty() {
        format!("{auth}{}", field(&url.host))
    } else if !field(&url.hostname).is_empty() {
        let hostname = field(&url.hostname);
        let mut host = if hostname.contains(':') && !hostname.starts_with('[') {
            format!("{auth}[{hostname}]")
        } else {
            format!("{auth}{hostname}")
        };
        if let Some(port) = url.port.as_deref().filter(|port| !port.is_empty()) {
            host.push(':');
            host.push_str(port);
        }
        host
    } else {
        String::new()
    };

    let mut search = match (field(&url.search), &url.query) {
        ("", Some(Query::Raw(raw))) if !raw.is_empty() => format!("?{raw}"),
        ("", Some(Query::Parsed(map))) if !map.is_empty() => {
            format!("?{}", querystring::stringify(map))
        }
        (search, _) => search.to_string(),
    };

    if !protocol.is_empty() && !protocol.ends_with(':') {
        protocol.push(':');
    }

    // '#' and '?' in a pathname would start a new component
    if pathname.contains(['#', '?']) {
        pathname = pathname.replace('#', "%23").replace('?', "%3F");
    }

    let slashes = url.slashes == Some(true);
    if slashes || is_slashed_scheme(&protocol) {
        if slashes || !host.is_empty() {
            if !pathname.is_empty() && !pathname.starts_with('/') {
                pathname.insert(0, '/');
            }
            host.insert_str(0, "//");
        } else if protocol
            .get(..4)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("file"))
        {
            host.insert_str(0, "//");
        }
    }

    search = search.replace('#', "%23");

    if !hash.is_empty() && !hash.starts_with('#') {
        hash.insert(0, '#');
    }
    if !search.is_empty() && !search.starts_with('?') {
        search.insert(0, '?');
    }

    format!("{protocol}{host}{pathname}{search}{hash}")
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// `encodeURIComponent`, with the first `:` left readable
fn escape_auth(auth: &str) -> String {
    querystring::escape(auth).replacen("%3A", ":", 1)
}
