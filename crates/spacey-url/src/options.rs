// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Options accepted by `url.parse()`

use serde::{Deserialize, Serialize};

/// Flags for [`parse_with`](crate::parse_with)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Decode `query` into a key/value mapping instead of raw text
    pub parse_query_string: bool,

    /// Treat `//x` as an authority even without a scheme
    pub slashes_denote_host: bool,
}

impl ParseOptions {
    /// Options with both flags off
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `parseQueryString`
    pub fn with_query_string(mut self, enabled: bool) -> Self {
        self.parse_query_string = enabled;
        self
    }

    /// Set `slashesDenoteHost`
    pub fn with_slashes_denote_host(mut self, enabled: bool) -> Self {
        self.slashes_denote_host = enabled;
        self
    }
}
