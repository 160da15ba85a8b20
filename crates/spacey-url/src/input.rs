// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! String-or-record arguments

use crate::record::LegacyUrl;

/// A URL given either as text or as an already parsed record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlLike<'a> {
    /// URL string, parsed on demand
    Str(&'a str),
    /// Parsed record
    Record(&'a LegacyUrl),
}

impl<'a> From<&'a str> for UrlLike<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a String> for UrlLike<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a LegacyUrl> for UrlLike<'a> {
    fn from(value: &'a LegacyUrl) -> Self {
        Self::Record(value)
    }
}
