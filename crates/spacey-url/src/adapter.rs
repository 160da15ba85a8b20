// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Strict parsing with the legacy fallbacks

use crate::options::ParseOptions;
use crate::quirks::QuirkState;
use crate::strict::{PLACEHOLDER_ORIGIN, StrictParser, StrictRecord};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `//` followed by something that looks like a host (has `@` or `.`)
static HOST_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//.+[@.]").expect("host pattern is valid"));

/// A successful strict parse and how it was reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrictParse {
    /// What the strict parser returned
    pub record: StrictRecord,
    /// The string that was finally handed to the strict parser
    pub input: String,
    /// Parsed on the first attempt, without the placeholder base
    pub direct: bool,
    /// A leading `/` was removed before retrying (`//path` read as a path)
    pub stripped_slash: bool,
}

/// Outcome of the strict parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrictOutcome {
    /// Some attempt succeeded
    Parsed(StrictParse),
    /// Every attempt failed; only the recorded scheme survives
    Degraded,
}

/// Parse the preprocessed input, retrying against the placeholder origin
pub fn strict_parse<P: StrictParser>(
    parser: &P,
    state: &QuirkState,
    options: ParseOptions,
) -> StrictOutcome {
    let mut input = state.input.clone();

    let first_error = match parser.parse(&input, None) {
        Ok(record) => {
            return StrictOutcome::Parsed(StrictParse {
                record,
                input,
                direct: true,
                stripped_slash: false,
            });
        }
        Err(e) => e,
    };

    let stripped_slash = state.context.protocol_prefix.is_none()
        && !options.slashes_denote_host
        && input.starts_with("//")
        && !HOST_LIKE.is_match(&input);
    if stripped_slash {
        input.remove(0);
    }

    debug!(%input, stripped_slash, error = %first_error, "retrying url against placeholder origin");

    match parser.parse(&input, Some(PLACEHOLDER_ORIGIN)) {
        Ok(record) => StrictOutcome::Parsed(StrictParse {
            record,
            input,
            direct: false,
            stripped_slash,
        }),
        Err(e) => {
            debug!(%input, error = %e, "url degraded to its scheme");
            StrictOutcome::Degraded
        }
    }
}
