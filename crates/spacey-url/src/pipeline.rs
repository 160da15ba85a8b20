// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The legacy URL pipeline
//!
//! `parse` runs preprocess -> strict parse -> reconcile, with the strict
//! parser injected through [`StrictParser`]:
//!
//! ```text
//! raw ──quirks──▶ QuirkState ──adapter──▶ StrictOutcome ──reconcile──▶ LegacyUrl
//! ```

use crate::adapter::{StrictOutcome, strict_parse};
use crate::error::{Result, UrlError};
use crate::format::format_record;
use crate::input::UrlLike;
use crate::options::ParseOptions;
use crate::quirks::preprocess;
use crate::reconcile::{degraded, reconcile};
use crate::record::{LegacyUrl, RECORD_KEYS};
use crate::resolve;
use crate::strict::{StrictParser, WhatwgParser};
use serde_json::Value;

/// Result of a parse, tagged with whether the strict parser accepted the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every field was derived from a strict parse
    Parsed(LegacyUrl),
    /// The strict parser rejected the input; only the scheme was kept
    Degraded(LegacyUrl),
}

impl ParseOutcome {
    /// The record, regardless of outcome
    pub fn url(&self) -> &LegacyUrl {
        match self {
            Self::Parsed(url) | Self::Degraded(url) => url,
        }
    }

    /// Take the record, regardless of outcome
    pub fn into_url(self) -> LegacyUrl {
        match self {
            Self::Parsed(url) | Self::Degraded(url) => url,
        }
    }

    /// Whether the input was rejected by the strict parser
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// Legacy `url` API over a strict parser
#[derive(Debug, Clone, Default)]
pub struct LegacyUrlParser<P = WhatwgParser> {
    strict: P,
}

impl LegacyUrlParser<WhatwgParser> {
    /// Pipeline over the `url` crate
    pub fn new() -> Self {
        Self::with_parser(WhatwgParser)
    }
}

impl<P: StrictParser> LegacyUrlParser<P> {
    /// Pipeline over a custom strict parser
    pub fn with_parser(strict: P) -> Self {
        Self { strict }
    }

    pub(crate) fn strict(&self) -> &P {
        &self.strict
    }

    /// Parse `input`, reporting whether it degraded
    pub fn parse_outcome(&self, input: &str, options: ParseOptions) -> ParseOutcome {
        let state = preprocess(input);

        match strict_parse(&self.strict, &state, options) {
            StrictOutcome::Parsed(parsed) => {
                ParseOutcome::Parsed(reconcile(&parsed, &state.context, options))
            }
            StrictOutcome::Degraded => ParseOutcome::Degraded(degraded(&state.context)),
        }
    }

    /// Parse with default options
    pub fn parse(&self, input: &str) -> LegacyUrl {
        self.parse_with(input, ParseOptions::default())
    }

    /// Parse with the given options
    pub fn parse_with(&self, input: &str, options: ParseOptions) -> LegacyUrl {
        self.parse_outcome(input, options).into_url()
    }

    /// Parse a dynamically typed argument
    ///
    /// Strings are parsed. A complete record object is returned as is.
    /// Anything else is rejected with [`UrlError::InvalidArgument`].
    pub fn parse_value(&self, value: &Value, options: ParseOptions) -> Result<LegacyUrl> {
        self.parse_argument(Some(value), options)
    }

    /// [`parse_value`](Self::parse_value) for a possibly missing argument
    ///
    /// `None` stands for `undefined` and is rejected.
    pub fn parse_argument(
        &self,
        value: Option<&Value>,
        options: ParseOptions,
    ) -> Result<LegacyUrl> {
        let Some(value) = value else {
            return Err(UrlError::invalid_argument("undefined"));
        };

        match value {
            Value::String(input) => Ok(self.parse_with(input, options)),
            Value::Object(obj) if RECORD_KEYS.iter().all(|key| obj.contains_key(*key)) => {
                serde_json::from_value(value.clone())
                    .map_err(|_| UrlError::invalid_argument(describe(value)))
            }
            other => Err(UrlError::invalid_argument(describe(other))),
        }
    }

    /// Serialize a record, or normalize a URL string
    pub fn format<'a>(&self, input: impl Into<UrlLike<'a>>) -> String {
        match input.into() {
            UrlLike::Str(input) => format_record(&self.parse(input)),
            UrlLike::Record(url) => format_record(url),
        }
    }

    /// Resolve `reference` against `base`
    pub fn resolve<'a>(&self, base: impl Into<UrlLike<'a>>, reference: &str) -> String {
        resolve::resolve(self, base.into(), reference)
    }

    /// [`resolve`](Self::resolve), parsed
    pub fn resolve_object<'a>(&self, base: impl Into<UrlLike<'a>>, reference: &str) -> LegacyUrl {
        self.parse(&self.resolve(base, reference))
    }
}

/// How Node describes a rejected argument
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("type boolean ({b})"),
        Value::Number(n) => format!("type number ({n})"),
        Value::String(s) => format!("type string ('{s}')"),
        Value::Array(_) => "an instance of Array".to_string(),
        Value::Object(_) => "an instance of Object".to_string(),
    }
}
