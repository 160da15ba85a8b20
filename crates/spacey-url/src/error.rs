// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the legacy url module

use thiserror::Error;

/// Result type for legacy url operations
pub type Result<T> = std::result::Result<T, UrlError>;

/// Errors that can occur while parsing, formatting or resolving URLs
///
/// Only [`UrlError::InvalidArgument`] ever reaches the caller of the
/// legacy API. The other variants are produced by the pipeline's
/// collaborators and recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// Wrong argument type handed to `parse`
    #[error("TypeError [ERR_INVALID_ARG_TYPE]: {0}")]
    InvalidArgument(String),

    /// The strict parser rejected the input
    #[error("Invalid URL '{input}': {reason}")]
    UnparsableUrl {
        /// Input the strict parser was given
        input: String,
        /// Reason reported by the strict parser
        reason: String,
    },

    /// Malformed percent-encoded sequence
    #[error("URIError: URI malformed: {0}")]
    DecodeFailure(String),
}

impl UrlError {
    /// Create an invalid argument error for a value of the given kind
    pub fn invalid_argument(received: impl AsRef<str>) -> Self {
        Self::InvalidArgument(format!(
            "The \"url\" argument must be of type string. Received {}",
            received.as_ref()
        ))
    }

    /// Create an unparsable url error
    pub fn unparsable(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::UnparsableUrl {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a decode failure for the given input
    pub fn decode_failure(input: impl Into<String>) -> Self {
        Self::DecodeFailure(input.into())
    }
}
