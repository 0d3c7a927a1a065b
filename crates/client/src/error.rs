// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while talking to the results API.

use thiserror::Error;

/// Errors that can occur during a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("Request failed with status {0}")]
    Status(u16),

    /// The request never produced a response (DNS, refused, reset, timeout)
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// A success response carried a body that is not valid JSON
    #[error("Invalid JSON body: {0}")]
    Decode(#[source] reqwest::Error),

    /// The request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// The HTTP status code, for [`FetchError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        assert_eq!(FetchError::Status(503).status(), Some(503));
        assert_eq!(FetchError::InvalidUrl("x".into()).status(), None);
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            FetchError::Status(500).to_string(),
            "Request failed with status 500"
        );
    }
}
