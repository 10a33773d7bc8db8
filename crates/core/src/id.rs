// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A tracker record key that names one crawl-QA job.
///
/// Only numeric-like keys are valid job ids; the tracker also carries
/// records (social links, admin tickets) whose keys are not crawl ids,
/// and those must never reach the queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

/// Error returned when a record key is not a valid job id.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid job id '{0}': not a numeric record key")]
pub struct IdError(pub String);

impl JobId {
    /// Parse a raw record key. Valid ids are non-empty and all ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Get the string value of this JobId.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for JobId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for JobId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
