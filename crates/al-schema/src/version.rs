//! Migration identifiers.
//!
//! Unit names have the form `<token>-<description>`, where the token is a
//! 14-digit `YYYYMMDDHHMMSS` timestamp. Names in the wild are not always
//! clean: a stray leading character or an extra leading digit must still
//! sort where the timestamp says it belongs.

use crate::error::{SchemaError, SchemaResult};
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

const TOKEN_LEN: usize = 14;

/// Canonical `(token, description)` identity of a migration unit.
///
/// Ordering compares the token first, then the description, so units that
/// share a token still apply in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MigrationId {
    token: String,
    description: String,
}

impl MigrationId {
    /// Parse a unit name.
    ///
    /// A non-digit prefix is dropped. A digit run longer than 14 keeps its
    /// trailing 14 digits, so `120231203110000-x` yields token
    /// `20231203110000`.
    pub fn parse(name: &str) -> SchemaResult<Self> {
        let invalid = |reason: &str| SchemaError::InvalidVersion {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let start = name
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| invalid("no version token"))?;
        let rest = &name[start..];
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = &rest[..digits_end];
        if digits.len() < TOKEN_LEN {
            return Err(invalid("version token needs 14 digits"));
        }
        let token = &digits[digits.len() - TOKEN_LEN..];

        let description = rest[digits_end..]
            .strip_prefix('-')
            .ok_or_else(|| invalid("expected '-' after the version token"))?;
        if description.is_empty() {
            return Err(invalid("missing description"));
        }

        Ok(Self {
            token: token.to_string(),
            description: description.to_string(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The token read as a timestamp, when it is a valid one.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.token, "%Y%m%d%H%M%S").ok()
    }

    /// Whether `target` names this unit, by full id or by token alone.
    pub fn matches(&self, target: &str) -> bool {
        target == self.token || target == self.to_string()
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.token, self.description)
    }
}

impl FromStr for MigrationId {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
