//! Numeric version parsing and ordering.
//!
//! Versions are dot-separated numeric components compared left to right,
//! with the shorter sequence padded with zeros (`1.0 == 1.0.0`,
//! `1.10.0 > 1.9.0`). The text a version was parsed from is kept so reason
//! strings show exactly what the caller wrote.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors produced while parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The input was empty or only whitespace.
    #[error("Version string cannot be empty")]
    Empty,

    /// A dot-separated component was not a plain non-negative integer.
    #[error("Invalid version `{input}`: component `{component}` is not numeric")]
    InvalidComponent { input: String, component: String },

    /// No leading numeric component could be found in installed metadata.
    #[error("Invalid version `{0}`: no leading numeric component")]
    NoNumericPrefix(String),
}

/// A numeric version such as `1.8.0`.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
    raw: String,
}

impl Version {
    /// Parse version metadata reported by an installed package.
    ///
    /// Installed versions carry decorations a caller-supplied minimum never
    /// should: a local segment (`2.1.0+cu118`) is dropped, and parsing stops
    /// at the first component that is not purely numeric, keeping its
    /// leading digits (`1.9.0a0` reads as `1.9.0`, `2.0.0rc1` as `2.0.0`).
    pub fn parse_installed(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let public = trimmed.split('+').next().unwrap_or(trimmed);
        let mut components = Vec::new();
        for part in public.split('.') {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() {
                break;
            }
            let Ok(value) = digits.parse::<u64>() else {
                break;
            };
            components.push(value);
            if digits.len() != part.len() {
                break;
            }
        }

        if components.is_empty() {
            return Err(VersionError::NoNumericPrefix(trimmed.to_string()));
        }

        Ok(Self {
            components,
            raw: trimmed.to_string(),
        })
    }

    /// Numeric components in declaration order.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// The text this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Version {
    type Err = VersionError;

    /// Strict parsing for caller-supplied versions: every component must be
    /// a plain non-negative integer.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let components = trimmed
            .split('.')
            .map(|part| {
                let numeric = !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
                numeric
                    .then(|| part.parse::<u64>().ok())
                    .flatten()
                    .ok_or_else(|| VersionError::InvalidComponent {
                        input: trimmed.to_string(),
                        component: part.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            components,
            raw: trimmed.to_string(),
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| {
                let lhs = self.components.get(i).copied().unwrap_or(0);
                let rhs = other.components.get(i).copied().unwrap_or(0);
                lhs.cmp(&rhs)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
