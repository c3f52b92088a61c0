//! Storage quota parsing and accounting for Cubby.

use crate::{CubbyError, Result};

/// Parse a quota limit string into bytes.
///
/// Accepts a plain byte count ("1048576") or a binary-suffixed form
/// ("500K", "5M", "1G", "2T"). Suffixes are case-insensitive.
pub fn parse_limit(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CubbyError::Validation(
            "quota limit must not be empty".to_string(),
        ));
    }

    let (digits, multiplier) = match trimmed.chars().last() {
        Some(c) if c.is_ascii_digit() => (trimmed, 1i64),
        Some(c) => {
            let multiplier = match c.to_ascii_uppercase() {
                'K' => 1i64 << 10,
                'M' => 1i64 << 20,
                'G' => 1i64 << 30,
                'T' => 1i64 << 40,
                _ => {
                    return Err(CubbyError::Validation(format!(
                        "unknown quota suffix '{c}' in '{trimmed}'"
                    )))
                }
            };
            (&trimmed[..trimmed.len() - c.len_utf8()], multiplier)
        }
        None => unreachable!("trimmed input is non-empty"),
    };

    let value: i64 = digits.parse().map_err(|_| {
        CubbyError::Validation(format!("invalid quota limit '{trimmed}'"))
    })?;
    if value < 0 {
        return Err(CubbyError::Validation(format!(
            "quota limit '{trimmed}' must not be negative"
        )));
    }

    value.checked_mul(multiplier).ok_or_else(|| {
        CubbyError::Validation(format!("quota limit '{trimmed}' is too large"))
    })
}

/// Per-owner storage allowance.
///
/// Enforcement happens in the metadata store at insert time; the
/// accountant carries the configured limit and reports headroom.
#[derive(Debug, Clone, Copy)]
pub struct QuotaAccountant {
    limit_bytes: i64,
}

impl QuotaAccountant {
    /// Create an accountant with the given limit in bytes.
    pub fn new(limit_bytes: i64) -> Self {
        Self { limit_bytes }
    }

    /// Create an accountant from a limit string like "1G".
    pub fn from_limit(limit: &str) -> Result<Self> {
        Ok(Self::new(parse_limit(limit)?))
    }

    /// The configured limit in bytes.
    pub fn limit_bytes(&self) -> i64 {
        self.limit_bytes
    }

    /// Bytes still available given the owner's current usage.
    pub fn available(&self, usage: i64) -> i64 {
        (self.limit_bytes - usage).max(0)
    }
}
