//! Matching policy: probe granularity, COPY threshold and span bound.

use serde::{Deserialize, Serialize};

use crate::error::{DeltaError, DeltaResult};

/// Granularity of the matcher, in bytes.
///
/// Origin offsets are probed at multiples of this value, match lengths grow
/// in steps of this value, and the scan advances by this value when no
/// usable match is found at a position.
pub const ALIGNMENT: usize = 4;

/// A match is only encoded as a COPY when it is strictly longer than this.
///
/// Shorter matches stay inside the surrounding INSERT payload, since a COPY
/// record costs 12 bytes on the wire.
pub const MIN_MATCH: usize = 16;

/// Default upper bound on a single probe and on a single COPY span.
pub const DEFAULT_MAX_LEN: usize = 100 * 1024;

/// Tunable parameters for a diff run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Longest span the matcher will probe for, and the largest COPY emitted.
    pub max_len: usize,
    /// Matches of this length or shorter are not emitted as COPY operations.
    pub min_match: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_LEN,
            min_match: MIN_MATCH,
        }
    }
}

impl DiffConfig {
    /// Override the maximum span length.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Override the COPY threshold.
    pub fn with_min_match(mut self, min_match: usize) -> Self {
        self.min_match = min_match;
        self
    }

    /// Check that the matcher can make progress with these settings.
    pub fn validate(&self) -> DeltaResult<()> {
        if self.max_len < ALIGNMENT {
            return Err(DeltaError::InvalidConfig(format!(
                "max_len must be at least {ALIGNMENT}, got {}",
                self.max_len
            )));
        }
        if self.max_len > u32::MAX as usize {
            return Err(DeltaError::InvalidConfig(format!(
                "max_len {} does not fit a 32-bit length field",
                self.max_len
            )));
        }
        Ok(())
    }
}
