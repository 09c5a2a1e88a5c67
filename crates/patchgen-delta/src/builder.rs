//! Left-to-right scan of the final buffer producing COPY/INSERT operations.

use tracing::debug;

use crate::config::{DiffConfig, ALIGNMENT};
use crate::error::{DeltaError, DeltaResult};
use crate::matcher::find_best_match;
use crate::operation::{Operation, OperationSequence};

/// Builds the operation sequence turning `original` into `final_buf`.
///
/// The scan keeps three cursors into the final buffer:
/// - `scan_pos`: where the next match is attempted.
/// - `flush_pos`: start of the bytes not yet covered by an operation.
/// - `total_emitted`: bytes represented by operations pushed so far.
///
/// Unmatched bytes between `flush_pos` and `scan_pos` are flushed as one
/// INSERT right before the next COPY, and whatever is left after the scan
/// becomes a trailing INSERT.
#[derive(Clone, Copy, Debug)]
pub struct OperationBuilder<'a> {
    original: &'a [u8],
    final_buf: &'a [u8],
    config: DiffConfig,
}

impl<'a> OperationBuilder<'a> {
    /// Create a builder using the default policy.
    pub fn new(original: &'a [u8], final_buf: &'a [u8]) -> Self {
        Self {
            original,
            final_buf,
            config: DiffConfig::default(),
        }
    }

    /// Replace the matching policy.
    pub fn with_config(mut self, config: DiffConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Run the scan.
    pub fn build(&self) -> DeltaResult<OperationSequence> {
        self.config.validate()?;
        check_addressable(self.original)?;
        check_addressable(self.final_buf)?;

        let final_len = self.final_buf.len();
        let mut ops = OperationSequence::new();
        let mut scan_pos = 0usize;
        let mut flush_pos = 0usize;
        let mut total_emitted = 0usize;

        while scan_pos < final_len {
            let found =
                find_best_match(self.original, self.final_buf, scan_pos, self.config.max_len);
            match found {
                Some(m) if m.length > self.config.min_match => {
                    if scan_pos > flush_pos {
                        ops.push(self.insert(flush_pos, scan_pos));
                        total_emitted += scan_pos - flush_pos;
                    }
                    debug!(
                        final_pos = scan_pos,
                        origin_offset = m.origin_offset,
                        length = m.length,
                        "copy"
                    );
                    ops.push(Operation::Copy {
                        origin_offset: m.origin_offset as u32,
                        length: m.length as u32,
                    });
                    total_emitted += m.length;
                    flush_pos = scan_pos + m.length;
                    scan_pos += m.length;
                }
                _ => scan_pos += ALIGNMENT,
            }
        }

        if total_emitted < final_len {
            ops.push(self.insert(total_emitted, final_len));
        }

        debug!(
            original_len = self.original.len(),
            final_len,
            operations = ops.len(),
            "scan complete"
        );
        Ok(ops)
    }

    fn insert(&self, start: usize, end: usize) -> Operation {
        debug!(final_offset = start, length = end - start, "insert");
        Operation::Insert {
            final_offset: start as u32,
            payload: self.final_buf[start..end].to_vec(),
        }
    }
}

/// Build the delta from `original` to `final_buf` with the given span bound
/// and the default COPY threshold.
pub fn build(original: &[u8], final_buf: &[u8], max_len: usize) -> DeltaResult<OperationSequence> {
    OperationBuilder::new(original, final_buf)
        .with_config(DiffConfig::default().with_max_len(max_len))
        .build()
}

/// Offsets and lengths are written as 32-bit fields.
fn check_addressable(buf: &[u8]) -> DeltaResult<()> {
    if u32::try_from(buf.len()).is_err() {
        return Err(DeltaError::InputTooLarge { len: buf.len() });
    }
    Ok(())
}
