use serde::{Deserialize, Serialize};

use crate::operation::{Operation, OperationSequence};

/// Summary of a delta: how much of the final buffer was reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub original_len: usize,
    pub final_len: usize,
    /// Final-buffer bytes covered by COPY operations.
    pub copied_bytes: usize,
    /// Final-buffer bytes carried literally in INSERT payloads.
    pub inserted_bytes: usize,
    pub copy_ops: usize,
    pub insert_ops: usize,
    /// Serialized size of the delta.
    pub delta_len: usize,
}

impl DiffStats {
    /// Tally a sequence produced against an original of `original_len` bytes.
    pub fn from_sequence(ops: &OperationSequence, original_len: usize) -> Self {
        let mut stats = Self {
            original_len,
            ..Self::default()
        };
        for op in ops {
            match op {
                Operation::Copy { length, .. } => {
                    stats.copy_ops += 1;
                    stats.copied_bytes += *length as usize;
                }
                Operation::Insert { payload, .. } => {
                    stats.insert_ops += 1;
                    stats.inserted_bytes += payload.len();
                }
            }
            stats.delta_len += op.encoded_len();
        }
        stats.final_len = stats.copied_bytes + stats.inserted_bytes;
        stats
    }

    /// Fraction of the final buffer that had to be sent literally,
    /// `1 - copied / final_len`. Zero for an empty final buffer.
    pub fn ratio(&self) -> f64 {
        if self.final_len == 0 {
            return 0.0;
        }
        1.0 - self.copied_bytes as f64 / self.final_len as f64
    }
}
