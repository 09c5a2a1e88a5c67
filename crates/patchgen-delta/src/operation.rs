//! Delta operations and the ordered sequence that holds them.

use serde::{Deserialize, Serialize};

use crate::error::{DeltaError, DeltaResult};
use crate::stats::DiffStats;

/// Size of the fixed part of every record: opcode + two 32-bit fields.
pub const RECORD_HEADER_LEN: usize = 12;

/// Wire opcode for an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum OpCode {
    Copy = 0,
    Insert = 1,
}

impl OpCode {
    /// Parse a wire opcode.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Copy),
            1 => Some(Self::Insert),
            _ => None,
        }
    }

    /// The value written on the wire.
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// A single step in rebuilding the final buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Reuse `length` bytes of the original buffer starting at `origin_offset`.
    Copy { origin_offset: u32, length: u32 },
    /// Emit `payload` verbatim. `final_offset` is where the bytes sit in the
    /// final buffer and is informational only.
    Insert { final_offset: u32, payload: Vec<u8> },
}

impl Operation {
    /// The opcode this operation is written with.
    pub fn opcode(&self) -> OpCode {
        match self {
            Self::Copy { .. } => OpCode::Copy,
            Self::Insert { .. } => OpCode::Insert,
        }
    }

    /// Number of final-buffer bytes this operation produces.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Copy { length, .. } => *length as usize,
            Self::Insert { payload, .. } => payload.len(),
        }
    }

    /// Number of bytes this operation occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Copy { .. } => RECORD_HEADER_LEN,
            Self::Insert { payload, .. } => RECORD_HEADER_LEN + payload.len(),
        }
    }

    pub fn is_copy(&self) -> bool {
        matches!(self, Self::Copy { .. })
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert { .. })
    }
}

/// Operations in final-buffer order. Append-only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSequence {
    ops: Vec<Operation>,
}

impl OperationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation at the tail.
    pub fn push(&mut self, op: Operation) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.ops
    }

    /// Total number of final-buffer bytes described by the sequence.
    pub fn final_len(&self) -> usize {
        self.ops.iter().map(Operation::output_len).sum()
    }

    /// Size of the sequence once serialized.
    pub fn encoded_len(&self) -> usize {
        self.ops.iter().map(Operation::encoded_len).sum()
    }

    /// Summarize the sequence against the length of the original buffer.
    pub fn stats(&self, original_len: usize) -> DiffStats {
        DiffStats::from_sequence(self, original_len)
    }

    /// Check that the sequence is a valid delta between buffers of the given
    /// lengths: every COPY stays inside the original, every INSERT records
    /// its true final offset, and the operations tile `[0, final_len)`.
    pub fn validate(&self, original_len: usize, final_len: usize) -> DeltaResult<()> {
        let mut cursor = 0usize;
        for (index, op) in self.ops.iter().enumerate() {
            match op {
                Operation::Copy {
                    origin_offset,
                    length,
                } => {
                    let end = *origin_offset as usize + *length as usize;
                    if *length == 0 {
                        return Err(DeltaError::InvariantViolation(format!(
                            "op {index}: empty COPY"
                        )));
                    }
                    if end > original_len {
                        return Err(DeltaError::InvariantViolation(format!(
                            "op {index}: COPY {origin_offset}+{length} past original length {original_len}"
                        )));
                    }
                }
                Operation::Insert {
                    final_offset,
                    payload,
                } => {
                    if payload.is_empty() {
                        return Err(DeltaError::InvariantViolation(format!(
                            "op {index}: empty INSERT"
                        )));
                    }
                    if *final_offset as usize != cursor {
                        return Err(DeltaError::InvariantViolation(format!(
                            "op {index}: INSERT at final offset {final_offset}, expected {cursor}"
                        )));
                    }
                }
            }
            cursor += op.output_len();
        }
        if cursor != final_len {
            return Err(DeltaError::InvariantViolation(format!(
                "operations cover {cursor} bytes, final buffer has {final_len}"
            )));
        }
        Ok(())
    }
}

impl From<Vec<Operation>> for OperationSequence {
    fn from(ops: Vec<Operation>) -> Self {
        Self { ops }
    }
}

impl FromIterator<Operation> for OperationSequence {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for OperationSequence {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a OperationSequence {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
