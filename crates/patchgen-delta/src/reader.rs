//! Delta decoder.
//!
//! Turns a serialized delta back into [`Operation`]s for inspection and
//! validation. The stream has no terminator, so records are read until the
//! source is exhausted; running out of bytes in the middle of a record is a
//! corruption error rather than a short final operation.

use std::io::{self, Read};

use tracing::warn;

use crate::error::{DeltaError, DeltaResult};
use crate::operation::{OpCode, Operation, OperationSequence, RECORD_HEADER_LEN};

/// Iterator over the records of a serialized delta.
///
/// Yields at most one error, after which iteration stops.
pub struct DeltaReader<R: Read> {
    source: R,
    offset: u64,
    done: bool,
}

impl<R: Read> DeltaReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            offset: 0,
            done: false,
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn read_record(&mut self) -> DeltaResult<Option<Operation>> {
        let start = self.offset;
        let mut header = [0u8; RECORD_HEADER_LEN];
        let got = self.fill(&mut header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < RECORD_HEADER_LEN {
            return Err(self.corrupt(
                start,
                format!("truncated record header: {got} of {RECORD_HEADER_LEN} bytes"),
            ));
        }

        let opcode = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let offset = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let length = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);

        match OpCode::from_u32(opcode) {
            Some(OpCode::Copy) => Ok(Some(Operation::Copy {
                origin_offset: offset,
                length,
            })),
            Some(OpCode::Insert) => {
                let mut payload = Vec::new();
                let got = self.read_payload(length, &mut payload)?;
                if got < length as usize {
                    return Err(self.corrupt(
                        start,
                        format!("truncated INSERT payload: {got} of {length} bytes"),
                    ));
                }
                Ok(Some(Operation::Insert {
                    final_offset: offset,
                    payload,
                }))
            }
            None => Err(self.corrupt(start, format!("unknown opcode {opcode}"))),
        }
    }

    /// Read until `buf` is full or the source is exhausted.
    fn fill(&mut self, buf: &mut [u8]) -> DeltaResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.offset += filled as u64;
        Ok(filled)
    }

    fn read_payload(&mut self, length: u32, payload: &mut Vec<u8>) -> DeltaResult<usize> {
        // The length field is untrusted, so grow with the data instead of preallocating.
        let got = (&mut self.source).take(u64::from(length)).read_to_end(payload)?;
        self.offset += got as u64;
        Ok(got)
    }

    fn corrupt(&self, offset: u64, reason: String) -> DeltaError {
        warn!(offset, %reason, "corrupt delta record");
        DeltaError::StreamCorruption { offset, reason }
    }
}

impl<R: Read> Iterator for DeltaReader<R> {
    type Item = DeltaResult<Operation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(op)) => Some(Ok(op)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Decode a complete delta held in memory.
pub fn decode(bytes: &[u8]) -> DeltaResult<OperationSequence> {
    DeltaReader::new(bytes).collect()
}
