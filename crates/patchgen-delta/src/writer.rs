//! Delta serializer.
//!
//! Records are written back to back with no header or trailer. Every
//! integer is a little-endian `u32`:
//!
//! ```text
//! COPY:   [opcode = 0][origin_offset][length]
//! INSERT: [opcode = 1][final_offset][length][length bytes of payload]
//! ```

use std::io::Write;

use tracing::debug;

use crate::error::{DeltaError, DeltaResult};
use crate::operation::{Operation, OperationSequence};

/// Writes operations to a byte sink in wire order.
pub struct DeltaWriter<W: Write> {
    sink: W,
    records: usize,
    bytes_written: u64,
}

impl<W: Write> DeltaWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            records: 0,
            bytes_written: 0,
        }
    }

    /// Append one record.
    pub fn write_operation(&mut self, op: &Operation) -> DeltaResult<()> {
        match op {
            Operation::Copy {
                origin_offset,
                length,
            } => {
                self.put_u32(op.opcode().as_u32())?;
                self.put_u32(*origin_offset)?;
                self.put_u32(*length)?;
                debug!(index = self.records, origin_offset, length, "wrote COPY");
            }
            Operation::Insert {
                final_offset,
                payload,
            } => {
                let length = wire_len(payload.len())?;
                self.put_u32(op.opcode().as_u32())?;
                self.put_u32(*final_offset)?;
                self.put_u32(length)?;
                self.sink.write_all(payload)?;
                self.bytes_written += payload.len() as u64;
                debug!(
                    index = self.records,
                    final_offset,
                    length = payload.len(),
                    "wrote INSERT"
                );
            }
        }
        self.records += 1;
        Ok(())
    }

    /// Append every operation of `ops`, front to back.
    pub fn write_sequence(&mut self, ops: &OperationSequence) -> DeltaResult<()> {
        for op in ops {
            self.write_operation(op)?;
        }
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> DeltaResult<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn put_u32(&mut self, value: u32) -> DeltaResult<()> {
        self.sink.write_all(&value.to_le_bytes())?;
        self.bytes_written += 4;
        Ok(())
    }
}

/// Serialize `ops` into `sink`. Write failures are returned as-is.
pub fn write(ops: &OperationSequence, sink: &mut dyn Write) -> DeltaResult<()> {
    let mut writer = DeltaWriter::new(sink);
    writer.write_sequence(ops)?;
    writer.flush()
}

/// Serialize `ops` into a fresh buffer.
pub fn encode(ops: &OperationSequence) -> DeltaResult<Vec<u8>> {
    let mut writer = DeltaWriter::new(Vec::with_capacity(ops.encoded_len()));
    writer.write_sequence(ops)?;
    Ok(writer.into_inner())
}

/// INSERT lengths are written as 32-bit fields.
fn wire_len(len: usize) -> DeltaResult<u32> {
    u32::try_from(len).map_err(|_| DeltaError::InputTooLarge { len })
}
