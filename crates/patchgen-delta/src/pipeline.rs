//! End-to-end run: load both inputs, build the operations, write the delta.

use std::io::Write;

use tracing::info;

use crate::builder::OperationBuilder;
use crate::config::DiffConfig;
use crate::error::DeltaResult;
use crate::source::ByteSource;
use crate::stats::DiffStats;
use crate::writer::DeltaWriter;

/// Diff `original` against `final_src` and serialize the delta into `sink`.
///
/// Both inputs are fully loaded before matching starts. Any I/O failure
/// aborts the run.
pub fn generate_delta<O, F, W>(
    original: &mut O,
    final_src: &mut F,
    sink: W,
    config: DiffConfig,
) -> DeltaResult<DiffStats>
where
    O: ByteSource + ?Sized,
    F: ByteSource + ?Sized,
    W: Write,
{
    let original = original.read_all()?;
    let final_buf = final_src.read_all()?;

    let ops = OperationBuilder::new(&original, &final_buf)
        .with_config(config)
        .build()?;

    let mut writer = DeltaWriter::new(sink);
    writer.write_sequence(&ops)?;
    writer.flush()?;

    let stats = ops.stats(original.len());
    info!(
        final_len = stats.final_len,
        copied = stats.copied_bytes,
        ratio = stats.ratio(),
        delta_len = writer.bytes_written(),
        "delta written"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::decode;
    use crate::source::MemorySource;

    #[test]
    fn memory_to_buffer() {
        let original: Vec<u8> = (0..200u8).collect();
        let mut final_buf = original[40..160].to_vec();
        final_buf.extend_from_slice(b"appended");

        let mut out = Vec::new();
        let stats = generate_delta(
            &mut MemorySource::new(original.clone()),
            &mut MemorySource::new(final_buf.clone()),
            &mut out,
            DiffConfig::default(),
        )
        .unwrap();

        assert_eq!(stats.final_len, final_buf.len());
        assert_eq!(stats.copied_bytes, 120);
        assert_eq!(stats.inserted_bytes, 8);
        assert_eq!(stats.delta_len, out.len());

        let ops = decode(&out).unwrap();
        ops.validate(original.len(), final_buf.len()).unwrap();
    }

    #[test]
    fn empty_inputs_write_nothing() {
        let mut out = Vec::new();
        let stats = generate_delta(
            &mut MemorySource::default(),
            &mut MemorySource::default(),
            &mut out,
            DiffConfig::default(),
        )
        .unwrap();
        assert!(out.is_empty());
        assert_eq!(stats, DiffStats::default());
    }
}
