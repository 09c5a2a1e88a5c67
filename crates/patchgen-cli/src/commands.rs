use std::fs::File;
use std::io::BufWriter;

use anyhow::Context;
use colored::Colorize;
use patchgen_delta::{generate_delta, ByteSource, DiffStats, FileSource};
use tracing::info;

use crate::cli::{Cli, OutputFormat};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let stats = run_diff(&cli)?;
    report(&stats, &cli.format)
}

/// Open the three paths, generate the delta, and return its summary.
pub fn run_diff(cli: &Cli) -> anyhow::Result<DiffStats> {
    let config = cli.config();
    config.validate()?;

    let mut original = FileSource::open(&cli.original)
        .with_context(|| format!("failed to open original file {}", cli.original.display()))?;
    let mut final_src = FileSource::open(&cli.final_path)
        .with_context(|| format!("failed to open final file {}", cli.final_path.display()))?;
    let original_len = original.total_size()?;
    let final_len = final_src.total_size()?;
    info!(
        original = %cli.original.display(),
        original_len,
        final_path = %cli.final_path.display(),
        final_len,
        delta = %cli.delta.display(),
        "inputs opened"
    );
    let delta = File::create(&cli.delta)
        .with_context(|| format!("failed to create delta file {}", cli.delta.display()))?;

    generate_delta(&mut original, &mut final_src, BufWriter::new(delta), config)
        .with_context(|| format!("failed to write delta to {}", cli.delta.display()))
}

fn report(stats: &DiffStats, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(stats)?;
            value["ratio"] = serde_json::json!(stats.ratio());
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!(
                "Total: {}, matched: {}, ratio: {}",
                stats.final_len.to_string().bold(),
                stats.copied_bytes.to_string().green(),
                format!("{:.6}", stats.ratio()).yellow()
            );
            println!(
                "  {} copy, {} insert, {} delta bytes",
                stats.copy_ops, stats.insert_ops, stats.delta_len
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use patchgen_delta::decode;
    use std::io::{self, Write};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::EnvFilter;

    fn cli_for(dir: &Path, extra: &[&str]) -> Cli {
        let original = dir.join("original.bin");
        let final_path = dir.join("final.bin");
        let delta = dir.join("out.delta");
        let mut args = vec![
            "patchgen".to_string(),
            original.display().to_string(),
            final_path.display().to_string(),
            delta.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn writes_decodable_delta() {
        let dir = tempfile::tempdir().unwrap();
        let original: Vec<u8> = (0..=255u8).collect();
        let mut final_buf = b"PREFIX!!".to_vec();
        final_buf.extend_from_slice(&original[64..192]);
        std::fs::write(dir.path().join("original.bin"), &original).unwrap();
        std::fs::write(dir.path().join("final.bin"), &final_buf).unwrap();

        let cli = cli_for(dir.path(), &[]);
        let stats = run_diff(&cli).unwrap();
        assert_eq!(stats.final_len, final_buf.len());
        assert_eq!(stats.copied_bytes, 128);

        let bytes = std::fs::read(dir.path().join("out.delta")).unwrap();
        assert_eq!(bytes.len(), stats.delta_len);
        let ops = decode(&bytes).unwrap();
        ops.validate(original.len(), final_buf.len()).unwrap();
    }

    #[test]
    fn truncates_existing_delta() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("original.bin"), b"").unwrap();
        std::fs::write(dir.path().join("final.bin"), b"").unwrap();
        std::fs::write(dir.path().join("out.delta"), vec![0xAA; 1000]).unwrap();

        run_diff(&cli_for(dir.path(), &[])).unwrap();
        let bytes = std::fs::read(dir.path().join("out.delta")).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn missing_input_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("final.bin"), b"data").unwrap();

        let err = run_diff(&cli_for(dir.path(), &[])).unwrap_err();
        assert!(err.to_string().contains("original.bin"));
        assert!(!dir.path().join("out.delta").exists());
    }

    #[test]
    fn invalid_max_len_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("original.bin"), b"abcd").unwrap();
        std::fs::write(dir.path().join("final.bin"), b"abcd").unwrap();

        let cli = cli_for(dir.path(), &["--max-len", "2"]);
        assert!(run_diff(&cli).is_err());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn verbose_logs_each_record() {
        let dir = tempfile::tempdir().unwrap();
        let original: Vec<u8> = (0..=255u8).collect();
        let mut final_buf = b"PREFIX!!".to_vec();
        final_buf.extend_from_slice(&original[64..192]);
        std::fs::write(dir.path().join("original.bin"), &original).unwrap();
        std::fs::write(dir.path().join("final.bin"), &final_buf).unwrap();

        let cli = cli_for(dir.path(), &["-v"]);
        let log = CapturedLog::default();
        let sink = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(cli.log_filter()))
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || run_diff(&cli).unwrap());

        let text = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("inputs opened"));
        assert!(text.contains("wrote INSERT"));
        assert!(text.contains("wrote COPY"));
    }

    #[test]
    fn report_formats() {
        let stats = DiffStats {
            original_len: 10,
            final_len: 40,
            copied_bytes: 36,
            inserted_bytes: 4,
            copy_ops: 1,
            insert_ops: 1,
            delta_len: 28,
        };
        report(&stats, &OutputFormat::Text).unwrap();
        report(&stats, &OutputFormat::Json).unwrap();
    }
}
