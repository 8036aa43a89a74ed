//! Reading and writing signal logs on disk

use crate::error::{EmgError, EmgResult};
use crate::format::{format_record, parse_record};
use crate::signal::Signal;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Load a signal log from `path`
///
/// The file is closed when this returns, whether parsing succeeded or not.
pub fn load_signal(path: impl AsRef<Path>) -> EmgResult<Signal> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| EmgError::io(path, &e))?;
    let source = path.display().to_string();

    let signal = read_signal(BufReader::new(file), &source)?;
    debug!(source = %source, samples = signal.len(), "loaded signal log");
    Ok(signal.with_source(source))
}

/// Parse a signal log from any buffered reader
///
/// `source` labels parse errors. Blank lines are skipped.
pub fn read_signal<R: BufRead>(reader: R, source: &str) -> EmgResult<Signal> {
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| EmgError::IoError {
            path: source.to_string(),
            reason: e.to_string(),
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let sample = parse_record(&line).map_err(|reason| EmgError::ParseError {
            source: source.to_string(),
            line: index + 1,
            reason,
        })?;
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(EmgError::InsufficientData {
            operation: "loading signal log",
            required: 1,
            available: 0,
        });
    }

    let signal = Signal::new(samples)?;
    if !signal.is_monotonic() {
        warn!(source = %source, "timestamps in signal log are not monotonic");
    }
    Ok(signal)
}

/// Write a signal to `path` in the log record format
pub fn write_signal(path: impl AsRef<Path>, signal: &Signal) -> EmgResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| EmgError::io(path, &e))?;
    let mut writer = BufWriter::new(file);

    write_records(&mut writer, signal).map_err(|e| EmgError::io(path, &e))?;
    writer.flush().map_err(|e| EmgError::io(path, &e))?;

    debug!(path = %path.display(), samples = signal.len(), "wrote signal log");
    Ok(())
}

/// Write every sample of `signal` as one record per line
pub fn write_records<W: Write>(writer: &mut W, signal: &Signal) -> std::io::Result<()> {
    for sample in signal.samples() {
        writeln!(writer, "{}", format_record(sample))?;
    }
    Ok(())
}
