//! Text record format for EMG signal logs
//!
//! One sample per line:
//!
//! ```text
//! [2024-01-01 12:00:00.000000]-0.0123
//! [2024-01-01 12:00:00.001000] 0.0456
//! ```
//!
//! The bracketed timestamp is followed by optional whitespace and a decimal
//! amplitude.

use crate::signal::Sample;
use crate::timestamp::PrecisionTimestamp;

/// Parse a single log record
///
/// Returns a human-readable reason on failure; callers attach the source and
/// line number.
pub fn parse_record(line: &str) -> Result<Sample, String> {
    let record = line.trim();

    let Some(rest) = record.strip_prefix('[') else {
        return Err("record must start with '['".to_string());
    };

    let Some((time_text, amplitude_text)) = rest.split_once(']') else {
        return Err("missing closing ']' after timestamp".to_string());
    };

    if amplitude_text.contains(']') || time_text.contains('[') {
        return Err("unbalanced brackets".to_string());
    }

    let timestamp: PrecisionTimestamp = time_text
        .parse()
        .map_err(|e| format!("invalid timestamp '{}': {}", time_text, e))?;

    let amplitude_text = amplitude_text.trim();
    let amplitude: f64 = amplitude_text
        .parse()
        .map_err(|_| format!("invalid amplitude '{}'", amplitude_text))?;

    if !amplitude.is_finite() {
        return Err(format!("amplitude '{}' is not finite", amplitude_text));
    }

    Ok(Sample::new(timestamp, amplitude))
}

/// Render a sample in the log record layout
pub fn format_record(sample: &Sample) -> String {
    format!("[{}] {}", sample.timestamp, sample.amplitude)
}
