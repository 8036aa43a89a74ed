//! Signal: immutable container for a single-channel EMG recording

use crate::error::{EmgError, EmgResult};
use crate::timestamp::PrecisionTimestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: PrecisionTimestamp,
    pub amplitude: f64,
}

impl Sample {
    pub fn new(timestamp: PrecisionTimestamp, amplitude: f64) -> Self {
        Self { timestamp, amplitude }
    }
}

/// Ordered, non-empty sequence of samples in acquisition order
///
/// A `Signal` is never mutated after construction; processing stages build
/// new signals (see [`Signal::with_amplitudes`]) so the raw recording stays
/// available for plotting next to the processed one.
#[derive(Debug, Clone)]
pub struct Signal {
    /// Unique identifier used to correlate log lines
    id: Uuid,
    /// Where the samples came from, if known
    source: Option<String>,
    samples: Vec<Sample>,
}

impl Signal {
    /// Create a signal from samples
    pub fn new(samples: Vec<Sample>) -> EmgResult<Self> {
        if samples.is_empty() {
            return Err(EmgError::InsufficientData {
                operation: "signal construction",
                required: 1,
                available: 0,
            });
        }

        Ok(Signal {
            id: Uuid::new_v4(),
            source: None,
            samples,
        })
    }

    /// Create a signal from parallel timestamp and amplitude sequences
    pub fn from_parts(timestamps: &[PrecisionTimestamp], amplitudes: &[f64]) -> EmgResult<Self> {
        if timestamps.len() != amplitudes.len() {
            return Err(EmgError::InvalidParameter {
                name: "amplitudes",
                reason: format!(
                    "{} amplitudes for {} timestamps",
                    amplitudes.len(),
                    timestamps.len()
                ),
            });
        }

        let samples = timestamps
            .iter()
            .zip(amplitudes)
            .map(|(&t, &a)| Sample::new(t, a))
            .collect();
        Self::new(samples)
    }

    /// Attach a source label (usually the log file path)
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Build a new signal on the same time base with replacement amplitudes
    pub fn with_amplitudes(&self, amplitudes: Vec<f64>) -> EmgResult<Signal> {
        if amplitudes.len() != self.samples.len() {
            return Err(EmgError::InvalidParameter {
                name: "amplitudes",
                reason: format!(
                    "{} values cannot replace a signal of {} samples",
                    amplitudes.len(),
                    self.samples.len()
                ),
            });
        }

        let samples = self
            .samples
            .iter()
            .zip(amplitudes)
            .map(|(s, a)| Sample::new(s.timestamp, a))
            .collect();

        Ok(Signal {
            id: Uuid::new_v4(),
            source: self.source.clone(),
            samples,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Label for diagnostics: the source if known, otherwise the id
    pub fn label(&self) -> String {
        match &self.source {
            Some(source) => source.clone(),
            None => self.id.to_string(),
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed signal; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Amplitude sequence in acquisition order
    pub fn amplitudes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.amplitude).collect()
    }

    /// Timestamp sequence in acquisition order
    pub fn timestamps(&self) -> Vec<PrecisionTimestamp> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    pub fn first_timestamp(&self) -> PrecisionTimestamp {
        self.samples[0].timestamp
    }

    /// Get time vector for plotting, in seconds since the first sample
    pub fn time_vector(&self) -> Vec<f64> {
        let start = self.first_timestamp();
        self.samples
            .iter()
            .map(|s| s.timestamp.seconds_since(&start))
            .collect()
    }

    /// Seconds between the first and last sample
    pub fn duration(&self) -> f64 {
        let last = self.samples[self.samples.len() - 1].timestamp;
        last.seconds_since(&self.first_timestamp())
    }

    /// Seconds between the first two samples
    pub fn sampling_interval(&self) -> EmgResult<f64> {
        if self.samples.len() < 2 {
            return Err(EmgError::InsufficientData {
                operation: "sampling interval",
                required: 2,
                available: self.samples.len(),
            });
        }
        Ok(self.samples[1].timestamp.seconds_since(&self.samples[0].timestamp))
    }

    /// Check that every sample interval is within `tolerance` (relative) of the first
    pub fn is_uniformly_sampled(&self, tolerance: f64) -> bool {
        let Ok(interval) = self.sampling_interval() else {
            return true;
        };

        self.samples.windows(2).all(|w| {
            let dt = w[1].timestamp.seconds_since(&w[0].timestamp);
            (dt - interval).abs() <= tolerance * interval.abs()
        })
    }

    /// Check that timestamps never go backwards
    pub fn is_monotonic(&self) -> bool {
        self.samples.windows(2).all(|w| w[1].timestamp >= w[0].timestamp)
    }

    /// Calculate basic amplitude statistics
    pub fn stats(&self) -> SignalStats {
        SignalStats::calculate(&self.amplitudes())
    }
}

/// Basic statistics for a signal's amplitudes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl SignalStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;

        let sum_sq: f64 = data.iter().map(|x| x * x).sum();
        let rms = (sum_sq / n).sqrt();

        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        Self {
            mean,
            rms,
            std_dev,
            min,
            max,
            peak_to_peak: max - min,
        }
    }
}
