//! Synthetic EMG recordings in the signal log time base

use crate::signal_patterns::SignalPattern;
use emg_core::{EmgError, EmgResult, PrecisionTimestamp, Sample, Signal};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// 2024-01-01 12:00:00 UTC
const DEFAULT_START_MICROS: i64 = 1_704_110_400_000_000;

/// Configuration for synthetic recordings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Recording length in seconds
    pub duration: f64,
    /// Activation envelope
    pub pattern: SignalPattern,
    /// Dominant motor-unit firing frequency in Hz
    pub carrier_frequency: f64,
    /// Amplitude at full activation
    pub peak_amplitude: f64,
    /// Gaussian noise standard deviation (0.0 = no noise)
    pub noise_std: f64,
    /// Power line interference frequency, if any
    pub powerline_freq: Option<f64>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Timestamp of the first sample
    pub start: Option<PrecisionTimestamp>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 1000.0,
            duration: 5.0,
            pattern: SignalPattern::Sinusoidal {
                frequency: 0.5,
                amplitude: 0.4,
                baseline: 0.4,
            },
            carrier_frequency: 80.0,
            peak_amplitude: 1.0,
            noise_std: 0.02,
            powerline_freq: Some(50.0),
            seed: None,
            start: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> EmgResult<()> {
        if !self.sampling_rate.is_finite() || self.sampling_rate <= 0.0 {
            return Err(EmgError::InvalidParameter {
                name: "sampling_rate",
                reason: format!("must be positive, got {}", self.sampling_rate),
            });
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(EmgError::InvalidParameter {
                name: "duration",
                reason: format!("must be positive, got {}", self.duration),
            });
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(EmgError::InvalidParameter {
                name: "noise_std",
                reason: format!("must be non-negative, got {}", self.noise_std),
            });
        }
        Ok(())
    }

    /// Number of samples the configuration produces
    pub fn sample_count(&self) -> usize {
        (self.duration * self.sampling_rate).round() as usize
    }
}

/// Generates synthetic EMG signals
pub struct LogGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    normal_dist: Normal<f64>,
}

impl LogGenerator {
    /// Create a generator with a validated configuration
    pub fn new(config: GeneratorConfig) -> EmgResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let normal_dist =
            Normal::new(0.0, config.noise_std).map_err(|e| EmgError::InvalidParameter {
                name: "noise_std",
                reason: e.to_string(),
            })?;

        Ok(LogGenerator {
            config,
            rng,
            normal_dist,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one recording
    pub fn generate(&mut self) -> EmgResult<Signal> {
        let count = self.config.sample_count();
        if count == 0 {
            return Err(EmgError::InsufficientData {
                operation: "signal generation",
                required: 1,
                available: 0,
            });
        }

        let start = match self.config.start {
            Some(start) => start,
            None => PrecisionTimestamp::from_unix_micros(DEFAULT_START_MICROS)?,
        };
        let micros_per_sample = 1_000_000.0 / self.config.sampling_rate;

        let mut samples = Vec::with_capacity(count);
        for i in 0..count {
            let timestamp = start.offset_micros((i as f64 * micros_per_sample).round() as i64)?;
            let time = i as f64 / self.config.sampling_rate;
            samples.push(Sample::new(timestamp, self.sample_at(time)));
        }

        debug!(
            samples = count,
            pattern = self.config.pattern.description(),
            "generated synthetic EMG"
        );
        Signal::new(samples)
    }

    /// Single EMG value at `time` seconds
    fn sample_at(&mut self, time: f64) -> f64 {
        let activation = self.config.pattern.activation_at_time(time).max(0.0);
        let amplitude = activation * self.config.peak_amplitude;
        let carrier = self.config.carrier_frequency;

        // Firing frequency and two harmonics
        let mut value = amplitude * (2.0 * PI * carrier * time).sin();
        value += amplitude * 0.3 * (2.0 * PI * carrier * 2.0 * time).sin();
        value += amplitude * 0.1 * (2.0 * PI * carrier * 3.0 * time).sin();

        // Random motor unit recruitment
        value += amplitude * self.rng.gen_range(-0.2..0.2);

        value += self.normal_dist.sample(&mut self.rng);

        if let Some(freq) = self.config.powerline_freq {
            value += 0.05 * self.config.peak_amplitude * (2.0 * PI * freq * time).sin();
        }

        value
    }
}
