//! One-sided amplitude spectrum of a uniformly sampled signal

use emg_core::{EmgError, EmgResult, Signal};
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Relative interval deviation above which a signal counts as non-uniform
pub const DEFAULT_UNIFORMITY_TOLERANCE: f64 = 0.01;

/// One frequency bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumBin {
    /// Bin frequency in Hz
    pub frequency: f64,
    /// Single-sided amplitude, in the units of the input signal
    pub amplitude: f64,
}

/// Positive-frequency amplitude spectrum without the DC bin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spectrum {
    bins: Vec<SpectrumBin>,
    /// Number of time-domain samples transformed
    sample_count: usize,
    /// Sampling interval in seconds
    sampling_interval: f64,
}

impl Spectrum {
    pub fn bins(&self) -> &[SpectrumBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn frequencies(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.frequency).collect()
    }

    pub fn amplitudes(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.amplitude).collect()
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn sampling_interval(&self) -> f64 {
        self.sampling_interval
    }

    /// Frequency spacing between adjacent bins in Hz
    pub fn bin_width(&self) -> f64 {
        1.0 / (self.sample_count as f64 * self.sampling_interval)
    }

    /// Highest representable frequency in Hz
    pub fn nyquist(&self) -> f64 {
        0.5 / self.sampling_interval
    }

    /// Bin with the largest amplitude
    pub fn peak(&self) -> Option<SpectrumBin> {
        self.bins
            .iter()
            .copied()
            .fold(None, |best: Option<SpectrumBin>, bin| match best {
                Some(b) if b.amplitude >= bin.amplitude => Some(b),
                _ => Some(bin),
            })
    }

    /// Power-weighted mean frequency
    pub fn mean_frequency(&self) -> Option<f64> {
        let total_power: f64 = self.bins.iter().map(|b| b.amplitude * b.amplitude).sum();
        if total_power <= 0.0 {
            return None;
        }

        let weighted: f64 = self
            .bins
            .iter()
            .map(|b| b.frequency * b.amplitude * b.amplitude)
            .sum();
        Some(weighted / total_power)
    }

    /// Frequency that splits the spectral power into two equal halves
    pub fn median_frequency(&self) -> Option<f64> {
        let total_power: f64 = self.bins.iter().map(|b| b.amplitude * b.amplitude).sum();
        if total_power <= 0.0 {
            return None;
        }

        let half_power = total_power / 2.0;
        let mut cumulative = 0.0;
        for bin in &self.bins {
            cumulative += bin.amplitude * bin.amplitude;
            if cumulative >= half_power {
                return Some(bin.frequency);
            }
        }
        self.bins.last().map(|b| b.frequency)
    }
}

/// FFT-based spectrum analyzer
///
/// Keeps its planner between calls so repeated transforms of the same length
/// reuse the same plan.
pub struct SpectrumAnalyzer {
    planner: RealFftPlanner<f64>,
    uniformity_tolerance: f64,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        SpectrumAnalyzer {
            planner: RealFftPlanner::new(),
            uniformity_tolerance: DEFAULT_UNIFORMITY_TOLERANCE,
        }
    }

    /// Relative interval deviation tolerated before warning about non-uniform sampling
    pub fn with_uniformity_tolerance(mut self, tolerance: f64) -> Self {
        self.uniformity_tolerance = tolerance;
        self
    }

    /// Compute the one-sided amplitude spectrum of `signal`
    ///
    /// The sampling interval is taken from the first two timestamps and assumed
    /// to hold for the whole signal. Bins `1..N/2` are returned with amplitude
    /// `2/N * |X_k|`; the DC bin is dropped.
    pub fn to_spectrum(&mut self, signal: &Signal) -> EmgResult<Spectrum> {
        let n = signal.len();
        if n < 2 {
            return Err(EmgError::InsufficientData {
                operation: "spectrum analysis",
                required: 2,
                available: n,
            });
        }

        let interval = signal.sampling_interval()?;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(EmgError::InvalidParameter {
                name: "sampling_interval",
                reason: format!(
                    "first two samples of {} are {} s apart; must be positive",
                    signal.label(),
                    interval
                ),
            });
        }

        if !signal.is_uniformly_sampled(self.uniformity_tolerance) {
            warn!(
                source = %signal.label(),
                interval,
                "signal is not uniformly sampled; spectrum frequencies will be inaccurate"
            );
        }

        let r2c = self.planner.plan_fft_forward(n);
        let mut input = signal.amplitudes();
        let mut output = r2c.make_output_vec();
        r2c.process(&mut input, &mut output)
            .map_err(|e| EmgError::InvalidParameter {
                name: "fft",
                reason: e.to_string(),
            })?;

        let scale = 2.0 / n as f64;
        let span = n as f64 * interval;
        let bins: Vec<SpectrumBin> = output[..n / 2]
            .iter()
            .enumerate()
            .skip(1) // DC
            .map(|(k, c)| SpectrumBin {
                frequency: k as f64 / span,
                amplitude: scale * c.norm(),
            })
            .collect();

        debug!(samples = n, interval, bins = bins.len(), "computed spectrum");

        Ok(Spectrum {
            bins,
            sample_count: n,
            sampling_interval: interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emg_core::{PrecisionTimestamp, Sample};
    use std::f64::consts::PI;
    use std::sync::{Arc, Mutex};

    fn sampled(values: &[f64], interval_micros: i64) -> Signal {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let t = PrecisionTimestamp::from_unix_micros(i as i64 * interval_micros).unwrap();
                Sample::new(t, v)
            })
            .collect();
        Signal::new(samples).unwrap()
    }

    fn stamped(micros: &[i64], values: &[f64]) -> Signal {
        let samples = micros
            .iter()
            .zip(values)
            .map(|(&us, &v)| Sample::new(PrecisionTimestamp::from_unix_micros(us).unwrap(), v))
            .collect();
        Signal::new(samples).unwrap()
    }

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn sine(frequency: f64, amplitude: f64, rate: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * frequency * i as f64 / rate).sin())
            .collect()
    }

    #[test]
    fn test_sine_peak_amplitude_and_frequency() {
        // 1 kHz sampling, 50 Hz tone lands exactly on bin 50 with N = 1000
        let signal = sampled(&sine(50.0, 2.5, 1000.0, 1000), 1_000);
        let spectrum = SpectrumAnalyzer::new().to_spectrum(&signal).unwrap();

        let peak = spectrum.peak().unwrap();
        assert!((peak.frequency - 50.0).abs() <= spectrum.bin_width());
        assert!((peak.amplitude - 2.5).abs() < 1e-9);
        assert!((spectrum.bin_width() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_off_bin_sine_within_one_bin() {
        let signal = sampled(&sine(37.3, 1.0, 500.0, 512), 2_000);
        let spectrum = SpectrumAnalyzer::new().to_spectrum(&signal).unwrap();

        let peak = spectrum.peak().unwrap();
        assert!((peak.frequency - 37.3).abs() <= spectrum.bin_width());
    }

    #[test]
    fn test_length_excludes_dc() {
        let mut analyzer = SpectrumAnalyzer::new();
        for n in [2usize, 3, 4, 5, 10, 11, 128] {
            let signal = sampled(&vec![1.0; n], 1_000);
            let spectrum = analyzer.to_spectrum(&signal).unwrap();
            assert_eq!(spectrum.len(), n / 2 - 1, "n = {}", n);
        }
    }

    #[test]
    fn test_frequency_axis() {
        let signal = sampled(&[0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0], 250_000);
        let spectrum = SpectrumAnalyzer::new().to_spectrum(&signal).unwrap();

        // N = 8, T = 0.25 s: bins at k / 2 Hz for k = 1..4
        assert_eq!(spectrum.frequencies(), vec![0.5, 1.0, 1.5]);
        assert!((spectrum.nyquist() - 2.0).abs() < 1e-12);
        let peak = spectrum.peak().unwrap();
        assert_eq!(peak.frequency, 1.0);
        assert!((peak.amplitude - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_signal_has_no_ac_content() {
        let signal = sampled(&vec![3.0; 64], 1_000);
        let spectrum = SpectrumAnalyzer::new().to_spectrum(&signal).unwrap();
        assert!(spectrum.amplitudes().iter().all(|a| a.abs() < 1e-12));
    }

    #[test]
    fn test_single_sample() {
        let err = SpectrumAnalyzer::new()
            .to_spectrum(&sampled(&[1.0], 1_000))
            .unwrap_err();
        assert!(matches!(
            err,
            EmgError::InsufficientData { required: 2, available: 1, .. }
        ));
    }

    #[test]
    fn test_duplicate_first_timestamp() {
        let err = SpectrumAnalyzer::new()
            .to_spectrum(&sampled(&[1.0, 2.0, 3.0], 0))
            .unwrap_err();
        assert!(matches!(
            err,
            EmgError::InvalidParameter { name: "sampling_interval", .. }
        ));
    }

    #[test]
    fn test_jittered_sampling_warns_but_still_transforms() {
        let micros = [0, 1_000, 2_100, 2_900, 4_000, 5_200, 6_000, 7_100, 8_050];
        let values = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0, 0.0];
        let signal = stamped(&micros, &values);
        assert!(!signal.is_uniformly_sampled(DEFAULT_UNIFORMITY_TOLERANCE));

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || {
            SpectrumAnalyzer::new().to_spectrum(&signal)
        });

        let spectrum = result.unwrap();
        assert_eq!(spectrum.len(), 9 / 2 - 1);
        // Interval comes from the first two samples only
        assert!((spectrum.sampling_interval() - 0.001).abs() < 1e-12);
        assert!((spectrum.frequencies()[0] - 1.0 / (9.0 * 0.001)).abs() < 1e-9);

        let output = logs.contents();
        assert!(output.contains("WARN"), "no warning logged: {}", output);
        assert!(output.contains("not uniformly sampled"));
    }

    #[test]
    fn test_uniform_sampling_does_not_warn() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let signal = sampled(&sine(50.0, 1.0, 1000.0, 64), 1_000);
        tracing::subscriber::with_default(subscriber, || {
            SpectrumAnalyzer::new().to_spectrum(&signal).unwrap();
        });

        assert!(!logs.contents().contains("not uniformly sampled"));
    }

    #[test]
    fn test_spectral_frequencies() {
        let signal = sampled(&sine(50.0, 1.0, 1000.0, 1000), 1_000);
        let spectrum = SpectrumAnalyzer::new().to_spectrum(&signal).unwrap();

        assert!((spectrum.mean_frequency().unwrap() - 50.0).abs() < 1e-6);
        assert_eq!(spectrum.median_frequency(), Some(50.0));
    }
}
