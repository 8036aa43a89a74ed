//! Maximum Voluntary Contraction (MVC) extraction
//!
//! The MVC reference is the peak of a trailing moving average over a
//! calibration recording in which the subject contracts the muscle as hard as
//! they can. Averaging first keeps a single spike from setting the reference.

use crate::rolling::RollingMean;
use emg_core::{EmgError, EmgResult, Signal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of samples per averaging window
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Normalization reference derived from a calibration signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MvcReference {
    /// Peak rolling-average amplitude
    pub value: f64,
    /// Window size used for averaging
    pub window_size: usize,
    /// Number of defined rolling averages the peak was taken from
    pub window_count: usize,
    /// Index of the last sample of the peak window
    pub peak_index: usize,
}

impl MvcReference {
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Computes the MVC reference from calibration recordings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MvcExtractor {
    window_size: usize,
    /// Constant added to every calibration amplitude before averaging
    calibration_offset: f64,
}

impl MvcExtractor {
    /// Create an extractor; `window_size` must be at least 1
    pub fn new(window_size: usize) -> EmgResult<Self> {
        if window_size == 0 {
            return Err(emg_core::parameter_error!(
                "window_size",
                "must be at least 1, got {}",
                window_size
            ));
        }

        Ok(MvcExtractor {
            window_size,
            calibration_offset: 0.0,
        })
    }

    /// Shift calibration amplitudes by a constant sensor bias before averaging
    pub fn with_calibration_offset(mut self, offset: f64) -> EmgResult<Self> {
        if !offset.is_finite() {
            return Err(EmgError::InvalidParameter {
                name: "calibration_offset",
                reason: format!("must be finite, got {}", offset),
            });
        }
        self.calibration_offset = offset;
        Ok(self)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn calibration_offset(&self) -> f64 {
        self.calibration_offset
    }

    /// Maximum of the rolling mean over the calibration amplitudes
    pub fn extract(&self, calibration: &Signal) -> EmgResult<MvcReference> {
        if calibration.len() < self.window_size {
            return Err(EmgError::InsufficientData {
                operation: "MVC extraction",
                required: self.window_size,
                available: calibration.len(),
            });
        }

        let mut rolling = RollingMean::new(self.window_size)?;
        let mut peak: Option<(usize, f64)> = None;
        let mut window_count = 0;

        for (index, sample) in calibration.samples().iter().enumerate() {
            let Some(mean) = rolling.push(sample.amplitude + self.calibration_offset) else {
                continue;
            };
            window_count += 1;

            if !mean.is_finite() {
                continue;
            }
            match peak {
                Some((_, best)) if best >= mean => {}
                _ => peak = Some((index, mean)),
            }
        }

        let (peak_index, value) = peak.ok_or_else(|| EmgError::InvalidParameter {
            name: "calibration",
            reason: format!("{} has no finite rolling average", calibration.label()),
        })?;

        debug!(
            source = %calibration.label(),
            window_size = self.window_size,
            window_count,
            peak_index,
            mvc = value,
            "extracted MVC reference"
        );

        Ok(MvcReference {
            value,
            window_size: self.window_size,
            window_count,
            peak_index,
        })
    }
}

/// Extract the MVC reference with no calibration offset
pub fn extract_mvc(calibration: &Signal, window_size: usize) -> EmgResult<MvcReference> {
    MvcExtractor::new(window_size)?.extract(calibration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emg_core::{PrecisionTimestamp, Sample};

    fn signal_from(values: &[f64]) -> Signal {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let t = PrecisionTimestamp::from_unix_micros(i as i64 * 1_000_000).unwrap();
                Sample::new(t, v)
            })
            .collect();
        Signal::new(samples).unwrap()
    }

    fn brute_force_mvc(values: &[f64], window: usize) -> f64 {
        values
            .windows(window)
            .map(|w| w.iter().sum::<f64>() / window as f64)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    #[test]
    fn test_ramp_scenario() {
        let values: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let mvc = extract_mvc(&signal_from(&values), 3).unwrap();

        assert_eq!(mvc.value, 9.0);
        assert_eq!(mvc.window_count, 9);
        assert_eq!(mvc.peak_index, 10);
    }

    #[test]
    fn test_matches_brute_force() {
        let recordings: [&[f64]; 3] = [
            &[
                0.3, -1.2, 4.5, 2.2, -0.7, 3.3, 3.9, -2.8, 0.0, 1.1, 5.6, -4.4, 2.5, 0.9,
            ],
            &[-1e17, 3.0, 3.0, 3.0],
            &[2.5e16, 0.1, -7.0, 1e-3, 4.2, 4.2, -3e15, 0.7, 1.9, 2.0],
        ];

        for values in recordings {
            for window in 1..=values.len() {
                let mvc = extract_mvc(&signal_from(values), window).unwrap();
                let expected = brute_force_mvc(values, window);
                assert_eq!(mvc.value, expected, "window {} of {:?}", window, values);
            }
        }
    }

    #[test]
    fn test_huge_leading_sample_does_not_zero_reference() {
        let mvc = extract_mvc(&signal_from(&[-1e17, 3.0, 3.0, 3.0]), 1).unwrap();
        assert_eq!(mvc.value, 3.0);
        assert_eq!(mvc.peak_index, 1);
    }

    #[test]
    fn test_negative_signal_peak_below_samples() {
        // The peak average can sit below the largest sample when values are mixed
        let values = [-5.0, 4.0, -5.0, -5.0];
        let mvc = extract_mvc(&signal_from(&values), 2).unwrap();
        assert_eq!(mvc.value, -0.5);
        assert!(mvc.value < 4.0);
    }

    #[test]
    fn test_window_equals_length_is_mean() {
        let values = [1.0, 2.0, 3.0, 6.0];
        let mvc = extract_mvc(&signal_from(&values), 4).unwrap();
        assert_eq!(mvc.value, 3.0);
        assert_eq!(mvc.window_count, 1);
    }

    #[test]
    fn test_insufficient_data() {
        let err = extract_mvc(&signal_from(&[1.0, 2.0]), 3).unwrap_err();
        assert_eq!(
            err,
            EmgError::InsufficientData {
                operation: "MVC extraction",
                required: 3,
                available: 2,
            }
        );
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(matches!(
            extract_mvc(&signal_from(&[1.0]), 0),
            Err(EmgError::InvalidParameter { name: "window_size", .. })
        ));
    }

    #[test]
    fn test_calibration_offset() {
        let values: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let extractor = MvcExtractor::new(3)
            .unwrap()
            .with_calibration_offset(300.0)
            .unwrap();

        let mvc = extractor.extract(&signal_from(&values)).unwrap();
        assert_eq!(mvc.value, 309.0);

        assert!(MvcExtractor::new(3)
            .unwrap()
            .with_calibration_offset(f64::INFINITY)
            .is_err());
    }
}
