//! Trailing simple moving average

use emg_core::{EmgError, EmgResult};
use std::collections::VecDeque;

/// Streaming moving average over the last `window_size` values
///
/// Produces a value only once the window is full, so the first
/// `window_size - 1` inputs yield `None`. Each mean is summed from the
/// buffered window, so it equals the direct mean of the same values.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl RollingMean {
    /// Create a new rolling mean; `window_size` must be at least 1
    pub fn new(window_size: usize) -> EmgResult<Self> {
        if window_size == 0 {
            return Err(emg_core::parameter_error!(
                "window_size",
                "must be at least 1, got {}",
                window_size
            ));
        }

        Ok(RollingMean {
            window_size,
            buffer: VecDeque::with_capacity(window_size + 1),
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Feed one value; returns the window mean once the window is full
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.buffer.push_back(value);

        // Remove oldest value once the window overflows
        if self.buffer.len() > self.window_size {
            self.buffer.pop_front();
        }

        if self.buffer.len() == self.window_size {
            let sum: f64 = self.buffer.iter().sum();
            Some(sum / self.window_size as f64)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// Moving averages of every full window in `values`
///
/// Element `i` of the result is the mean of `values[i..i + window_size]`,
/// so the result has `values.len() - window_size + 1` entries.
pub fn rolling_mean(values: &[f64], window_size: usize) -> EmgResult<Vec<f64>> {
    let mut rolling = RollingMean::new(window_size)?;

    if values.len() < window_size {
        return Err(EmgError::InsufficientData {
            operation: "rolling mean",
            required: window_size,
            available: values.len(),
        });
    }

    Ok(values.iter().filter_map(|&v| rolling.push(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean_defined_windows() {
        let values: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let means = rolling_mean(&values, 3).unwrap();
        assert_eq!(means, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_window_equal_to_length() {
        let means = rolling_mean(&[2.0, 4.0, 6.0, 8.0], 4).unwrap();
        assert_eq!(means, vec![5.0]);
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let values = [3.0, -1.0, 7.5];
        assert_eq!(rolling_mean(&values, 1).unwrap(), values.to_vec());
    }

    #[test]
    fn test_invalid_window() {
        assert!(matches!(
            rolling_mean(&[1.0], 0),
            Err(EmgError::InvalidParameter { name: "window_size", .. })
        ));
        assert!(matches!(
            rolling_mean(&[1.0, 2.0], 3),
            Err(EmgError::InsufficientData { required: 3, available: 2, .. })
        ));
    }

    #[test]
    fn test_streaming_reset() {
        let mut rolling = RollingMean::new(2).unwrap();
        assert_eq!(rolling.push(1.0), None);
        assert_eq!(rolling.push(3.0), Some(2.0));
        assert_eq!(rolling.push(5.0), Some(4.0));

        rolling.reset();
        assert_eq!(rolling.push(10.0), None);
    }

    #[test]
    fn test_large_value_leaving_window() {
        let means = rolling_mean(&[-1e17, 3.0, 3.0, 3.0], 1).unwrap();
        assert_eq!(means, vec![-1e17, 3.0, 3.0, 3.0]);

        let means = rolling_mean(&[1e17, 3.0, 5.0, 3.0, 5.0], 2).unwrap();
        assert_eq!(&means[1..], &[4.0, 4.0, 4.0]);
    }
}
