//! MVC normalization and full-wave rectification

use crate::mvc::MvcReference;
use emg_core::{EmgError, EmgResult, Signal};

/// Signal expressed as a fraction of the MVC reference, rectified
///
/// Shares the time base of the raw signal it was derived from.
#[derive(Debug, Clone)]
pub struct NormalizedSignal {
    signal: Signal,
    reference: f64,
}

impl NormalizedSignal {
    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    pub fn into_signal(self) -> Signal {
        self.signal
    }

    pub fn values(&self) -> Vec<f64> {
        self.signal.amplitudes()
    }

    /// Reference the raw amplitudes were divided by
    pub fn reference(&self) -> f64 {
        self.reference
    }

    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }

    /// Number of values above 1.0
    ///
    /// Only raw values below `-reference` can land here, because the upper
    /// clip happens before rectification.
    pub fn above_unit_count(&self) -> usize {
        self.signal
            .samples()
            .iter()
            .filter(|s| s.amplitude > 1.0)
            .count()
    }
}

fn check_reference(reference: f64) -> EmgResult<()> {
    if reference == 0.0 {
        return Err(EmgError::DivisionError {
            reason: "MVC reference is zero",
        });
    }
    if !reference.is_finite() || reference < 0.0 {
        return Err(EmgError::InvalidParameter {
            name: "reference",
            reason: format!("must be positive and finite, got {}", reference),
        });
    }
    Ok(())
}

/// Divide by `reference`, clip at 1.0, then take the absolute value
///
/// Values below `-reference` are not clipped and rectify to more than 1.0.
pub fn normalize_rectify_values(values: &[f64], reference: f64) -> EmgResult<Vec<f64>> {
    check_reference(reference)?;

    Ok(values
        .iter()
        .map(|&v| {
            let normalized = v / reference;
            let clipped = if normalized > 1.0 { 1.0 } else { normalized };
            clipped.abs()
        })
        .collect())
}

/// Normalize and rectify a signal against a raw reference value
pub fn normalize_rectify(signal: &Signal, reference: f64) -> EmgResult<NormalizedSignal> {
    let values = normalize_rectify_values(&signal.amplitudes(), reference)?;

    Ok(NormalizedSignal {
        signal: signal.with_amplitudes(values)?,
        reference,
    })
}

/// Normalize and rectify a signal against an extracted MVC reference
pub fn normalize_to_mvc(signal: &Signal, mvc: &MvcReference) -> EmgResult<NormalizedSignal> {
    normalize_rectify(signal, mvc.value())
}
