//! Muscle activation envelopes for synthetic recordings

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Activation level over time, nominally in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalPattern {
    /// Constant activation level
    Constant { level: f64 },
    /// Sinusoidal contraction cycles
    Sinusoidal {
        frequency: f64,
        amplitude: f64,
        baseline: f64,
    },
    /// Linear ramp that holds its end level
    Ramp {
        start_level: f64,
        end_level: f64,
        duration: f64,
    },
    /// On/off contraction bursts
    Burst {
        on_duration: f64,
        off_duration: f64,
        amplitude: f64,
    },
}

impl SignalPattern {
    /// Activation level at `time` seconds
    pub fn activation_at_time(&self, time: f64) -> f64 {
        match self {
            SignalPattern::Constant { level } => *level,

            SignalPattern::Sinusoidal { frequency, amplitude, baseline } => {
                baseline + amplitude * (2.0 * PI * frequency * time).sin()
            }

            SignalPattern::Ramp { start_level, end_level, duration } => {
                if time >= *duration {
                    *end_level
                } else {
                    start_level + (end_level - start_level) * (time / duration)
                }
            }

            SignalPattern::Burst { on_duration, off_duration, amplitude } => {
                let cycle_duration = on_duration + off_duration;
                if cycle_duration <= 0.0 {
                    return 0.0;
                }
                if time % cycle_duration < *on_duration {
                    *amplitude
                } else {
                    0.0
                }
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SignalPattern::Constant { .. } => "Constant activation",
            SignalPattern::Sinusoidal { .. } => "Sinusoidal contraction",
            SignalPattern::Ramp { .. } => "Gradual ramp",
            SignalPattern::Burst { .. } => "Burst pattern",
        }
    }

    /// Look up a named preset
    pub fn preset(name: &str) -> Option<SignalPattern> {
        Self::presets()
            .into_iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .map(|(_, pattern)| pattern)
    }

    /// Common presets, keyed by CLI-friendly name
    pub fn presets() -> Vec<(&'static str, SignalPattern)> {
        vec![
            ("rest", SignalPattern::Constant { level: 0.1 }),
            ("moderate", SignalPattern::Constant { level: 0.5 }),
            ("mvc", SignalPattern::Constant { level: 1.0 }),
            (
                "contraction",
                SignalPattern::Sinusoidal {
                    frequency: 0.5,
                    amplitude: 0.4,
                    baseline: 0.4,
                },
            ),
            (
                "warmup",
                SignalPattern::Ramp {
                    start_level: 0.1,
                    end_level: 0.8,
                    duration: 5.0,
                },
            ),
            (
                "bursts",
                SignalPattern::Burst {
                    on_duration: 1.0,
                    off_duration: 0.5,
                    amplitude: 0.8,
                },
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_holds_end_level() {
        let ramp = SignalPattern::Ramp {
            start_level: 0.0,
            end_level: 1.0,
            duration: 2.0,
        };
        assert_eq!(ramp.activation_at_time(1.0), 0.5);
        assert_eq!(ramp.activation_at_time(5.0), 1.0);
    }

    #[test]
    fn test_burst_cycle() {
        let burst = SignalPattern::Burst {
            on_duration: 1.0,
            off_duration: 1.0,
            amplitude: 0.7,
        };
        assert_eq!(burst.activation_at_time(0.5), 0.7);
        assert_eq!(burst.activation_at_time(1.5), 0.0);
        assert_eq!(burst.activation_at_time(2.5), 0.7);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(SignalPattern::preset("MVC"), Some(SignalPattern::Constant { level: 1.0 }));
        assert_eq!(SignalPattern::preset("sprint"), None);
    }
}
