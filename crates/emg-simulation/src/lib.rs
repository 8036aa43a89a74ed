//! EMG-Simulation: synthetic EMG recordings
//!
//! Generates signals in the log time base for demos, fixtures and benchmarks.

pub mod log_generator;
pub mod signal_patterns;

pub use log_generator::*;
pub use signal_patterns::*;
