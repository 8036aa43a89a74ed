//! EMG-Core: foundation types for EMG log processing
//!
//! Samples, signals, timestamps, the log record format and the shared error
//! type used by every other crate in the workspace.

pub mod error;
pub mod format;
pub mod loader;
pub mod signal;
pub mod timestamp;

pub use error::{EmgError, EmgResult};
pub use loader::{load_signal, read_signal, write_signal};
pub use signal::*;
pub use timestamp::PrecisionTimestamp;
