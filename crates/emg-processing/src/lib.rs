//! EMG-Processing: MVC normalization and spectral analysis
//!
//! Rolling-average MVC extraction, normalization with rectification, the
//! one-sided amplitude spectrum and the pipeline that ties them together.

pub mod config;
pub mod mvc;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod rolling;
pub mod spectrum;

pub use config::PipelineConfig;
pub use mvc::{extract_mvc, MvcExtractor, MvcReference, DEFAULT_WINDOW_SIZE};
pub use normalize::{
    normalize_rectify, normalize_rectify_values, normalize_to_mvc, NormalizedSignal,
};
pub use pipeline::{EmgPipeline, PipelineError, PipelineOutput, PipelineStage};
pub use render::{LogRenderer, MemoryRenderer, PlotSeries, Renderer};
pub use rolling::{rolling_mean, RollingMean};
pub use spectrum::{Spectrum, SpectrumAnalyzer, SpectrumBin};
