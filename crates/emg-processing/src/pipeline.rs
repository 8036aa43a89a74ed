//! End-to-end normalization pipeline
//!
//! Load → MVC extraction → normalize/rectify → spectrum → render. Every
//! stage runs to completion before any plot is rendered, so a failure
//! anywhere leaves the renderer untouched.

use crate::config::PipelineConfig;
use crate::mvc::{MvcExtractor, MvcReference};
use crate::normalize::{normalize_to_mvc, NormalizedSignal};
use crate::render::{PlotSeries, Renderer};
use crate::spectrum::{Spectrum, SpectrumAnalyzer};
use emg_core::{load_signal, EmgError, Signal};
use core::fmt;
use tracing::{info, warn};

pub const RAW_TIME_TITLE: &str = "Raw EMG Signal in Time Domain";
pub const PROCESSED_TIME_TITLE: &str = "Processed EMG Signal in Time Domain";
pub const PROCESSED_FREQUENCY_TITLE: &str = "Processed EMG Signal in Frequency Domain - Without DC";

/// Pipeline stage, used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Configuration,
    LoadMain,
    LoadCalibration,
    MvcExtraction,
    Normalization,
    SpectrumAnalysis,
    Rendering,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Configuration => "configuration",
            PipelineStage::LoadMain => "loading main signal",
            PipelineStage::LoadCalibration => "loading calibration signal",
            PipelineStage::MvcExtraction => "MVC extraction",
            PipelineStage::Normalization => "normalization",
            PipelineStage::SpectrumAnalysis => "spectrum analysis",
            PipelineStage::Rendering => "rendering",
        };
        write!(f, "{}", name)
    }
}

/// Error raised by a pipeline run, tagged with the stage that failed
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineError {
    pub stage: PipelineStage,
    pub error: EmgError,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Tags a stage result with its stage
trait StageContext<T> {
    fn stage(self, stage: PipelineStage) -> Result<T, PipelineError>;
}

impl<T> StageContext<T> for Result<T, EmgError> {
    fn stage(self, stage: PipelineStage) -> Result<T, PipelineError> {
        self.map_err(|error| PipelineError { stage, error })
    }
}

/// Everything a successful run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub raw: Signal,
    pub mvc: MvcReference,
    pub normalized: NormalizedSignal,
    pub spectrum: Spectrum,
}

impl PipelineOutput {
    /// The three plots in display order
    pub fn plots(&self) -> [PlotSeries; 3] {
        [
            PlotSeries::time_domain(RAW_TIME_TITLE, &self.raw),
            PlotSeries::time_domain(PROCESSED_TIME_TITLE, self.normalized.signal()),
            PlotSeries::frequency_domain(PROCESSED_FREQUENCY_TITLE, &self.spectrum),
        ]
    }
}

/// Orchestrates one normalization run
pub struct EmgPipeline {
    config: PipelineConfig,
    extractor: MvcExtractor,
    analyzer: SpectrumAnalyzer,
}

impl EmgPipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().stage(PipelineStage::Configuration)?;

        let extractor = MvcExtractor::new(config.window_size)
            .and_then(|e| e.with_calibration_offset(config.calibration_offset))
            .stage(PipelineStage::Configuration)?;

        if config.calibration_offset != 0.0 {
            warn!(
                offset = config.calibration_offset,
                "applying calibration offset to MVC recording"
            );
        }

        Ok(EmgPipeline {
            config,
            extractor,
            analyzer: SpectrumAnalyzer::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load both logs named in the configuration and process them
    pub fn process(&mut self) -> Result<PipelineOutput, PipelineError> {
        info!(path = %self.config.main_file.display(), "loading main signal");
        let raw = load_signal(&self.config.main_file).stage(PipelineStage::LoadMain)?;

        info!(path = %self.config.calibration_file.display(), "loading calibration signal");
        let calibration =
            load_signal(&self.config.calibration_file).stage(PipelineStage::LoadCalibration)?;

        self.process_signals(raw, &calibration)
    }

    /// Process already-loaded signals
    pub fn process_signals(
        &mut self,
        raw: Signal,
        calibration: &Signal,
    ) -> Result<PipelineOutput, PipelineError> {
        let mvc = self
            .extractor
            .extract(calibration)
            .stage(PipelineStage::MvcExtraction)?;
        info!(
            mvc = mvc.value,
            window_size = mvc.window_size,
            windows = mvc.window_count,
            "MVC reference"
        );

        let normalized = normalize_to_mvc(&raw, &mvc).stage(PipelineStage::Normalization)?;
        let above_unit = normalized.above_unit_count();
        if above_unit > 0 {
            warn!(
                count = above_unit,
                "normalized values exceed 1.0; raw signal dips below -MVC"
            );
        }
        info!(samples = normalized.len(), "normalized and rectified signal");

        let spectrum = self
            .analyzer
            .to_spectrum(normalized.signal())
            .stage(PipelineStage::SpectrumAnalysis)?;
        info!(
            bins = spectrum.len(),
            bin_width = spectrum.bin_width(),
            median_frequency = spectrum.median_frequency().unwrap_or(0.0),
            mean_frequency = spectrum.mean_frequency().unwrap_or(0.0),
            "spectrum"
        );

        Ok(PipelineOutput {
            raw,
            mvc,
            normalized,
            spectrum,
        })
    }

    /// Render the three plots of a finished run
    pub fn render(
        output: &PipelineOutput,
        renderer: &mut dyn Renderer,
    ) -> Result<(), PipelineError> {
        for plot in output.plots() {
            renderer.render(&plot).stage(PipelineStage::Rendering)?;
        }
        Ok(())
    }

    /// Load, process and render in one call
    pub fn run(&mut self, renderer: &mut dyn Renderer) -> Result<PipelineOutput, PipelineError> {
        let output = self.process()?;
        Self::render(&output, renderer)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemoryRenderer;
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

    #[test]
    fn test_process_signals() {
        let calibration = signal_from(&(0..=10).map(|i| i as f64).collect::<Vec<_>>());
        let raw = signal_from(&[9.0, -18.0, 4.5, 0.0, 27.0]);

        let config = PipelineConfig::new("unused", "unused").with_window_size(3);
        let mut pipeline = EmgPipeline::new(config).unwrap();
        let output = pipeline.process_signals(raw, &calibration).unwrap();

        assert_eq!(output.mvc.value, 9.0);
        assert_eq!(output.normalized.values(), vec![1.0, 2.0, 0.5, 0.0, 1.0]);
        assert_eq!(output.spectrum.len(), 5 / 2 - 1);

        let mut renderer = MemoryRenderer::new();
        EmgPipeline::render(&output, &mut renderer).unwrap();
        assert_eq!(
            renderer.titles(),
            vec![RAW_TIME_TITLE, PROCESSED_TIME_TITLE, PROCESSED_FREQUENCY_TITLE]
        );
    }

    #[test]
    fn test_stage_attribution() {
        let calibration = signal_from(&[1.0, 2.0]);
        let raw = signal_from(&[1.0, 2.0, 3.0]);

        let mut pipeline = EmgPipeline::new(PipelineConfig::new("a", "b")).unwrap();
        let err = pipeline.process_signals(raw, &calibration).unwrap_err();

        assert_eq!(err.stage, PipelineStage::MvcExtraction);
        assert!(matches!(err.error, EmgError::InsufficientData { .. }));
        assert!(err.to_string().starts_with("MVC extraction failed"));
    }

    #[test]
    fn test_non_positive_mvc_rejected() {
        let calibration = signal_from(&[0.0, 0.0, 0.0]);
        let raw = signal_from(&[1.0, 2.0]);

        let config = PipelineConfig::new("a", "b").with_window_size(2);
        let mut pipeline = EmgPipeline::new(config).unwrap();
        let err = pipeline.process_signals(raw, &calibration).unwrap_err();

        assert_eq!(err.stage, PipelineStage::Normalization);
        assert!(matches!(err.error, EmgError::DivisionError { .. }));
    }

    #[test]
    fn test_invalid_config() {
        let err = EmgPipeline::new(PipelineConfig::new("a", "b").with_window_size(0))
            .err()
            .unwrap();
        assert_eq!(err.stage, PipelineStage::Configuration);
    }
}
