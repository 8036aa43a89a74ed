//! Subcommand implementations

use crate::csv_renderer::CsvRenderer;
use anyhow::{bail, Context, Result};
use emg_core::{write_signal, PrecisionTimestamp};
use emg_processing::{EmgPipeline, LogRenderer, PipelineConfig};
use emg_simulation::{GeneratorConfig, LogGenerator, SignalPattern};
use std::path::PathBuf;
use tracing::info;

/// Options for `process`
#[derive(Debug, clap::Args)]
pub struct ProcessArgs {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Raw EMG log
    #[arg(short, long)]
    pub main: Option<PathBuf>,

    /// MVC calibration log
    #[arg(short, long)]
    pub calibration: Option<PathBuf>,

    /// Samples per MVC averaging window [default: 10]
    #[arg(short, long)]
    pub window_size: Option<usize>,

    /// Constant added to calibration amplitudes before MVC extraction
    #[arg(long, allow_hyphen_values = true)]
    pub calibration_offset: Option<f64>,

    /// Export plots as CSV into this directory instead of logging summaries
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

impl ProcessArgs {
    /// Merge the optional config file with command line flags
    pub fn resolve(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => {
                let (Some(main), Some(calibration)) = (&self.main, &self.calibration) else {
                    bail!("--main and --calibration are required when no --config is given");
                };
                PipelineConfig::new(main, calibration)
            }
        };

        if let Some(main) = &self.main {
            config.main_file = main.clone();
        }
        if let Some(calibration) = &self.calibration {
            config.calibration_file = calibration.clone();
        }
        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
        }
        if let Some(offset) = self.calibration_offset {
            config.calibration_offset = offset;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }

        Ok(config)
    }
}

/// Options for `generate`
#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Log file to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Recording length in seconds
    #[arg(short, long, default_value = "5.0")]
    pub duration: f64,

    /// Sampling rate in Hz
    #[arg(short = 'r', long, default_value = "1000.0")]
    pub sampling_rate: f64,

    /// Activation pattern preset (rest, moderate, mvc, contraction, warmup, bursts)
    #[arg(short, long, default_value = "contraction")]
    pub pattern: String,

    /// Amplitude at full activation
    #[arg(long, default_value = "1.0")]
    pub peak_amplitude: f64,

    /// Gaussian noise standard deviation
    #[arg(long, default_value = "0.02")]
    pub noise: f64,

    /// Disable 50 Hz power line interference
    #[arg(long)]
    pub no_powerline: bool,

    /// Random seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// First timestamp, e.g. "2024-01-01 12:00:00.000000"
    #[arg(long)]
    pub start: Option<String>,
}

impl GenerateArgs {
    pub fn to_config(&self) -> Result<GeneratorConfig> {
        let Some(pattern) = SignalPattern::preset(&self.pattern) else {
            let names: Vec<&str> = SignalPattern::presets().iter().map(|(n, _)| *n).collect();
            bail!("unknown pattern '{}', expected one of: {}", self.pattern, names.join(", "));
        };

        let start = match &self.start {
            Some(text) => Some(
                text.parse::<PrecisionTimestamp>()
                    .with_context(|| format!("invalid start timestamp '{}'", text))?,
            ),
            None => None,
        };

        Ok(GeneratorConfig {
            sampling_rate: self.sampling_rate,
            duration: self.duration,
            pattern,
            peak_amplitude: self.peak_amplitude,
            noise_std: self.noise,
            powerline_freq: if self.no_powerline { None } else { Some(50.0) },
            seed: self.seed,
            start,
            ..GeneratorConfig::default()
        })
    }
}

/// Run the normalization pipeline and render its plots
pub fn process(args: &ProcessArgs) -> Result<()> {
    let config = args.resolve()?;
    info!(
        main = %config.main_file.display(),
        calibration = %config.calibration_file.display(),
        window_size = config.window_size,
        "starting EMG normalization"
    );

    let mut pipeline = EmgPipeline::new(config.clone())?;
    let output = pipeline.process()?;

    match &config.output_dir {
        Some(dir) => {
            let mut renderer = CsvRenderer::new(dir)?;
            EmgPipeline::render(&output, &mut renderer)?;
            for path in renderer.written() {
                println!("wrote {}", path.display());
            }
        }
        None => EmgPipeline::render(&output, &mut LogRenderer)?,
    }

    println!(
        "MVC {:.6} (window {}), {} samples normalized, {} spectrum bins",
        output.mvc.value,
        output.mvc.window_size,
        output.normalized.len(),
        output.spectrum.len()
    );
    Ok(())
}

/// Write a synthetic EMG log
pub fn generate(args: &GenerateArgs) -> Result<()> {
    let config = args.to_config()?;
    let mut generator = LogGenerator::new(config)?;
    let signal = generator.generate()?;

    write_signal(&args.output, &signal)?;
    println!("wrote {} samples to {}", signal.len(), args.output.display());
    Ok(())
}
