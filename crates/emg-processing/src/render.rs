//! Plot descriptions and the renderer seam
//!
//! The pipeline only builds [`PlotSeries`] values; how they are shown or
//! exported is up to the [`Renderer`] it is handed.

use crate::spectrum::Spectrum;
use emg_core::{EmgResult, Signal};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Titled 2-D line series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<[f64; 2]>,
}

impl PlotSeries {
    /// Amplitude against seconds since the first sample
    pub fn time_domain(title: &str, signal: &Signal) -> Self {
        let points = signal
            .time_vector()
            .into_iter()
            .zip(signal.amplitudes())
            .map(|(t, a)| [t, a])
            .collect();

        PlotSeries {
            title: title.to_string(),
            x_label: "Time (s)".to_string(),
            y_label: "Amplitude".to_string(),
            points,
        }
    }

    /// Amplitude against frequency
    pub fn frequency_domain(title: &str, spectrum: &Spectrum) -> Self {
        let points = spectrum
            .bins()
            .iter()
            .map(|b| [b.frequency, b.amplitude])
            .collect();

        PlotSeries {
            title: title.to_string(),
            x_label: "Frequency (Hz)".to_string(),
            y_label: "Amplitude".to_string(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// (min, max) of the x values
    pub fn x_range(&self) -> Option<(f64, f64)> {
        range(self.points.iter().map(|p| p[0]))
    }

    /// (min, max) of the y values
    pub fn y_range(&self) -> Option<(f64, f64)> {
        range(self.points.iter().map(|p| p[1]))
    }

    /// Point with the largest y value
    pub fn peak(&self) -> Option<[f64; 2]> {
        self.points
            .iter()
            .copied()
            .fold(None, |best: Option<[f64; 2]>, p| match best {
                Some(b) if b[1] >= p[1] => Some(b),
                _ => Some(p),
            })
    }

    /// File-name friendly form of the title
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        for c in self.title.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        slug.trim_matches('_').to_string()
    }
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Destination for plots produced by the pipeline
pub trait Renderer {
    /// Show or export one plot
    fn render(&mut self, plot: &PlotSeries) -> EmgResult<()>;
}

/// Writes a one-line summary of each plot to the log
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, plot: &PlotSeries) -> EmgResult<()> {
        let (x_min, x_max) = plot.x_range().unwrap_or((0.0, 0.0));
        let (y_min, y_max) = plot.y_range().unwrap_or((0.0, 0.0));
        let [peak_x, peak_y] = plot.peak().unwrap_or([0.0, 0.0]);

        info!(
            title = %plot.title,
            points = plot.len(),
            x_label = %plot.x_label,
            x_min,
            x_max,
            y_min,
            y_max,
            peak_x,
            peak_y,
            "plot"
        );
        Ok(())
    }
}

/// Keeps rendered plots in memory
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    pub plots: Vec<PlotSeries>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.plots.iter().map(|p| p.title.as_str()).collect()
    }
}

impl Renderer for MemoryRenderer {
    fn render(&mut self, plot: &PlotSeries) -> EmgResult<()> {
        self.plots.push(plot.clone());
        Ok(())
    }
}
