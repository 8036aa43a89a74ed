//! Exports plots as CSV files, one per plot

use emg_core::{EmgError, EmgResult};
use emg_processing::{PlotSeries, Renderer};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes `<output_dir>/<slug>.csv` for every rendered plot
pub struct CsvRenderer {
    output_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl CsvRenderer {
    /// Create the renderer, creating `output_dir` if needed
    pub fn new(output_dir: impl Into<PathBuf>) -> EmgResult<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|e| EmgError::io(&output_dir, &e))?;

        Ok(CsvRenderer {
            output_dir,
            written: Vec::new(),
        })
    }

    /// Files written so far, in render order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn csv_error(path: &Path, err: csv::Error) -> EmgError {
        EmgError::IoError {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl Renderer for CsvRenderer {
    fn render(&mut self, plot: &PlotSeries) -> EmgResult<()> {
        let path = self.output_dir.join(format!("{}.csv", plot.slug()));
        let mut writer = csv::Writer::from_path(&path).map_err(|e| Self::csv_error(&path, e))?;

        writer
            .write_record([plot.x_label.as_str(), plot.y_label.as_str()])
            .map_err(|e| Self::csv_error(&path, e))?;
        for [x, y] in &plot.points {
            writer
                .write_record([x.to_string(), y.to_string()])
                .map_err(|e| Self::csv_error(&path, e))?;
        }
        writer.flush().map_err(|e| EmgError::io(&path, &e))?;

        info!(title = %plot.title, path = %path.display(), points = plot.len(), "exported plot");
        self.written.push(path);
        Ok(())
    }
}
