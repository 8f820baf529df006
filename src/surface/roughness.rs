use indexmap::IndexMap;

use crate::error::InvalidInputError;
use crate::surface::HeightMap;

pub const RA: &str = "Ra";
pub const RQ: &str = "Rq";
pub const PEAK_TO_VALLEY: &str = "Peak-to-Valley";

/// Roughness statistics of a single height map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoughnessReport {
    /// Mean absolute deviation from the mean height.
    pub ra: f64,
    /// Root-mean-square deviation from the mean height.
    pub rq: f64,
    pub peak_to_valley: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub sample_count: usize,
}

impl RoughnessReport {
    /// Headline metrics in display order.
    pub fn metrics(&self) -> IndexMap<&'static str, f64> {
        IndexMap::from([
            (RA, self.ra),
            (RQ, self.rq),
            (PEAK_TO_VALLEY, self.peak_to_valley),
        ])
    }

    pub fn format_metric(value: f64, decimals: usize, unit: &str) -> String {
        if unit.is_empty() {
            format!("{value:.decimals$}")
        } else {
            format!("{value:.decimals$} {unit}")
        }
    }
}

/// Computes Ra, Rq and the peak-to-valley range of `grid`.
pub fn analyze(grid: &HeightMap) -> Result<RoughnessReport, InvalidInputError> {
    if grid.is_empty() {
        return Err(InvalidInputError::EmptyGrid);
    }
    let cols = grid.cols().max(1);
    if let Some(index) = grid.samples().iter().position(|v| !v.is_finite()) {
        return Err(InvalidInputError::NonFiniteSample {
            row: index / cols,
            col: index % cols,
        });
    }

    let samples = grid.samples();
    let n = samples.len() as f64;
    // running mean stays finite for samples near f64::MAX
    let mean = samples
        .iter()
        .enumerate()
        .fold(0.0, |mean, (i, &v)| mean + (v - mean) / (i + 1) as f64);

    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in samples {
        let dev = v - mean;
        abs_sum += dev.abs();
        sq_sum += dev * dev;
        min = min.min(v);
        max = max.max(v);
    }

    let report = RoughnessReport {
        ra: abs_sum / n,
        rq: (sq_sum / n).sqrt(),
        peak_to_valley: max - min,
        mean,
        min,
        max,
        sample_count: samples.len(),
    };
    tracing::debug!(
        "Analyzed {} samples: Ra={:.4} Rq={:.4} PtV={:.4}",
        report.sample_count,
        report.ra,
        report.rq,
        report.peak_to_valley
    );
    Ok(report)
}
