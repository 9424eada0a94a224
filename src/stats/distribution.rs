use crate::error::{PropstatError, Result};
use crate::stats::normality::NormalFit;
use serde::Serialize;

/// Equal-width histogram bins, chart-ready.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// bin edges, one more than counts
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Bins a sample into `bins` equal-width buckets.
pub fn histogram(values: &[f64], bins: usize) -> Result<Histogram> {
    if values.is_empty() || bins == 0 {
        return Err(PropstatError::Computation(
            "histogram requires a non-empty sample and at least one bin".to_string(),
        ));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min {
        (max - min) / bins as f64
    } else {
        1.0
    };

    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in values {
        let mut idx = ((v - min) / width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }

    Ok(Histogram { edges, counts })
}

/// Empirical CDF points: each sorted observation with its cumulative
/// probability i / n.
pub fn ecdf(values: &[f64]) -> Vec<(f64, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, x)| (x, (i + 1) as f64 / n))
        .collect()
}

/// Samples the fitted normal density over [min, max], for overlaying on a
/// histogram.
pub fn normal_curve(fit: NormalFit, min: f64, max: f64, points: usize) -> Vec<(f64, f64)> {
    if points < 2 || max <= min {
        return Vec::new();
    }
    let step = (max - min) / (points - 1) as f64;
    (0..points)
        .map(|i| {
            let x = min + step * i as f64;
            (x, fit.pdf(x))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value_once() {
        let values = [1.0, 2.0, 2.5, 3.0, 9.0, 10.0];
        let hist = histogram(&values, 3).expect("histogram");
        assert_eq!(hist.edges.len(), 4);
        assert_eq!(hist.counts.iter().sum::<usize>(), values.len());
        // max lands in the last bin, not out of range
        assert_eq!(hist.counts[2], 2);
    }

    #[test]
    fn histogram_degenerate_sample() {
        let hist = histogram(&[4.0, 4.0, 4.0], 5).expect("histogram");
        assert_eq!(hist.counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn ecdf_reaches_one() {
        let points = ecdf(&[3.0, 1.0, 2.0]);
        assert_eq!(points[0], (1.0, 1.0 / 3.0));
        assert_eq!(points[2], (3.0, 1.0));
    }

    #[test]
    fn normal_curve_peaks_at_mean() {
        let fit = NormalFit {
            mean: 2.0,
            std: 1.0,
        };
        let curve = normal_curve(fit, -2.0, 6.0, 81);
        let peak = curve
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .expect("non-empty");
        assert!((peak.0 - 2.0).abs() < 0.11);
    }
}
