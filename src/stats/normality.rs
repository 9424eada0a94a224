use crate::error::{PropstatError, Result};
use crate::stats::math::{kolmogorov_tail, normal_cdf, normal_quantile};
use serde::Serialize;

/// Normal distribution fitted by method of moments (maximum likelihood):
/// sample mean and population standard deviation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NormalFit {
    pub mean: f64,
    pub std: f64,
}

impl NormalFit {
    pub fn fit(values: &[f64]) -> Result<NormalFit> {
        if values.is_empty() {
            return Err(PropstatError::Computation(
                "cannot fit a distribution to an empty sample".to_string(),
            ));
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Ok(NormalFit {
            mean,
            std: var.sqrt(),
        })
    }

    pub fn cdf(&self, x: f64) -> f64 {
        normal_cdf((x - self.mean) / self.std)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        crate::stats::math::normal_pdf((x - self.mean) / self.std) / self.std
    }
}

/// Statistic and p-value of a single hypothesis test.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
}

/// Normal fit plus the two normality tests run against it.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionAnalysis {
    pub fit: NormalFit,
    pub shapiro_wilk: TestResult,
    pub kolmogorov_smirnov: TestResult,
}

/// Fits a normal distribution to the sample and tests normality with
/// Shapiro-Wilk and Kolmogorov-Smirnov.
pub fn analyze_distribution(values: &[f64]) -> Result<DistributionAnalysis> {
    let fit = NormalFit::fit(values)?;
    Ok(DistributionAnalysis {
        fit,
        shapiro_wilk: shapiro_wilk(values)?,
        kolmogorov_smirnov: kolmogorov_smirnov(values, fit)?,
    })
}

/// Shapiro-Wilk W test, Royston's AS R94 approximation (3 <= n <= 5000).
pub fn shapiro_wilk(values: &[f64]) -> Result<TestResult> {
    let n = values.len();
    if !(3..=5000).contains(&n) {
        return Err(PropstatError::Computation(format!(
            "Shapiro-Wilk requires between 3 and 5000 observations, got {}",
            n
        )));
    }

    let mut x = values.to_vec();
    x.sort_by(|a, b| a.total_cmp(b));
    if x[n - 1] - x[0] <= 0.0 {
        return Err(PropstatError::Computation(
            "Shapiro-Wilk is undefined for a zero-range sample".to_string(),
        ));
    }

    let nf = n as f64;

    // Expected normal order statistics, Blom approximation.
    let m: Vec<f64> = (1..=n)
        .map(|i| normal_quantile((i as f64 - 0.375) / (nf + 0.25)))
        .collect();
    let ssm: f64 = m.iter().map(|v| v * v).sum();

    // Weights: normalized order statistics with Royston's polynomial
    // corrections to the one or two extreme coefficients.
    let mut a = vec![0.0; n];
    if n == 3 {
        a[2] = std::f64::consts::FRAC_1_SQRT_2;
        a[0] = -a[2];
    } else {
        let rsn = 1.0 / nf.sqrt();
        let c_n = m[n - 1] / ssm.sqrt();
        let a_n = c_n + 0.221157 * rsn - 0.147981 * rsn.powi(2) - 2.071190 * rsn.powi(3)
            + 4.434685 * rsn.powi(4)
            - 2.706056 * rsn.powi(5);

        let phi;
        if n > 5 {
            let c_n1 = m[n - 2] / ssm.sqrt();
            let a_n1 = c_n1 + 0.042981 * rsn - 0.293762 * rsn.powi(2) - 1.752461 * rsn.powi(3)
                + 5.682633 * rsn.powi(4)
                - 3.582633 * rsn.powi(5);
            phi = (ssm - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
                / (1.0 - 2.0 * a_n.powi(2) - 2.0 * a_n1.powi(2));
            a[n - 1] = a_n;
            a[n - 2] = a_n1;
            a[0] = -a_n;
            a[1] = -a_n1;
            for i in 2..n - 2 {
                a[i] = m[i] / phi.sqrt();
            }
        } else {
            phi = (ssm - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * a_n.powi(2));
            a[n - 1] = a_n;
            a[0] = -a_n;
            for i in 1..n - 1 {
                a[i] = m[i] / phi.sqrt();
            }
        }
    }

    let mean = x.iter().sum::<f64>() / nf;
    let numerator: f64 = a.iter().zip(&x).map(|(ai, xi)| ai * xi).sum::<f64>().powi(2);
    let denominator: f64 = x.iter().map(|xi| (xi - mean).powi(2)).sum();
    let w = (numerator / denominator).min(1.0);

    let p_value = shapiro_p_value(w, n).clamp(0.0, 1.0);
    Ok(TestResult {
        statistic: w,
        p_value,
    })
}

// Royston's normalizing transforms for W.
fn shapiro_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    if n == 3 {
        let p = 6.0 / std::f64::consts::PI
            * ((w.sqrt()).asin() - (0.75_f64).sqrt().asin());
        return p.max(0.0);
    }
    let z = if n <= 11 {
        let gamma = -2.273 + 0.459 * nf;
        let transformed = -(gamma - (1.0 - w).ln()).ln();
        let mu = 0.5440 - 0.39978 * nf + 0.025054 * nf.powi(2) - 0.0006714 * nf.powi(3);
        let sigma =
            (1.3822 - 0.77857 * nf + 0.062767 * nf.powi(2) - 0.0020322 * nf.powi(3)).exp();
        (transformed - mu) / sigma
    } else {
        let u = nf.ln();
        let transformed = (1.0 - w).ln();
        let mu = -1.5861 - 0.31082 * u - 0.083751 * u.powi(2) + 0.0038915 * u.powi(3);
        let sigma = (-0.4803 - 0.082676 * u + 0.0030302 * u.powi(2)).exp();
        (transformed - mu) / sigma
    };
    1.0 - normal_cdf(z)
}

/// One-sample Kolmogorov-Smirnov test against a fitted normal.
pub fn kolmogorov_smirnov(values: &[f64], fit: NormalFit) -> Result<TestResult> {
    if values.is_empty() {
        return Err(PropstatError::Computation(
            "Kolmogorov-Smirnov requires a non-empty sample".to_string(),
        ));
    }
    if fit.std <= 0.0 {
        return Err(PropstatError::Computation(
            "Kolmogorov-Smirnov is undefined for a zero-variance fit".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len() as f64;

    let mut d: f64 = 0.0;
    for (i, x) in sorted.iter().enumerate() {
        let theoretical = fit.cdf(*x);
        let above = (i + 1) as f64 / n - theoretical;
        let below = theoretical - i as f64 / n;
        d = d.max(above.max(below));
    }

    let lambda = (n.sqrt() + 0.12 + 0.11 / n.sqrt()) * d;
    Ok(TestResult {
        statistic: d,
        p_value: kolmogorov_tail(lambda),
    })
}
