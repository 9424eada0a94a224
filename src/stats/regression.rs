use crate::dataset::{ListingTable, NumericColumn};
use crate::error::{PropstatError, Result};
use crate::stats::math::{f_cdf, students_t_cdf, students_t_critical};
use log::{debug, info};
use serde::Serialize;

/// One fitted term: the intercept or a feature.
#[derive(Debug, Clone, Serialize)]
pub struct RegressionTerm {
    pub name: String,
    pub coefficient: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
}

/// A point prediction with its 95% prediction interval.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Prediction {
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Ordinary least squares fit of a target on features, with an intercept.
#[derive(Debug, Clone, Serialize)]
pub struct RegressionModel {
    /// intercept first, then one term per feature in input order
    pub terms: Vec<RegressionTerm>,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_p_value: f64,
    pub residual_std_error: f64,
    pub df_residual: usize,
    pub fitted_values: Vec<f64>,
    /// 95% prediction interval per observation
    pub prediction_intervals: Vec<(f64, f64)>,
    #[serde(skip)]
    xtx_inverse: Vec<Vec<f64>>,
    #[serde(skip)]
    sigma2: f64,
    #[serde(skip)]
    t_crit_95: f64,
}

/// Fits `target = b0 + b1 f1 + ... + bk fk` by ordinary least squares.
///
/// Feature vectors must all match the target length. Collinear features
/// (a singular normal-equation system) and too-few observations are
/// computation errors.
pub fn fit_ols(target: &[f64], features: &[(String, Vec<f64>)]) -> Result<RegressionModel> {
    let n = target.len();
    let k = features.len();
    if k == 0 {
        return Err(PropstatError::Computation(
            "regression requires at least one feature".to_string(),
        ));
    }
    for (name, column) in features {
        if column.len() != n {
            return Err(PropstatError::Computation(format!(
                "feature '{}' has {} values, target has {}",
                name,
                column.len(),
                n
            )));
        }
    }
    let p = k + 1;
    if n <= p {
        return Err(PropstatError::Computation(format!(
            "regression with {} terms needs more than {} observations, got {}",
            p, p, n
        )));
    }

    info!("Fitting OLS with {} features over {} observations", k, n);

    // Design matrix rows: [1, f1_i, ..., fk_i].
    let row = |i: usize| -> Vec<f64> {
        let mut r = Vec::with_capacity(p);
        r.push(1.0);
        for (_, column) in features {
            r.push(column[i]);
        }
        r
    };

    // Normal equations: X'X b = X'y.
    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    for i in 0..n {
        let r = row(i);
        for a in 0..p {
            for b in 0..p {
                xtx[a][b] += r[a] * r[b];
            }
            xty[a] += r[a] * target[i];
        }
    }

    let xtx_inverse = invert_matrix(xtx).ok_or_else(|| {
        PropstatError::Computation(
            "normal equations are singular; features are collinear or constant".to_string(),
        )
    })?;

    let coefficients: Vec<f64> = (0..p)
        .map(|a| (0..p).map(|b| xtx_inverse[a][b] * xty[b]).sum())
        .collect();
    debug!("OLS coefficients: {:?}", coefficients);

    let fitted_values: Vec<f64> = (0..n)
        .map(|i| {
            let r = row(i);
            r.iter().zip(&coefficients).map(|(x, b)| x * b).sum()
        })
        .collect();

    let mean_y = target.iter().sum::<f64>() / n as f64;
    let sse: f64 = target
        .iter()
        .zip(&fitted_values)
        .map(|(y, f)| (y - f).powi(2))
        .sum();
    let sst: f64 = target.iter().map(|y| (y - mean_y).powi(2)).sum();
    if sst <= 0.0 {
        return Err(PropstatError::Computation(
            "target column has zero variance".to_string(),
        ));
    }

    let df_residual = n - p;
    let sigma2 = sse / df_residual as f64;
    let r_squared = 1.0 - sse / sst;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (n - 1) as f64 / df_residual as f64;

    let f_statistic = ((sst - sse) / k as f64) / (sse / df_residual as f64);
    let f_p_value = 1.0 - f_cdf(f_statistic, k as f64, df_residual as f64);

    let mut names = Vec::with_capacity(p);
    names.push("Intercept".to_string());
    names.extend(features.iter().map(|(name, _)| name.clone()));

    let terms: Vec<RegressionTerm> = names
        .into_iter()
        .enumerate()
        .map(|(j, name)| {
            let std_error = (sigma2 * xtx_inverse[j][j]).sqrt();
            let t_value = if std_error > 0.0 {
                coefficients[j] / std_error
            } else {
                f64::INFINITY
            };
            let p_value = 2.0 * (1.0 - students_t_cdf(t_value.abs(), df_residual as f64));
            RegressionTerm {
                name,
                coefficient: coefficients[j],
                std_error,
                t_value,
                p_value: p_value.clamp(0.0, 1.0),
            }
        })
        .collect();

    // 95% prediction interval per observation: t * sigma * sqrt(1 + h_ii).
    let t_crit_95 = students_t_critical(0.975, df_residual as f64);
    let sigma = sigma2.sqrt();
    let prediction_intervals: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let r = row(i);
            let leverage = quadratic_form(&r, &xtx_inverse);
            let margin = t_crit_95 * sigma * (1.0 + leverage).sqrt();
            (fitted_values[i] - margin, fitted_values[i] + margin)
        })
        .collect();

    Ok(RegressionModel {
        terms,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_p_value,
        residual_std_error: sigma,
        df_residual,
        fitted_values,
        prediction_intervals,
        xtx_inverse,
        sigma2,
        t_crit_95,
    })
}

/// Fits a regression of one table column on others.
pub fn fit_ols_columns(
    table: &ListingTable,
    target: NumericColumn,
    features: &[NumericColumn],
) -> Result<RegressionModel> {
    let feature_columns: Vec<(String, Vec<f64>)> = features
        .iter()
        .map(|&c| (c.as_str().to_string(), table.column(c)))
        .collect();
    fit_ols(&table.column(target), &feature_columns)
}

impl RegressionModel {
    /// Predicts the target for a new observation, with its 95% prediction
    /// interval. Feature values must be in fitting order.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction> {
        if features.len() + 1 != self.terms.len() {
            return Err(PropstatError::Computation(format!(
                "expected {} feature values, got {}",
                self.terms.len() - 1,
                features.len()
            )));
        }
        let mut r = Vec::with_capacity(self.terms.len());
        r.push(1.0);
        r.extend_from_slice(features);

        let value: f64 = r
            .iter()
            .zip(self.terms.iter())
            .map(|(x, term)| x * term.coefficient)
            .sum();
        let leverage = quadratic_form(&r, &self.xtx_inverse);
        let margin = self.t_crit_95 * self.sigma2.sqrt() * (1.0 + leverage).sqrt();

        Ok(Prediction {
            value,
            lower: value - margin,
            upper: value + margin,
        })
    }
}

// x' A x for symmetric A.
fn quadratic_form(x: &[f64], a: &[Vec<f64>]) -> f64 {
    let mut total = 0.0;
    for (i, xi) in x.iter().enumerate() {
        for (j, xj) in x.iter().enumerate() {
            total += xi * a[i][j] * xj;
        }
    }
    total
}

// Gauss-Jordan inversion with partial pivoting. None on a singular matrix.
fn invert_matrix(mut m: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let n = m.len();
    let scale: f64 = m
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()))
        .max(1.0);

    let mut inv: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot_row][col].abs() < 1.0e-12 * scale {
            return None;
        }
        m.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = m[col][col];
        for j in 0..n {
            m[col][j] /= pivot;
            inv[col][j] /= pivot;
        }
        for i in 0..n {
            if i == col {
                continue;
            }
            let factor = m[i][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                m[i][j] -= factor * m[col][j];
                inv[i][j] -= factor * inv[col][j];
            }
        }
    }

    Some(inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(name: &str, values: Vec<f64>) -> (String, Vec<f64>) {
        (name.to_string(), values)
    }

    #[test]
    fn recovers_known_line() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();

        let model = fit_ols(&y, &[feature("x", x)]).expect("fit");
        assert!((model.terms[0].coefficient - 3.0).abs() < 1e-6);
        assert!((model.terms[1].coefficient - 2.0).abs() < 1e-6);
        assert!(model.r_squared > 0.999_999);
        assert!(model.terms[1].p_value < 1e-6);
    }

    #[test]
    fn multiple_features() {
        // y = 1 + 2a - 3b over a small grid
        let mut a = Vec::new();
        let mut b = Vec::new();
        let mut y = Vec::new();
        for i in 0..6 {
            for j in 0..6 {
                a.push(i as f64);
                b.push(j as f64);
                y.push(1.0 + 2.0 * i as f64 - 3.0 * j as f64);
            }
        }
        let model = fit_ols(&y, &[feature("a", a), feature("b", b)]).expect("fit");
        assert!((model.terms[0].coefficient - 1.0).abs() < 1e-8);
        assert!((model.terms[1].coefficient - 2.0).abs() < 1e-8);
        assert!((model.terms[2].coefficient + 3.0).abs() < 1e-8);
        assert!(model.adj_r_squared > 0.999_999);
        assert!(model.f_p_value < 1e-9);
    }

    #[test]
    fn noisy_fit_keeps_inference_sensible() {
        // deterministic "noise" with zero mean
        let x: Vec<f64> = (0..40).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 2.0 * v + 3.0 + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();

        let model = fit_ols(&y, &[feature("x", x)]).expect("fit");
        assert!((model.terms[1].coefficient - 2.0).abs() < 0.01);
        assert!(model.r_squared > 0.99);
        assert!(model.residual_std_error > 0.0);
        // every interval brackets its fitted value
        for (fitted, (lo, hi)) in model.fitted_values.iter().zip(&model.prediction_intervals) {
            assert!(lo < fitted && fitted < hi);
        }
    }

    #[test]
    fn collinear_features_fail() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let x2 = x.clone();
        let y: Vec<f64> = x.iter().map(|v| v + 1.0).collect();
        let err = fit_ols(&y, &[feature("x", x), feature("x2", x2)]).unwrap_err();
        assert!(matches!(err, PropstatError::Computation(_)));
    }

    #[test]
    fn too_few_observations_fail() {
        let err = fit_ols(&[1.0, 2.0], &[feature("x", vec![1.0, 2.0])]).unwrap_err();
        assert!(matches!(err, PropstatError::Computation(_)));
    }

    #[test]
    fn predict_reproduces_fitted_line() {
        let x: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();
        let model = fit_ols(&y, &[feature("x", x)]).expect("fit");

        let prediction = model.predict(&[10.0]).expect("predict");
        assert!((prediction.value - 23.0).abs() < 1e-6);
        assert!(prediction.lower <= prediction.value && prediction.value <= prediction.upper);

        assert!(model.predict(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn matrix_inverse_known_case() {
        let m = vec![vec![4.0, 7.0], vec![2.0, 6.0]];
        let inv = invert_matrix(m).expect("invertible");
        assert!((inv[0][0] - 0.6).abs() < 1e-12);
        assert!((inv[0][1] + 0.7).abs() < 1e-12);
        assert!((inv[1][0] + 0.2).abs() < 1e-12);
        assert!((inv[1][1] - 0.4).abs() < 1e-12);
    }
}
