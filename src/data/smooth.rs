use crate::config::ConfigError;

use super::model::ProcessError;

// ---------------------------------------------------------------------------
// Savitzky–Golay smoothing
// ---------------------------------------------------------------------------

/// Local least-squares polynomial smoother with precomputed weights.
///
/// Interior samples are replaced by the centred fit over `window` samples.
/// The first and last `window / 2` samples are evaluated on the polynomial
/// fitted to the first (last) full window.
///
/// Weights are built once and the filter is only read afterwards, so one
/// instance is shared by all workers of a batch.
#[derive(Debug, Clone)]
pub struct SavitzkyGolay {
    window: usize,
    order: usize,
    /// Convolution weights of the centred fit.
    centre: Vec<f64>,
    /// `leading[k]`: weights over the first window giving the fit at sample `k`.
    leading: Vec<Vec<f64>>,
}

impl SavitzkyGolay {
    /// Build the filter. `window` must be odd and strictly larger than `order`.
    pub fn new(window: usize, order: usize) -> Result<Self, ConfigError> {
        if window == 0 || window % 2 == 0 {
            return Err(ConfigError::EvenWindow(window));
        }
        if order >= window {
            return Err(ConfigError::OrderTooHigh { order, window });
        }

        let half = window / 2;
        let centre = fit_weights(window, order, half as f64)
            .ok_or(ConfigError::OrderTooHigh { order, window })?;
        let leading = (0..half)
            .map(|k| fit_weights(window, order, k as f64))
            .collect::<Option<Vec<_>>>()
            .ok_or(ConfigError::OrderTooHigh { order, window })?;

        Ok(SavitzkyGolay {
            window,
            order,
            centre,
            leading,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Smooth `y`, returning a sequence of the same length.
    pub fn apply(&self, y: &[f64]) -> Result<Vec<f64>, ProcessError> {
        let n = y.len();
        if n < self.window {
            return Err(ProcessError::InsufficientSamples {
                found: n,
                window: self.window,
            });
        }

        let half = self.window / 2;
        let mut out = vec![0.0; n];

        for (i, slot) in out.iter_mut().enumerate().take(n - half).skip(half) {
            *slot = dot(&self.centre, &y[i - half..=i + half]);
        }

        let head = &y[..self.window];
        let tail = &y[n - self.window..];
        for (k, weights) in self.leading.iter().enumerate() {
            out[k] = dot(weights, head);
            // The fit is symmetric under reversal, so the tail reuses the
            // leading weights against the reversed last window.
            out[n - 1 - k] = weights
                .iter()
                .zip(tail.iter().rev())
                .map(|(w, v)| w * v)
                .sum();
        }

        Ok(out)
    }
}

fn dot(weights: &[f64], values: &[f64]) -> f64 {
    weights.iter().zip(values).map(|(w, v)| w * v).sum()
}

/// Weights `w` such that `Σ w_j y_j` is the degree-`order` least-squares fit
/// over samples `0..window`, evaluated at sample position `at`.
///
/// Positions are rescaled to [-1, 1] around the window centre to keep the
/// normal equations well conditioned.
fn fit_weights(window: usize, order: usize, at: f64) -> Option<Vec<f64>> {
    let half = (window / 2).max(1) as f64;
    let centre = (window / 2) as f64;
    let u: Vec<f64> = (0..window).map(|j| (j as f64 - centre) / half).collect();
    let s = (at - centre) / half;
    let terms = order + 1;

    // Normal matrix M[a][b] = Σ u^(a+b); right-hand side e(s) = [1, s, s², ...].
    let mut m = vec![vec![0.0; terms]; terms];
    for (a, row) in m.iter_mut().enumerate() {
        for (b, cell) in row.iter_mut().enumerate() {
            *cell = u.iter().map(|&uj| uj.powi((a + b) as i32)).sum();
        }
    }
    let rhs: Vec<f64> = (0..terms).map(|a| s.powi(a as i32)).collect();
    let c = solve(m, rhs)?;

    Some(
        u.iter()
            .map(|&uj| {
                c.iter()
                    .enumerate()
                    .map(|(a, ca)| ca * uj.powi(a as i32))
                    .sum()
            })
            .collect(),
    )
}

/// Gaussian elimination with partial pivoting. `None` on a singular matrix.
fn solve(mut m: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let n = rhs.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot][col].abs() < 1e-12 {
            return None;
        }
        m.swap(col, pivot);
        rhs.swap(col, pivot);

        for row in col + 1..n {
            let factor = m[row][col] / m[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[row][k] -= factor * m[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| m[row][k] * x[k]).sum();
        x[row] = (rhs[row] - tail) / m[row][row];
    }
    Some(x)
}
