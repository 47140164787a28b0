use super::model::{CommonAxis, ProcessError, Spectrum};

/// Linearly interpolate `spectrum` onto every point of `axis`.
///
/// Targets outside the source range take the nearest boundary intensity.
/// An axis that is not non-decreasing is first sorted
/// (stable, x and y together).
pub fn resample(spectrum: &Spectrum, axis: &CommonAxis) -> Result<Vec<f64>, ProcessError> {
    if spectrum.len() < 2 {
        return Err(ProcessError::Interpolation(format!(
            "need at least 2 samples, got {}",
            spectrum.len()
        )));
    }

    let sorted;
    let (x, y) = if is_non_decreasing(&spectrum.x) {
        (spectrum.x.as_slice(), spectrum.y.as_slice())
    } else {
        sorted = sort_by_wavenumber(spectrum);
        (sorted.0.as_slice(), sorted.1.as_slice())
    };

    let first = x[0];
    let last = x[x.len() - 1];
    if last <= first {
        return Err(ProcessError::Interpolation(format!(
            "wavenumber axis has zero span at {first}"
        )));
    }

    Ok(axis.points().iter().map(|&t| interpolate(x, y, t)).collect())
}

fn is_non_decreasing(x: &[f64]) -> bool {
    x.windows(2).all(|w| w[0] <= w[1])
}

fn sort_by_wavenumber(spectrum: &Spectrum) -> (Vec<f64>, Vec<f64>) {
    let mut pairs: Vec<(f64, f64)> = spectrum
        .x
        .iter()
        .copied()
        .zip(spectrum.y.iter().copied())
        .collect();
    // `sort_by` is stable: equal wavenumbers keep their authored order.
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs.into_iter().unzip()
}

/// Value at `t` on the polyline through sorted `(x, y)`, clamped at the ends.
fn interpolate(x: &[f64], y: &[f64], t: f64) -> f64 {
    // First index with x > t; x[hi - 1] <= t < x[hi] in the bracketing case.
    let hi = x.partition_point(|&xi| xi <= t);
    if hi == 0 {
        return y[0];
    }
    if hi == x.len() {
        return y[y.len() - 1];
    }
    let lo = hi - 1;
    let frac = (t - x[lo]) / (x[hi] - x[lo]);
    y[lo] + frac * (y[hi] - y[lo])
}
