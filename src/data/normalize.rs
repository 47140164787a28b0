use super::model::Spectrum;

/// Min-max scale the intensities into [0, 1] in place.
///
/// A flat spectrum (max - min <= 0) becomes all zeros instead of dividing
/// by zero.
pub fn min_max(spectrum: &mut Spectrum) {
    let min = spectrum.y.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = spectrum.y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range > 0.0 {
        for v in &mut spectrum.y {
            *v = (*v - min) / range;
        }
    } else {
        spectrum.y.iter_mut().for_each(|v| *v = 0.0);
    }
}
