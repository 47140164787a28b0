use super::model::{RawSpectrum, Spectrum};

// ---------------------------------------------------------------------------
// Cleaning: keep only pairs where both coordinates are finite
// ---------------------------------------------------------------------------

/// Drop every sample whose wavenumber or intensity is NaN or infinite.
///
/// Order is preserved; the axis is never sorted here. The result may be
/// empty, which the pipeline reports as an empty spectrum.
pub fn clean(raw: RawSpectrum) -> Spectrum {
    let (x, y) = raw
        .x
        .into_iter()
        .zip(raw.y)
        .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
        .unzip();
    Spectrum { x, y }
}
