use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Row colours for the processed-spectra plot
// ---------------------------------------------------------------------------

/// Golden-angle hue step: consecutive rows never get neighbouring hues.
const HUE_STEP: f32 = 137.508;

/// One colour per matrix row.
#[derive(Debug, Clone)]
pub struct RowPalette {
    colors: Vec<Color32>,
}

impl RowPalette {
    pub fn new(rows: usize) -> Self {
        let colors = (0..rows)
            .map(|i| {
                let hue = (i as f32 * HUE_STEP) % 360.0;
                // Alternate lightness so close hues stay apart on a dark plot.
                let lightness = if i % 2 == 0 { 0.55 } else { 0.68 };
                let rgb: Srgb = Hsl::new(hue, 0.75, lightness).into_color();
                Color32::from_rgb(
                    (rgb.red * 255.0) as u8,
                    (rgb.green * 255.0) as u8,
                    (rgb.blue * 255.0) as u8,
                )
            })
            .collect();
        RowPalette { colors }
    }

    pub fn color(&self, row: usize) -> Color32 {
        self.colors.get(row).copied().unwrap_or(Color32::GRAY)
    }
}
