use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use rusty_jcamp::data::jcamp::encode_xydata;

/// Sum of Gaussian bands `(centre, width, height)` over a flat baseline.
fn absorbance(wavenumber: f64, bands: &[(f64, f64, f64)]) -> f64 {
    bands
        .iter()
        .map(|&(centre, width, height)| {
            height * (-0.5 * ((wavenumber - centre) / width).powi(2)).exp()
        })
        .sum::<f64>()
        + 0.05
}

/// SplitMix64 stream with a Box-Muller normal draw.
struct Noise {
    state: u64,
}

impl Noise {
    fn seeded(seed: u64) -> Self {
        Noise { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in (0, 1].
    fn unit(&mut self) -> f64 {
        ((self.next_u64() >> 11) + 1) as f64 / (1u64 << 53) as f64
    }

    fn normal(&mut self, std_dev: f64) -> f64 {
        let radius = (-2.0 * self.unit().ln()).sqrt();
        let angle = std::f64::consts::TAU * self.unit();
        std_dev * radius * angle.cos()
    }
}

/// Each sample gets its own native axis: (first, step, count).
struct SampleKind {
    name: &'static str,
    axis: (f64, f64, usize),
    bands: Vec<(f64, f64, f64)>,
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_spectra.zip".to_string());
    let mut noise = Noise::seeded(42);

    let kinds = [
        SampleKind {
            name: "Sample_A",
            // 4000 → 650, step -2 (descending, as many instruments write it)
            axis: (4000.0, -2.0, 1676),
            bands: vec![(3400.0, 80.0, 0.8), (2900.0, 40.0, 0.5), (1650.0, 30.0, 0.3)],
        },
        SampleKind {
            name: "Sample_B",
            axis: (650.0, 1.5, 2234),
            bands: vec![(3200.0, 60.0, 0.6), (2800.0, 50.0, 0.7), (1100.0, 35.0, 0.4)],
        },
        SampleKind {
            name: "Sample_C",
            axis: (700.0, 3.0, 1034),
            bands: vec![(3600.0, 70.0, 0.9), (3000.0, 45.0, 0.4), (1200.0, 25.0, 0.5)],
        },
    ];
    let concentrations = [0.1, 0.5, 1.0, 2.0, 5.0];

    let file = File::create(&output_path).context("Failed to create output file")?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let mut written = 0;
    for kind in &kinds {
        let (first, step, count) = kind.axis;
        let wavenumbers: Vec<f64> = (0..count).map(|i| first + i as f64 * step).collect();

        for &conc in &concentrations {
            let bands: Vec<(f64, f64, f64)> = kind
                .bands
                .iter()
                .map(|&(centre, width, height)| (centre, width, height * conc))
                .collect();
            let y: Vec<f64> = wavenumbers
                .iter()
                .map(|&wn| absorbance(wn, &bands) + noise.normal(0.005 * conc))
                .collect();

            let title = format!("{} c={conc}", kind.name);
            let name = format!("spectra/{}_{conc}.jdx", kind.name);
            zip.start_file(name.as_str(), options)?;
            zip.write_all(encode_xydata(&title, &wavenumbers, &y, 1e-6).as_bytes())?;
            written += 1;
        }
    }

    // One unreadable spectrum and one non-JCAMP file, to exercise skipping.
    zip.start_file("spectra/truncated.jdx", options)?;
    zip.write_all(b"##TITLE=truncated\n##JCAMP-DX=4.24\n##XYDATA=(X++(Y..Y))\n")?;
    zip.start_file("spectra/README.txt", options)?;
    zip.write_all(b"Synthetic IR spectra generated by generate_sample\n")?;
    zip.finish().context("Failed to finish ZIP archive")?;

    println!("Wrote {written} spectra (+1 truncated file) to {output_path}");
    Ok(())
}
