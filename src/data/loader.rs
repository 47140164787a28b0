use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use zip::ZipArchive;

use super::model::{SkipRecord, SourceFile};

/// File extensions treated as JCAMP-DX (compared case-insensitively).
pub const JCAMP_EXTENSIONS: [&str; 2] = ["jdx", "dx"];

/// Payloads collected from disk, plus the entries that could not be read.
#[derive(Debug, Default)]
pub struct SourceSet {
    pub files: Vec<SourceFile>,
    pub failures: Vec<SkipRecord>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Collect JCAMP payloads from a path.  Dispatch by kind.
///
/// Supported inputs:
/// * directory  – every `.jdx` / `.dx` file directly inside, sorted by name
/// * `.zip`     – every `.jdx` / `.dx` entry, in archive order
/// * `.jdx` / `.dx` – that single file
///
/// Only a failure to open the directory or archive itself is an error; an
/// entry that cannot be read is recorded in [`SourceSet::failures`].
pub fn load_sources(path: &Path) -> Result<SourceSet> {
    if path.is_dir() {
        info!("Reading spectra from folder {}", path.display());
        return load_dir(path);
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "zip" => {
            info!("Reading spectra from ZIP archive {}", path.display());
            load_zip(path)
        }
        _ if is_jcamp_name(&path.to_string_lossy()) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(SourceSet {
                files: vec![SourceFile::new(name, bytes)],
                failures: Vec::new(),
            })
        }
        other => bail!("Unsupported input: expected a folder, .zip, .jdx or .dx (got .{other})"),
    }
}

/// Whether `name` ends in one of [`JCAMP_EXTENSIONS`].
pub fn is_jcamp_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| JCAMP_EXTENSIONS.iter().any(|j| e.eq_ignore_ascii_case(j)))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// ZIP archives
// ---------------------------------------------------------------------------

fn load_zip(path: &Path) -> Result<SourceSet> {
    let file = File::open(path).context("opening ZIP archive")?;
    let mut archive = ZipArchive::new(BufReader::new(file)).context("reading ZIP directory")?;

    let mut set = SourceSet::default();
    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot open ZIP entry #{i}: {e}");
                set.failures.push(SkipRecord {
                    name: format!("entry #{i}"),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if !is_jcamp_name(&name) {
            debug!("Ignoring non-JCAMP entry {name}");
            continue;
        }

        let mut bytes = Vec::with_capacity(initial_capacity(entry.size()));
        match entry.read_to_end(&mut bytes) {
            Ok(_) => set.files.push(SourceFile::new(name, bytes)),
            Err(e) => {
                warn!("Cannot read ZIP entry {name}: {e}");
                set.failures.push(SkipRecord {
                    name,
                    reason: format!("read error: {e}"),
                });
            }
        }
    }

    info!("{} JCAMP entries found in archive", set.files.len());
    Ok(set)
}

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 64 << 20;

/// The header's uncompressed size is untrusted; `read_to_end` grows past it.
fn initial_capacity(declared: u64) -> usize {
    declared.min(MAX_PREALLOC) as usize
}

// ---------------------------------------------------------------------------
// Folders
// ---------------------------------------------------------------------------

fn load_dir(path: &Path) -> Result<SourceSet> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(path).context("listing folder")? {
        let entry = entry.context("listing folder")?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_jcamp_name(&name) && entry.path().is_file() {
            paths.push((name, entry.path()));
        }
    }
    paths.sort_by(|a, b| a.0.cmp(&b.0));

    let mut set = SourceSet::default();
    for (name, file_path) in paths {
        match std::fs::read(&file_path) {
            Ok(bytes) => set.files.push(SourceFile::new(name, bytes)),
            Err(e) => {
                warn!("Cannot read {}: {e}", file_path.display());
                set.failures.push(SkipRecord {
                    name,
                    reason: format!("read error: {e}"),
                });
            }
        }
    }

    info!("{} JCAMP files found in folder", set.files.len());
    Ok(set)
}
