//! Zip packaging of badge images in badge-number order
//!
//! Image filenames start with the badge number, optionally behind a `QR_`
//! prefix: `12_Name.png`, `012_Name.png`, `QR_012_Name.png`. Entries are
//! written in ascending numeric order of that number, never lexical order.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const IMAGE_EXTENSION: &str = "png";

/// Result of writing an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// Entry names in archive order
    pub entries: Vec<String>,
    pub size_bytes: u64,
}

impl ArchiveSummary {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Badge number at the start of an image filename
pub fn badge_token(file_name: &str) -> Result<u32> {
    let rest = file_name.strip_prefix("QR_").unwrap_or(file_name);
    let token = rest.split('_').next().unwrap_or_default();
    token
        .parse::<u32>()
        .with_context(|| format!("Filename does not start with a badge number: {}", file_name))
}

/// Names of the `.png` files directly inside `dir`
pub fn list_images(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read image directory: {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list: {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(IMAGE_EXTENSION) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        } else {
            log::warn!("Skipping non UTF-8 filename: {}", path.display());
        }
    }
    Ok(names)
}

/// Sort filenames by badge number
///
/// Fails on the first name without a leading badge number.
pub fn sort_serial(names: Vec<String>) -> Result<Vec<String>> {
    let mut keyed = names
        .into_iter()
        .map(|name| badge_token(&name).map(|badge| (badge, name)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort();
    Ok(keyed.into_iter().map(|(_, name)| name).collect())
}

/// The `.png` files of `dir` in serial order
pub fn serial_images(dir: &Path) -> Result<Vec<String>> {
    sort_serial(list_images(dir)?)
}

/// Write `names` from `dir` into a deflate zip, in the given order
pub fn write_zip(dir: &Path, names: &[String], dest: &Path) -> Result<ArchiveSummary> {
    let file = File::create(dest)
        .with_context(|| format!("Failed to create zip file: {}", dest.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (idx, name) in names.iter().enumerate() {
        let source = dir.join(name);
        let mut input = File::open(&source)
            .with_context(|| format!("Failed to open image: {}", source.display()))?;
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add zip entry: {}", name))?;
        io::copy(&mut input, &mut zip)
            .with_context(|| format!("Failed to write zip entry: {}", name))?;

        if (idx + 1) % 100 == 0 {
            log::info!("Added {}/{} files...", idx + 1, names.len());
        }
    }

    zip.finish()
        .with_context(|| format!("Failed to finish zip file: {}", dest.display()))?;

    let size_bytes = fs::metadata(dest)
        .with_context(|| format!("Failed to stat zip file: {}", dest.display()))?
        .len();

    Ok(ArchiveSummary {
        path: dest.to_path_buf(),
        entries: names.to_vec(),
        size_bytes,
    })
}

/// Package every image of `dir` into `dest` in ascending badge order
pub fn write_serial_zip(dir: &Path, dest: &Path) -> Result<ArchiveSummary> {
    let names = serial_images(dir)?;
    if names.is_empty() {
        log::warn!("No images found in {}", dir.display());
    }
    let summary = write_zip(dir, &names, dest)?;
    log::info!(
        "Created {} with {} entries ({:.2} MB)",
        dest.display(),
        summary.entries.len(),
        summary.size_mb()
    );
    Ok(summary)
}

/// Entry names of an existing archive, in archive order
pub fn read_entry_names(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open zip file: {}", path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("Failed to read zip file: {}", path.display()))?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to read entry {} of {}", i, path.display()))?;
        names.push(entry.name().to_string());
    }
    Ok(names)
}

/// Fail unless `names` is in serial order
pub fn ensure_serial(names: &[String]) -> Result<()> {
    let mut previous: Option<(u32, &str)> = None;
    for name in names {
        let badge = badge_token(name)?;
        if let Some((prev_badge, prev_name)) = previous {
            if badge < prev_badge {
                bail!("Archive out of order: {} follows {}", name, prev_name);
            }
        }
        previous = Some((badge, name));
    }
    Ok(())
}

/// Remove every regular file in `dir`
pub fn clear_directory(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read: {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove: {}", path.display()))?;
            removed += 1;
        }
    }
    log::debug!("Removed {} files from {}", removed, dir.display());
    Ok(removed)
}
