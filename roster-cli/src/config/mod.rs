//! Configuration for the roster tools
//!
//! Every input and output location is a named path in [`Config`]. Values come
//! from a TOML file when one is found, otherwise from defaults that mirror the
//! filenames the event workflow has always used.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up in the working directory when `--config` is absent
pub const LOCAL_CONFIG_FILE: &str = "roster.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workbook: WorkbookConfig,
    pub identity: IdentityConfig,
    pub dataset: DatasetConfig,
    pub compare: CompareConfig,
    pub verify: VerifyConfig,
    pub qr: QrConfig,
    pub pack: OutputPaths,
    pub inspect: InspectConfig,
    pub fonts: FontConfig,
}

/// Source workbook location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    pub path: PathBuf,
    pub sheet: String,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("IDCardData_Final.xlsx"),
            sheet: "Sheet8".to_string(),
        }
    }
}

/// Prefixes used when deriving identifiers from badge numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub uuid_prefix: String,
    pub token_prefix: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            uuid_prefix: "palitana-yatra-".to_string(),
            token_prefix: "PALITANA_YATRA_".to_string(),
        }
    }
}

/// Corrected dataset output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub output: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("participants_corrected.json"),
        }
    }
}

/// Store snapshot comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub snapshot: PathBuf,
    pub report: PathBuf,
    /// Optional Excel rendering of the report
    pub xlsx: Option<PathBuf>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("participants_import_final.json"),
            report: PathBuf::from("verification_report.json"),
            xlsx: None,
        }
    }
}

/// Final verification against the corrected dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Where to write the JSON report, if anywhere
    pub report: Option<PathBuf>,
    pub image_dir: PathBuf,
    pub zip: PathBuf,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            report: None,
            image_dir: PathBuf::from("qr_codes_final"),
            zip: PathBuf::from("palitana_qr_codes_corrected.zip"),
        }
    }
}

/// An image directory and the archive built from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub zip: PathBuf,
}

impl OutputPaths {
    fn new(dir: &str, zip: &str) -> Self {
        Self {
            dir: PathBuf::from(dir),
            zip: PathBuf::from(zip),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::new("qr_codes_serial", "palitana_qr_codes_serial_order.zip")
    }
}

/// Output locations for each QR badge variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    pub classic: OutputPaths,
    pub named: OutputPaths,
    pub labeled: OutputPaths,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            classic: OutputPaths::new("qr_codes_final", "palitana_qr_codes_corrected.zip"),
            named: OutputPaths::new("qr_codes_named", "palitana_qr_codes_named.zip"),
            labeled: OutputPaths::new("qr_codes_labeled", "palitana_qr_codes_with_labels.zip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    pub output: PathBuf,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("final_data_extracted.json"),
        }
    }
}

/// Candidate TrueType fonts for badge labels, tried in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub bold: Vec<PathBuf>,
    pub regular: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            bold: vec![
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/freefont/FreeSansBold.ttf"),
            ],
            regular: vec![
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/freefont/FreeSans.ttf"),
            ],
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// Lookup order: the explicit path, `./roster.toml`, then
    /// `<config dir>/roster/config.toml`. Falls back to defaults when none exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(&local);
        }

        if let Some(global) = dirs::config_dir().map(|d| d.join("roster").join("config.toml")) {
            if global.is_file() {
                return Self::from_file(&global);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse a config file, resolving relative paths against its directory
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.rebase(base);
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Make every relative path relative to `base`
    pub fn rebase(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        join(&mut self.workbook.path);
        join(&mut self.dataset.output);
        join(&mut self.compare.snapshot);
        join(&mut self.compare.report);
        if let Some(p) = self.compare.xlsx.as_mut() {
            join(p);
        }
        if let Some(p) = self.verify.report.as_mut() {
            join(p);
        }
        join(&mut self.verify.image_dir);
        join(&mut self.verify.zip);
        for paths in [
            &mut self.qr.classic,
            &mut self.qr.named,
            &mut self.qr.labeled,
            &mut self.pack,
        ] {
            join(&mut paths.dir);
            join(&mut paths.zip);
        }
        join(&mut self.inspect.output);
        for p in self.fonts.bold.iter_mut().chain(self.fonts.regular.iter_mut()) {
            join(p);
        }
    }
}
