//! Command handlers, one module per subcommand

pub mod compare;
pub mod generate;
pub mod inspect;
pub mod pack;
pub mod qr;
pub mod verify;

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::*;

use crate::config::WorkbookConfig;
use crate::excel::{SourceSheet, read_source_sheet};

use super::WorkbookArgs;

const RULE_WIDTH: usize = 80;

impl WorkbookArgs {
    /// Workbook path and sheet, CLI values taking precedence over config
    pub fn resolve(&self, config: &WorkbookConfig) -> (PathBuf, String) {
        (
            self.workbook.clone().unwrap_or_else(|| config.path.clone()),
            self.sheet.clone().unwrap_or_else(|| config.sheet.clone()),
        )
    }
}

fn load_sheet(args: &WorkbookArgs, config: &WorkbookConfig) -> Result<SourceSheet> {
    let (path, sheet) = args.resolve(config);
    println!(
        "Reading {} (sheet {})...",
        path.display().to_string().cyan(),
        sheet.cyan()
    );
    read_source_sheet(&path, &sheet)
}

fn pick(override_path: &Option<PathBuf>, configured: &Path) -> PathBuf {
    override_path
        .clone()
        .unwrap_or_else(|| configured.to_path_buf())
}

fn banner(title: &str) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{}", title.bold());
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn size_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbook_args_override_config() {
        let config = WorkbookConfig::default();
        let args = WorkbookArgs {
            workbook: Some(PathBuf::from("other.xlsx")),
            sheet: None,
        };
        let (path, sheet) = args.resolve(&config);
        assert_eq!(path, PathBuf::from("other.xlsx"));
        assert_eq!(sheet, "Sheet8");
    }

    #[test]
    fn test_pick_prefers_override() {
        let configured = Path::new("configured.json");
        assert_eq!(pick(&None, configured), PathBuf::from("configured.json"));
        assert_eq!(
            pick(&Some(PathBuf::from("cli.json")), configured),
            PathBuf::from("cli.json")
        );
    }
}
