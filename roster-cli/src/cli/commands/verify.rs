//! `roster verify`: workbook against the corrected dataset, plus artifact checks

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::archive;
use crate::cli::VerifyArgs;
use crate::config::Config;
use crate::reconcile::{ConsoleOptions, ConsoleReport, reconcile};
use crate::snapshot::StoreSnapshot;

use super::compare::policy_for;
use super::{banner, load_sheet, pick, size_mb};

const PREVIEW_LIMIT: usize = 10;
const TITLE: &str = "FINAL DATA VERIFICATION: Excel vs Corrected Dataset";

pub fn handle_verify_command(args: VerifyArgs, config: &Config) -> Result<()> {
    let dataset_path = pick(&args.dataset, &config.dataset.output);
    let image_dir = pick(&args.dir, &config.verify.image_dir);
    let zip_path = pick(&args.zip, &config.verify.zip);
    let report_path = args.report.clone().or_else(|| config.verify.report.clone());

    let sheet = load_sheet(&args.workbook, &config.workbook)?;
    let dataset = StoreSnapshot::load(&dataset_path)?;

    let report = reconcile(&sheet, &dataset, policy_for(args.exact));
    let options = ConsoleOptions {
        title: TITLE,
        preview_limit: PREVIEW_LIMIT,
    };
    print!("{}", ConsoleReport::new(&report, options));

    if let Some(path) = report_path {
        report.write_json(&path)?;
        println!("\nReport saved to: {}", path.display().to_string().cyan());
    }

    println!();
    banner("ARTIFACT CHECKS");
    print_images(&image_dir, check_images(&image_dir)?);
    print_archive(&zip_path, check_archive(&zip_path)?);

    println!();
    println!("{}", "VERIFICATION COMPLETE".bold());
    Ok(())
}

/// Number of `.png` images in `dir`, or `None` when the directory is missing
fn check_images(dir: &Path) -> Result<Option<usize>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    Ok(Some(archive::list_images(dir)?.len()))
}

/// Size of the archive in bytes, or `None` when it is missing
fn check_archive(path: &Path) -> Result<Option<u64>> {
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::metadata(path)
        .with_context(|| format!("Failed to stat archive: {}", path.display()))?
        .len();
    Ok(Some(bytes))
}

fn print_images(dir: &Path, count: Option<usize>) {
    match count {
        Some(count) => println!(
            "{} {} QR images in {}",
            "✅".green(),
            count,
            dir.display().to_string().cyan()
        ),
        None => println!(
            "{} Image directory missing: {}",
            "❌".red(),
            dir.display()
        ),
    }
}

fn print_archive(path: &Path, bytes: Option<u64>) {
    match bytes {
        Some(bytes) => println!(
            "{} Archive {} ({:.2} MB)",
            "✅".green(),
            path.display().to_string().cyan(),
            size_mb(bytes)
        ),
        None => println!("{} Archive missing: {}", "❌".red(), path.display()),
    }
}
