//! `roster pack`: serial-order zip of an existing image directory

use anyhow::{Result, bail};
use colored::*;

use crate::archive::{ensure_serial, read_entry_names, write_serial_zip};
use crate::cli::PackArgs;
use crate::config::Config;

use super::{banner, pick};

const HEAD: usize = 10;
const TAIL: usize = 5;

pub fn handle_pack_command(args: PackArgs, config: &Config) -> Result<()> {
    let dir = pick(&args.dir, &config.pack.dir);
    let zip = pick(&args.zip, &config.pack.zip);

    if !dir.is_dir() {
        bail!("Image directory does not exist: {}", dir.display());
    }

    println!(
        "Packaging {} into {}...",
        dir.display().to_string().cyan(),
        zip.display().to_string().cyan()
    );
    let summary = write_serial_zip(&dir, &zip)?;

    let names = read_entry_names(&zip)?;
    ensure_serial(&names)?;

    println!();
    banner("SERIAL ORDER ARCHIVE");
    println!("First {} files in zip:", HEAD);
    for name in names.iter().take(HEAD) {
        println!("  {}", name);
    }
    println!();
    println!("Last {} files in zip:", TAIL);
    for name in names.iter().skip(names.len().saturating_sub(TAIL)) {
        println!("  {}", name);
    }

    println!();
    println!(
        "{} {} files, {:.2} MB",
        "✅".green(),
        names.len().to_string().bold(),
        summary.size_mb()
    );
    Ok(())
}
