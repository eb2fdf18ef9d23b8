//! `roster qr`: badge images for one variant, then the serial-order archive

use anyhow::Result;
use colored::*;

use crate::cli::QrArgs;
use crate::config::{Config, OutputPaths};
use crate::dataset::read_participants;
use crate::qr::{LabelFonts, generate_badges};

use super::{banner, pick};

pub fn handle_qr_command(args: QrArgs, config: &Config) -> Result<()> {
    let variant = args.variant;
    let configured = variant.paths(&config.qr);
    let paths = OutputPaths {
        dir: pick(&args.dir, &configured.dir),
        zip: pick(&args.zip, &configured.zip),
    };
    let dataset_path = pick(&args.dataset, &config.dataset.output);

    let participants = read_participants(&dataset_path)?;
    println!(
        "Loaded {} participants from {}",
        participants.len(),
        dataset_path.display().to_string().cyan()
    );

    let fonts = if variant.layout().is_some() {
        LabelFonts::load(&config.fonts)?
    } else {
        LabelFonts::default()
    };

    let summary = generate_badges(&participants, variant, &paths, &fonts)?;

    println!();
    banner(&format!("QR BADGES ({})", variant));
    println!(
        "{} Generated {} images in {}",
        "✅".green(),
        summary.files.len().to_string().bold(),
        summary.dir.display().to_string().cyan()
    );
    println!(
        "{} Archive {} with {} files ({:.2} MB)",
        "📦".cyan(),
        summary.archive.path.display().to_string().cyan(),
        summary.archive.entries.len(),
        summary.archive.size_mb()
    );
    if let (Some(first), Some(last)) = (summary.archive.entries.first(), summary.archive.entries.last()) {
        println!("  First: {}", first);
        println!("  Last: {}", last);
    }

    Ok(())
}
