//! Badge image generation for a whole roster

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use image::DynamicImage;

use crate::archive::{self, ArchiveSummary};
use crate::config::OutputPaths;
use crate::participant::Participant;

use super::encode::render_qr;
use super::label::{LabelFonts, compose_badge};
use super::variant::BadgeVariant;

const PROGRESS_EVERY: usize = 50;

/// Outcome of a generation run
#[derive(Debug)]
pub struct GenerationSummary {
    pub dir: PathBuf,
    /// Files written, in generation order
    pub files: Vec<String>,
    pub archive: ArchiveSummary,
}

/// Render one badge image
pub fn render_badge(
    participant: &Participant,
    variant: BadgeVariant,
    fonts: &LabelFonts,
) -> Result<DynamicImage> {
    let qr = render_qr(&participant.qr_token, &variant.style())?;
    Ok(match variant.layout() {
        Some(layout) => DynamicImage::ImageRgb8(compose_badge(
            &qr,
            &layout,
            participant.badge_number,
            &participant.name,
            fonts,
        )?),
        None => DynamicImage::ImageLuma8(qr),
    })
}

/// Render every participant into `paths.dir`, then zip the directory to `paths.zip`
///
/// Participants are processed in ascending badge order. A failure part way
/// through leaves the images written so far and no archive.
pub fn generate_badges(
    participants: &[Participant],
    variant: BadgeVariant,
    paths: &OutputPaths,
    fonts: &LabelFonts,
) -> Result<GenerationSummary> {
    let dir = &paths.dir;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    if variant.clears_output() {
        let removed = archive::clear_directory(dir)?;
        if removed > 0 {
            log::info!("Cleared {} existing files from {}", removed, dir.display());
        }
    }

    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by_key(|p| p.badge_number);

    log::info!(
        "Generating {} {} badges into {}",
        ordered.len(),
        variant,
        dir.display()
    );

    let mut files = Vec::with_capacity(ordered.len());
    for (idx, participant) in ordered.iter().enumerate() {
        let image = render_badge(participant, variant, fonts)
            .with_context(|| format!("Failed to render badge #{}", participant.badge_number))?;
        let file_name = variant.file_name(participant);
        let path = dir.join(&file_name);
        image
            .save(&path)
            .with_context(|| format!("Failed to save image: {}", path.display()))?;
        files.push(file_name);

        if (idx + 1) % PROGRESS_EVERY == 0 {
            log::info!("Generated {}/{} QR codes...", idx + 1, ordered.len());
        }
    }

    let archive = archive::write_serial_zip(dir, &paths.zip)?;

    Ok(GenerationSummary {
        dir: dir.clone(),
        files,
        archive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(badge: u32, name: &str) -> Participant {
        Participant {
            uuid: String::new(),
            name: name.to_string(),
            mobile: String::new(),
            qr_token: format!("PALITANA_YATRA_{}", badge),
            emergency_contact: String::new(),
            photo_uri: None,
            blood_group: None,
            age: None,
            badge_number: badge,
        }
    }

    fn roster() -> Vec<Participant> {
        vec![
            participant(10, "Ten Person"),
            participant(2, "Two Person"),
            participant(1, "One Person"),
        ]
    }

    fn paths(root: &std::path::Path) -> OutputPaths {
        OutputPaths {
            dir: root.join("images"),
            zip: root.join("badges.zip"),
        }
    }

    #[test]
    fn test_named_variant_writes_bare_symbols_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths(dir.path());

        let summary =
            generate_badges(&roster(), BadgeVariant::Named, &paths, &LabelFonts::default())
                .unwrap();

        assert_eq!(
            summary.files,
            vec!["1_One_Person.png", "2_Two_Person.png", "10_Ten_Person.png"]
        );
        assert_eq!(summary.archive.entries, summary.files);
        assert_eq!(archive::read_entry_names(&paths.zip).unwrap(), summary.files);

        let img = image::open(paths.dir.join("1_One_Person.png")).unwrap();
        let expected = render_qr("PALITANA_YATRA_1", &BadgeVariant::Named.style()).unwrap();
        assert_eq!(img.width(), expected.width());
        assert_eq!(img.height(), expected.height());
    }

    #[test]
    fn test_classic_variant_extends_canvas_below_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths(dir.path());

        let fonts = LabelFonts::bundled().unwrap();
        generate_badges(&roster(), BadgeVariant::Classic, &paths, &fonts).unwrap();

        let qr = render_qr("PALITANA_YATRA_2", &BadgeVariant::Classic.style()).unwrap();
        let img = image::open(paths.dir.join("QR_002_Two_Person.png")).unwrap();
        assert_eq!(img.width(), qr.width());
        assert_eq!(img.height(), qr.height() + 80);
    }

    #[test]
    fn test_labeled_variant_clears_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths(dir.path());
        fs::create_dir_all(&paths.dir).unwrap();
        fs::write(paths.dir.join("999_Stale.png"), b"old").unwrap();

        let fonts = LabelFonts::bundled().unwrap();
        let summary = generate_badges(&roster(), BadgeVariant::Labeled, &paths, &fonts).unwrap();

        assert!(!paths.dir.join("999_Stale.png").exists());
        assert_eq!(
            summary.archive.entries,
            vec!["001_One_Person.png", "002_Two_Person.png", "010_Ten_Person.png"]
        );

        let qr = render_qr("PALITANA_YATRA_1", &BadgeVariant::Labeled.style()).unwrap();
        let img = image::open(paths.dir.join("001_One_Person.png")).unwrap().to_luma8();
        assert_eq!(img.width(), qr.width() + 40);
        assert_eq!(img.height(), qr.height() + 100);

        let label_top = qr.height() + 10;
        let dark = (label_top..img.height())
            .flat_map(|y| (0..img.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| img.get_pixel(x, y)[0] < 128)
            .count();
        assert!(dark > 0);
    }

    #[test]
    fn test_labeled_variant_without_fonts_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths(dir.path());

        let result =
            generate_badges(&roster(), BadgeVariant::Labeled, &paths, &LabelFonts::default());
        assert!(result.is_err());
        assert!(archive::list_images(&paths.dir).unwrap().is_empty());
        assert!(!paths.zip.exists());
    }

    #[test]
    fn test_named_variant_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths(dir.path());
        fs::create_dir_all(&paths.dir).unwrap();
        render_badge(&participant(50, "Earlier"), BadgeVariant::Named, &LabelFonts::default())
            .unwrap()
            .save(paths.dir.join("50_Earlier.png"))
            .unwrap();

        let summary =
            generate_badges(&roster(), BadgeVariant::Named, &paths, &LabelFonts::default())
                .unwrap();

        assert_eq!(summary.files.len(), 3);
        assert_eq!(summary.archive.entries.len(), 4);
        assert_eq!(summary.archive.entries.last().unwrap(), "50_Earlier.png");
    }
}
