//! Badge composition: QR symbol on a white canvas with badge number and name

use std::fs;
use std::path::PathBuf;

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result, anyhow};
use image::{GrayImage, Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::config::FontConfig;
use crate::participant::display_name;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Used when none of the configured candidates loads
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Bold,
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Left edge at the given x offset
    Left(u32),
    Center,
}

/// One line of label text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLine {
    pub weight: FontWeight,
    pub size: f32,
    /// Top of the line, measured from the bottom edge of the QR symbol
    pub offset_y: u32,
}

/// Geometry of a labeled badge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    /// Added on the left and right of the QR symbol
    pub side_padding: u32,
    /// Gap above the QR symbol
    pub qr_top: u32,
    /// Added below the QR symbol for the text lines
    pub text_height: u32,
    pub align: Align,
    pub badge: TextLine,
    pub name: TextLine,
    /// Names longer than this are truncated
    pub name_max_chars: usize,
    /// Characters kept before the ellipsis when truncating
    pub name_keep_chars: usize,
}

impl LabelLayout {
    /// Canvas size for a QR symbol of the given size
    pub fn canvas_size(&self, qr_width: u32, qr_height: u32) -> (u32, u32) {
        (
            qr_width + 2 * self.side_padding,
            self.qr_top + qr_height + self.text_height,
        )
    }
}

/// Fonts for label text
///
/// Either weight falls back to the other when only one loads. The default
/// value holds no fonts and is only usable for bare QR symbols.
#[derive(Default)]
pub struct LabelFonts {
    bold: Option<FontVec>,
    regular: Option<FontVec>,
}

impl LabelFonts {
    /// First readable candidate per weight, the bundled font when none loads
    pub fn load(config: &FontConfig) -> Result<Self> {
        let mut fonts = Self {
            bold: load_first(&config.bold),
            regular: load_first(&config.regular),
        };
        if fonts.is_empty() {
            log::warn!("No configured label font could be loaded, using bundled DejaVu Sans Bold");
            fonts.bold = Some(bundled_font()?);
        }
        Ok(fonts)
    }

    /// Only the bundled font, for both weights
    pub fn bundled() -> Result<Self> {
        Ok(Self {
            bold: Some(bundled_font()?),
            regular: None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.bold.is_none() && self.regular.is_none()
    }

    fn get(&self, weight: FontWeight) -> Option<&FontVec> {
        match weight {
            FontWeight::Bold => self.bold.as_ref().or(self.regular.as_ref()),
            FontWeight::Regular => self.regular.as_ref().or(self.bold.as_ref()),
        }
    }
}

fn bundled_font() -> Result<FontVec> {
    FontVec::try_from_vec(BUNDLED_FONT.to_vec())
        .map_err(|e| anyhow!("Bundled label font is unreadable: {}", e))
}

fn load_first(candidates: &[PathBuf]) -> Option<FontVec> {
    candidates.iter().find_map(|path| {
        let bytes = fs::read(path).ok()?;
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                log::debug!("Loaded font {}", path.display());
                Some(font)
            }
            Err(e) => {
                log::warn!("Skipping unreadable font {}: {}", path.display(), e);
                None
            }
        }
    })
}

/// Place a QR symbol on a labeled canvas
///
/// Fails when `fonts` holds no font at all.
pub fn compose_badge(
    qr: &GrayImage,
    layout: &LabelLayout,
    badge: u32,
    name: &str,
    fonts: &LabelFonts,
) -> Result<RgbImage> {
    let (qr_w, qr_h) = qr.dimensions();
    let (width, height) = layout.canvas_size(qr_w, qr_h);

    let mut canvas = RgbImage::from_pixel(width, height, WHITE);
    let qr_rgb = image::DynamicImage::ImageLuma8(qr.clone()).to_rgb8();
    imageops::replace(
        &mut canvas,
        &qr_rgb,
        ((width - qr_w) / 2) as i64,
        layout.qr_top as i64,
    );

    let text_top = layout.qr_top + qr_h;
    let badge_text = format!("#{}", badge);
    let name_text = display_name(name, layout.name_max_chars, layout.name_keep_chars);

    draw_line(&mut canvas, fonts, layout.align, &layout.badge, text_top, &badge_text)?;
    draw_line(&mut canvas, fonts, layout.align, &layout.name, text_top, &name_text)?;

    Ok(canvas)
}

fn draw_line(
    canvas: &mut RgbImage,
    fonts: &LabelFonts,
    align: Align,
    line: &TextLine,
    text_top: u32,
    text: &str,
) -> Result<()> {
    let font = fonts
        .get(line.weight)
        .with_context(|| format!("No font loaded for badge label '{}'", text))?;
    let scale = PxScale::from(line.size);
    let x = match align {
        Align::Left(x) => x,
        Align::Center => {
            let (text_w, _) = text_size(scale, font, text);
            canvas.width().saturating_sub(text_w) / 2
        }
    };
    draw_text_mut(
        canvas,
        BLACK,
        x as i32,
        (text_top + line.offset_y) as i32,
        scale,
        font,
        text,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn layout() -> LabelLayout {
        LabelLayout {
            side_padding: 20,
            qr_top: 10,
            text_height: 90,
            align: Align::Center,
            badge: TextLine {
                weight: FontWeight::Bold,
                size: 28.0,
                offset_y: 5,
            },
            name: TextLine {
                weight: FontWeight::Bold,
                size: 22.0,
                offset_y: 40,
            },
            name_max_chars: 30,
            name_keep_chars: 27,
        }
    }

    fn qr(side: u32) -> GrayImage {
        GrayImage::from_pixel(side, side, Luma([0]))
    }

    #[test]
    fn test_canvas_size() {
        assert_eq!(layout().canvas_size(290, 290), (330, 390));
    }

    fn dark_pixels_below(img: &RgbImage, top: u32) -> usize {
        (top..img.height())
            .flat_map(|y| (0..img.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| img.get_pixel(x, y)[0] < 128)
            .count()
    }

    #[test]
    fn test_qr_is_centered_below_top_gap() {
        let fonts = LabelFonts::bundled().unwrap();
        let img = compose_badge(&qr(100), &layout(), 7, "Name", &fonts).unwrap();
        assert_eq!(img.dimensions(), (140, 200));
        assert_eq!(img.get_pixel(19, 50), &WHITE);
        assert_eq!(img.get_pixel(20, 10), &BLACK);
        assert_eq!(img.get_pixel(119, 109), &BLACK);
        assert_eq!(img.get_pixel(120, 50), &WHITE);
        assert_eq!(img.get_pixel(60, 9), &WHITE);
    }

    #[test]
    fn test_label_area_carries_text() {
        let fonts = LabelFonts::bundled().unwrap();
        let img = compose_badge(&qr(290), &layout(), 7, "Asha Shah", &fonts).unwrap();
        assert!(dark_pixels_below(&img, 300) > 0);
    }

    #[test]
    fn test_without_fonts_composition_fails() {
        let result = compose_badge(&qr(50), &layout(), 1, "Someone", &LabelFonts::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_font_files_fall_back_to_bundled() {
        let fonts = LabelFonts::load(&FontConfig {
            bold: vec![PathBuf::from("/nonexistent/bold.ttf")],
            regular: vec![],
        })
        .unwrap();
        assert!(!fonts.is_empty());

        let img = compose_badge(&qr(290), &layout(), 7, "Asha Shah", &fonts).unwrap();
        assert!(dark_pixels_below(&img, 300) > 0);
    }

    #[test]
    fn test_invalid_font_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        fs::write(&bogus, b"not a font").unwrap();

        assert!(load_first(&[bogus]).is_none());
    }

    #[test]
    fn test_first_readable_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("label.ttf");
        fs::write(&font, BUNDLED_FONT).unwrap();

        let fonts = LabelFonts::load(&FontConfig {
            bold: vec![PathBuf::from("/nonexistent/bold.ttf"), font],
            regular: vec![],
        })
        .unwrap();
        assert!(fonts.get(FontWeight::Regular).is_some());
    }
}
