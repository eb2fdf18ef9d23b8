//! QR symbol rasterization

use anyhow::{Result, anyhow};
use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode};

/// Fixed encoding parameters for a badge variant
///
/// The quiet zone is always the standard four modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrStyle {
    pub ec_level: EcLevel,
    /// Side of one module in pixels
    pub module_px: u32,
}

impl QrStyle {
    pub const fn new(ec_level: EcLevel, module_px: u32) -> Self {
        Self {
            ec_level,
            module_px,
        }
    }
}

/// Encode `token` as a black-on-white QR image
///
/// The symbol uses the smallest version that holds the token.
pub fn render_qr(token: &str, style: &QrStyle) -> Result<GrayImage> {
    let code = QrCode::with_error_correction_level(token.as_bytes(), style.ec_level)
        .map_err(|e| anyhow!("Failed to encode QR token '{}': {}", token, e))?;

    Ok(code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(style.module_px, style.module_px)
        .build())
}
