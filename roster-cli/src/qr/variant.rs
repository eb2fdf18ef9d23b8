//! Badge variants and their fixed parameters

use clap::ValueEnum;
use qrcode::EcLevel;

use crate::config::{OutputPaths, QrConfig};
use crate::participant::{Participant, sanitize_filename};

use super::encode::QrStyle;
use super::label::{Align, FontWeight, LabelLayout, TextLine};

/// Longest sanitized name kept in classic filenames
const CLASSIC_NAME_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BadgeVariant {
    /// `QR_<badge:03>_<name>.png`, low error correction, left-aligned label
    Classic,
    /// `<badge>_<name>.png`, bare QR symbol
    Named,
    /// `<badge:03>_<name>.png`, centered label; clears the output directory first
    Labeled,
}

impl std::fmt::Display for BadgeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BadgeVariant::Classic => write!(f, "classic"),
            BadgeVariant::Named => write!(f, "named"),
            BadgeVariant::Labeled => write!(f, "labeled"),
        }
    }
}

impl BadgeVariant {
    pub fn style(&self) -> QrStyle {
        match self {
            BadgeVariant::Classic => QrStyle::new(EcLevel::L, 10),
            BadgeVariant::Named | BadgeVariant::Labeled => QrStyle::new(EcLevel::M, 10),
        }
    }

    /// Label geometry, `None` for a bare QR symbol
    pub fn layout(&self) -> Option<LabelLayout> {
        match self {
            BadgeVariant::Classic => Some(LabelLayout {
                side_padding: 0,
                qr_top: 0,
                text_height: 80,
                align: Align::Left(10),
                badge: TextLine {
                    weight: FontWeight::Bold,
                    size: 24.0,
                    offset_y: 10,
                },
                name: TextLine {
                    weight: FontWeight::Regular,
                    size: 16.0,
                    offset_y: 45,
                },
                name_max_chars: 30,
                name_keep_chars: 30,
            }),
            BadgeVariant::Named => None,
            BadgeVariant::Labeled => Some(LabelLayout {
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
            }),
        }
    }

    pub fn file_name(&self, participant: &Participant) -> String {
        let badge = participant.badge_number;
        let safe = sanitize_filename(&participant.name);
        match self {
            BadgeVariant::Classic => {
                let short: String = safe.chars().take(CLASSIC_NAME_CHARS).collect();
                format!("QR_{:03}_{}.png", badge, short)
            }
            BadgeVariant::Named => format!("{}_{}.png", badge, safe),
            BadgeVariant::Labeled => format!("{:03}_{}.png", badge, safe),
        }
    }

    /// Whether existing files in the output directory are removed before a run
    pub fn clears_output(&self) -> bool {
        matches!(self, BadgeVariant::Labeled)
    }

    pub fn paths<'a>(&self, config: &'a QrConfig) -> &'a OutputPaths {
        match self {
            BadgeVariant::Classic => &config.classic,
            BadgeVariant::Named => &config.named,
            BadgeVariant::Labeled => &config.labeled,
        }
    }
}
