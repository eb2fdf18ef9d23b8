//! Corrected participant dataset
//!
//! Builds one [`Participant`] per workbook row and writes the sorted list as
//! the JSON file every later step reads.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::excel::{SourceRow, SourceSheet};
use crate::participant::{IdentityDeriver, Participant};

/// How many records carry each optional field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completeness {
    pub total: usize,
    pub with_age: usize,
    pub with_blood_group: usize,
    pub with_photo: usize,
}

impl Completeness {
    pub fn of(participants: &[Participant]) -> Self {
        Self {
            total: participants.len(),
            with_age: participants.iter().filter(|p| p.age.is_some()).count(),
            with_blood_group: participants.iter().filter(|p| p.blood_group.is_some()).count(),
            with_photo: participants.iter().filter(|p| p.photo_uri.is_some()).count(),
        }
    }
}

/// Build a participant from a workbook row
pub fn participant_from_row(row: &SourceRow, identity: &IdentityDeriver) -> Participant {
    let badge = row.badge_number;
    let emergency = row.emergency_contact.clone().unwrap_or_default();

    Participant {
        uuid: identity.uuid(badge).to_string(),
        name: row.name.clone().unwrap_or_default(),
        mobile: emergency.clone(),
        qr_token: identity.qr_token(badge),
        emergency_contact: emergency,
        photo_uri: row.photo_uri.clone(),
        blood_group: row.blood_group.clone(),
        age: row.age,
        badge_number: badge,
    }
}

/// Build all participants, sorted ascending by badge number
pub fn build_participants(sheet: &SourceSheet, identity: &IdentityDeriver) -> Vec<Participant> {
    let mut participants: Vec<Participant> = sheet
        .rows
        .iter()
        .map(|row| participant_from_row(row, identity))
        .collect();
    participants.sort_by_key(|p| p.badge_number);
    participants
}

/// Write participants as an indented JSON array
pub fn write_participants(participants: &[Participant], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(participants)
        .context("Failed to serialize participants")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write participants to: {}", path.display()))?;
    log::info!("Wrote {} participants to {}", participants.len(), path.display());
    Ok(())
}

/// Read a participant JSON array written by [`write_participants`]
pub fn read_participants(path: &Path) -> Result<Vec<Participant>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read participants file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse participants file: {}", path.display()))
}
