//! Reconciliation report value and its JSON form

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::excel::SourceRow;

use super::compare::FieldMismatch;

/// Outcome of reconciling the workbook against a store snapshot
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub discrepancies: Vec<Discrepancy>,
    pub missing_in_db: Vec<MissingInStore>,
    pub missing_in_excel: Vec<ExtraInStore>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub excel_count: usize,
    pub database_count: usize,
    pub matching: usize,
    pub discrepancies: usize,
    pub missing_in_db: usize,
    pub missing_in_excel: usize,
}

/// A badge present on both sides whose fields disagree
#[derive(Debug, Clone, Serialize)]
pub struct Discrepancy {
    pub badge: u32,
    pub name: Option<String>,
    pub issues: Vec<FieldMismatch>,
}

/// A workbook row with no store record, with the fields needed to add it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingInStore {
    pub badge: u32,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub blood_group: Option<String>,
    pub emergency_contact: Option<String>,
    pub photo: Option<String>,
}

impl From<&SourceRow> for MissingInStore {
    fn from(row: &SourceRow) -> Self {
        Self {
            badge: row.badge_number,
            name: row.name.clone(),
            age: row.age,
            blood_group: row.blood_group.clone(),
            emergency_contact: row.emergency_contact.clone(),
            photo: row.photo_uri.clone(),
        }
    }
}

/// A store record whose badge is not in the workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraInStore {
    pub badge: u32,
    pub name: Option<String>,
}

impl Report {
    /// No discrepancies and nothing missing from the store
    ///
    /// Extra store records do not fail verification.
    pub fn passed(&self) -> bool {
        self.discrepancies.is_empty() && self.missing_in_db.is_empty()
    }

    /// Count of problems that fail verification
    pub fn issue_count(&self) -> usize {
        self.discrepancies.len() + self.missing_in_db.len()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write report to: {}", path.display()))?;
        log::info!("Report saved to {}", path.display());
        Ok(())
    }
}
