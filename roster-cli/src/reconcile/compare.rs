//! Field-by-field comparison of workbook rows against store records

use std::fmt;

use serde::{Serialize, Serializer};

use crate::excel::{SourceRow, SourceSheet};
use crate::snapshot::{StoreRecord, StoreSnapshot};

use super::report::{Discrepancy, ExtraInStore, MissingInStore, Report, Summary};

/// Rules used to decide whether two records agree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparePolicy {
    /// Normalized comparison that only fires on values present in the workbook.
    ///
    /// Age and blood group are compared only when the workbook has a value; a
    /// value that exists only in the store is never reported.
    #[default]
    Lenient,
    /// Plain equality of every field, absent values included
    Exact,
}

/// Compared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Age,
    BloodGroup,
    EmergencyContact,
}

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Age => "Age",
            Field::BloodGroup => "Blood",
            Field::EmergencyContact => "Emergency",
        }
    }

    fn quoted(&self) -> bool {
        !matches!(self, Field::Age)
    }
}

/// One field that disagrees between workbook and store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    pub field: Field,
    pub excel: Option<String>,
    pub store: Option<String>,
}

impl FieldMismatch {
    fn new(field: Field, excel: Option<String>, store: Option<String>) -> Self {
        Self { field, excel, store }
    }
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |v: &Option<String>| match v {
            Some(v) if self.field.quoted() => format!("'{}'", v),
            Some(v) => v.clone(),
            None => "None".to_string(),
        };
        write!(
            f,
            "{}: Excel={} vs DB={}",
            self.field.label(),
            render(&self.excel),
            render(&self.store)
        )
    }
}

impl Serialize for FieldMismatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Case-insensitive form with all whitespace removed
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Trimmed value, `None` when empty
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Compare one workbook row with its store record
pub fn compare_record(row: &SourceRow, store: &StoreRecord, policy: ComparePolicy) -> Vec<FieldMismatch> {
    match policy {
        ComparePolicy::Lenient => compare_lenient(row, store),
        ComparePolicy::Exact => compare_exact(row, store),
    }
}

fn compare_lenient(row: &SourceRow, store: &StoreRecord) -> Vec<FieldMismatch> {
    let mut issues = Vec::new();

    if let (Some(excel), Some(db)) = (non_empty(row.name.as_deref()), non_empty(store.name.as_deref())) {
        if normalize(excel) != normalize(db) {
            issues.push(FieldMismatch::new(
                Field::Name,
                Some(excel.to_string()),
                Some(db.to_string()),
            ));
        }
    }

    if let Some(excel) = row.age {
        if store.age != Some(excel) {
            issues.push(FieldMismatch::new(
                Field::Age,
                Some(excel.to_string()),
                store.age.map(|a| a.to_string()),
            ));
        }
    }

    if let Some(excel) = non_empty(row.blood_group.as_deref()) {
        let db = non_empty(store.blood_group.as_deref());
        if db.is_none_or(|db| normalize(excel) != normalize(db)) {
            issues.push(FieldMismatch::new(
                Field::BloodGroup,
                Some(excel.to_string()),
                db.map(str::to_string),
            ));
        }
    }

    if let (Some(excel), Some(db)) = (
        non_empty(row.emergency_contact.as_deref()),
        non_empty(store.emergency_contact.as_deref()),
    ) {
        if excel != db {
            issues.push(FieldMismatch::new(
                Field::EmergencyContact,
                Some(excel.to_string()),
                Some(db.to_string()),
            ));
        }
    }

    issues
}

/// Absent names and contacts compare as empty strings, matching how the
/// corrected dataset stores them.
fn compare_exact(row: &SourceRow, store: &StoreRecord) -> Vec<FieldMismatch> {
    let mut issues = Vec::new();

    let excel_name = row.name.clone().unwrap_or_default();
    let db_name = store.name.clone().unwrap_or_default();
    if excel_name != db_name {
        issues.push(FieldMismatch::new(Field::Name, Some(excel_name), Some(db_name)));
    }

    if row.age != store.age {
        issues.push(FieldMismatch::new(
            Field::Age,
            row.age.map(|a| a.to_string()),
            store.age.map(|a| a.to_string()),
        ));
    }

    if row.blood_group != store.blood_group {
        issues.push(FieldMismatch::new(
            Field::BloodGroup,
            row.blood_group.clone(),
            store.blood_group.clone(),
        ));
    }

    let excel_contact = row.emergency_contact.clone().unwrap_or_default();
    let db_contact = store.emergency_contact.clone().unwrap_or_default();
    if excel_contact != db_contact {
        issues.push(FieldMismatch::new(
            Field::EmergencyContact,
            Some(excel_contact),
            Some(db_contact),
        ));
    }

    issues
}

/// Reconcile workbook rows against a store snapshot
///
/// Every workbook row lands in exactly one of matching, discrepancies or
/// missing-in-store. Store records whose badge is not in the workbook are
/// listed as missing-in-excel, in snapshot order.
pub fn reconcile(sheet: &SourceSheet, store: &StoreSnapshot, policy: ComparePolicy) -> Report {
    if sheet.is_empty() {
        log::warn!("Sheet '{}' has no participant rows", sheet.sheet_name);
    }
    if store.is_empty() {
        log::warn!("Store snapshot has no records, every row will be reported missing");
    }

    let mut matching = 0;
    let mut discrepancies = Vec::new();
    let mut missing_in_db = Vec::new();

    for row in &sheet.rows {
        let Some(record) = store.get(row.badge_number) else {
            log::debug!(
                "Badge #{} (row {}) not found in store",
                row.badge_number,
                row.row_number
            );
            missing_in_db.push(MissingInStore::from(row));
            continue;
        };

        let issues = compare_record(row, record, policy);
        if issues.is_empty() {
            matching += 1;
        } else {
            log::debug!(
                "Badge #{} (row {}): {} field mismatches",
                row.badge_number,
                row.row_number,
                issues.len()
            );
            discrepancies.push(Discrepancy {
                badge: row.badge_number,
                name: row.name.clone(),
                issues,
            });
        }
    }

    let source_badges = sheet.badge_numbers();
    let missing_in_excel: Vec<ExtraInStore> = store
        .records()
        .iter()
        .filter(|r| !source_badges.contains(&r.badge_number))
        .map(|r| ExtraInStore {
            badge: r.badge_number,
            name: r.name.clone(),
        })
        .collect();

    log::info!(
        "Reconciliation complete: {} matching, {} discrepancies, {} missing in store, {} extra in store",
        matching,
        discrepancies.len(),
        missing_in_db.len(),
        missing_in_excel.len()
    );

    Report {
        summary: Summary {
            excel_count: sheet.len(),
            database_count: store.len(),
            matching,
            discrepancies: discrepancies.len(),
            missing_in_db: missing_in_db.len(),
            missing_in_excel: missing_in_excel.len(),
        },
        discrepancies,
        missing_in_db,
        missing_in_excel,
    }
}
