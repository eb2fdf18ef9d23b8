//! Store snapshots: JSON exports of what was imported into the record store
//!
//! Snapshots come from more than one producer, so fields are read loosely:
//! everything except `badgeNumber` is optional, and numeric fields accept
//! either JSON numbers or strings.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer};

/// One record of a store snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    pub badge_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_integer")]
    pub age: Option<i64>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub photo_uri: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) if f.fract() == 0.0 => format!("{}", f as i64),
        Scalar::Float(f) => f.to_string(),
        Scalar::Text(t) => t,
    }))
}

fn loose_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => None,
        Some(Scalar::Int(i)) => Some(i),
        Some(Scalar::Float(f)) => Some(f.trunc() as i64),
        Some(Scalar::Text(t)) => {
            let t = t.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.parse().map_err(|_| {
                    serde::de::Error::custom(format!("expected an integer, got '{}'", t))
                })?)
            }
        }
    })
}

/// Snapshot records with a lookup by badge number
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    records: Vec<StoreRecord>,
    by_badge: HashMap<u32, usize>,
}

impl StoreSnapshot {
    /// Index records by badge number
    ///
    /// Duplicate badge numbers are rejected: which duplicate should win is
    /// not knowable from the snapshot alone.
    pub fn new(records: Vec<StoreRecord>) -> Result<Self> {
        let mut by_badge = HashMap::with_capacity(records.len());
        let mut duplicates = BTreeSet::new();

        for (idx, record) in records.iter().enumerate() {
            if by_badge.insert(record.badge_number, idx).is_some() {
                duplicates.insert(record.badge_number);
            }
        }

        if !duplicates.is_empty() {
            let list: Vec<String> = duplicates.iter().map(|b| b.to_string()).collect();
            bail!("Duplicate badge numbers in snapshot: {}", list.join(", "));
        }

        Ok(Self { records, by_badge })
    }

    /// Load and index a snapshot JSON array
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        let records: Vec<StoreRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;

        log::info!("Loaded {} store records from {}", records.len(), path.display());

        Self::new(records).with_context(|| format!("Invalid snapshot: {}", path.display()))
    }

    pub fn get(&self, badge: u32) -> Option<&StoreRecord> {
        self.by_badge.get(&badge).map(|&idx| &self.records[idx])
    }

    /// Records in snapshot order
    pub fn records(&self) -> &[StoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
