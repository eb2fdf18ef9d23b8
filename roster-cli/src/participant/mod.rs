//! Participant model and the values derived from a badge number
//!
//! Every derived field (`uuid`, `qrToken`) depends on the badge number and the
//! configured prefixes only, so regenerating from the same workbook reproduces
//! them exactly.

mod sanitize;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use sanitize::{display_name, sanitize_filename};

use crate::config::IdentityConfig;

/// A participant record as written to the corrected dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub uuid: String,
    pub name: String,
    /// Emergency contact, reused as the mobile number
    pub mobile: String,
    pub qr_token: String,
    pub emergency_contact: String,
    pub photo_uri: Option<String>,
    pub blood_group: Option<String>,
    pub age: Option<i64>,
    pub badge_number: u32,
}

/// Derives identifiers for participants from their badge numbers
#[derive(Debug, Clone)]
pub struct IdentityDeriver {
    uuid_prefix: String,
    token_prefix: String,
}

impl IdentityDeriver {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            uuid_prefix: config.uuid_prefix.clone(),
            token_prefix: config.token_prefix.clone(),
        }
    }

    /// Name-based (v5) UUID in the DNS namespace
    pub fn uuid(&self, badge: u32) -> Uuid {
        let name = format!("{}{}", self.uuid_prefix, badge);
        Uuid::new_v5(&Uuid::NAMESPACE_DNS, name.as_bytes())
    }

    /// Scan token encoded into the participant's QR symbol
    pub fn qr_token(&self, badge: u32) -> String {
        format!("{}{}", self.token_prefix, badge)
    }
}

impl Default for IdentityDeriver {
    fn default() -> Self {
        Self::new(&IdentityConfig::default())
    }
}
