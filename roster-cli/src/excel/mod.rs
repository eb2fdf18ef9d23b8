//! Excel import for participant rows
//!
//! The roster sheet carries one participant per row under these headers
//! (surrounding whitespace in header cells is ignored):
//! - "Badge Number"
//! - "Name"
//! - "Age"
//! - "Blood Group"
//! - "Emergency Contact Number"
//! - "Drive Photo Link"

mod cells;
mod inspect;
mod reader;

pub use inspect::{SheetSummary, inspect_workbook};
pub use reader::{SourceRow, SourceSheet, read_source_sheet};

#[cfg(test)]
pub(crate) use reader::tests as fixtures;
