//! Reconciliation of the roster workbook against a store snapshot
//!
//! This module handles:
//! - Matching workbook rows to store records by badge number
//! - Diffing fields under a [`ComparePolicy`]
//! - Building a report and rendering it to the console, JSON or Excel

mod compare;
mod render;
mod report;
mod xlsx;

pub use compare::{ComparePolicy, reconcile};
pub use render::{ConsoleOptions, ConsoleReport};
pub use xlsx::export_report_to_excel;
