//! `roster compare`: workbook against an imported store snapshot

use anyhow::Result;
use colored::*;

use crate::cli::CompareArgs;
use crate::config::Config;
use crate::reconcile::{
    ComparePolicy, ConsoleOptions, ConsoleReport, export_report_to_excel, reconcile,
};
use crate::snapshot::StoreSnapshot;

use super::{load_sheet, pick};

const PREVIEW_LIMIT: usize = 20;
const TITLE: &str = "DATA VERIFICATION: Excel vs Database";

pub fn handle_compare_command(args: CompareArgs, config: &Config) -> Result<()> {
    let snapshot_path = pick(&args.snapshot, &config.compare.snapshot);
    let report_path = pick(&args.report, &config.compare.report);
    let xlsx_path = args.xlsx.clone().or_else(|| config.compare.xlsx.clone());

    let sheet = load_sheet(&args.workbook, &config.workbook)?;
    let store = StoreSnapshot::load(&snapshot_path)?;

    let policy = policy_for(args.exact);
    log::debug!("Comparing with {:?} policy", policy);
    let report = reconcile(&sheet, &store, policy);

    let options = ConsoleOptions {
        title: TITLE,
        preview_limit: PREVIEW_LIMIT,
    };
    print!("{}", ConsoleReport::new(&report, options));

    report.write_json(&report_path)?;
    println!(
        "\nDetailed report saved to: {}",
        report_path.display().to_string().cyan()
    );

    if let Some(path) = xlsx_path {
        export_report_to_excel(&report, TITLE, &path)?;
        println!("Excel report saved to: {}", path.display().to_string().cyan());
    }

    Ok(())
}

pub(super) fn policy_for(exact: bool) -> ComparePolicy {
    if exact {
        ComparePolicy::Exact
    } else {
        ComparePolicy::Lenient
    }
}
