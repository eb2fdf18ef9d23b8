//! Console rendering of reconciliation reports

use std::fmt;

use colored::*;

use super::report::Report;

const RULE_WIDTH: usize = 80;

/// Options for console rendering
#[derive(Debug, Clone)]
pub struct ConsoleOptions<'a> {
    pub title: &'a str,
    /// How many discrepancies to list before summarizing the rest
    pub preview_limit: usize,
}

/// A report laid out for the terminal
pub struct ConsoleReport<'a> {
    report: &'a Report,
    options: ConsoleOptions<'a>,
}

impl<'a> ConsoleReport<'a> {
    pub fn new(report: &'a Report, options: ConsoleOptions<'a>) -> Self {
        Self { report, options }
    }
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn section(f: &mut fmt::Formatter<'_>, heading: &str) -> fmt::Result {
    writeln!(f, "\n{}", rule())?;
    writeln!(f, "{}", heading.bold())?;
    writeln!(f, "{}", rule())
}

fn display(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("None")
}

impl fmt::Display for ConsoleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let limit = self.options.preview_limit;
        let summary = &report.summary;

        writeln!(f, "{}", rule())?;
        writeln!(f, "{}", self.options.title.bold())?;
        writeln!(f, "{}", rule())?;
        writeln!(f, "\nExcel records: {}", summary.excel_count)?;
        writeln!(f, "Database records: {}", summary.database_count)?;

        section(f, "SUMMARY")?;
        writeln!(f, "{} Matching records: {}", "✅".green(), summary.matching)?;
        writeln!(f, "{}  Records with discrepancies: {}", "⚠️".yellow(), summary.discrepancies)?;
        writeln!(f, "{} Missing in database: {}", "❌".red(), summary.missing_in_db)?;
        writeln!(f, "{} In database but not in Excel: {}", "❓".cyan(), summary.missing_in_excel)?;

        if !report.discrepancies.is_empty() {
            section(f, "DISCREPANCIES FOUND")?;
            for d in report.discrepancies.iter().take(limit) {
                writeln!(f, "\nBadge #{} - {}", d.badge, display(&d.name))?;
                for issue in &d.issues {
                    writeln!(f, "  {} {}", "❌".red(), issue)?;
                }
            }
            if report.discrepancies.len() > limit {
                writeln!(
                    f,
                    "\n... and {} more discrepancies",
                    report.discrepancies.len() - limit
                )?;
            }
        }

        if !report.missing_in_db.is_empty() {
            section(f, "MISSING IN DATABASE (need to add)")?;
            for m in &report.missing_in_db {
                writeln!(f, "  Badge #{}: {}", m.badge, display(&m.name))?;
            }
        }

        if !report.missing_in_excel.is_empty() {
            section(f, "IN DATABASE BUT NOT IN EXCEL (extra records)")?;
            for m in &report.missing_in_excel {
                writeln!(f, "  Badge #{}: {}", m.badge, display(&m.name))?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", verdict_line(report))
    }
}

/// Final verdict line
pub fn verdict_line(report: &Report) -> String {
    if report.passed() {
        format!("{} DATA VERIFICATION PASSED - All records match!", "✅".green())
    } else {
        format!(
            "{}  DATA VERIFICATION NEEDS ATTENTION - {} issues found",
            "⚠️".yellow(),
            report.issue_count()
        )
    }
}
