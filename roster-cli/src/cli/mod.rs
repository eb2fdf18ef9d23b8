//! Command-line interface definition

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::qr::BadgeVariant;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Participant roster reconciliation and QR badge tooling")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./roster.toml, then the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the corrected participant dataset from the workbook
    Generate(GenerateArgs),
    /// Compare the workbook against an imported store snapshot
    Compare(CompareArgs),
    /// Compare the workbook against the corrected dataset and check generated artifacts
    Verify(VerifyArgs),
    /// Render QR badge images and package them
    Qr(QrArgs),
    /// Package an image directory into a zip in badge-number order
    Pack(PackArgs),
    /// Summarize workbook sheets and extract the main sheet as JSON
    Inspect(InspectArgs),
}

/// Workbook location overrides shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct WorkbookArgs {
    /// Source workbook (.xlsx)
    #[arg(long)]
    pub workbook: Option<PathBuf>,

    /// Sheet holding the participant rows
    #[arg(long)]
    pub sheet: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub workbook: WorkbookArgs,

    /// Output JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub workbook: WorkbookArgs,

    /// Store snapshot JSON
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// JSON report destination
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Also write the report as an Excel workbook
    #[arg(long)]
    pub xlsx: Option<PathBuf>,

    /// Compare every field with plain equality, absent values included
    #[arg(long)]
    pub exact: bool,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub workbook: WorkbookArgs,

    /// Corrected dataset JSON
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Write the JSON report here
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Image directory to count
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Archive to check
    #[arg(long)]
    pub zip: Option<PathBuf>,

    /// Compare every field with plain equality, absent values included
    #[arg(long)]
    pub exact: bool,
}

#[derive(Args, Debug, Clone)]
pub struct QrArgs {
    /// Badge layout and filename scheme
    #[arg(long, value_enum, default_value_t = BadgeVariant::Classic)]
    pub variant: BadgeVariant,

    /// Corrected dataset JSON to render
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Output image directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Output archive
    #[arg(long)]
    pub zip: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    /// Image directory to package
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Output archive
    #[arg(long)]
    pub zip: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub workbook: WorkbookArgs,

    /// Extracted rows JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_qr_variant() {
        let cli = Cli::parse_from(["roster", "qr", "--variant", "labeled", "--dir", "out"]);
        match cli.command {
            Commands::Qr(args) => {
                assert_eq!(args.variant, BadgeVariant::Labeled);
                assert_eq!(args.dir, Some(PathBuf::from("out")));
                assert!(args.zip.is_none());
            }
            _ => panic!("expected qr command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["roster", "compare", "--exact", "--no-color", "--config", "r.toml"]);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("r.toml")));
        match cli.command {
            Commands::Compare(args) => assert!(args.exact),
            _ => panic!("expected compare command"),
        }
    }
}
