//! `roster generate`: corrected dataset from the workbook

use anyhow::Result;
use colored::*;

use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::dataset::{Completeness, build_participants, write_participants};
use crate::participant::{IdentityDeriver, Participant};

use super::{banner, load_sheet, pick};

const SAMPLE_SIZE: usize = 5;

pub fn handle_generate_command(args: GenerateArgs, config: &Config) -> Result<()> {
    let output = pick(&args.output, &config.dataset.output);
    let sheet = load_sheet(&args.workbook, &config.workbook)?;
    println!("Loaded {} rows from {}", sheet.len(), sheet.sheet_name);

    let identity = IdentityDeriver::new(&config.identity);
    let participants = build_participants(&sheet, &identity);
    write_participants(&participants, &output)?;

    println!();
    banner("CORRECTED DATASET");
    println!(
        "{} Created {} records",
        "✅".green(),
        participants.len().to_string().bold()
    );
    println!("Saved to: {}", output.display().to_string().cyan());

    let c = Completeness::of(&participants);
    println!();
    println!("Data completeness:");
    println!("  With age: {}/{}", c.with_age, c.total);
    println!("  With blood group: {}/{}", c.with_blood_group, c.total);
    println!("  With photo: {}/{}", c.with_photo, c.total);

    if !participants.is_empty() {
        println!();
        println!("First {} records:", SAMPLE_SIZE);
        for p in participants.iter().take(SAMPLE_SIZE) {
            println!("  {}", sample_line(p));
        }

        println!();
        println!("Last {} records:", SAMPLE_SIZE);
        let skip = participants.len().saturating_sub(SAMPLE_SIZE);
        for p in participants.iter().skip(skip) {
            println!("  {}", sample_line(p));
        }
    }

    Ok(())
}

fn sample_line(p: &Participant) -> String {
    let age = p.age.map_or_else(|| "None".to_string(), |a| a.to_string());
    format!(
        "#{}: {} (Age: {}, Blood: {})",
        p.badge_number,
        p.name,
        age,
        p.blood_group.as_deref().unwrap_or("None")
    )
}
