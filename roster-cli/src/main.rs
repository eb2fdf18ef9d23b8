//! `roster`: participant roster reconciliation and QR badge tooling

mod archive;
mod cli;
mod config;
mod dataset;
mod excel;
mod participant;
mod qr;
mod reconcile;
mod snapshot;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use cli::commands::{compare, generate, inspect, pack, qr as qr_command, verify};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate(args) => generate::handle_generate_command(args, &config),
        Commands::Compare(args) => compare::handle_compare_command(args, &config),
        Commands::Verify(args) => verify::handle_verify_command(args, &config),
        Commands::Qr(args) => qr_command::handle_qr_command(args, &config),
        Commands::Pack(args) => pack::handle_pack_command(args, &config),
        Commands::Inspect(args) => inspect::handle_inspect_command(args, &config),
    }
}
