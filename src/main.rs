#![deny(unsafe_code)]
pub mod commands;

use anyhow::Result;
use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

/// Custom styles for CLI help output
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());
use commands::command::Command;
use commands::count::CountReads;
use commands::samplesheet::SampleSheet;
use commands::split::Split;
use commands::tag::TagBarcodes;
use enum_dispatch::enum_dispatch;
use env_logger::Env;
use log::info;

#[derive(Parser, Debug)]
#[command(styles = STYLES)]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[enum_dispatch(Command)]
#[derive(Parser, Debug)]
#[command(version)]
enum Subcommand {
    // Core
    #[command(display_order = 1)]
    Split(Split),

    // Utilities
    #[command(display_order = 2)]
    Samplesheet(SampleSheet),
    #[command(display_order = 3)]
    Tag(TagBarcodes),
    #[command(display_order = 4)]
    Count(CountReads),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Capture full command line BEFORE clap parsing for @PG records
    let command_line = std::env::args().collect::<Vec<_>>().join(" ");

    let args = Args::parse();

    info!("Running scsplit version {}", env!("CARGO_PKG_VERSION"));
    args.subcommand.execute(&command_line)
}
