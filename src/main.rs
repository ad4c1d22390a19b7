//! # slackview CLI
//!
//! Command-line interface for the slackview library.

use std::process;

use clap::Parser as ClapParser;

use slackview::cli::Args;
use slackview::config::{ExportConfig, Zone};
use slackview::export::run_export;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> slackview::Result<()> {
    let args = <Args as ClapParser>::parse();

    let zone = match &args.timezone {
        Some(tz) => Zone::parse(tz)?,
        None => Zone::Local,
    };
    let config = ExportConfig::new()
        .with_work_dir(&args.work_dir)
        .with_zone(zone);

    println!("📦 slackview v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Archive: {}", config.work_dir.display());
    println!(
        "🕒 Zone:    {}",
        args.timezone.as_deref().unwrap_or("local")
    );
    println!();

    let stats = run_export(&config)?;

    println!();
    println!(
        "✅ Exported {} messages across {} channels ({} cached assets)",
        stats.messages, stats.channels, stats.cached_assets
    );
    Ok(())
}
