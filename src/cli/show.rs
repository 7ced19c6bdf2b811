use std::{
    io::{stdout, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::Parser;

use crate::{
    age::{compute_age, format_age, lifetime_totals, BirthInstant},
    settings::store::{JsonSettingsStore, SettingsStore},
};

#[derive(Debug, Parser)]
pub struct ShowCommand {
    #[arg(long, help = "Also print whole-life totals and the stored birthdate")]
    details: bool,
    #[arg(short, long, help = "Keep refreshing the readout every second")]
    watch: bool,
}

/// Command to process `show`. One shot by default, `--watch` turns it into an
/// in-terminal rendition of the daemon readout.
pub async fn process_show_command(
    ShowCommand { details, watch }: ShowCommand,
    app_dir: PathBuf,
) -> Result<()> {
    let store = JsonSettingsStore::new(app_dir)?;
    let birth = store.load().await?.birth_instant();

    if watch {
        return watch_age(birth).await;
    }

    let now = Local::now();
    println!("💀 {}", format_age(&compute_age(birth, now)));

    if details {
        print_details(birth, now);
    }
    Ok(())
}

fn print_details(birth: BirthInstant, now: DateTime<Local>) {
    let Some(totals) = lifetime_totals(birth, now) else {
        return;
    };
    println!();
    println!("Total days: {}", totals.days);
    println!("Total hours: {}", totals.hours);
    if let Some(born) = birth.to_datetime(&Local) {
        println!("Birthdate: {}", born.format("%Y-%m-%d %H:%M:%S"));
    }
    println!();
    println!("Remember, you will die.");
}

async fn watch_age(birth: BirthInstant) -> Result<()> {
    loop {
        print!("\r💀 {}", format_age(&compute_age(birth, Local::now())));
        stdout().flush()?;
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
