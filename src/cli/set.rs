use std::{fmt::Display, path::PathBuf};

use anyhow::Result;
use chrono::Local;
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    age::{is_birthday_today, BirthInstant},
    notify::{AgeNotifier, GenericNotifier},
    settings::{
        entity::Settings,
        store::{JsonSettingsStore, SettingsStore},
    },
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct SetCommand {
    #[arg(
        help = "Birth moment. Examples are \"15/06/2000\", \"04:30 15/06/2000\", \"1 Jan 1990\""
    )]
    date: String,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Command to process `set`. Parses a human readable birthdate, persists the
/// millisecond timestamp and fires the reminder right away when today already
/// is the birthday. A running daemon picks the new value up on its next tick.
pub async fn process_set_command(
    SetCommand { date, date_style }: SetCommand,
    app_dir: PathBuf,
) -> Result<()> {
    let now = Local::now();
    let born = match parse_date_string(&date, now, date_style.into()) {
        Ok(v) => v,
        Err(e) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate birthdate {e}"),
                )
                .into());
        }
    };

    let birth = BirthInstant::from_millis(born.timestamp_millis());
    let store = JsonSettingsStore::new(app_dir)?;
    store.save(&Settings::with_birthdate(birth)).await?;
    println!("Birthdate saved: {}", born.format("%Y-%m-%d %H:%M:%S"));

    if is_birthday_today(birth, now) {
        GenericNotifier::new()?.birthday_reminder().await?;
    }
    Ok(())
}
