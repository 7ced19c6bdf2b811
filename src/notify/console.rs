use std::io::{stdout, Write};

use anyhow::Result;
use async_trait::async_trait;

use super::{AgeNotifier, BIRTHDAY_BODY, BIRTHDAY_TITLE};

/// Fallback renderer for hosts without a notification service: keeps
/// rewriting a single terminal line.
pub struct ConsoleNotifier;

#[async_trait]
impl AgeNotifier for ConsoleNotifier {
    async fn update_age(&mut self, text: &str) -> Result<()> {
        print!("\r💀 {text}");
        stdout().flush()?;
        Ok(())
    }

    async fn birthday_reminder(&mut self) -> Result<()> {
        println!("\n{BIRTHDAY_TITLE}: {BIRTHDAY_BODY}");
        Ok(())
    }
}
