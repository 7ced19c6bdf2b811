use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::warn;

use super::{AgeNotifier, BIRTHDAY_BODY, BIRTHDAY_TITLE, NOTIFICATION_TITLE};

/// Renders through the `notify-send` binary. The first update captures the
/// server-assigned notification id so later updates replace the bubble in
/// place instead of stacking a new one every second.
pub struct NotifySendNotifier {
    replace_id: Option<u32>,
}

impl NotifySendNotifier {
    pub fn new() -> Self {
        Self { replace_id: None }
    }
}

impl Default for NotifySendNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgeNotifier for NotifySendNotifier {
    async fn update_age(&mut self, text: &str) -> Result<()> {
        let mut command = Command::new("notify-send");
        command.args(["--print-id", "--urgency=low", "--app-name", NOTIFICATION_TITLE]);
        if let Some(id) = self.replace_id {
            command.arg(format!("--replace-id={id}"));
        }
        command.arg(NOTIFICATION_TITLE);
        command.arg(format!("💀 {text}"));

        let output = command.output().await.context("Failed to run notify-send")?;
        if !output.status.success() {
            warn!("notify-send exited with {}", output.status);
            return Ok(());
        }
        if let Ok(id) = String::from_utf8_lossy(&output.stdout).trim().parse::<u32>() {
            self.replace_id = Some(id);
        }
        Ok(())
    }

    async fn birthday_reminder(&mut self) -> Result<()> {
        let status = Command::new("notify-send")
            .args(["--urgency=critical", "--app-name", NOTIFICATION_TITLE])
            .arg(BIRTHDAY_TITLE)
            .arg(BIRTHDAY_BODY)
            .status()
            .await
            .context("Failed to run notify-send")?;
        if !status.success() {
            warn!("notify-send exited with {status}");
        }
        Ok(())
    }
}
