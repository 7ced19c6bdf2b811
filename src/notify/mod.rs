//! The notification boundary. [GenericNotifier] is the main artifact of this
//! module, picking whatever the host can render: `notify-send` bubbles on
//! linux, a rewritten terminal line everywhere else.

#[cfg(not(target_os = "linux"))]
pub mod console;
#[cfg(target_os = "linux")]
pub mod notify_send;

use anyhow::Result;
use async_trait::async_trait;

pub const NOTIFICATION_TITLE: &str = "Memento Mori";
pub const BIRTHDAY_TITLE: &str = "A Reminder";
pub const BIRTHDAY_BODY: &str =
    "Another year closer to the end. Make it count. Happy Birthday.";

/// Intended to serve as a contract the per-platform renderers must implement.
/// Async because the linux renderer shells out, and the daemon runtime is a
/// single thread that must keep ticking while a render is in flight.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgeNotifier: Send {
    /// Replaces the persistent age readout with new text.
    async fn update_age(&mut self, text: &str) -> Result<()>;

    /// Fires the high priority birthday reminder. Callers gate this to once
    /// per day change and once right after a same-day birthdate save.
    async fn birthday_reminder(&mut self) -> Result<()>;
}

/// Serves as a cross-compatible AgeNotifier implementation.
pub struct GenericNotifier {
    inner: Box<dyn AgeNotifier>,
}

impl GenericNotifier {
    pub fn new() -> Result<Self> {
        cfg_if::cfg_if! {
            if #[cfg(target_os = "linux")] {
                Ok(Self {
                    inner: Box::new(notify_send::NotifySendNotifier::new()),
                })
            }
            else {
                Ok(Self {
                    inner: Box::new(console::ConsoleNotifier),
                })
            }
        }
    }
}

#[async_trait]
impl AgeNotifier for GenericNotifier {
    async fn update_age(&mut self, text: &str) -> Result<()> {
        self.inner.update_age(text).await
    }

    async fn birthday_reminder(&mut self) -> Result<()> {
        self.inner.birthday_reminder().await
    }
}
