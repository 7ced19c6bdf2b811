use anyhow::Result;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info};

use crate::notify::AgeNotifier;

use super::event::AgeEvent;

/// Consumes ticker events and drives the notification renderer. A failed
/// render is logged and the loop keeps going, the next tick repaints anyway.
pub struct DisplayModule<N> {
    receiver: Receiver<AgeEvent>,
    notifier: N,
}

impl<N: AgeNotifier> DisplayModule<N> {
    pub fn new(receiver: Receiver<AgeEvent>, notifier: N) -> Self {
        Self { receiver, notifier }
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(event) = self.receiver.recv().await {
            debug!("Displaying event {:?}", event);
            if let Err(e) = self.render(&event).await {
                error!("Error displaying event {:?}: {e:?}", event)
            }
        }

        self.receiver.close();
        Ok(())
    }

    async fn render(&mut self, event: &AgeEvent) -> Result<()> {
        match event {
            AgeEvent::Refresh { text } => self.notifier.update_age(text).await,
            AgeEvent::Birthday => {
                info!("Birthday reached, sending the reminder");
                self.notifier.birthday_reminder().await
            }
        }
    }
}
