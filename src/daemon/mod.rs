use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Result};
use display::DisplayModule;
use event::AgeEvent;
use ticker::AgeTickerModule;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    notify::GenericNotifier,
    settings::store::{JsonSettingsStore, SettingsStore},
    utils::clock::{Clock, DefaultClock},
};

pub mod args;
pub mod display;
pub mod event;
pub mod shutdown;
pub mod ticker;

const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Represents the starting point for the daemon
pub async fn start_daemon(dir: PathBuf) -> Result<()> {
    let store = JsonSettingsStore::new(dir)?;
    if !store.load().await?.birth_instant().is_set() {
        // Nothing to count from. Same refusal the cli gives on `init`.
        bail!("Birthdate is not set, run `memento set <date>` first");
    }

    let (sender, receiver) = mpsc::channel::<AgeEvent>(10);
    let notifier = GenericNotifier::new()?;

    let shutdown_token = CancellationToken::new();

    let ticker = create_ticker(sender, store, &shutdown_token, DefaultClock);
    let display = DisplayModule::new(receiver, notifier);

    let (_, ticker_result, display_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token),
        ticker.run(),
        display.run(),
    );

    if let Err(ticker_result) = ticker_result {
        error!("Ticker module got an error {:?}", ticker_result);
    }

    if let Err(display_result) = display_result {
        error!("Display module got an error {:?}", display_result);
    }

    Ok(())
}

fn create_ticker<S: SettingsStore>(
    sender: mpsc::Sender<AgeEvent>,
    settings: S,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
) -> AgeTickerModule<S> {
    AgeTickerModule::new(
        sender,
        settings,
        shutdown_token.clone(),
        DEFAULT_TICK_INTERVAL,
        Box::new(clock),
    )
}

#[cfg(test)]
mod daemon_tests {
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use tokio::{sync::mpsc, time::Instant};
    use tokio_util::sync::CancellationToken;

    use crate::{
        age::BirthInstant,
        daemon::{create_ticker, display::DisplayModule, event::AgeEvent},
        notify::MockAgeNotifier,
        settings::{entity::Settings, store::SettingsStore},
        utils::{clock::Clock, logging::TEST_LOGGING},
    };

    #[derive(Clone)]
    struct TestClock {
        start_time: DateTime<Utc>,
        reference: Instant,
    }

    #[async_trait]
    impl Clock for TestClock {
        fn time(&self) -> DateTime<Utc> {
            self.start_time + self.reference.elapsed()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep_until(&self, instant: tokio::time::Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }

    /// In-memory stand-in so the whole pipeline stays on the runtime's own
    /// tasks. File io would run on the blocking pool, which the paused clock
    /// can auto-advance past.
    struct StubStore(Settings);

    impl SettingsStore for StubStore {
        async fn load(&self) -> Result<Settings> {
            Ok(self.0.clone())
        }

        async fn save(&self, _settings: &Settings) -> Result<()> {
            Ok(())
        }
    }

    /// Smoke test for the whole daemon pipeline: stored settings feed the
    /// ticker, which feeds the renderer once a second. Runs on the paused
    /// tokio clock, so the five and a half simulated seconds finish instantly
    /// and the tick count is exact.
    #[tokio::test(start_paused = true)]
    async fn smoke_test_daemon() -> Result<()> {
        *TEST_LOGGING;
        let mut mock_notifier = MockAgeNotifier::new();
        mock_notifier
            .expect_update_age()
            .times(6)
            .returning(|_| Ok(()));

        let born = Utc.with_ymd_and_hms(1990, 3, 14, 8, 0, 0).unwrap();
        let store = StubStore(Settings::with_birthdate(BirthInstant::from_millis(
            born.timestamp_millis(),
        )));

        let shutdown_token = CancellationToken::new();

        let (sender, receiver) = mpsc::channel::<AgeEvent>(10);
        let test_clock = TestClock {
            // Noon, far away from any day boundary in every time zone.
            start_time: Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap(),
            reference: Instant::now(),
        };
        let ticker = create_ticker(sender, store, &shutdown_token, test_clock);
        let display = DisplayModule::new(receiver, mock_notifier);

        let (_, ticker_result, display_result) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(5500)).await;
                shutdown_token.cancel()
            },
            ticker.run(),
            display.run(),
        );

        ticker_result?;
        display_result?;

        Ok(())
    }
}
