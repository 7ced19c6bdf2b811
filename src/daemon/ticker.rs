use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::{
    age::{compute_age, format_age, is_birthday_today, BirthInstant},
    settings::store::SettingsStore,
    utils::clock::Clock,
};

use super::event::AgeEvent;

/// Produces one refresh per tick and watches the local calendar date for
/// flipping onto the birthday.
pub struct AgeTickerModule<S> {
    next: mpsc::Sender<AgeEvent>,
    settings: S,
    shutdown: CancellationToken,
    tick_interval: Duration,
    time_provider: Box<dyn Clock>,
    current_day: Option<NaiveDate>,
}

impl<S: SettingsStore> AgeTickerModule<S> {
    pub fn new(
        next: mpsc::Sender<AgeEvent>,
        settings: S,
        shutdown: CancellationToken,
        tick_interval: Duration,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            settings,
            shutdown,
            tick_interval,
            time_provider,
            current_day: None,
        }
    }

    /// Settings are reloaded on every tick, so a birthdate edited through
    /// `memento set` shows up without restarting the daemon.
    async fn tick(&mut self) -> Result<Vec<AgeEvent>> {
        let settings = self.settings.load().await?;
        let now = self.time_provider.time().with_timezone(&Local);
        Ok(self.evaluate(settings.birth_instant(), now))
    }

    /// The calendar-dependent part of a tick, separated from the clock and the
    /// store so it can be exercised with fixed instants.
    fn evaluate<Tz: TimeZone>(&mut self, birth: BirthInstant, now: DateTime<Tz>) -> Vec<AgeEvent> {
        let today = now.date_naive();
        let previous_day = self.current_day.replace(today);

        if !birth.is_set() {
            warn!("Birthdate is not set, nothing to display");
            return vec![];
        }

        let breakdown = compute_age(birth, now.clone());
        let mut events = vec![AgeEvent::Refresh {
            text: format_age(&breakdown),
        }];

        // At most once per day change, and never on the first tick after
        // start. A save on the birthday itself is handled by the cli.
        if matches!(previous_day, Some(previous) if previous != today)
            && is_birthday_today(birth, now)
        {
            events.push(AgeEvent::Birthday);
        }
        events
    }

    /// Executes the ticker event loop.
    pub async fn run(mut self) -> Result<()> {
        let mut tick_point = self.time_provider.instant();
        loop {
            tick_point += self.tick_interval;

            match self.tick().await {
                Ok(events) => {
                    for event in events {
                        debug!("Sending event {:?}", event);
                        self.next
                            .send(event)
                            .await
                            .inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
                    }
                }
                Err(e) => {
                    error!("Encountered an error during a tick {:?}", e)
                }
            }

            tokio::select! {
                // Cancelation stops the event loop. That also drops the sender
                // channel and consequently stops the display module.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.time_provider.sleep_until(tick_point) => ()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use chrono::{DateTime, TimeZone, Utc};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use crate::{
        age::BirthInstant,
        daemon::event::AgeEvent,
        settings::{entity::Settings, store::SettingsStore},
        utils::clock::DefaultClock,
    };

    use super::AgeTickerModule;

    struct StubStore;

    impl SettingsStore for StubStore {
        async fn load(&self) -> Result<Settings> {
            Ok(Settings::default())
        }

        async fn save(&self, _settings: &Settings) -> Result<()> {
            Ok(())
        }
    }

    fn test_ticker() -> AgeTickerModule<StubStore> {
        let (sender, _receiver) = mpsc::channel::<AgeEvent>(10);
        AgeTickerModule::new(
            sender,
            StubStore,
            CancellationToken::new(),
            Duration::from_secs(1),
            Box::new(DefaultClock),
        )
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn birth(y: i32, mo: u32, d: u32) -> BirthInstant {
        BirthInstant::from_millis(utc(y, mo, d, 8, 0, 0).timestamp_millis())
    }

    #[test]
    fn test_unset_birthdate_produces_no_events() {
        let mut ticker = test_ticker();
        let events = ticker.evaluate(BirthInstant::from_millis(0), utc(2024, 3, 14, 12, 0, 0));
        assert!(events.is_empty());
    }

    #[test]
    fn test_every_tick_refreshes_the_readout() {
        let mut ticker = test_ticker();
        let events = ticker.evaluate(birth(1990, 6, 15), utc(2024, 3, 13, 12, 0, 0));
        assert!(matches!(events.as_slice(), [AgeEvent::Refresh { .. }]));
    }

    #[test]
    fn test_first_tick_never_fires_the_birthday() {
        let mut ticker = test_ticker();
        // Started directly on the birthday, still only a refresh.
        let events = ticker.evaluate(birth(1990, 3, 14), utc(2024, 3, 14, 12, 0, 0));
        assert!(matches!(events.as_slice(), [AgeEvent::Refresh { .. }]));
    }

    #[test]
    fn test_day_change_onto_the_birthday_fires_once() {
        let mut ticker = test_ticker();
        let born = birth(1990, 3, 14);

        ticker.evaluate(born, utc(2024, 3, 13, 23, 59, 59));
        let at_midnight = ticker.evaluate(born, utc(2024, 3, 14, 0, 0, 0));
        assert!(matches!(
            at_midnight.as_slice(),
            [AgeEvent::Refresh { .. }, AgeEvent::Birthday]
        ));

        // Later ticks of the same day refresh only.
        let later = ticker.evaluate(born, utc(2024, 3, 14, 0, 0, 1));
        assert!(matches!(later.as_slice(), [AgeEvent::Refresh { .. }]));
    }

    #[test]
    fn test_day_change_off_the_birthday_stays_quiet() {
        let mut ticker = test_ticker();
        let born = birth(1990, 3, 14);

        ticker.evaluate(born, utc(2024, 3, 14, 23, 59, 59));
        let next_day = ticker.evaluate(born, utc(2024, 3, 15, 0, 0, 0));
        assert!(matches!(next_day.as_slice(), [AgeEvent::Refresh { .. }]));
    }
}
