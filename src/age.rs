//! Age arithmetic shared by the daemon, the notifier and the cli.
//! Everything here is a pure function of (birth instant, current instant),
//! recomputed from scratch on every call.

use chrono::{DateTime, Datelike, TimeZone};

/// Reserved settings value meaning "no birthdate configured".
pub const UNSET_BIRTHDATE_MILLIS: i64 = 0;

/// Text shown wherever an age would go while no birthdate is stored.
pub const UNSET_PLACEHOLDER: &str = "Set birthdate";

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A birth moment the way settings store it: milliseconds since the Unix
/// epoch, with [UNSET_BIRTHDATE_MILLIS] standing in for "not configured".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthInstant(i64);

impl BirthInstant {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    pub fn is_set(&self) -> bool {
        self.0 != UNSET_BIRTHDATE_MILLIS
    }

    /// Resolves the stored timestamp in the calendar of `tz`.
    pub fn to_datetime<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_millis_opt(self.0).single()
    }
}

/// Snapshot of an age at one instant. All numeric fields stay at zero while
/// `valid` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBreakdown {
    /// Whole calendar years lived.
    pub years: i32,
    /// Whole days since the most recent birthday anniversary.
    pub days: i64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub valid: bool,
}

impl AgeBreakdown {
    pub const UNSET: AgeBreakdown = AgeBreakdown {
        years: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        valid: false,
    };
}

/// Breaks the time lived between `birth` and `now` into years, days past the
/// last anniversary and an hh:mm:ss component.
///
/// Years use the ordinary whole-year rule: the calendar year difference,
/// minus one while this year's (month, day) hasn't reached the birth's yet.
/// The hh:mm:ss part is seconds lived wrapped to a 24 hour cycle, not the
/// wall clock time of day. That is how every previous rendition of this
/// display behaved and it stays that way.
pub fn compute_age<Tz: TimeZone>(birth: BirthInstant, now: DateTime<Tz>) -> AgeBreakdown {
    if !birth.is_set() {
        return AgeBreakdown::UNSET;
    }
    let Some(born) = birth.to_datetime(&now.timezone()) else {
        return AgeBreakdown::UNSET;
    };

    let mut years = now.year() - born.year();
    if (now.month(), now.day()) < (born.month(), born.day()) {
        years -= 1;
    }

    let Some(anniversary) = anniversary_of(&born, born.year() + years) else {
        return AgeBreakdown::UNSET;
    };
    let days = now
        .clone()
        .signed_duration_since(anniversary)
        .num_milliseconds()
        / MILLIS_PER_DAY;

    let total_seconds = (now.timestamp_millis() - birth.millis()).div_euclid(1000);
    let in_day = total_seconds.rem_euclid(SECONDS_PER_DAY);

    AgeBreakdown {
        years,
        days,
        hours: (in_day / 3600) as u32,
        minutes: (in_day % 3600 / 60) as u32,
        seconds: (in_day % 60) as u32,
        valid: true,
    }
}

/// The birth moment with its year field replaced. A Feb 29 birth in a year
/// without one lands on Mar 1, the same rollover a lenient `Calendar` or a JS
/// `Date` performs.
fn anniversary_of<Tz: TimeZone>(born: &DateTime<Tz>, year: i32) -> Option<DateTime<Tz>> {
    born.with_year(year)
        .or_else(|| born.with_day(1)?.with_month(3)?.with_year(year))
}

/// Renders a breakdown as `{years}y {days}d {hh}:{mm}:{ss}`, or the fixed
/// placeholder while no birthdate is stored.
pub fn format_age(age: &AgeBreakdown) -> String {
    if !age.valid {
        return UNSET_PLACEHOLDER.to_string();
    }
    format!(
        "{}y {}d {:02}:{:02}:{:02}",
        age.years, age.days, age.hours, age.minutes, age.seconds
    )
}

/// True iff `reference` falls on the stored birthday: month and day-of-month
/// equality, year ignored. The unset sentinel never matches.
pub fn is_birthday_today<Tz: TimeZone>(birth: BirthInstant, reference: DateTime<Tz>) -> bool {
    if !birth.is_set() {
        return false;
    }
    let Some(born) = birth.to_datetime(&reference.timezone()) else {
        return false;
    };
    born.month() == reference.month() && born.day() == reference.day()
}

/// Whole-life counters for the details view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifetimeTotals {
    pub days: i64,
    pub hours: i64,
}

pub fn lifetime_totals<Tz: TimeZone>(
    birth: BirthInstant,
    now: DateTime<Tz>,
) -> Option<LifetimeTotals> {
    if !birth.is_set() {
        return None;
    }
    let elapsed = now.timestamp_millis() - birth.millis();
    Some(LifetimeTotals {
        days: elapsed / MILLIS_PER_DAY,
        hours: elapsed / MILLIS_PER_HOUR,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::{
        compute_age, format_age, is_birthday_today, lifetime_totals, BirthInstant,
        UNSET_PLACEHOLDER,
    };

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn birth(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> BirthInstant {
        BirthInstant::from_millis(utc(y, mo, d, h, mi, s).timestamp_millis())
    }

    #[test]
    fn unset_sentinel_is_invalid() {
        let unset = BirthInstant::from_millis(0);
        for now in [utc(1970, 1, 1, 0, 0, 0), utc(2024, 6, 15, 12, 30, 5)] {
            let age = compute_age(unset, now);
            assert!(!age.valid);
            assert_eq!((age.years, age.days), (0, 0));
            assert_eq!((age.hours, age.minutes, age.seconds), (0, 0, 0));
            assert!(!is_birthday_today(unset, now));
            assert_eq!(lifetime_totals(unset, now), None);
        }
    }

    #[test]
    fn years_flip_exactly_on_the_anniversary_date() {
        let born = birth(2000, 6, 15, 0, 0, 0);

        let before = compute_age(born, utc(2024, 6, 14, 23, 59, 59));
        assert_eq!(before.years, 23);

        let after = compute_age(born, utc(2024, 6, 15, 0, 0, 0));
        assert_eq!(after.years, 24);
        assert_eq!(after.days, 0);
    }

    #[test]
    fn day_count_grows_monotonically_within_a_year() {
        let born = birth(2000, 6, 15, 0, 0, 0);
        let anniversary = utc(2023, 6, 15, 0, 0, 0);

        let mut previous = -1;
        for offset in [0, 1, 30, 180, 300, 364] {
            let now = anniversary + Duration::days(offset) + Duration::hours(12);
            let age = compute_age(born, now);
            assert_eq!(age.years, 23);
            assert_eq!(age.days, offset);
            assert!(age.days >= previous);
            previous = age.days;
        }
    }

    #[test]
    fn clock_wraps_at_twenty_four_hours() {
        let born = birth(2000, 1, 1, 0, 0, 0);
        // 1 day, 1 hour, 1 minute, 1.001 seconds
        let now = utc(2000, 1, 1, 0, 0, 0) + Duration::milliseconds(90_061_001);

        let age = compute_age(born, now);
        assert_eq!(age.years, 0);
        assert_eq!(age.days, 1);
        assert_eq!((age.hours, age.minutes, age.seconds), (1, 1, 1));
    }

    #[test]
    fn clock_shows_time_lived_not_time_of_day() {
        let born = birth(2000, 1, 1, 6, 0, 0);
        // Wall clock says 18:30, but only 12:30:00 have been lived.
        let age = compute_age(born, utc(2000, 1, 1, 18, 30, 0));
        assert_eq!((age.hours, age.minutes, age.seconds), (12, 30, 0));
    }

    #[test]
    fn birthday_matches_on_month_and_day_only() {
        let born = birth(1990, 3, 14, 8, 0, 0);
        assert!(is_birthday_today(born, utc(2024, 3, 14, 0, 0, 0)));
        assert!(is_birthday_today(born, utc(1991, 3, 14, 23, 59, 59)));
        assert!(!is_birthday_today(born, utc(2024, 3, 15, 0, 0, 0)));
        assert!(!is_birthday_today(born, utc(2024, 4, 14, 0, 0, 0)));
    }

    #[test]
    fn identical_inputs_produce_identical_output() {
        let born = birth(1990, 3, 14, 8, 0, 0);
        let now = utc(2024, 6, 15, 12, 30, 5);
        assert_eq!(compute_age(born, now), compute_age(born, now));
    }

    #[test]
    fn placeholder_formats_the_same_for_any_now() {
        let unset = BirthInstant::from_millis(0);
        for now in [utc(1970, 1, 2, 0, 0, 0), utc(2030, 12, 31, 23, 59, 59)] {
            assert_eq!(format_age(&compute_age(unset, now)), UNSET_PLACEHOLDER);
        }
    }

    #[test]
    fn format_pads_time_components_only() {
        let born = birth(2000, 1, 1, 0, 0, 0);
        let age = compute_age(born, utc(2024, 6, 15, 1, 2, 3));
        assert_eq!(format_age(&age), "24y 166d 01:02:03");
    }

    #[test]
    fn leap_day_anniversary_rolls_to_march_first() {
        let born = birth(2000, 2, 29, 0, 0, 0);

        // (3, 1) is not before (2, 29), so a full year is counted and the
        // missing Feb 29 anniversary lands on Mar 1.
        let off_year = compute_age(born, utc(2001, 3, 1, 0, 0, 0));
        assert_eq!(off_year.years, 1);
        assert_eq!(off_year.days, 0);

        let leap_year = compute_age(born, utc(2004, 2, 29, 0, 0, 0));
        assert_eq!(leap_year.years, 4);
        assert_eq!(leap_year.days, 0);
    }

    #[test]
    fn lifetime_totals_count_whole_units() {
        let born = birth(2000, 1, 1, 0, 0, 0);
        let totals = lifetime_totals(born, utc(2000, 1, 3, 1, 30, 0)).unwrap();
        assert_eq!(totals.days, 2);
        assert_eq!(totals.hours, 49);
    }
}
