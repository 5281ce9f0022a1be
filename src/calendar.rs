use chrono::naive::NaiveDate;
use chrono::{Datelike, Month, Months};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;

use crate::error::{Error, Result};

/// Column of a weekday in the grid, 0 = Sunday … 6 = Saturday.
pub type WeekdayIndex = u32;

pub const DAYS_PER_WEEK: usize = 7;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// The Gregorian calendar repeats every 400 years (146097 days, a whole number
// of weeks), so every year maps onto one inside [CYCLE_BASE, CYCLE_BASE + 400).
const CYCLE_BASE: i32 = 2000;
const CYCLE_YEARS: i32 = 400;

fn first_of_month(year: i32, month: Month) -> NaiveDate {
    NaiveDate::from_ymd_opt(
        CYCLE_BASE + year.rem_euclid(CYCLE_YEARS),
        month.number_from_month(),
        1,
    )
    .expect("first day of a month inside the reference cycle always exists")
}

/// Number of days of `month` in `year` in the proleptic Gregorian calendar.
pub fn days_in_month(year: i32, month: Month) -> u32 {
    let first = first_of_month(year, month);
    (first + Months::new(1)).signed_duration_since(first).num_days() as u32
}

/// Weekday of the first day of `month` in `year`.
pub fn first_weekday_of_month(year: i32, month: Month) -> WeekdayIndex {
    first_of_month(year, month).weekday().num_days_from_sunday()
}

pub fn is_weekend(weekday: WeekdayIndex) -> bool {
    weekday == 0 || weekday == 6
}

pub fn month_abbreviation(month: Month) -> &'static str {
    MONTH_ABBREVIATIONS[month.number_from_month() as usize - 1]
}

/// A single month of a single year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    year: i32,
    month: Month,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        match Month::from_u32(month) {
            Some(month) => Ok(CalendarMonth { year, month }),
            None => Err(Error::invalid_argument(&format!(
                "month must be within 1..=12 (got {})",
                month
            ))),
        }
    }

    /// The month `offset` months after this one, rolling the year over.
    pub fn offset(&self, offset: u64) -> Result<Self> {
        let out_of_range = || {
            Error::invalid_argument(&format!(
                "{} months after {} is out of range",
                offset, self
            ))
        };

        let index = i64::try_from(offset)
            .ok()
            .and_then(|offset| offset.checked_add(self.month0() as i64))
            .ok_or_else(out_of_range)?;

        let year = i32::try_from(self.year as i64 + index.div_euclid(12))
            .map_err(|_| out_of_range())?;

        CalendarMonth::new(year, index.rem_euclid(12) as u32 + 1)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    /// Month number, 1..=12.
    pub fn num(&self) -> u32 {
        self.month.number_from_month()
    }

    pub fn month0(&self) -> u32 {
        self.num() - 1
    }

    pub fn abbreviation(&self) -> &'static str {
        month_abbreviation(self.month)
    }

    pub fn num_days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn first_weekday(&self) -> WeekdayIndex {
        first_weekday_of_month(self.year, self.month)
    }
}

impl PartialOrd for CalendarMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.num()).cmp(&(other.year, other.num()))
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.abbreviation(), self.year)
    }
}
