//! Grid layout of a run of months.
//!
//! Every month is laid out on its own week rows of seven cells, Sunday
//! first. The month's name is placed in the cell right before day 1. When
//! day 1 falls on a Sunday there is no such cell, so the name gets a row of
//! its own above the first week.

use std::convert::TryFrom;
use std::ops::Range;

use crate::calendar::{self, CalendarMonth, WeekdayIndex, DAYS_PER_WEEK};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// A real day of the month.
    Day {
        day: u32,
        weekday: WeekdayIndex,
        weekend: bool,
    },
    /// The month's name. `rotated` is set when it sits inline before day 1
    /// and unset in a dedicated label row.
    Label { name: &'static str, rotated: bool },
    /// Filler without any content.
    Empty,
}

impl Cell {
    fn day(day: u32, weekday: WeekdayIndex) -> Self {
        Cell::Day {
            day,
            weekday,
            weekend: calendar::is_weekend(weekday),
        }
    }

    pub fn is_day(&self) -> bool {
        matches!(self, Cell::Day { .. })
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Cell::Label { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn day_num(&self) -> Option<u32> {
        match self {
            Cell::Day { day, .. } => Some(*day),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: [Cell; DAYS_PER_WEEK],
}

impl Row {
    pub fn new(cells: [Cell; DAYS_PER_WEEK]) -> Self {
        Row { cells }
    }

    fn label_row(name: &'static str) -> Self {
        let mut cells = [Cell::Empty; DAYS_PER_WEEK];
        cells[0] = Cell::Label {
            name,
            rotated: false,
        };
        Row { cells }
    }

    pub fn cells(&self) -> &[Cell; DAYS_PER_WEEK] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Whether this row holds nothing but an unrotated month label.
    pub fn is_label_row(&self) -> bool {
        matches!(self.cells[0], Cell::Label { rotated: false, .. })
            && self.cells[1..].iter().all(Cell::is_empty)
    }
}

/// The rows that belong to one month of a [`CalendarLayout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSpan {
    pub month: CalendarMonth,
    pub rows: Range<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarLayout {
    rows: Vec<Row>,
    months: Vec<MonthSpan>,
}

impl CalendarLayout {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn months(&self) -> &[MonthSpan] {
        &self.months
    }

    pub fn month_rows(&self, span: &MonthSpan) -> &[Row] {
        &self.rows[span.rows.clone()]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    fn push_month(&mut self, month: CalendarMonth) {
        let begin = self.rows.len();
        self.rows.extend(layout_month(month));
        self.months.push(MonthSpan {
            month,
            rows: begin..self.rows.len(),
        });
    }
}

/// Number of week rows `month` touches, not counting a dedicated label row.
pub fn weeks_spanned(month: CalendarMonth) -> usize {
    let cells = month.first_weekday() as usize + month.num_days() as usize;
    (cells + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK
}

/// Lays out the rows of a single month.
pub fn layout_month(month: CalendarMonth) -> Vec<Row> {
    let first = month.first_weekday() as usize;
    let name = month.abbreviation();

    let mut rows = Vec::with_capacity(weeks_spanned(month) + 1);
    if first == 0 {
        rows.push(Row::label_row(name));
    }

    let leading = (0..first).map(|pos| {
        if pos + 1 == first {
            Cell::Label {
                name,
                rotated: true,
            }
        } else {
            Cell::Empty
        }
    });

    let days = (1..=month.num_days()).map(|day| {
        let weekday = (first as u32 + day - 1) % DAYS_PER_WEEK as u32;
        Cell::day(day, weekday)
    });

    let mut cells: Vec<Cell> = leading.chain(days).collect();
    let trailing = (DAYS_PER_WEEK - cells.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
    cells.extend(std::iter::repeat(Cell::Empty).take(trailing));

    rows.extend(cells.chunks(DAYS_PER_WEEK).map(|week| {
        let mut row = [Cell::Empty; DAYS_PER_WEEK];
        row.copy_from_slice(week);
        Row::new(row)
    }));

    rows
}

/// Lays out `months` consecutive months beginning with `start_month` of
/// `start_year`.
///
/// Fails with [`ErrorKind::InvalidArgument`](crate::error::ErrorKind) if
/// `start_month` is not within 1..=12, `months` is negative or the last
/// month would fall outside the representable years. No rows are produced
/// in that case.
pub fn generate_layout(start_year: i32, start_month: u32, months: i64) -> Result<CalendarLayout> {
    let months = u64::try_from(months).map_err(|_| {
        Error::invalid_argument(&format!("months must not be negative (got {})", months))
    })?;

    let start = CalendarMonth::new(start_year, start_month)?;
    if months > 0 {
        start.offset(months - 1)?;
    }

    let mut layout = CalendarLayout::default();
    for offset in 0..months {
        layout.push_month(start.offset(offset)?);
    }

    log::debug!(
        "Laid out {} months starting {} in {} rows",
        months,
        start,
        layout.len()
    );

    Ok(layout)
}
