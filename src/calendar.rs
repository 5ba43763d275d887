//! Calendar-day keys and month grid arithmetic.
//!
//! Grids are laid out Sunday-first in seven columns: the first day of the
//! month is preceded by `leading_blank_count` empty cells.

use crate::errors::{StoreError, StoreResult};
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Canonical `YYYY-MM-DD` key for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, DATE_KEY_FORMAT)
            .map_err(|_| StoreError::InvalidDateKey(s.to_string()))?;
        // chrono accepts unpadded fields, keys must be canonical
        if date.format(DATE_KEY_FORMAT).to_string() != s {
            return Err(StoreError::InvalidDateKey(s.to_string()));
        }
        Ok(Self(date))
    }
}

impl TryFrom<String> for DateKey {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> StoreResult<NaiveDate> {
    let key: DateKey = format!("{s}-01")
        .parse()
        .map_err(|_| StoreError::InvalidMonth(s.to_string()))?;
    Ok(key.date())
}

pub fn format_month(reference: NaiveDate) -> String {
    reference.format("%Y-%m").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Only `-1` and `+1` are valid steps.
    pub fn from_step(step: i32) -> Option<Self> {
        match step {
            -1 => Some(Self::Previous),
            1 => Some(Self::Next),
            _ => None,
        }
    }

    pub fn step(self) -> i32 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// The 1st of `reference`'s month. Only the year and month are read.
pub fn first_of_month(reference: &impl Datelike) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(reference.year(), reference.month(), 1)
}

/// Every day of `reference`'s month in ascending order. The day-of-month and
/// any time-of-day of `reference` are ignored.
pub fn days_in_month(reference: impl Datelike) -> Vec<NaiveDate> {
    let Some(first) = first_of_month(&reference) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|day| day.month() == first.month())
        .collect()
}

pub fn month_length(reference: impl Datelike) -> u32 {
    let Some(first) = first_of_month(&reference) else {
        return 0;
    };
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        None => days_in_month(first).len() as u32,
    }
}

/// Weekday of the 1st, Sunday = 0.
pub fn leading_blank_count(reference: impl Datelike) -> u32 {
    first_of_month(&reference)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Moves one calendar month. The day-of-month is clamped to the length of the
/// target month, so Jan 31 + 1 lands on the last day of February.
pub fn navigate(reference: NaiveDate, direction: Direction) -> NaiveDate {
    let moved = match direction {
        Direction::Previous => reference.checked_sub_months(Months::new(1)),
        Direction::Next => reference.checked_add_months(Months::new(1)),
    };
    moved.unwrap_or(reference)
}

pub fn same_day(a: &impl Datelike, b: &impl Datelike) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

pub fn same_month(a: &impl Datelike, b: &impl Datelike) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn month_title(reference: NaiveDate) -> String {
    reference.format("%B %Y").to_string()
}

/// Displayed month plus the selected day of one calendar widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    reference: NaiveDate,
    selected: NaiveDate,
}

impl CalendarState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            reference: today,
            selected: today,
        }
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    /// Changes the displayed month only; the selection stays put.
    pub fn navigate(&mut self, direction: Direction) {
        self.reference = navigate(self.reference, direction);
    }

    /// Displays `reference`'s month without touching the selection.
    pub fn show_month(&mut self, reference: NaiveDate) {
        self.reference = reference;
    }

    /// Picking a day outside the displayed month also jumps the display to it.
    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
        if !same_month(&date, &self.reference) {
            self.reference = date;
        }
    }

    pub fn is_selected(&self, date: &impl Datelike) -> bool {
        same_day(&self.selected, date)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: DateKey,
    pub day: u32,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_data: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub title: String,
    pub month: String,
    pub previous_month: String,
    pub next_month: String,
    pub selected: DateKey,
    pub weekdays: [&'static str; 7],
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

pub fn month_grid(state: &CalendarState, today: NaiveDate, marked: &BTreeSet<DateKey>) -> MonthGrid {
    let reference = state.reference();
    let days = days_in_month(reference)
        .into_iter()
        .map(|date| DayCell {
            date: DateKey::new(date),
            day: date.day(),
            is_today: same_day(&date, &today),
            is_selected: state.is_selected(&date),
            has_data: marked.contains(&DateKey::new(date)),
        })
        .collect();

    MonthGrid {
        title: month_title(reference),
        month: format_month(reference),
        previous_month: format_month(navigate(reference, Direction::Previous)),
        next_month: format_month(navigate(reference, Direction::Next)),
        selected: DateKey::new(state.selected()),
        weekdays: WEEKDAY_LABELS,
        leading_blanks: leading_blank_count(reference),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_in_month_covers_whole_month() {
        for (y, m, len) in [(2024, 2, 29), (2023, 2, 28), (2024, 4, 30), (2024, 12, 31), (1900, 2, 28), (2000, 2, 29)] {
            let days = days_in_month(date(y, m, 17));
            assert_eq!(days.len(), len, "{y}-{m}");
            assert_eq!(days[0], date(y, m, 1));
            assert_eq!(days.last().unwrap().day() as usize, len);
            assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn month_helpers_accept_date_times() {
        let late = NaiveDateTime::new(date(2024, 2, 29), NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        let days = days_in_month(late);
        assert_eq!(days.len(), 29);
        assert_eq!(days[0], date(2024, 2, 1));
        assert_eq!(leading_blank_count(late), 4);
        assert_eq!(month_length(late), 29);
        assert_eq!(month_length(date(2023, 2, 3)), 28);
        assert_eq!(month_length(date(2024, 12, 31)), 31);
    }

    #[test]
    fn month_title_names_month_and_year() {
        assert_eq!(month_title(date(2024, 3, 15)), "March 2024");
        assert_eq!(month_title(date(1999, 12, 1)), "December 1999");
        assert_eq!(month_title(date(2025, 1, 31)), "January 2025");
    }

    #[test]
    fn leading_blanks_match_first_weekday() {
        // March 1, 2024 is a Friday
        assert_eq!(leading_blank_count(date(2024, 3, 20)), 5);
        // September 1, 2024 is a Sunday
        assert_eq!(leading_blank_count(date(2024, 9, 30)), 0);
        // June 1, 2024 is a Saturday
        assert_eq!(leading_blank_count(date(2024, 6, 1)), 6);
    }

    #[test]
    fn navigate_rolls_over_years() {
        assert_eq!(navigate(date(2024, 12, 10), Direction::Next), date(2025, 1, 10));
        assert_eq!(navigate(date(2024, 1, 10), Direction::Previous), date(2023, 12, 10));
    }

    #[test]
    fn navigate_clamps_to_shorter_month() {
        assert_eq!(navigate(date(2024, 1, 31), Direction::Next), date(2024, 2, 29));
        assert_eq!(navigate(date(2024, 3, 31), Direction::Previous), date(2024, 2, 29));
    }

    #[test]
    fn navigate_forward_then_back_returns_to_same_month() {
        let mut day = date(2023, 1, 1);
        while day < date(2025, 1, 1) {
            let back = navigate(navigate(day, Direction::Next), Direction::Previous);
            assert!(same_month(&back, &day), "{day}");
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn direction_from_step_rejects_other_values() {
        assert_eq!(Direction::from_step(-1), Some(Direction::Previous));
        assert_eq!(Direction::from_step(1), Some(Direction::Next));
        assert_eq!(Direction::from_step(0), None);
        assert_eq!(Direction::from_step(2), None);
        assert_eq!(Direction::Next.step(), 1);
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let morning = NaiveDateTime::new(date(2024, 3, 15), NaiveTime::from_hms_opt(0, 5, 0).unwrap());
        let night = NaiveDateTime::new(date(2024, 3, 15), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        assert!(same_day(&morning, &night));
        assert!(same_day(&morning, &date(2024, 3, 15)));
        assert!(!same_day(&night, &date(2024, 3, 16)));
    }

    #[test]
    fn date_key_is_canonical() {
        let key: DateKey = "2024-03-15".parse().unwrap();
        assert_eq!(key.to_string(), "2024-03-15");
        assert!("2024-3-15".parse::<DateKey>().is_err());
        assert!("2024-02-30".parse::<DateKey>().is_err());
        assert!("2024-03-15T10:00:00".parse::<DateKey>().is_err());
        assert!("".parse::<DateKey>().is_err());
    }

    #[test]
    fn date_key_serializes_as_string() {
        let key = DateKey::new(date(2024, 3, 15));
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-03-15\"");
        let parsed: DateKey = serde_json::from_str("\"2024-03-15\"").unwrap();
        assert_eq!(parsed, key);
        assert!(serde_json::from_str::<DateKey>("\"15/03/2024\"").is_err());
    }

    #[test]
    fn parse_month_accepts_year_month_only() {
        assert_eq!(parse_month("2024-03").unwrap(), date(2024, 3, 1));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("2024-03-01").is_err());
        assert_eq!(format_month(date(2024, 3, 9)), "2024-03");
    }

    #[test]
    fn state_navigation_leaves_selection() {
        let today = date(2024, 3, 15);
        let mut state = CalendarState::new(today);
        assert_eq!(state.reference(), today);
        assert_eq!(state.selected(), today);

        state.navigate(Direction::Next);
        assert!(same_month(&state.reference(), &date(2024, 4, 1)));
        assert_eq!(state.selected(), today);
    }

    #[test]
    fn selecting_outside_displayed_month_moves_reference() {
        let mut state = CalendarState::new(date(2024, 3, 15));
        state.select(date(2024, 3, 2));
        assert_eq!(state.reference(), date(2024, 3, 15));

        state.select(date(2023, 11, 5));
        assert_eq!(state.selected(), date(2023, 11, 5));
        assert!(same_month(&state.reference(), &date(2023, 11, 1)));
    }

    #[test]
    fn month_grid_flags_today_selected_and_marked() {
        let today = date(2024, 3, 15);
        let mut state = CalendarState::new(today);
        state.select(date(2024, 3, 2));
        let marked = BTreeSet::from([DateKey::new(date(2024, 3, 10))]);

        let grid = month_grid(&state, today, &marked);
        assert_eq!(grid.title, "March 2024");
        assert_eq!(grid.month, "2024-03");
        assert_eq!(grid.previous_month, "2024-02");
        assert_eq!(grid.next_month, "2024-04");
        assert_eq!(grid.leading_blanks, 5);
        assert_eq!(grid.days.len(), 31);
        assert!(grid.days[14].is_today);
        assert!(grid.days[1].is_selected);
        assert!(grid.days[9].has_data);
        assert_eq!(grid.days.iter().filter(|cell| cell.has_data).count(), 1);
        assert_eq!(grid.days.iter().filter(|cell| cell.is_selected).count(), 1);
    }
}
