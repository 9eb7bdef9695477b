// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bookable time slots.
//!
//! A `TimeSlot` is a validated window on a single calendar day together with
//! the number of reservations that window may hold.
//!
//! ## Invariants
//!
//! - `capacity > 0`
//! - `start_time < end_time` (equal times are rejected, not a zero-length slot)
//! - Times are whole minutes. Input is `H:MM` or `HH:MM` (24-hour); output is
//!   always `HH:MM`
//!
//! Capacity accounting is keyed on the exact `(date, start, end)` triple, see
//! [`SlotKey`]. Two slots that overlap without being identical are separate
//! pools.

use crate::error::DomainError;
use time::macros::format_description;
use time::{Date, Time};

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` if the text is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        DomainError::InvalidDate {
            date_string: value.to_string(),
        }
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Formats a time of day as `HH:MM`.
#[must_use]
pub fn format_time(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

fn parse_time(value: &str) -> Option<Time> {
    // One- or two-digit hour, so "9:00" and "09:00" are the same time.
    Time::parse(
        value.trim(),
        format_description!("[hour padding:none]:[minute]"),
    )
    .ok()
}

const fn is_whole_minute(time: Time) -> bool {
    time.second() == 0 && time.nanosecond() == 0
}

/// Identifies a distinct capacity pool: `(date, start_time, end_time)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    date: Date,
    start_time: Time,
    end_time: Time,
}

impl SlotKey {
    /// Returns the calendar date of the slot.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.date
    }

    /// Returns the slot start time.
    #[must_use]
    pub const fn start_time(&self) -> Time {
        self.start_time
    }

    /// Returns the slot end time.
    #[must_use]
    pub const fn end_time(&self) -> Time {
        self.end_time
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}-{}",
            format_date(self.date),
            format_time(self.start_time),
            format_time(self.end_time)
        )
    }
}

/// A validated, immutable bookable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    date: Date,
    start_time: Time,
    end_time: Time,
    capacity: u32,
}

impl TimeSlot {
    /// Creates a new time slot from already-typed times.
    ///
    /// # Arguments
    ///
    /// * `date` - The calendar date of the slot
    /// * `start_time` - The wall-clock start (whole minutes)
    /// * `end_time` - The wall-clock end (whole minutes)
    /// * `capacity` - Maximum number of non-cancelled reservations
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCapacity` if `capacity <= 0`, and
    /// `DomainError::InvalidTimeRange` if `start_time >= end_time` or either
    /// time carries seconds.
    pub fn new(
        date: Date,
        start_time: Time,
        end_time: Time,
        capacity: i64,
    ) -> Result<Self, DomainError> {
        let capacity: u32 = validate_capacity(capacity)?;

        if !is_whole_minute(start_time) || !is_whole_minute(end_time) || start_time >= end_time {
            return Err(DomainError::InvalidTimeRange {
                start_time: format_time(start_time),
                end_time: format_time(end_time),
            });
        }

        Ok(Self {
            date,
            start_time,
            end_time,
            capacity,
        })
    }

    /// Creates a new time slot from `HH:MM` time strings.
    ///
    /// Capacity is validated before the times are parsed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCapacity` if `capacity <= 0`, and
    /// `DomainError::InvalidTimeRange` if either time cannot be parsed or the
    /// start does not strictly precede the end.
    pub fn parse(
        date: Date,
        start_time: &str,
        end_time: &str,
        capacity: i64,
    ) -> Result<Self, DomainError> {
        validate_capacity(capacity)?;

        let invalid_range = || DomainError::InvalidTimeRange {
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        };

        let start: Time = parse_time(start_time).ok_or_else(invalid_range)?;
        let end: Time = parse_time(end_time).ok_or_else(invalid_range)?;

        if start >= end {
            return Err(invalid_range());
        }

        Self::new(date, start, end, capacity)
    }

    /// Returns true if another reservation fits given `reserved_count`
    /// existing non-cancelled reservations.
    ///
    /// At `reserved_count == capacity` the slot is full.
    #[must_use]
    pub const fn is_available(&self, reserved_count: u32) -> bool {
        self.capacity > reserved_count
    }

    /// Returns the capacity accounting key for this slot.
    #[must_use]
    pub const fn key(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.date
    }

    /// Returns the start time.
    #[must_use]
    pub const fn start_time(&self) -> Time {
        self.start_time
    }

    /// Returns the end time.
    #[must_use]
    pub const fn end_time(&self) -> Time {
        self.end_time
    }

    /// Returns the slot capacity.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }
}

fn validate_capacity(capacity: i64) -> Result<u32, DomainError> {
    if capacity <= 0 {
        return Err(DomainError::InvalidCapacity { capacity });
    }
    u32::try_from(capacity).map_err(|_| DomainError::InvalidCapacity { capacity })
}
