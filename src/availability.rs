//! Booking admissibility and pricing.
//!
//! Stays are half-open `[check_in, check_out)` ranges: a guest leaving on the
//! morning another arrives does not block them. Everything in here is pure;
//! callers load the room's bookings and persist the result.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::booking::Booking;

const MILLIS_PER_NIGHT: i64 = 24 * 60 * 60 * 1000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StayError {
    #[error("Check-out date must be after check-in date.")]
    NotAfterCheckIn,
}

/// A proposed or booked stay. Construction guarantees `check_in < check_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
}

impl StayRange {
    pub fn new(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Result<Self, StayError> {
        if check_in >= check_out {
            return Err(StayError::NotAfterCheckIn);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> DateTime<Utc> {
        self.check_in
    }

    pub fn check_out(&self) -> DateTime<Utc> {
        self.check_out
    }

    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }

    /// Billable nights; any partial day counts as a full night.
    pub fn nights(&self) -> i64 {
        let millis = (self.check_out - self.check_in).num_milliseconds();
        (millis + MILLIS_PER_NIGHT - 1) / MILLIS_PER_NIGHT
    }
}

/// The stay that blocks a proposal.
#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "This room is already booked from {} to {}.",
    .check_in.format("%Y-%m-%d"),
    .check_out.format("%Y-%m-%d")
)]
pub struct BookingConflict {
    pub booking_id: i64,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

impl From<&Booking> for BookingConflict {
    fn from(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            check_in: booking.check_in_date,
            check_out: booking.check_out_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub nights: i64,
    pub nightly_price: f64,
    pub total_price: f64,
}

/// Decides whether `stay` can be booked on `room_id` given the room's
/// existing bookings, and prices it at `nightly_price` if so.
///
/// The first overlapping booking in `existing` is reported. Bookings that
/// belong to another room are skipped.
pub fn evaluate_booking<'a, I>(
    room_id: i64,
    existing: I,
    stay: &StayRange,
    nightly_price: f64,
) -> Result<Quote, BookingConflict>
where
    I: IntoIterator<Item = &'a Booking>,
{
    if let Some(blocking) = existing
        .into_iter()
        .filter(|booking| booking.room_id == room_id)
        .find(|booking| booking.overlaps(stay))
    {
        return Err(BookingConflict::from(blocking));
    }

    let nights = stay.nights();
    Ok(Quote {
        nights,
        nightly_price,
        total_price: nights as f64 * nightly_price,
    })
}
