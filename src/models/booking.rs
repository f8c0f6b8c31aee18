use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::availability::StayRange;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(rename = "hotel")]
    pub hotel_id: i64,
    #[serde(rename = "room")]
    pub room_id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub nightly_price: f64,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn overlaps(&self, stay: &StayRange) -> bool {
        stay.check_in() < self.check_out_date && stay.check_out() > self.check_in_date
    }
}

/// A booking joined with the names a listing needs to display it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookingListing {
    pub id: i64,
    #[serde(rename = "hotel")]
    pub hotel_id: i64,
    pub hotel_name: String,
    pub hotel_city: String,
    #[serde(rename = "room")]
    pub room_id: i64,
    pub room_number: String,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub total_price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    #[serde(deserialize_with = "stay_date::deserialize")]
    pub check_in_date: DateTime<Utc>,
    #[serde(deserialize_with = "stay_date::deserialize")]
    pub check_out_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub hotel_id: i64,
    pub room_id: i64,
    pub user_id: i64,
    pub stay: StayRange,
    pub nightly_price: f64,
    pub total_price: f64,
}

/// Check-in/check-out values arrive either as a calendar date (taken as
/// midnight UTC) or as a full RFC 3339 timestamp.
pub mod stay_date {
    use super::*;
    use serde::{de, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        let raw = raw.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Ok(at.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Utc.from_utc_datetime(&naive));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|day| Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)))
            .map_err(|_| format!("invalid date `{raw}`, expected YYYY-MM-DD or an RFC 3339 timestamp"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_dates_are_midnight_utc() {
        let at = stay_date::parse("2024-01-05").unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let at = stay_date::parse("2024-01-05T14:00:00+02:00").unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(stay_date::parse("next tuesday").is_err());
        assert!(stay_date::parse("2024-02-30").is_err());
    }

    #[test]
    fn request_body_uses_camel_case() {
        let body: CreateBooking = serde_json::from_str(
            r#"{"checkInDate":"2024-01-01","checkOutDate":"2024-01-04T10:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(body.check_in_date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(body.check_out_date, Utc.with_ymd_and_hms(2024, 1, 4, 10, 30, 0).unwrap());
    }
}
