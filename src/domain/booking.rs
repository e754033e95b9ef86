//! Booking domain entity, status lifecycle and submission validation.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidateEmail;

use super::form::{clean, lenient_id, max_chars, max_chars_opt, required};
use crate::config::{
    BOOKING_DATE_FORMAT, MAX_ADDRESS_CHARS, MAX_EMAIL_CHARS, MAX_NAME_CHARS, MAX_PET_AGE_CHARS,
    MAX_PET_BREED_CHARS, MAX_PET_TYPE_CHARS, MAX_PHONE_CHARS, MAX_PINCODE_CHARS,
    MAX_REGION_CHARS, MAX_TIME_CHARS, MAX_TITLE_CHARS, STATUS_FILTER_ALL,
};
use crate::errors::{AppError, AppResult};

/// Booking status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum BookingStatus {
    New,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Every status, in lifecycle order
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::New,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::New => "New",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| AppError::validation("Invalid status"))
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking domain entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Booking {
    pub id: i64,
    pub user_id: Option<i64>,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub service_id: Option<i64>,
    /// Service title as it was when the booking was made
    pub service_title_snapshot: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub pet_type: Option<String>,
    pub pet_breed: Option<String>,
    pub pet_age: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking form as posted by a customer.
///
/// Any `status` in the payload is ignored; new bookings always start as `New`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookingSubmission {
    #[schema(example = "Jane Doe")]
    pub customer_name: String,
    #[schema(example = "555-0100")]
    pub phone: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    /// Catalog service being booked, if picked from the catalog; numeric text is accepted
    #[serde(deserialize_with = "lenient_id")]
    pub service_id: Option<i64>,
    /// Service as typed or selected on the form
    #[schema(example = "Dog Walking")]
    pub service: String,
    #[schema(example = "2025-03-01")]
    pub preferred_date: String,
    #[schema(example = "10:00")]
    pub preferred_time: String,
    pub pet_type: Option<String>,
    pub pet_breed: Option<String>,
    pub pet_age: Option<String>,
    pub notes: Option<String>,
}

/// A submission that passed validation, before the service snapshot is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub customer_name: String,
    pub phone: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub service_id: Option<i64>,
    pub service: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub pet_type: Option<String>,
    pub pet_breed: Option<String>,
    pub pet_age: Option<String>,
    pub notes: Option<String>,
}

impl BookingSubmission {
    /// Check every mandatory field, collecting all messages in form order.
    pub fn validate_submission(self) -> AppResult<BookingDraft> {
        let mut errors = Vec::new();

        let customer_name = required(&self.customer_name, "Name is required", &mut errors);
        let phone = required(&self.phone, "Phone number is required", &mut errors);

        let email = self.email.trim().to_lowercase();
        if !email.validate_email() {
            errors.push("Valid email is required".to_string());
        }

        let service = required(&self.service, "Service selection is required", &mut errors);

        let preferred_date = match self.preferred_date.trim() {
            "" => {
                errors.push("Start date is required".to_string());
                None
            }
            raw => match NaiveDate::parse_from_str(raw, BOOKING_DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("Start date must be a valid date (YYYY-MM-DD)".to_string());
                    None
                }
            },
        };

        let preferred_time = required(&self.preferred_time, "Preferred time is required", &mut errors);

        let address_line1 = self.address_line1.trim().to_string();
        let address_line2 = clean(self.address_line2);
        let city = self.city.trim().to_string();
        let state = self.state.trim().to_string();
        let pincode = self.pincode.trim().to_string();
        let pet_type = clean(self.pet_type);
        let pet_breed = clean(self.pet_breed);
        let pet_age = clean(self.pet_age);

        max_chars(&customer_name, MAX_NAME_CHARS, "Name", &mut errors);
        max_chars(&phone, MAX_PHONE_CHARS, "Phone number", &mut errors);
        max_chars(&email, MAX_EMAIL_CHARS, "Email", &mut errors);
        max_chars(&address_line1, MAX_ADDRESS_CHARS, "Address", &mut errors);
        max_chars_opt(address_line2.as_deref(), MAX_ADDRESS_CHARS, "Address line 2", &mut errors);
        max_chars(&city, MAX_REGION_CHARS, "City", &mut errors);
        max_chars(&state, MAX_REGION_CHARS, "State", &mut errors);
        max_chars(&pincode, MAX_PINCODE_CHARS, "Pincode", &mut errors);
        max_chars(&service, MAX_TITLE_CHARS, "Service", &mut errors);
        max_chars(&preferred_time, MAX_TIME_CHARS, "Preferred time", &mut errors);
        max_chars_opt(pet_type.as_deref(), MAX_PET_TYPE_CHARS, "Pet type", &mut errors);
        max_chars_opt(pet_breed.as_deref(), MAX_PET_BREED_CHARS, "Pet breed", &mut errors);
        max_chars_opt(pet_age.as_deref(), MAX_PET_AGE_CHARS, "Pet age", &mut errors);

        if let Some(err) = AppError::from_messages(errors) {
            return Err(err);
        }

        Ok(BookingDraft {
            customer_name,
            phone,
            email,
            address_line1,
            address_line2,
            city,
            state,
            pincode,
            service_id: self.service_id,
            service,
            preferred_date: preferred_date.ok_or_else(|| AppError::internal("date missing"))?,
            preferred_time,
            pet_type,
            pet_breed,
            pet_age,
            notes: clean(self.notes),
        })
    }
}

/// Values inserted for a new booking.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub user_id: Option<i64>,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub service_id: Option<i64>,
    pub service_title_snapshot: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: String,
    pub pet_type: Option<String>,
    pub pet_breed: Option<String>,
    pub pet_age: Option<String>,
    pub notes: Option<String>,
}

impl BookingDraft {
    /// Attach the owner and the service snapshot.
    ///
    /// `resolved` is the catalog service `(id, title)` when `service_id` matched
    /// one; otherwise the reference is dropped and the submitted text is kept.
    pub fn into_new_booking(self, user_id: Option<i64>, resolved: Option<(i64, String)>) -> NewBooking {
        let (service_id, service_title_snapshot) = match resolved {
            Some((id, title)) => (Some(id), title),
            None => (None, self.service),
        };

        NewBooking {
            user_id,
            customer_name: self.customer_name,
            phone: self.phone,
            email: Some(self.email),
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            service_id,
            service_title_snapshot,
            preferred_date: self.preferred_date,
            preferred_time: self.preferred_time,
            pet_type: self.pet_type,
            pet_breed: self.pet_breed,
            pet_age: self.pet_age,
            notes: self.notes,
        }
    }
}

/// Filters for booking listings; all present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub user_id: Option<i64>,
    pub status: Option<BookingStatus>,
    /// Case-insensitive substring over name, phone, email and service title
    pub search: Option<String>,
}

impl BookingFilter {
    /// Build a filter from raw query values.
    ///
    /// An empty status or `"all"` means no status filter.
    pub fn from_query(
        user_id: Option<i64>,
        status: Option<&str>,
        search: Option<&str>,
    ) -> AppResult<Self> {
        let status = match status.map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case(STATUS_FILTER_ALL) => None,
            Some(s) => Some(s.parse::<BookingStatus>()?),
        };

        Ok(Self {
            user_id,
            status,
            search: clean(search.map(str::to_string)),
        })
    }

    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }
}

/// Number of bookings per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub all: u64,
    #[serde(rename = "New")]
    pub new: u64,
    #[serde(rename = "Confirmed")]
    pub confirmed: u64,
    #[serde(rename = "Completed")]
    pub completed: u64,
    #[serde(rename = "Cancelled")]
    pub cancelled: u64,
}

impl StatusCounts {
    /// Fold grouped `(status, count)` rows; statuses with no rows stay at zero.
    ///
    /// Rows with an unrecognised status are left out of every total.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            let bucket = match status.parse::<BookingStatus>() {
                Ok(BookingStatus::New) => &mut counts.new,
                Ok(BookingStatus::Confirmed) => &mut counts.confirmed,
                Ok(BookingStatus::Completed) => &mut counts.completed,
                Ok(BookingStatus::Cancelled) => &mut counts.cancelled,
                Err(_) => {
                    tracing::warn!(status = %status, count, "Unknown booking status in store");
                    continue;
                }
            };
            *bucket += count;
            counts.all += count;
        }
        counts
    }

    pub fn get(&self, status: BookingStatus) -> u64 {
        match status {
            BookingStatus::New => self.new,
            BookingStatus::Confirmed => self.confirmed,
            BookingStatus::Completed => self.completed,
            BookingStatus::Cancelled => self.cancelled,
        }
    }
}

/// A customer's bookings grouped by status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BookingsByStatus {
    #[serde(rename = "New")]
    pub new: Vec<Booking>,
    #[serde(rename = "Confirmed")]
    pub confirmed: Vec<Booking>,
    #[serde(rename = "Completed")]
    pub completed: Vec<Booking>,
    #[serde(rename = "Cancelled")]
    pub cancelled: Vec<Booking>,
}

impl BookingsByStatus {
    /// Group bookings, keeping their relative order within each status.
    pub fn group(bookings: &[Booking]) -> Self {
        let mut grouped = BookingsByStatus::default();
        for booking in bookings {
            let bucket = match booking.status {
                BookingStatus::New => &mut grouped.new,
                BookingStatus::Confirmed => &mut grouped.confirmed,
                BookingStatus::Completed => &mut grouped.completed,
                BookingStatus::Cancelled => &mut grouped.cancelled,
            };
            bucket.push(booking.clone());
        }
        grouped
    }
}
