use async_trait::async_trait;
use chrono::NaiveDate;

use crate::booking::Booking;
use crate::identity::{StoredUser, User};

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Registered accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredUser>, StoreError>;

    async fn insert_user(
        &self,
        user: &StoredUser,
    ) -> Result<(), StoreError>;
}

/// Result of a conditional booking write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Nothing was written; these seats are held by another confirmed booking
    SeatsTaken(Vec<String>),
}

/// Finalized bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn save_booking(
        &self,
        booking: &Booking,
    ) -> Result<(), StoreError>;

    /// Save `booking` only if none of its seats is held by a confirmed booking
    /// of the same trip. The check and the write happen under one lock.
    async fn save_booking_if_free(
        &self,
        booking: &Booking,
    ) -> Result<SaveOutcome, StoreError>;

    async fn get_booking(
        &self,
        id: &str,
    ) -> Result<Option<Booking>, StoreError>;

    async fn list_bookings(
        &self,
        user_id: &str,
    ) -> Result<Vec<Booking>, StoreError>;

    /// Every booking holding seats on `bus_id` for `journey_date`
    async fn list_trip_bookings(
        &self,
        bus_id: &str,
        journey_date: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError>;
}

/// The signed-in account, if any
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn current_user(&self) -> Result<Option<User>, StoreError>;

    async fn set_current_user(&self, user: &User) -> Result<(), StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}
