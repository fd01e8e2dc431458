use std::collections::HashMap;

use async_trait::async_trait;
use busline_core::booking::Booking;
use busline_core::identity::{StoredUser, User};
use busline_core::repository::{
    BookingRepository, SaveOutcome, SessionStore, StoreError, UserRepository,
};
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Process-local store, used by tests and `storage.backend = "memory"`
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, StoredUser>>,
    bookings: RwLock<Vec<Booking>>,
    current_user: RwLock<Option<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert_user(&self, user: &StoredUser) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.user.email) {
            return Err(format!("User {} already exists", user.user.email).into());
        }
        users.insert(user.user.email.clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn save_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        self.bookings.write().await.push(booking.clone());
        info!("Booking {} stored in memory", booking.id);
        Ok(())
    }

    async fn save_booking_if_free(&self, booking: &Booking) -> Result<SaveOutcome, StoreError> {
        let mut bookings = self.bookings.write().await;
        let taken = booking.seats_taken_by(bookings.iter());
        if !taken.is_empty() {
            warn!("Booking {} not stored, seats {:?} already sold", booking.id, taken);
            return Ok(SaveOutcome::SeatsTaken(taken));
        }
        bookings.push(booking.clone());
        info!("Booking {} stored in memory", booking.id);
        Ok(SaveOutcome::Saved)
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookings(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_trip_bookings(
        &self,
        bus_id: &str,
        journey_date: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.is_for_trip(bus_id, journey_date))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn current_user(&self) -> Result<Option<User>, StoreError> {
        Ok(self.current_user.read().await.clone())
    }

    async fn set_current_user(&self, user: &User) -> Result<(), StoreError> {
        *self.current_user.write().await = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.current_user.write().await = None;
        Ok(())
    }
}
