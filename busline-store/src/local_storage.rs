use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use busline_core::booking::Booking;
use busline_core::identity::{StoredUser, User};
use busline_core::repository::{
    BookingRepository, SaveOutcome, SessionStore, StoreError, UserRepository,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const USERS_KEY: &str = "bus_booking_users";
pub const BOOKINGS_KEY: &str = "bus_bookings";
pub const AUTH_KEY: &str = "bus_booking_auth";

/// Key-value JSON document on disk, one top-level key per collection.
///
/// Every write rewrites the whole document through a temp file and rename.
pub struct LocalStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Map<String, Value>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Map::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(document)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Wrote {}", self.path.display());
        Ok(())
    }

    pub async fn get_item<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_item(key).await
    }

    pub async fn set_item<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_document(&document).await
    }

    pub async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        if document.remove(key).is_some() {
            self.write_document(&document).await?;
        }
        Ok(())
    }

    async fn read_item<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let document = self.read_document().await?;
        match document.get(key) {
            Some(value) => Ok(Some(T::deserialize(value)?)),
            None => Ok(None),
        }
    }

    /// Read-modify-write of a list-valued key under the document lock.
    ///
    /// Lists only grow, so the document is rewritten only when `update` added items.
    async fn update_list<T, R>(
        &self,
        key: &str,
        update: impl FnOnce(&mut Vec<T>) -> Result<R, StoreError> + Send,
    ) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        R: Send,
    {
        let _guard = self.lock.lock().await;
        let mut items: Vec<T> = self.read_item(key).await?.unwrap_or_default();
        let before = items.len();
        let outcome = update(&mut items)?;

        if items.len() != before {
            let mut document = self.read_document().await?;
            document.insert(key.to_string(), serde_json::to_value(&items)?);
            self.write_document(&document).await?;
        }
        Ok(outcome)
    }

    async fn append_to<T>(
        &self,
        key: &str,
        item: &T,
        accept: impl FnOnce(&[T]) -> Result<(), StoreError> + Send,
    ) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync,
    {
        self.update_list(key, |items: &mut Vec<T>| {
            accept(items.as_slice())?;
            items.push(item.clone());
            Ok(())
        })
        .await
    }

    async fn list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        Ok(self.get_item::<Vec<T>>(key).await?.unwrap_or_default())
    }
}

#[async_trait]
impl UserRepository for LocalStorage {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, StoreError> {
        let users: Vec<StoredUser> = self.list(USERS_KEY).await?;
        Ok(users.into_iter().find(|u| u.user.email == email))
    }

    async fn insert_user(&self, user: &StoredUser) -> Result<(), StoreError> {
        let email = user.user.email.clone();
        self.append_to(USERS_KEY, user, move |existing: &[StoredUser]| {
            if existing.iter().any(|u| u.user.email == email) {
                return Err(format!("User {} already exists", email).into());
            }
            Ok(())
        })
        .await?;
        info!("User {} saved to {}", user.user.id, self.path.display());
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for LocalStorage {
    async fn save_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        self.append_to(BOOKINGS_KEY, booking, |_: &[Booking]| Ok(())).await?;
        info!("Booking {} saved to {}", booking.id, self.path.display());
        Ok(())
    }

    async fn save_booking_if_free(&self, booking: &Booking) -> Result<SaveOutcome, StoreError> {
        let outcome = self
            .update_list(BOOKINGS_KEY, |items: &mut Vec<Booking>| {
                let taken = booking.seats_taken_by(items.iter());
                if !taken.is_empty() {
                    return Ok(SaveOutcome::SeatsTaken(taken));
                }
                items.push(booking.clone());
                Ok(SaveOutcome::Saved)
            })
            .await?;

        match &outcome {
            SaveOutcome::Saved => info!("Booking {} saved to {}", booking.id, self.path.display()),
            SaveOutcome::SeatsTaken(seats) => {
                warn!("Booking {} not saved, seats {:?} already sold", booking.id, seats)
            }
        }
        Ok(outcome)
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        let bookings: Vec<Booking> = self.list(BOOKINGS_KEY).await?;
        Ok(bookings.into_iter().find(|b| b.id == id))
    }

    async fn list_bookings(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let bookings: Vec<Booking> = self.list(BOOKINGS_KEY).await?;
        Ok(bookings.into_iter().filter(|b| b.user_id == user_id).collect())
    }

    async fn list_trip_bookings(
        &self,
        bus_id: &str,
        journey_date: NaiveDate,
    ) -> Result<Vec<Booking>, StoreError> {
        let bookings: Vec<Booking> = self.list(BOOKINGS_KEY).await?;
        Ok(bookings
            .into_iter()
            .filter(|b| b.is_for_trip(bus_id, journey_date))
            .collect())
    }
}

#[async_trait]
impl SessionStore for LocalStorage {
    async fn current_user(&self) -> Result<Option<User>, StoreError> {
        self.get_item(AUTH_KEY).await
    }

    async fn set_current_user(&self, user: &User) -> Result<(), StoreError> {
        self.set_item(AUTH_KEY, user).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.remove_item(AUTH_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busline_catalog::{Bus, Route};
    use busline_core::booking::Passenger;
    use busline_core::payment::{PaymentMethod, PaymentStatus};
    use busline_shared::Gender;
    use chrono::Utc;

    fn temp_store() -> LocalStorage {
        let path = std::env::temp_dir()
            .join(format!("busline-store-{}", uuid::Uuid::new_v4()))
            .join("local-storage.json");
        LocalStorage::new(path)
    }

    fn user(email: &str) -> StoredUser {
        StoredUser {
            user: User {
                id: uuid::Uuid::new_v4(),
                email: email.to_string(),
                name: "Asha".to_string(),
                mobile: "9876543210".to_string(),
                gender: Gender::Female,
                created_at: Utc::now(),
            },
            password_hash: "$argon2id$fake".to_string(),
        }
    }

    fn booking(id: &str, user_id: &str, bus_id: &str, day: u32) -> Booking {
        Booking {
            id: id.to_string(),
            user_id: user_id.to_string(),
            bus: Bus {
                id: bus_id.to_string(),
                name: "KPN".into(),
                bus_number: "TN01".into(),
                image: "/kpn.jpg".into(),
                route: Route { from: "Chennai".into(), to: "Madurai".into() },
                departure_time: "21:00".into(),
                arrival_time: "05:00".into(),
                price: 500,
                bus_type: "AC Seater".into(),
                seats: vec![],
            },
            passengers: vec![Passenger::draft("A1")],
            journey_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            booking_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            payment_id: "PAY1".into(),
            payment_status: PaymentStatus::Completed,
            total_amount: 500,
            payment_method: PaymentMethod::Qr,
            upi_id: None,
        }
    }

    #[tokio::test]
    async fn test_users_persist_across_instances() {
        let store = temp_store();
        store.insert_user(&user("asha@example.com")).await.unwrap();
        assert!(store.insert_user(&user("asha@example.com")).await.is_err());

        let reopened = LocalStorage::new(store.path());
        let found = reopened.find_by_email("asha@example.com").await.unwrap();
        assert_eq!(found.unwrap().user.name, "Asha");
        assert!(reopened.find_by_email("ravi@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_key() {
        let store = temp_store();
        assert!(store.current_user().await.unwrap().is_none());

        let stored = user("asha@example.com");
        store.set_current_user(&stored.user).await.unwrap();
        assert_eq!(store.current_user().await.unwrap(), Some(stored.user.clone()));

        store.clear().await.unwrap();
        assert!(store.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_booking_queries() {
        let store = temp_store();
        store.save_booking(&booking("BK1", "asha@example.com", "bus-1", 5)).await.unwrap();
        store.save_booking(&booking("BK2", "asha@example.com", "bus-1", 6)).await.unwrap();
        store.save_booking(&booking("BK3", "ravi@example.com", "bus-1", 5)).await.unwrap();

        assert_eq!(store.list_bookings("asha@example.com").await.unwrap().len(), 2);
        assert!(store.get_booking("BK3").await.unwrap().is_some());

        let trip = store
            .list_trip_bookings("bus-1", NaiveDate::from_ymd_opt(2025, 1, 5).unwrap())
            .await
            .unwrap();
        let ids: Vec<&str> = trip.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["BK1", "BK3"]);
    }

    #[tokio::test]
    async fn test_save_if_free_refuses_sold_seats() {
        let store = temp_store();
        let first = booking("BK1", "asha@example.com", "bus-1", 5);
        assert_eq!(store.save_booking_if_free(&first).await.unwrap(), SaveOutcome::Saved);

        let clash = booking("BK2", "ravi@example.com", "bus-1", 5);
        assert_eq!(
            store.save_booking_if_free(&clash).await.unwrap(),
            SaveOutcome::SeatsTaken(vec!["A1".to_string()])
        );

        let next_day = booking("BK3", "ravi@example.com", "bus-1", 6);
        assert_eq!(store.save_booking_if_free(&next_day).await.unwrap(), SaveOutcome::Saved);

        let reopened = LocalStorage::new(store.path());
        assert!(reopened.get_booking("BK2").await.unwrap().is_none());
        assert_eq!(reopened.list_bookings("ravi@example.com").await.unwrap().len(), 1);
    }
}
