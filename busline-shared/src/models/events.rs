use uuid::Uuid;

use super::gender::Gender;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct UserRegisteredEvent {
    pub user_id: Uuid,
    pub gender: Gender,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct SeatsBookedEvent {
    pub bus_id: String,
    pub journey_date: chrono::NaiveDate,
    pub seat_numbers: Vec<String>,
    pub booked_at: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingConfirmedEvent {
    pub booking_id: String,
    pub payment_id: String,
    pub customer_id: String,
    pub total_amount: i32,
    pub passenger_count: usize,
    pub timestamp: i64,
}

/// Everything published on the booking event bus
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    UserRegistered(UserRegisteredEvent),
    SeatsBooked(SeatsBookedEvent),
    BookingConfirmed(BookingConfirmedEvent),
}

impl DomainEvent {
    /// Topic the event is published under
    pub fn topic(&self) -> &'static str {
        match self {
            DomainEvent::UserRegistered(_) => "users.registered",
            DomainEvent::SeatsBooked(_) => "seats.booked",
            DomainEvent::BookingConfirmed(_) => "bookings.confirmed",
        }
    }
}
