use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use busline_core::booking::Booking;
use busline_core::identity::User;
use busline_core::repository::BookingRepository;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

const DATE_FORMAT: &str = "%-d %B %Y";

/// Printable ticket for one booking
#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    booking: Booking,
}

impl Ticket {
    pub fn from_booking(booking: Booking) -> Self {
        Self { booking }
    }

    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    pub fn file_name(&self) -> String {
        format!("bus-ticket-{}.txt", self.booking.id)
    }

    pub fn render(&self) -> String {
        let b = &self.booking;
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(out, "BUS TICKET");
        let _ = writeln!(out, "==========");
        let _ = writeln!(out, "Booking ID: {}", b.id);
        let _ = writeln!(out, "Booked on: {}", format_date(b.booking_date));
        let _ = writeln!(out);
        let _ = writeln!(out, "{} ({})", b.bus.name, b.bus.bus_number);
        let _ = writeln!(out, "Type: {}", b.bus.bus_type);
        let _ = writeln!(out, "Route: {} -> {}", b.bus.route.from, b.bus.route.to);
        let _ = writeln!(out, "Journey date: {}", format_date(b.journey_date));
        let _ = writeln!(
            out,
            "Departure: {}  Arrival: {}",
            b.bus.departure_time, b.bus.arrival_time
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Passengers");
        for (i, p) in b.passengers.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} ({}, {}) Seat {}",
                i + 1,
                p.name,
                p.age,
                p.gender.label(),
                p.seat_number
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Payment ID: {}", b.payment_id);
        let _ = writeln!(
            out,
            "Payment: {} ({})",
            b.payment_method.as_str().to_uppercase(),
            b.payment_status.as_str()
        );
        let _ = writeln!(out, "Total paid: ₹{}", b.total_amount);
        out
    }

    /// Write the rendered ticket into `dir`, returning the file path
    pub async fn download(&self, dir: impl AsRef<Path>) -> Result<PathBuf, TicketError> {
        let dir = dir.as_ref();
        let path = dir.join(self.file_name());
        let io_err = |source| TicketError::Io {
            path: path.clone(),
            source,
        };

        tokio::fs::create_dir_all(dir).await.map_err(io_err)?;
        tokio::fs::write(&path, self.render()).await.map_err(io_err)?;
        info!("Ticket for booking {} written to {}", self.booking.id, path.display());
        Ok(path)
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Looks up the signed-in user's bookings
pub struct TicketService {
    bookings: Arc<dyn BookingRepository>,
}

impl TicketService {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// Bookings of `user`, newest journey first
    pub async fn bookings_for(&self, user: &User) -> Result<Vec<Booking>, TicketError> {
        let mut bookings = self
            .bookings
            .list_bookings(&user.email)
            .await
            .map_err(|e| TicketError::Storage(e.to_string()))?;
        bookings.sort_by(|a, b| b.journey_date.cmp(&a.journey_date));
        Ok(bookings)
    }

    /// Ticket for `booking_id`, if it belongs to `user`
    pub async fn ticket(&self, user: &User, booking_id: &str) -> Result<Ticket, TicketError> {
        let booking = self
            .bookings
            .get_booking(booking_id)
            .await
            .map_err(|e| TicketError::Storage(e.to_string()))?
            .ok_or_else(|| TicketError::NotFound(booking_id.to_string()))?;

        if booking.user_id != user.email {
            warn!("User {} asked for booking {} of another account", user.id, booking_id);
            return Err(TicketError::NotFound(booking_id.to_string()));
        }
        Ok(Ticket::from_booking(booking))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load bookings: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{booking_for, sample_bus, sample_user};
    use busline_shared::Gender;
    use busline_store::MemoryStore;

    fn booking() -> Booking {
        let bus = sample_bus();
        booking_for(&bus, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), &[("B1", Gender::Female)])
    }

    #[test]
    fn test_render() {
        let ticket = Ticket::from_booking(booking());
        let text = ticket.render();

        assert!(text.contains("Booking ID: BK1"));
        assert!(text.contains("Route: Chennai -> Madurai"));
        assert!(text.contains("Journey date: 10 January 2025"));
        assert!(text.contains("1. Asha (30, Female) Seat B1"));
        assert!(text.contains("Total paid: ₹650"));
        assert_eq!(ticket.file_name(), "bus-ticket-BK1.txt");
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let dir = std::env::temp_dir().join(format!("busline-tickets-{}", uuid::Uuid::new_v4()));
        let ticket = Ticket::from_booking(booking());

        let path = ticket.download(&dir).await.unwrap();
        assert_eq!(path, dir.join("bus-ticket-BK1.txt"));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), ticket.render());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_tickets_are_scoped_to_owner() {
        let store = Arc::new(MemoryStore::new());
        store.save_booking(&booking()).await.unwrap();
        let service = TicketService::new(store);

        let owner = sample_user(Gender::Female);
        assert_eq!(service.bookings_for(&owner).await.unwrap().len(), 1);
        assert!(service.ticket(&owner, "BK1").await.is_ok());

        let mut stranger = sample_user(Gender::Male);
        stranger.email = "ravi@example.com".into();
        assert!(matches!(service.ticket(&stranger, "BK1").await, Err(TicketError::NotFound(_))));
        assert!(matches!(service.ticket(&owner, "BK9").await, Err(TicketError::NotFound(_))));
    }
}
