use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use busline_core::booking::Booking;
use busline_core::events::EventPublisher;
use busline_core::payment::{PaymentAdapter, PaymentIntent, PaymentMethod, PaymentStatus};
use busline_core::repository::{BookingRepository, SaveOutcome};
use busline_core::validation::{self, ValidationErrors};
use busline_shared::models::events::{BookingConfirmedEvent, DomainEvent, SeatsBookedEvent};
use busline_shared::Masked;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::references::{generate_booking_id, generate_payment_id};
use crate::session::{BookingSession, BookingStage, SessionError};

/// How the user pays for the booking
#[derive(Debug, Clone)]
pub enum PaymentRequest {
    Upi { upi_id: Masked<String> },
    /// Scan of the merchant QR code, see [`Checkout::qr_payload`]
    Qr,
}

impl PaymentRequest {
    pub fn upi(upi_id: impl Into<String>) -> Self {
        PaymentRequest::Upi {
            upi_id: Masked(upi_id.into()),
        }
    }

    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentRequest::Upi { .. } => PaymentMethod::Upi,
            PaymentRequest::Qr => PaymentMethod::Qr,
        }
    }
}

/// Gateway stand-in: waits `delay`, then approves any positive amount
pub struct SimulatedPaymentGateway {
    delay: Duration,
}

impl SimulatedPaymentGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::from_millis(2000)
    }
}

#[async_trait]
impl PaymentAdapter for SimulatedPaymentGateway {
    async fn process_payment(
        &self,
        payment: &PaymentIntent,
    ) -> Result<PaymentStatus, Box<dyn std::error::Error + Send + Sync>> {
        info!(
            "Processing {} payment {} for {} {}",
            payment.method.as_str(),
            payment.id,
            payment.amount,
            payment.currency
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if payment.amount <= 0 {
            return Ok(PaymentStatus::Failed);
        }
        Ok(PaymentStatus::Completed)
    }
}

/// Turns a session at the payment stage into a finalized booking
pub struct Checkout {
    gateway: Arc<dyn PaymentAdapter>,
    bookings: Arc<dyn BookingRepository>,
    events: Arc<dyn EventPublisher>,
    currency: String,
    merchant_upi_id: String,
}

impl Checkout {
    pub fn new(
        gateway: Arc<dyn PaymentAdapter>,
        bookings: Arc<dyn BookingRepository>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            gateway,
            bookings,
            events,
            currency: "INR".to_string(),
            merchant_upi_id: "merchant@upi".to_string(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_merchant_upi_id(mut self, merchant_upi_id: impl Into<String>) -> Self {
        self.merchant_upi_id = merchant_upi_id.into();
        self
    }

    /// UPI deep link encoded in the payment QR code
    pub fn qr_payload(&self, amount: i32) -> String {
        format!(
            "upi://pay?pa={}&pn=BusBooking&am={}&cu={}",
            self.merchant_upi_id, amount, self.currency
        )
    }

    pub async fn pay(
        &self,
        session: &mut BookingSession,
        request: PaymentRequest,
    ) -> Result<Booking, CheckoutError> {
        session.ensure_stage(BookingStage::Payment)?;

        if let PaymentRequest::Upi { upi_id } = &request {
            let mut errors = ValidationErrors::new();
            validation::check_upi_id(&mut errors, "upiId", upi_id.as_inner());
            errors.into_result().map_err(CheckoutError::Validation)?;
        }

        self.ensure_seats_free(session).await?;

        let amount = session.total_fare();
        let upi_id = match &request {
            PaymentRequest::Upi { upi_id } => Some(upi_id.as_inner().clone()),
            PaymentRequest::Qr => None,
        };
        let intent = PaymentIntent::new(
            generate_payment_id(),
            amount,
            &self.currency,
            request.method(),
            upi_id.clone(),
        );

        let status = self.gateway.process_payment(&intent).await.map_err(|e| {
            error!("Payment {} failed: {}", intent.id, e);
            CheckoutError::PaymentFailed(e.to_string())
        })?;
        if status != PaymentStatus::Completed {
            warn!("Payment {} was not completed: {}", intent.id, status.as_str());
            return Err(CheckoutError::PaymentDeclined(status));
        }

        let booking = Booking {
            id: generate_booking_id(),
            user_id: session.user().email.clone(),
            bus: session.bus().clone(),
            passengers: session.passengers().to_vec(),
            journey_date: session.filters().date,
            booking_date: Utc::now().date_naive(),
            payment_id: intent.id.clone(),
            payment_status: status,
            total_amount: amount,
            payment_method: intent.method,
            upi_id,
        };

        // A concurrent checkout may have sold the seats while the gateway was busy
        let outcome = self.bookings.save_booking_if_free(&booking).await.map_err(|e| {
            error!("Failed to save booking {}: {}", booking.id, e);
            CheckoutError::Storage(e.to_string())
        })?;
        if let SaveOutcome::SeatsTaken(taken) = outcome {
            warn!(
                "Payment {} completed but seats {:?} were sold meanwhile; booking {} dropped",
                intent.id, taken, booking.id
            );
            return Err(CheckoutError::SeatsTaken(taken));
        }
        session.mark_completed();
        info!(
            "Booking {} confirmed: {} seats on bus {} for {}",
            booking.id,
            booking.passengers.len(),
            booking.bus.id,
            booking.journey_date
        );

        self.publish_confirmation(&booking).await;
        Ok(booking)
    }

    /// Seats may have been finalized by another booking since the trip was loaded
    async fn ensure_seats_free(&self, session: &BookingSession) -> Result<(), CheckoutError> {
        let existing = self
            .bookings
            .list_trip_bookings(&session.bus().id, session.filters().date)
            .await
            .map_err(|e| CheckoutError::Storage(e.to_string()))?;

        let taken: Vec<String> = session
            .seat_numbers()
            .iter()
            .filter(|seat| {
                existing
                    .iter()
                    .filter(|b| b.is_confirmed())
                    .any(|b| b.seat_numbers().contains(&seat.as_str()))
            })
            .cloned()
            .collect();

        if !taken.is_empty() {
            warn!("Seats {:?} on bus {} are already booked", taken, session.bus().id);
            return Err(CheckoutError::SeatsTaken(taken));
        }
        Ok(())
    }

    async fn publish_confirmation(&self, booking: &Booking) {
        let now = Utc::now().timestamp();
        let events = [
            DomainEvent::SeatsBooked(SeatsBookedEvent {
                bus_id: booking.bus.id.clone(),
                journey_date: booking.journey_date,
                seat_numbers: booking.seat_numbers().into_iter().map(String::from).collect(),
                booked_at: now,
            }),
            DomainEvent::BookingConfirmed(BookingConfirmedEvent {
                booking_id: booking.id.clone(),
                payment_id: booking.payment_id.clone(),
                customer_id: booking.user_id.clone(),
                total_amount: booking.total_amount,
                passenger_count: booking.passengers.len(),
                timestamp: now,
            }),
        ];

        for event in events {
            let topic = event.topic();
            if let Err(e) = self.events.publish(event).await {
                warn!("Failed to publish {} for booking {}: {}", topic, booking.id, e);
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Invalid payment details: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Payment was not completed (status: {})", .0.as_str())]
    PaymentDeclined(PaymentStatus),

    #[error("Seats already booked: {}", .0.join(", "))]
    SeatsTaken(Vec<String>),

    #[error("Failed to save booking: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{booking_for, session_at_payment};
    use busline_core::events::NoopPublisher;
    use busline_shared::Gender;
    use busline_store::MemoryStore;

    fn checkout(store: Arc<MemoryStore>) -> Checkout {
        Checkout::new(
            Arc::new(SimulatedPaymentGateway::from_millis(0)),
            store,
            Arc::new(NoopPublisher),
        )
        .with_merchant_upi_id("buses@okbank")
    }

    #[test]
    fn test_qr_payload() {
        let checkout = checkout(Arc::new(MemoryStore::new()));
        assert_eq!(
            checkout.qr_payload(1300),
            "upi://pay?pa=buses@okbank&pn=BusBooking&am=1300&cu=INR"
        );
    }

    #[tokio::test]
    async fn test_upi_payment_creates_booking() {
        let store = Arc::new(MemoryStore::new());
        let checkout = checkout(store.clone());
        let mut session = session_at_payment(&["B1", "B2"]);

        let booking = checkout
            .pay(&mut session, PaymentRequest::upi("asha@okaxis"))
            .await
            .unwrap();

        assert!(booking.id.starts_with("BK"));
        assert!(booking.payment_id.starts_with("PAY"));
        assert_eq!(booking.total_amount, 1300);
        assert_eq!(booking.payment_method, PaymentMethod::Upi);
        assert_eq!(booking.upi_id.as_deref(), Some("asha@okaxis"));
        assert_eq!(booking.seat_numbers(), vec!["B1", "B2"]);
        assert_eq!(session.stage(), BookingStage::Completed);

        let saved = store.get_booking(&booking.id).await.unwrap();
        assert_eq!(saved, Some(booking));
    }

    #[tokio::test]
    async fn test_rejects_malformed_upi_id() {
        let store = Arc::new(MemoryStore::new());
        let checkout = checkout(store.clone());
        let mut session = session_at_payment(&["B1"]);

        match checkout.pay(&mut session, PaymentRequest::upi("not-an-upi")).await {
            Err(CheckoutError::Validation(errors)) => assert_eq!(
                errors.get("upiId"),
                Some("Please enter a valid UPI ID (e.g., username@bankname)")
            ),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(session.stage(), BookingStage::Payment);
        assert!(store.list_bookings("asha@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_seats_taken_meanwhile() {
        let store = Arc::new(MemoryStore::new());
        let checkout = checkout(store.clone());
        let mut session = session_at_payment(&["B1"]);

        let other = booking_for(session.bus(), session.filters().date, &[("B1", Gender::Male)]);
        store.save_booking(&other).await.unwrap();

        let result = checkout.pay(&mut session, PaymentRequest::Qr).await;
        assert!(matches!(result, Err(CheckoutError::SeatsTaken(seats)) if seats == vec!["B1".to_string()]));
    }

    #[tokio::test]
    async fn test_concurrent_payments_sell_seat_once() {
        let store = Arc::new(MemoryStore::new());
        let checkout = Checkout::new(
            Arc::new(SimulatedPaymentGateway::from_millis(50)),
            store.clone(),
            Arc::new(NoopPublisher),
        );
        let mut first = session_at_payment(&["B1"]);
        let mut second = session_at_payment(&["B1"]);

        let (a, b) = tokio::join!(
            checkout.pay(&mut first, PaymentRequest::Qr),
            checkout.pay(&mut second, PaymentRequest::upi("ravi@okaxis")),
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(CheckoutError::SeatsTaken(seats)) if seats == &vec!["B1".to_string()]
        )));

        let trip = store
            .list_trip_bookings(&first.bus().id, first.filters().date)
            .await
            .unwrap();
        assert_eq!(trip.len(), 1);

        let completed = [first.stage(), second.stage()]
            .iter()
            .filter(|stage| **stage == BookingStage::Completed)
            .count();
        assert_eq!(completed, 1);
    }

    #[tokio::test]
    async fn test_requires_payment_stage() {
        let checkout = checkout(Arc::new(MemoryStore::new()));
        let mut session = session_at_payment(&["B1"]);
        session.reset();

        let result = checkout.pay(&mut session, PaymentRequest::Qr).await;
        assert!(matches!(
            result,
            Err(CheckoutError::Session(SessionError::WrongStage { .. }))
        ));
    }

    #[tokio::test]
    async fn test_gateway_declines_zero_amount() {
        let gateway = SimulatedPaymentGateway::from_millis(0);
        let intent = PaymentIntent::new("PAY1".into(), 0, "INR", PaymentMethod::Qr, None);
        assert_eq!(gateway.process_payment(&intent).await.unwrap(), PaymentStatus::Failed);
    }
}
