pub mod references;
pub mod trip;
pub mod session;
pub mod checkout;
pub mod ticket;

#[cfg(test)]
mod test_support;

pub use checkout::{Checkout, CheckoutError, PaymentRequest, SimulatedPaymentGateway};
pub use session::{BookingSession, BookingStage, SessionError};
pub use ticket::{Ticket, TicketError, TicketService};
pub use trip::{load_trip, overlay_bookings, search_trips, TripError};
