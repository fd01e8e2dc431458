use std::path::PathBuf;

use anyhow::{bail, Context};
use busline_core::booking::Passenger;
use busline_core::search::SearchFilters;
use busline_order::{load_trip, BookingSession, CheckoutError, PaymentRequest, SessionError, Ticket};
use busline_shared::{Gender, GenderPreference};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde::Deserialize;
use tracing::info;

use crate::output::{self, OutputFormat};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Upi,
    Qr,
}

#[derive(Debug, Args)]
pub struct BookArgs {
    pub bus_id: String,
    #[arg(long)]
    pub date: NaiveDate,
    #[arg(long, default_value = "any")]
    pub gender: GenderPreference,
    /// Comma-separated seat numbers, e.g. A1,A2
    #[arg(long, value_delimiter = ',', required = true)]
    pub seats: Vec<String>,
    /// JSON array of passengers, one per seat in the order given
    #[arg(long)]
    pub passengers: PathBuf,
    #[arg(long, value_enum, default_value = "upi")]
    pub method: MethodArg,
    #[arg(long, required_if_eq("method", "upi"))]
    pub upi_id: Option<String>,
}

/// Passenger form as written in the passengers file
#[derive(Debug, Deserialize)]
struct PassengerForm {
    name: String,
    age: u32,
    gender: Gender,
    mobile: String,
    email: String,
}

impl From<PassengerForm> for Passenger {
    fn from(form: PassengerForm) -> Self {
        Passenger {
            name: form.name,
            age: form.age,
            gender: form.gender,
            mobile: form.mobile,
            email: form.email,
            seat_number: String::new(),
        }
    }
}

pub async fn execute(state: &AppState, args: &BookArgs, format: OutputFormat) -> anyhow::Result<()> {
    let seats = requested_seats(&args.seats)?;
    let user = super::account::require_user(state).await?;
    let passengers = read_passengers(&args.passengers).await?;

    let bus = load_trip(&state.catalog, state.stores.bookings.as_ref(), &args.bus_id, args.date).await?;
    let filters = SearchFilters::new(
        bus.route.from.clone(),
        bus.route.to.clone(),
        args.date,
        args.gender,
    );
    super::routes::validate_filters(state, &filters)?;

    let mut session = BookingSession::new(user, bus, filters, state.engine);
    for seat in seats {
        session.toggle_seat(seat).map_err(|e| {
            println!("{}", session.seat_map());
            anyhow::Error::new(e)
        })?;
    }

    session.submit_seats()?;
    session.submit_passengers(passengers).map_err(explain_session)?;

    let checkout = state.checkout();
    let amount = session.total_fare();
    let request = match (args.method, &args.upi_id) {
        (MethodArg::Upi, Some(upi_id)) => PaymentRequest::upi(upi_id.clone()),
        (MethodArg::Upi, None) => bail!("--upi-id is required for UPI payments"),
        (MethodArg::Qr, _) => {
            output::print_kv("Scan to pay", &checkout.qr_payload(amount));
            PaymentRequest::Qr
        }
    };

    output::print_kv("Amount", &format!("₹{}", amount));
    info!("Paying for session {}", session.id());
    let booking = checkout.pay(&mut session, request).await.map_err(explain_checkout)?;

    output::print_success(&format!("Booking confirmed: {}", booking.id));
    let ticket = Ticket::from_booking(booking);
    output::print_item(ticket.booking(), &ticket.render(), format);
    Ok(())
}

/// Trimmed seat numbers in the order given. A repeated seat would toggle
/// itself off again, so it is refused.
fn requested_seats(seats: &[String]) -> anyhow::Result<Vec<&str>> {
    let mut requested: Vec<&str> = Vec::with_capacity(seats.len());
    for seat in seats.iter().map(|s| s.trim()) {
        if seat.is_empty() {
            bail!("--seats contains an empty entry");
        }
        if requested.contains(&seat) {
            bail!("Seat {} is listed more than once in --seats", seat);
        }
        requested.push(seat);
    }
    Ok(requested)
}

async fn read_passengers(path: &PathBuf) -> anyhow::Result<Vec<Passenger>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let forms: Vec<PassengerForm> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of passengers", path.display()))?;
    Ok(forms.into_iter().map(Passenger::from).collect())
}

fn explain_session(err: SessionError) -> anyhow::Error {
    match err {
        SessionError::Validation(errors) => {
            for (field, message) in errors.iter() {
                output::print_error(&format!("passenger {}: {}", field, message));
            }
            anyhow::anyhow!("Please correct the passenger details above")
        }
        other => other.into(),
    }
}

fn explain_checkout(err: CheckoutError) -> anyhow::Error {
    match err {
        CheckoutError::Validation(errors) => {
            for (_, message) in errors.iter() {
                output::print_error(message);
            }
            anyhow::anyhow!("Payment was not attempted")
        }
        other => other.into(),
    }
}
