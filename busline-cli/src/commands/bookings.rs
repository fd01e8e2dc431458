use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct TicketArgs {
    pub booking_id: String,
    /// Write bus-ticket-<id>.txt into tickets.output_dir
    #[arg(long)]
    pub download: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct BookingRow {
    id: String,
    bus: String,
    route: String,
    journey: String,
    seats: String,
    amount: String,
    status: String,
}

pub async fn list(state: &AppState, format: OutputFormat) -> anyhow::Result<()> {
    let user = super::account::require_user(state).await?;
    let bookings = state.tickets().bookings_for(&user).await?;

    let rows: Vec<BookingRow> = bookings
        .iter()
        .map(|b| BookingRow {
            id: b.id.clone(),
            bus: b.bus.name.clone(),
            route: format!("{} -> {}", b.bus.route.from, b.bus.route.to),
            journey: b.journey_date.format("%Y-%m-%d").to_string(),
            seats: b.seat_numbers().join(", "),
            amount: format!("₹{}", b.total_amount),
            status: b.payment_status.as_str().to_string(),
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}

pub async fn ticket(state: &AppState, args: &TicketArgs, format: OutputFormat) -> anyhow::Result<()> {
    let user = super::account::require_user(state).await?;
    let ticket = state.tickets().ticket(&user, &args.booking_id).await?;

    if args.download {
        let path = ticket.download(&state.config.tickets.output_dir).await?;
        output::print_success(&format!("Ticket saved to {}", path.display()));
        return Ok(());
    }

    output::print_item(ticket.booking(), &ticket.render(), format);
    Ok(())
}
