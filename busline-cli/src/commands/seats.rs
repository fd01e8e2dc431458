use busline_core::search::SearchFilters;
use busline_order::{load_trip, BookingSession};
use busline_shared::GenderPreference;
use chrono::NaiveDate;
use clap::Args;

use crate::output::{self, OutputFormat};
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct SeatsArgs {
    /// Bus id from `busline search`
    pub bus_id: String,
    #[arg(long)]
    pub date: NaiveDate,
    #[arg(long, default_value = "any")]
    pub gender: GenderPreference,
}

pub async fn execute(state: &AppState, args: &SeatsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let user = super::account::require_user(state).await?;
    let bus = load_trip(&state.catalog, state.stores.bookings.as_ref(), &args.bus_id, args.date).await?;
    let filters = SearchFilters::new(
        bus.route.from.clone(),
        bus.route.to.clone(),
        args.date,
        args.gender,
    );
    let session = BookingSession::new(user, bus, filters, state.engine);
    let map = session.seat_map();

    let bus = session.bus();
    let header = format!(
        "{} ({}) {} -> {} on {}, departs {}, ₹{} per seat\n\n{}",
        bus.name,
        bus.bus_type,
        bus.route.from,
        bus.route.to,
        args.date,
        bus.departure_time,
        bus.price,
        map
    );
    output::print_item(&map, &header, format);
    Ok(())
}
