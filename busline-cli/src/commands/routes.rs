use busline_core::search::SearchFilters;
use busline_order::search_trips;
use busline_shared::GenderPreference;
use chrono::{NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    /// Journey date, YYYY-MM-DD
    #[arg(long)]
    pub date: NaiveDate,
    /// Who you are willing to sit next to: male, female or any
    #[arg(long, default_value = "any")]
    pub gender: GenderPreference,
}

#[derive(Debug, Serialize, Tabled)]
struct RouteRow {
    from: String,
    to: String,
    buses: usize,
}

#[derive(Debug, Serialize, Tabled)]
struct BusRow {
    id: String,
    name: String,
    #[serde(rename = "type")]
    #[tabled(rename = "type")]
    bus_type: String,
    departs: String,
    arrives: String,
    fare: String,
    seats_left: String,
}

pub fn list_routes(state: &AppState, format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<RouteRow> = state
        .catalog
        .routes()
        .into_iter()
        .map(|route| RouteRow {
            buses: state.catalog.buses_for_route(&route.from, &route.to).len(),
            from: route.from,
            to: route.to,
        })
        .collect();

    output::print_list(&rows, format);
    if format == OutputFormat::Table {
        output::print_kv("Cities", &state.catalog.cities().join(", "));
    }
    Ok(())
}

pub async fn search(state: &AppState, args: &SearchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let filters = SearchFilters::new(args.from.clone(), args.to.clone(), args.date, args.gender);
    validate_filters(state, &filters)?;

    let summaries = search_trips(&state.catalog, state.stores.bookings.as_ref(), &filters).await?;
    let rows: Vec<BusRow> = summaries
        .into_iter()
        .map(|summary| BusRow {
            seats_left: if summary.sold_out {
                "Sold out".to_string()
            } else {
                summary.available_seats.to_string()
            },
            id: summary.bus.id,
            name: summary.bus.name,
            bus_type: summary.bus.bus_type,
            departs: summary.bus.departure_time,
            arrives: summary.bus.arrival_time,
            fare: format!("₹{}", summary.bus.price),
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}

pub fn validate_filters(state: &AppState, filters: &SearchFilters) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    filters
        .validate(today, state.config.search.max_advance_days)
        .map_err(|e| super::account::explain(e.into()))
}
