use busline_catalog::{Bus, BusCatalog, BusSummary, CatalogError, Occupancy};
use busline_core::booking::Booking;
use busline_core::repository::BookingRepository;
use busline_core::search::SearchFilters;
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Mark every seat held by a finalized booking of this bus on `journey_date`
/// as booked by that passenger's gender.
pub fn overlay_bookings(bus: &Bus, journey_date: NaiveDate, bookings: &[Booking]) -> Bus {
    let mut trip = bus.clone();

    for booking in bookings
        .iter()
        .filter(|b| b.is_confirmed() && b.is_for_trip(&bus.id, journey_date))
    {
        for passenger in &booking.passengers {
            match trip.seats.iter_mut().find(|s| s.number == passenger.seat_number) {
                Some(seat) if seat.is_booked() => {
                    warn!(
                        "Seat {} on bus {} is booked twice (booking {})",
                        seat.number, bus.id, booking.id
                    );
                }
                Some(seat) => seat.occupancy = Occupancy::Booked(passenger.gender),
                None => warn!(
                    "Booking {} references unknown seat {} on bus {}",
                    booking.id, passenger.seat_number, bus.id
                ),
            }
        }
    }

    trip
}

/// Seat map of `bus_id` as it stands for `journey_date`
pub async fn load_trip(
    catalog: &BusCatalog,
    bookings: &dyn BookingRepository,
    bus_id: &str,
    journey_date: NaiveDate,
) -> Result<Bus, TripError> {
    let bus = catalog.bus(bus_id)?;
    let existing = bookings
        .list_trip_bookings(bus_id, journey_date)
        .await
        .map_err(|e| TripError::Storage(e.to_string()))?;

    debug!(
        "Bus {} on {}: {} finalized bookings",
        bus_id,
        journey_date,
        existing.len()
    );
    Ok(overlay_bookings(&bus, journey_date, &existing))
}

/// Buses on the searched route with seats left on the searched date
pub async fn search_trips(
    catalog: &BusCatalog,
    bookings: &dyn BookingRepository,
    filters: &SearchFilters,
) -> Result<Vec<BusSummary>, TripError> {
    let mut results = Vec::new();
    for bus in catalog.buses_for_route(&filters.from, &filters.to) {
        let existing = bookings
            .list_trip_bookings(&bus.id, filters.date)
            .await
            .map_err(|e| TripError::Storage(e.to_string()))?;
        results.push(BusSummary::from(overlay_bookings(&bus, filters.date, &existing)));
    }

    debug!(
        "{} buses from {} to {} on {}",
        results.len(),
        filters.from,
        filters.to,
        filters.date
    );
    Ok(results)
}

#[derive(Debug, thiserror::Error)]
pub enum TripError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to load bookings: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{booking_for, sample_bus};
    use busline_shared::{Gender, GenderPreference};
    use busline_store::MemoryStore;

    #[test]
    fn test_overlay_marks_passenger_seats() {
        let bus = sample_bus();
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let bookings = vec![booking_for(&bus, date, &[("B1", Gender::Female), ("B2", Gender::Male)])];

        let trip = overlay_bookings(&bus, date, &bookings);
        assert_eq!(trip.seat("B1").unwrap().occupant_gender(), Some(Gender::Female));
        assert_eq!(trip.seat("B2").unwrap().occupant_gender(), Some(Gender::Male));
        assert_eq!(trip.available_seats(), bus.available_seats() - 2);
    }

    #[test]
    fn test_overlay_ignores_other_dates() {
        let bus = sample_bus();
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let other_day = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        let bookings = vec![booking_for(&bus, other_day, &[("B1", Gender::Female)])];

        let trip = overlay_bookings(&bus, date, &bookings);
        assert!(!trip.seat("B1").unwrap().is_booked());
    }

    #[tokio::test]
    async fn test_search_counts_seats_for_the_date() {
        let bus = sample_bus();
        let catalog = BusCatalog::new(vec![bus.clone()]).unwrap();
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let other_day = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        store
            .save_booking(&booking_for(&bus, date, &[("B1", Gender::Female), ("B2", Gender::Male)]))
            .await
            .unwrap();

        let filters = SearchFilters::new("chennai", "madurai", date, GenderPreference::Any);
        let results = search_trips(&catalog, &store, &filters).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].available_seats, bus.available_seats() - 2);

        let filters = SearchFilters::new("Chennai", "Madurai", other_day, GenderPreference::Any);
        let results = search_trips(&catalog, &store, &filters).await.unwrap();
        assert_eq!(results[0].available_seats, bus.available_seats());

        let filters = SearchFilters::new("Madurai", "Chennai", date, GenderPreference::Any);
        assert!(search_trips(&catalog, &store, &filters).await.unwrap().is_empty());
    }
}
