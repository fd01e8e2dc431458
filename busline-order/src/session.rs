use std::fmt;

use busline_catalog::Bus;
use busline_core::booking::{validate_passengers, Passenger};
use busline_core::identity::User;
use busline_core::search::SearchFilters;
use busline_core::validation::ValidationErrors;
use busline_seating::{SeatClass, SeatEligibilityEngine, SeatMap, SelectionState};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where a booking session stands
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStage {
    SeatSelection,
    PassengerDetails,
    Payment,
    Completed,
}

impl fmt::Display for BookingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingStage::SeatSelection => "SEAT_SELECTION",
            BookingStage::PassengerDetails => "PASSENGER_DETAILS",
            BookingStage::Payment => "PAYMENT",
            BookingStage::Completed => "COMPLETED",
        };
        f.write_str(name)
    }
}

/// One user's walk from seat selection to payment on one trip.
///
/// The session exclusively owns its `SelectionState`; the selection is moved
/// into the seat list when seats are submitted.
pub struct BookingSession {
    id: Uuid,
    user: User,
    bus: Bus,
    filters: SearchFilters,
    engine: SeatEligibilityEngine,
    selection: SelectionState,
    seat_numbers: Vec<String>,
    passengers: Vec<Passenger>,
    stage: BookingStage,
}

impl BookingSession {
    /// `bus` is the trip seat map, already overlaid with finalized bookings.
    pub fn new(user: User, bus: Bus, filters: SearchFilters, engine: SeatEligibilityEngine) -> Self {
        let id = Uuid::new_v4();
        info!(
            "Booking session {} opened for {} on bus {} ({})",
            id, user.email, bus.id, filters.date
        );
        Self {
            id,
            user,
            bus,
            filters,
            engine,
            selection: SelectionState::new(),
            seat_numbers: Vec::new(),
            passengers: Vec::new(),
            stage: BookingStage::SeatSelection,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn stage(&self) -> BookingStage {
        self.stage
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Seats fixed by `submit_seats`
    pub fn seat_numbers(&self) -> &[String] {
        &self.seat_numbers
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    fn seat_count(&self) -> usize {
        match self.stage {
            BookingStage::SeatSelection => self.selection.len(),
            _ => self.seat_numbers.len(),
        }
    }

    /// Fare for the seats currently chosen
    pub fn total_fare(&self) -> i32 {
        self.bus.fare_for(self.seat_count())
    }

    pub fn classify(&self, seat_number: &str) -> Result<SeatClass, SessionError> {
        let seat = self
            .bus
            .seat(seat_number)
            .ok_or_else(|| SessionError::UnknownSeat(seat_number.to_string()))?;
        Ok(self.engine.classify_seat(
            seat,
            &self.bus.seats,
            &self.selection,
            self.filters.gender,
            self.user.gender,
        ))
    }

    pub fn seat_map(&self) -> SeatMap {
        SeatMap::build(
            &self.engine,
            &self.bus.seats,
            &self.selection,
            self.filters.gender,
            self.user.gender,
        )
    }

    /// Select or deselect a seat. Deselecting is always allowed; selecting
    /// requires the seat to be eligible for this user right now.
    ///
    /// Returns true when the seat ends up selected.
    pub fn toggle_seat(&mut self, seat_number: &str) -> Result<bool, SessionError> {
        self.ensure_stage(BookingStage::SeatSelection)?;

        let seat = self
            .bus
            .seat(seat_number)
            .ok_or_else(|| SessionError::UnknownSeat(seat_number.to_string()))?;

        if !self.selection.contains(seat_number)
            && !self
                .engine
                .is_eligible(seat, &self.bus.seats, self.filters.gender, self.user.gender)
        {
            let class = self.classify(seat_number)?;
            warn!("Session {}: seat {} is not selectable ({})", self.id, seat_number, class);
            return Err(SessionError::SeatNotSelectable {
                seat: seat_number.to_string(),
                class,
            });
        }

        self.selection = self.engine.toggle_seat(seat_number, &self.selection);
        let selected = self.selection.contains(seat_number);
        debug!(
            "Session {}: seat {} {} ({} selected)",
            self.id,
            seat_number,
            if selected { "selected" } else { "deselected" },
            self.selection.len()
        );
        Ok(selected)
    }

    /// Fix the selection and move on to passenger details.
    ///
    /// Returns one empty passenger form per seat.
    pub fn submit_seats(&mut self) -> Result<Vec<Passenger>, SessionError> {
        self.ensure_stage(BookingStage::SeatSelection)?;
        if self.selection.is_empty() {
            return Err(SessionError::NoSeatsSelected);
        }

        self.seat_numbers = self.selection.to_vec();
        self.selection.clear();
        self.passengers = self.seat_numbers.iter().map(Passenger::draft).collect();
        self.stage = BookingStage::PassengerDetails;

        info!("Session {}: seats {:?} submitted", self.id, self.seat_numbers);
        Ok(self.passengers.clone())
    }

    /// Go back from passenger details with the previous seats selected again
    pub fn reopen_seat_selection(&mut self) -> Result<(), SessionError> {
        self.ensure_stage(BookingStage::PassengerDetails)?;
        self.selection = self.seat_numbers.drain(..).collect();
        self.passengers.clear();
        self.stage = BookingStage::SeatSelection;
        Ok(())
    }

    /// Attach passenger details, one per submitted seat and in seat order.
    /// Seat numbers on the forms are overwritten with the submitted seats.
    pub fn submit_passengers(&mut self, passengers: Vec<Passenger>) -> Result<(), SessionError> {
        self.ensure_stage(BookingStage::PassengerDetails)?;
        if passengers.len() != self.seat_numbers.len() {
            return Err(SessionError::PassengerCountMismatch {
                seats: self.seat_numbers.len(),
                passengers: passengers.len(),
            });
        }

        let passengers: Vec<Passenger> = passengers
            .into_iter()
            .zip(&self.seat_numbers)
            .map(|(passenger, seat)| Passenger {
                seat_number: seat.clone(),
                ..passenger
            })
            .collect();

        validate_passengers(&passengers).map_err(SessionError::Validation)?;

        self.passengers = passengers;
        self.stage = BookingStage::Payment;
        info!("Session {}: {} passengers captured", self.id, self.passengers.len());
        Ok(())
    }

    pub(crate) fn ensure_stage(&self, expected: BookingStage) -> Result<(), SessionError> {
        if self.stage != expected {
            return Err(SessionError::WrongStage {
                expected,
                actual: self.stage,
            });
        }
        Ok(())
    }

    pub(crate) fn mark_completed(&mut self) {
        self.stage = BookingStage::Completed;
    }

    /// Abandon progress and start over at seat selection
    pub fn reset(&mut self) {
        self.selection.clear();
        self.seat_numbers.clear();
        self.passengers.clear();
        self.stage = BookingStage::SeatSelection;
        info!("Session {} reset", self.id);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Please select at least one seat")]
    NoSeatsSelected,

    #[error("Seat {0} does not exist on this bus")]
    UnknownSeat(String),

    #[error("Seat {seat} cannot be selected ({class})")]
    SeatNotSelectable {
        seat: String,
        class: SeatClass,
    },

    #[error("Booking is at stage {actual}, expected {expected}")]
    WrongStage {
        expected: BookingStage,
        actual: BookingStage,
    },

    #[error("{passengers} passengers given for {seats} seats")]
    PassengerCountMismatch {
        seats: usize,
        passengers: usize,
    },

    #[error("Invalid passenger details: {0}")]
    Validation(ValidationErrors),
}
