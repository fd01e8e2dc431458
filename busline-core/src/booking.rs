use busline_catalog::Bus;
use busline_shared::Gender;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::payment::{PaymentMethod, PaymentStatus};
use crate::validation::{self, ValidationErrors};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passenger {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub mobile: String,
    pub email: String,
    pub seat_number: String,
}

impl Passenger {
    /// Empty form for one selected seat
    pub fn draft(seat_number: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            age: 0,
            gender: Gender::Male,
            mobile: String::new(),
            email: String::new(),
            seat_number: seat_number.into(),
        }
    }

    /// Record this passenger's failures under `"<index>-<field>"` keys
    pub fn validate_into(&self, index: usize, errors: &mut ValidationErrors) {
        errors.check(
            validation::is_valid_name(&self.name),
            format!("{}-name", index),
            "Please enter a valid name (min 2 characters)",
        );
        errors.check(
            validation::is_valid_age(self.age),
            format!("{}-age", index),
            "Age must be between 1 and 120",
        );
        validation::check_mobile(errors, &format!("{}-mobile", index), &self.mobile);
        validation::check_email(errors, &format!("{}-email", index), &self.email);
    }
}

pub fn validate_passengers(passengers: &[Passenger]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (index, passenger) in passengers.iter().enumerate() {
        passenger.validate_into(index, &mut errors);
    }
    errors.into_result()
}

/// A paid, finalized booking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    pub id: String,
    /// Email of the booking account
    pub user_id: String,
    /// Snapshot of the bus at the time of booking
    pub bus: Bus,
    pub passengers: Vec<Passenger>,
    pub journey_date: NaiveDate,
    pub booking_date: NaiveDate,
    pub payment_id: String,
    pub payment_status: PaymentStatus,
    pub total_amount: i32,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
}

impl Booking {
    pub fn seat_numbers(&self) -> Vec<&str> {
        self.passengers.iter().map(|p| p.seat_number.as_str()).collect()
    }

    /// Whether this booking holds seats on `bus_id` for `journey_date`
    pub fn is_for_trip(&self, bus_id: &str, journey_date: NaiveDate) -> bool {
        self.bus.id == bus_id && self.journey_date == journey_date
    }

    pub fn is_confirmed(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }

    /// Seats of this booking already held by a confirmed booking of the same trip
    pub fn seats_taken_by<'a>(&self, existing: impl IntoIterator<Item = &'a Booking>) -> Vec<String> {
        let held: Vec<&str> = existing
            .into_iter()
            .filter(|b| b.is_confirmed() && b.is_for_trip(&self.bus.id, self.journey_date))
            .flat_map(|b| b.passengers.iter().map(|p| p.seat_number.as_str()))
            .collect();

        self.passengers
            .iter()
            .map(|p| p.seat_number.as_str())
            .filter(|seat| held.contains(seat))
            .map(String::from)
            .collect()
    }
}
