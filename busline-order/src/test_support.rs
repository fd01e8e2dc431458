use busline_catalog::{Bus, Route, Seat, SeatPosition};
use busline_core::booking::{Booking, Passenger};
use busline_core::identity::User;
use busline_core::payment::{PaymentMethod, PaymentStatus};
use busline_core::search::SearchFilters;
use busline_seating::SeatEligibilityEngine;
use busline_shared::{Gender, GenderPreference};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::session::BookingSession;

/// Two rows:
/// `A1 | A2 (male) || B1 | B2` and `C1 | C2 || D1 | D2 (female)`
pub fn sample_bus() -> Bus {
    let seat = |number: &str, row, col| Seat::new(format!("seat-{}", number), number, SeatPosition::new(row, col));
    Bus {
        id: "bus-1".into(),
        name: "KPN Travels".into(),
        bus_number: "TN01AB1234".into(),
        image: "/kpn.jpg".into(),
        route: Route {
            from: "Chennai".into(),
            to: "Madurai".into(),
        },
        departure_time: "21:00".into(),
        arrival_time: "05:30".into(),
        price: 650,
        bus_type: "AC Seater".into(),
        seats: vec![
            seat("A1", 0, 0),
            seat("A2", 0, 1).booked(Gender::Male),
            seat("B1", 0, 2),
            seat("B2", 0, 3),
            seat("C1", 1, 0),
            seat("C2", 1, 1),
            seat("D1", 1, 2),
            seat("D2", 1, 3).booked(Gender::Female),
        ],
    }
}

pub fn sample_user(gender: Gender) -> User {
    User {
        id: Uuid::new_v4(),
        email: "asha@example.com".into(),
        name: "Asha".into(),
        mobile: "9876543210".into(),
        gender,
        created_at: Utc::now(),
    }
}

pub fn passenger(name: &str, gender: Gender) -> Passenger {
    Passenger {
        name: name.into(),
        age: 30,
        gender,
        mobile: "9876543210".into(),
        email: "asha@example.com".into(),
        seat_number: String::new(),
    }
}

/// Confirmed booking `BK1` of `asha@example.com` holding `seats`
pub fn booking_for(bus: &Bus, journey_date: NaiveDate, seats: &[(&str, Gender)]) -> Booking {
    Booking {
        id: "BK1".into(),
        user_id: "asha@example.com".into(),
        bus: bus.clone(),
        passengers: seats
            .iter()
            .map(|(seat, gender)| Passenger {
                seat_number: seat.to_string(),
                ..passenger("Asha", *gender)
            })
            .collect(),
        journey_date,
        booking_date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
        payment_id: "PAY1".into(),
        payment_status: PaymentStatus::Completed,
        total_amount: bus.fare_for(seats.len()),
        payment_method: PaymentMethod::Qr,
        upi_id: None,
    }
}

/// Session of a female user with `seats` selected and passengers filled in
pub fn session_at_payment(seats: &[&str]) -> BookingSession {
    let filters = SearchFilters::new(
        "Chennai",
        "Madurai",
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        GenderPreference::Any,
    );
    let mut session = BookingSession::new(
        sample_user(Gender::Female),
        sample_bus(),
        filters,
        SeatEligibilityEngine::default(),
    );
    for seat in seats {
        session.toggle_seat(seat).unwrap();
    }
    session.submit_seats().unwrap();
    session
        .submit_passengers(seats.iter().map(|_| passenger("Asha", Gender::Female)).collect())
        .unwrap();
    session
}
