use busline_shared::Gender;
use serde::{Deserialize, Serialize};

/// Seat category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeatKind {
    #[default]
    Normal,
    Sleeper,
}

impl SeatKind {
    /// Kind of every seat on a bus of `bus_type`
    pub fn for_bus_type(bus_type: &str) -> Self {
        if bus_type.contains("Sleeper") {
            SeatKind::Sleeper
        } else {
            SeatKind::Normal
        }
    }
}

/// Whether a seat has been sold for the trip, and to whom.
///
/// A vacant seat has no occupant gender by construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    #[default]
    Vacant,
    Booked(Gender),
}

/// Grid coordinates. Columns 0-1 are the left pair, 2-3 the right pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatPosition {
    pub row: u32,
    pub col: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PairSide {
    Left,
    Right,
}

/// The two seats sharing one side of the aisle in a row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SeatPair {
    pub row: u32,
    pub side: PairSide,
}

impl SeatPosition {
    pub fn new(row: u32, col: u8) -> Self {
        Self { row, col }
    }

    /// Pair this position belongs to
    pub fn pair(&self) -> SeatPair {
        let side = if self.col < 2 { PairSide::Left } else { PairSide::Right };
        SeatPair { row: self.row, side }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub id: String,
    pub number: String,
    #[serde(default)]
    pub kind: SeatKind,
    #[serde(default)]
    pub occupancy: Occupancy,
    pub position: SeatPosition,
    pub pair: SeatPair,
}

impl Seat {
    pub fn new(id: impl Into<String>, number: impl Into<String>, position: SeatPosition) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            kind: SeatKind::Normal,
            occupancy: Occupancy::Vacant,
            position,
            pair: position.pair(),
        }
    }

    pub fn booked(mut self, gender: Gender) -> Self {
        self.occupancy = Occupancy::Booked(gender);
        self
    }

    pub fn is_booked(&self) -> bool {
        matches!(self.occupancy, Occupancy::Booked(_))
    }

    pub fn occupant_gender(&self) -> Option<Gender> {
        match self.occupancy {
            Occupancy::Booked(gender) => Some(gender),
            Occupancy::Vacant => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Route {
    pub from: String,
    pub to: String,
}

impl Route {
    pub fn matches(&self, from: &str, to: &str) -> bool {
        self.from.eq_ignore_ascii_case(from.trim()) && self.to.eq_ignore_ascii_case(to.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bus {
    pub id: String,
    pub name: String,
    pub bus_number: String,
    pub image: String,
    pub route: Route,
    pub departure_time: String,
    pub arrival_time: String,
    /// Fare per seat in whole rupees
    pub price: i32,
    pub bus_type: String,
    pub seats: Vec<Seat>,
}

impl Bus {
    pub fn seat(&self, number: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.number == number)
    }

    pub fn available_seats(&self) -> usize {
        self.seats.iter().filter(|s| !s.is_booked()).count()
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_seats() == 0
    }

    /// Number of seat rows, derived from the highest occupied row index
    pub fn row_count(&self) -> u32 {
        self.seats.iter().map(|s| s.position.row + 1).max().unwrap_or(0)
    }

    /// Fare for `seat_count` seats
    pub fn fare_for(&self, seat_count: usize) -> i32 {
        self.price * seat_count as i32
    }
}

/// Buses operated by the state corporation are sleepers, everything else a seater.
pub fn bus_type_for(name: &str) -> &'static str {
    if name.contains("SETC") {
        "AC Sleeper"
    } else {
        "AC Seater"
    }
}
