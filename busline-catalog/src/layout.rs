use std::collections::HashSet;

use busline_shared::Gender;
use serde::{Deserialize, Serialize};

use crate::bus::{Occupancy, Seat, SeatKind, SeatPosition};

/// 2 seats on the left, aisle, 2 seats on the right
pub const SEATS_PER_ROW: usize = 4;

/// Seat entry as it appears in the seed export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeatRecord {
    pub seat_number: String,
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

/// Builds and checks seat grids
pub struct SeatLayout;

impl SeatLayout {
    /// Lay out flat seed records four to a row, in file order.
    pub fn from_records(records: &[SeatRecord]) -> Result<Vec<Seat>, LayoutError> {
        let mut seats = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let occupancy = match (record.is_booked, record.gender) {
                (true, Some(gender)) => Occupancy::Booked(gender),
                (true, None) => {
                    return Err(LayoutError::MissingOccupantGender(record.seat_number.clone()))
                }
                (false, Some(_)) => {
                    return Err(LayoutError::GenderOnVacantSeat(record.seat_number.clone()))
                }
                (false, None) => Occupancy::Vacant,
            };

            let position = SeatPosition::new(
                (index / SEATS_PER_ROW) as u32,
                (index % SEATS_PER_ROW) as u8,
            );

            seats.push(Seat {
                id: format!("seat-{}", index + 1),
                number: record.seat_number.clone(),
                kind: SeatKind::Normal,
                occupancy,
                position,
                pair: position.pair(),
            });
        }

        Self::validate(&seats)?;
        Ok(seats)
    }

    /// Check the grid invariants on an already-built seat list.
    pub fn validate(seats: &[Seat]) -> Result<(), LayoutError> {
        let mut numbers = HashSet::new();
        let mut positions = HashSet::new();

        for seat in seats {
            if seat.position.col as usize >= SEATS_PER_ROW {
                return Err(LayoutError::ColumnOutOfRange {
                    seat: seat.number.clone(),
                    col: seat.position.col,
                });
            }
            if seat.pair != seat.position.pair() {
                return Err(LayoutError::PairMismatch(seat.number.clone()));
            }
            if !numbers.insert(seat.number.as_str()) {
                return Err(LayoutError::DuplicateNumber(seat.number.clone()));
            }
            if !positions.insert(seat.position) {
                return Err(LayoutError::DuplicatePosition {
                    row: seat.position.row,
                    col: seat.position.col,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Duplicate seat number: {0}")]
    DuplicateNumber(String),

    #[error("Duplicate seat position: row {row}, col {col}")]
    DuplicatePosition {
        row: u32,
        col: u8,
    },

    #[error("Seat {seat} has column {col}, expected 0-3")]
    ColumnOutOfRange {
        seat: String,
        col: u8,
    },

    #[error("Seat {0} carries a pair tag that does not match its position")]
    PairMismatch(String),

    #[error("Booked seat {0} has no occupant gender")]
    MissingOccupantGender(String),

    #[error("Vacant seat {0} carries an occupant gender")]
    GenderOnVacantSeat(String),
}
