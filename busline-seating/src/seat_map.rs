use std::fmt;

use busline_catalog::{Seat, SEATS_PER_ROW};
use busline_shared::{Gender, GenderPreference};
use serde::Serialize;
use tracing::warn;

use crate::engine::{SeatClass, SeatEligibilityEngine};
use crate::selection::SelectionState;

pub const LEGEND: [SeatClass; 5] = [
    SeatClass::Available,
    SeatClass::BookedMale,
    SeatClass::BookedFemale,
    SeatClass::Selected,
    SeatClass::Blocked,
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeatCell {
    pub number: String,
    pub class: SeatClass,
    pub interactive: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeatMapRow {
    pub row: u32,
    /// Columns 0-3; `None` where the bus has no seat
    pub cells: [Option<SeatCell>; SEATS_PER_ROW],
}

/// Classified seat grid, driver at the top
#[derive(Debug, Clone, Serialize)]
pub struct SeatMap {
    pub rows: Vec<SeatMapRow>,
    pub preference: GenderPreference,
    pub notice: Option<String>,
}

impl SeatMap {
    pub fn build(
        engine: &SeatEligibilityEngine,
        seats: &[Seat],
        selection: &SelectionState,
        preference: GenderPreference,
        user_gender: Gender,
    ) -> Self {
        let row_count = seats.iter().map(|s| s.position.row + 1).max().unwrap_or(0);

        let mut rows: Vec<SeatMapRow> = (0..row_count)
            .map(|row| SeatMapRow {
                row,
                cells: Default::default(),
            })
            .collect();

        for seat in seats {
            let cell = rows
                .get_mut(seat.position.row as usize)
                .and_then(|row| row.cells.get_mut(seat.position.col as usize));
            let Some(cell) = cell else {
                warn!("Seat {} at column {} is outside the grid", seat.number, seat.position.col);
                continue;
            };

            let class = engine.classify_seat(seat, seats, selection, preference, user_gender);
            *cell = Some(SeatCell {
                number: seat.number.clone(),
                class,
                interactive: class.is_interactive(),
            });
        }

        let notice = (!preference.is_any()).then(|| {
            format!(
                "You selected {p} preference. Only seats next to {p} passengers are available.",
                p = preference
            )
        });

        Self {
            rows,
            preference,
            notice,
        }
    }

    pub fn cell(&self, number: &str) -> Option<&SeatCell> {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter().flatten())
            .find(|c| c.number == number)
    }

    pub fn count(&self, class: SeatClass) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter().flatten())
            .filter(|c| c.class == class)
            .count()
    }
}

fn marker(class: SeatClass) -> char {
    match class {
        SeatClass::Available => ' ',
        SeatClass::Selected => '*',
        SeatClass::BookedMale => 'M',
        SeatClass::BookedFemale => 'F',
        SeatClass::Blocked => 'x',
    }
}

fn write_cell(f: &mut fmt::Formatter<'_>, cell: &Option<SeatCell>) -> fmt::Result {
    match cell {
        Some(cell) => write!(f, "[{:>4}{}]", cell.number, marker(cell.class)),
        None => write!(f, "       "),
    }
}

/// Text grid: left pair, aisle, right pair, row label.
impl fmt::Display for SeatMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "            [ Driver ]")?;
        for row in &self.rows {
            write_cell(f, &row.cells[0])?;
            write_cell(f, &row.cells[1])?;
            write!(f, "   ")?;
            write_cell(f, &row.cells[2])?;
            write_cell(f, &row.cells[3])?;
            writeln!(f, "  Row {}", row.row + 1)?;
        }
        writeln!(f)?;
        let legend: Vec<String> = LEGEND
            .iter()
            .map(|class| format!("[{}] {}", marker(*class), class.label()))
            .collect();
        writeln!(f, "{}", legend.join("  "))?;
        if let Some(notice) = &self.notice {
            writeln!(f, "{}", notice)?;
        }
        Ok(())
    }
}
