//! Seat-selection eligibility: which seats a passenger may pick, given who already sits next to them.

pub mod engine;
pub mod selection;
pub mod seat_map;

pub use engine::{AdjacencyRule, SeatClass, SeatEligibilityEngine};
pub use selection::SelectionState;
pub use seat_map::{SeatCell, SeatMap, SeatMapRow};
