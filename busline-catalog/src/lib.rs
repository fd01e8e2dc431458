pub mod bus;
pub mod layout;
pub mod inventory;

pub use bus::{Bus, Occupancy, PairSide, Route, Seat, SeatKind, SeatPair, SeatPosition};
pub use layout::{LayoutError, SeatLayout, SeatRecord, SEATS_PER_ROW};
pub use inventory::{BusCatalog, BusSummary, CatalogError};
