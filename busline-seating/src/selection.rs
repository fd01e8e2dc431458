use serde::{Deserialize, Serialize};

/// Seat numbers chosen in the active booking session.
///
/// Iteration follows the order seats were picked, so passenger forms line up
/// with the user's clicks. Equality ignores order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SelectionState {
    seats: Vec<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, seat_number: &str) -> bool {
        self.seats.iter().any(|s| s == seat_number)
    }

    /// Copy of this state with `seat_number` flipped
    pub fn toggled(&self, seat_number: &str) -> Self {
        let mut next = self.clone();
        next.toggle(seat_number);
        next
    }

    /// Flip `seat_number` in place. Returns true when the seat is now selected.
    pub fn toggle(&mut self, seat_number: &str) -> bool {
        match self.seats.iter().position(|s| s == seat_number) {
            Some(index) => {
                self.seats.remove(index);
                false
            }
            None => {
                self.seats.push(seat_number.to_string());
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.seats.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.seats.clear();
    }

    /// Seats in pick order
    pub fn to_vec(&self) -> Vec<String> {
        self.seats.clone()
    }
}

impl PartialEq for SelectionState {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|s| other.contains(s))
    }
}

impl Eq for SelectionState {}

/// Later duplicates are dropped
impl<S: Into<String>> FromIterator<S> for SelectionState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for seat in iter {
            let seat = seat.into();
            if !selection.contains(&seat) {
                selection.seats.push(seat);
            }
        }
        selection
    }
}

impl From<Vec<String>> for SelectionState {
    fn from(seats: Vec<String>) -> Self {
        seats.into_iter().collect()
    }
}

impl From<SelectionState> for Vec<String> {
    fn from(selection: SelectionState) -> Self {
        selection.seats
    }
}
