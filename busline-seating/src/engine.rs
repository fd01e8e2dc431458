use std::fmt;
use std::str::FromStr;

use busline_catalog::Seat;
use busline_shared::{Gender, GenderPreference};
use serde::{Deserialize, Serialize};

use crate::selection::SelectionState;

/// Which seats count as "next to" each other for the gender rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyRule {
    /// Only the other seat of the same two-seat pair. The aisle separates pairs.
    #[default]
    SamePair,
    /// Any seat in the same row whose column differs by exactly one, including
    /// the two seats facing each other across the aisle (columns 1 and 2).
    ColumnDistance,
}

impl AdjacencyRule {
    pub fn are_adjacent(&self, a: &Seat, b: &Seat) -> bool {
        if a.number == b.number {
            return false;
        }
        match self {
            AdjacencyRule::SamePair => a.pair == b.pair,
            AdjacencyRule::ColumnDistance => {
                a.position.row == b.position.row && a.position.col.abs_diff(b.position.col) == 1
            }
        }
    }
}

impl FromStr for AdjacencyRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "same_pair" => Ok(AdjacencyRule::SamePair),
            "column_distance" => Ok(AdjacencyRule::ColumnDistance),
            other => Err(format!("Unknown adjacency rule: {}", other)),
        }
    }
}

/// Presentation class of a seat for one user in one selection session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatClass {
    Selected,
    BookedMale,
    BookedFemale,
    Blocked,
    Available,
}

impl SeatClass {
    /// Whether the user may click the seat (select or deselect)
    pub fn is_interactive(&self) -> bool {
        matches!(self, SeatClass::Selected | SeatClass::Available)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeatClass::Selected => "Selected",
            SeatClass::BookedMale => "Booked (Male)",
            SeatClass::BookedFemale => "Booked (Female)",
            SeatClass::Blocked => "Blocked",
            SeatClass::Available => "Available",
        }
    }
}

impl fmt::Display for SeatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decides which seats a user may select under the gender-adjacency rule.
///
/// The engine is stateless apart from its adjacency rule; every operation takes
/// the seat list, preference and user gender explicitly and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeatEligibilityEngine {
    rule: AdjacencyRule,
}

impl SeatEligibilityEngine {
    pub fn new(rule: AdjacencyRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> AdjacencyRule {
        self.rule
    }

    /// Booked seats adjacent to `seat` under the configured rule
    pub fn booked_neighbors<'a>(
        &self,
        seat: &'a Seat,
        all_seats: &'a [Seat],
    ) -> impl Iterator<Item = &'a Seat> + 'a {
        let rule = self.rule;
        all_seats
            .iter()
            .filter(move |other| other.is_booked() && rule.are_adjacent(seat, other))
    }

    pub fn is_eligible(
        &self,
        seat: &Seat,
        all_seats: &[Seat],
        preference: GenderPreference,
        user_gender: Gender,
    ) -> bool {
        if seat.is_booked() {
            return false;
        }
        if preference.is_any() {
            return true;
        }

        // No booked neighbor also passes: `all` is true on an empty iterator.
        self.booked_neighbors(seat, all_seats)
            .all(|neighbor| neighbor.occupant_gender() == Some(user_gender))
    }

    /// Flip membership of `seat_number`. Eligibility is the caller's concern.
    pub fn toggle_seat(&self, seat_number: &str, selection: &SelectionState) -> SelectionState {
        selection.toggled(seat_number)
    }

    pub fn classify_seat(
        &self,
        seat: &Seat,
        all_seats: &[Seat],
        selection: &SelectionState,
        preference: GenderPreference,
        user_gender: Gender,
    ) -> SeatClass {
        if selection.contains(&seat.number) {
            return SeatClass::Selected;
        }
        match seat.occupant_gender() {
            Some(Gender::Male) => SeatClass::BookedMale,
            Some(Gender::Female) => SeatClass::BookedFemale,
            None if !self.is_eligible(seat, all_seats, preference, user_gender) => SeatClass::Blocked,
            None => SeatClass::Available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busline_catalog::SeatPosition;

    fn seat(number: &str, row: u32, col: u8) -> Seat {
        Seat::new(format!("seat-{}", number), number, SeatPosition::new(row, col))
    }

    /// A1 | A2 (booked male) || B1 | B2
    fn scenario_row() -> Vec<Seat> {
        vec![
            seat("A1", 0, 0),
            seat("A2", 0, 1).booked(Gender::Male),
            seat("B1", 0, 2),
            seat("B2", 0, 3),
        ]
    }

    fn find<'a>(seats: &'a [Seat], number: &str) -> &'a Seat {
        seats.iter().find(|s| s.number == number).unwrap()
    }

    #[test]
    fn test_booked_seat_never_eligible() {
        let engine = SeatEligibilityEngine::default();
        let seats = scenario_row();
        let booked = find(&seats, "A2");

        for preference in [GenderPreference::Any, GenderPreference::Male, GenderPreference::Female] {
            for gender in [Gender::Male, Gender::Female] {
                assert!(!engine.is_eligible(booked, &seats, preference, gender));
            }
        }
    }

    #[test]
    fn test_any_preference_allows_every_vacant_seat() {
        let engine = SeatEligibilityEngine::default();
        let seats = vec![
            seat("1", 0, 0).booked(Gender::Female),
            seat("2", 0, 1),
            seat("3", 0, 2).booked(Gender::Male),
            seat("4", 0, 3),
        ];

        for s in seats.iter().filter(|s| !s.is_booked()) {
            assert!(engine.is_eligible(s, &seats, GenderPreference::Any, Gender::Male));
            assert!(engine.is_eligible(s, &seats, GenderPreference::Any, Gender::Female));
        }
    }

    #[test]
    fn test_mismatched_neighbor_blocks_seat() {
        let engine = SeatEligibilityEngine::default();
        let seats = vec![seat("1", 0, 0).booked(Gender::Female), seat("2", 0, 1)];
        let target = find(&seats, "2");

        assert!(!engine.is_eligible(target, &seats, GenderPreference::Female, Gender::Male));
        assert!(!engine.is_eligible(target, &seats, GenderPreference::Male, Gender::Male));
        assert!(engine.is_eligible(target, &seats, GenderPreference::Female, Gender::Female));
        assert!(engine.is_eligible(target, &seats, GenderPreference::Male, Gender::Female));
    }

    #[test]
    fn test_seat_without_booked_neighbor_is_eligible() {
        let engine = SeatEligibilityEngine::default();
        let seats = vec![
            seat("1", 0, 0),
            seat("2", 0, 1),
            seat("3", 1, 0).booked(Gender::Male),
        ];
        let target = find(&seats, "1");

        assert!(engine.is_eligible(target, &seats, GenderPreference::Female, Gender::Female));
    }

    #[test]
    fn test_pair_scenario() {
        let engine = SeatEligibilityEngine::new(AdjacencyRule::SamePair);
        let seats = scenario_row();
        let check = |n: &str| {
            engine.is_eligible(find(&seats, n), &seats, GenderPreference::Female, Gender::Female)
        };

        assert!(!check("A1"));
        assert!(check("B1"));
        assert!(check("B2"));
    }

    #[test]
    fn test_column_distance_crosses_the_aisle() {
        let engine = SeatEligibilityEngine::new(AdjacencyRule::ColumnDistance);
        let seats = scenario_row();
        let check = |n: &str| {
            engine.is_eligible(find(&seats, n), &seats, GenderPreference::Female, Gender::Female)
        };

        assert!(!check("A1"));
        assert!(!check("B1"));
        assert!(check("B2"));
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let engine = SeatEligibilityEngine::default();
        let original = SelectionState::from_iter(["A1", "B2"]);

        for number in ["A1", "C3"] {
            let once = engine.toggle_seat(number, &original);
            assert_ne!(once, original);
            assert_eq!(engine.toggle_seat(number, &once), original);
        }
    }

    #[test]
    fn test_classification() {
        let engine = SeatEligibilityEngine::default();
        let seats = vec![
            seat("A1", 0, 0),
            seat("A2", 0, 1).booked(Gender::Male),
            seat("B1", 0, 2).booked(Gender::Female),
            seat("B2", 0, 3),
            seat("C1", 1, 0),
        ];
        let selection = SelectionState::from_iter(["C1"]);
        let classify = |n: &str| {
            engine.classify_seat(
                find(&seats, n),
                &seats,
                &selection,
                GenderPreference::Female,
                Gender::Female,
            )
        };

        assert_eq!(classify("A1"), SeatClass::Blocked);
        assert_eq!(classify("A2"), SeatClass::BookedMale);
        assert_eq!(classify("B1"), SeatClass::BookedFemale);
        assert_eq!(classify("B2"), SeatClass::Available);
        assert_eq!(classify("C1"), SeatClass::Selected);
    }

    #[test]
    fn test_selected_wins_over_blocked() {
        let engine = SeatEligibilityEngine::default();
        let seats = scenario_row();
        let a1 = find(&seats, "A1");
        let selection = SelectionState::from_iter(["A1"]);

        assert!(!engine.is_eligible(a1, &seats, GenderPreference::Female, Gender::Female));
        assert_eq!(
            engine.classify_seat(a1, &seats, &selection, GenderPreference::Female, Gender::Female),
            SeatClass::Selected
        );
    }

    #[test]
    fn test_rule_parsing() {
        assert_eq!("same_pair".parse::<AdjacencyRule>().unwrap(), AdjacencyRule::SamePair);
        assert_eq!("Column-Distance".parse::<AdjacencyRule>().unwrap(), AdjacencyRule::ColumnDistance);
        assert!("row".parse::<AdjacencyRule>().is_err());
    }
}
