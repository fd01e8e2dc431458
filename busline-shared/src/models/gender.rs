use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender of a registered user, a passenger, or a seat's occupant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Capitalized label used on tickets and seat legends
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(ParseGenderError(s.to_string())),
        }
    }
}

/// Trip-level adjacency preference chosen at search time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenderPreference {
    Male,
    Female,
    #[default]
    Any,
}

impl GenderPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderPreference::Male => "male",
            GenderPreference::Female => "female",
            GenderPreference::Any => "any",
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, GenderPreference::Any)
    }
}

impl fmt::Display for GenderPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenderPreference {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(GenderPreference::Any),
            other => other.parse::<Gender>().map(GenderPreference::from),
        }
    }
}

impl From<Gender> for GenderPreference {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => GenderPreference::Male,
            Gender::Female => GenderPreference::Female,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown gender value: {0}")]
pub struct ParseGenderError(pub String);
