pub mod pii;
pub mod models;

pub use models::gender::{Gender, GenderPreference, ParseGenderError};
pub use pii::Masked;
