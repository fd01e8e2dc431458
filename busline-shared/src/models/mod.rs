pub mod gender;
pub mod events;
