//! SeaORM entities and their domain conversions.

pub mod author;
pub mod comment;
pub mod post;
