//! SeaORM entities.

pub mod comment;
pub mod session;
pub mod user;
