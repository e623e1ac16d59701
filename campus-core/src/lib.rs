//! Domain models for the campus administration console.
//!
//! The sync layer in `campus-console` is generic over the traits defined in
//! [`models::entity`]; every record type the console manages lives here.

pub mod models;
