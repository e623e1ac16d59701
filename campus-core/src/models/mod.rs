//! Domain models for the campus console.
//!
//! # Core Concepts
//!
//! ## Managed Entities
//!
//! - [`Student`]: Enrolled learner, searchable by name, email, DNI or phone.
//! - [`Teacher`]: Course author and instructor.
//! - [`Admin`]: Console operator account.
//! - [`PendingCourse`]: Course submitted by a teacher and awaiting review.
//!
//! Each of these implements [`Entity`] (identity, status, searchable fields)
//! and [`Resource`] (the REST collection it lives under). Types that can be
//! created and edited from the console also implement [`Editable`], which ties
//! them to a form payload implementing [`ApiPayload`].
//!
//! ## Session
//!
//! - [`Principal`]: The authenticated operator, cached next to the token.

mod admin;
mod course;
mod entity;
mod principal;
mod status;
mod student;
mod teacher;

pub use admin::*;
pub use course::*;
pub use entity::*;
pub use principal::*;
pub use status::*;
pub use student::*;
pub use teacher::*;
