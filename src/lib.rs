//! Session-aware data synchronization for the campus administration console.
//!
//! The crate is the layer every management screen sits on:
//! - [`session`]: token and principal storage plus pre-flight validation
//! - [`http`]: the authenticated request executor
//! - [`collection`]: canonical lists and the filter engine
//! - [`mutation`] and [`service`]: create/update/delete with reload
//! - [`notify`]: user-facing outcome notifications
//!
//! [`Console`] wires them together.

pub mod collection;
pub mod config;
pub mod console;
pub mod error;
pub mod http;
pub mod mutation;
pub mod notify;
pub mod service;
pub mod session;

pub use campus_core::models;
pub use config::ConsoleConfig;
pub use console::Console;
pub use error::{AuthFailure, Result, StorageError, SyncError};
pub use service::EntityService;
