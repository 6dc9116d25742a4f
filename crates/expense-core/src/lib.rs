//! expense-core - Core library for Expense Tracker
//!
//! This crate contains the record model, the `SQLite` schema and its
//! migrations, and the local store shared by capture screens, the CLI, and
//! the sync engine.

pub mod capture;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod util;

pub use error::{Error, Result};
pub use models::{Amount, Entry, Favorite, NewEntry, NewFavorite, RecordType, SyncBit};
