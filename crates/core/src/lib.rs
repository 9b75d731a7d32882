//! Storage, validation and the paginated selection pipeline behind the
//! educational game catalog.

pub mod db;
pub mod domain;
pub mod error;
pub mod models;
pub mod selection;

pub use error::{Entity, Error, Result};
