//! Trait definitions for Quetz operations.
//!
//! Each record type implements the traits its endpoints support.

mod get;
mod list;

pub use get::Get;
pub use list::List;
