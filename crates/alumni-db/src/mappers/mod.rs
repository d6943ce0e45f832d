//! Model to entity mappers
//!
//! - `From<Model> for Entity`: convert database rows to domain objects
//! - [`assemble_threads`]: rebuild threads from their split tables

mod account;
mod thread;

pub use thread::{assemble_threads, ThreadChildren};
