//! Domain types and pure rules for the taskboard service.
//!
//! Nothing in this crate performs I/O; the store and HTTP layers build on
//! these types.

pub mod error;
pub mod ordering;
pub mod todo;
pub mod types;
pub mod validation;
