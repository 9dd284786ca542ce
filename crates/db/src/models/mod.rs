//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - The camelCase wire shape returned to clients
//! - `Deserialize` request DTOs for create/update/patch

pub mod category;
pub mod todo;
