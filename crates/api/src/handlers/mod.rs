pub mod categories;
pub mod todos;
