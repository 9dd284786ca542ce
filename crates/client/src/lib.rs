//! HTTP client for the taskboard API plus a small state container that
//! keeps a local copy of the todo list in sync with the server.

pub mod api;
pub mod board;

pub use api::{ClientError, TodoApi, TodoClient};
pub use board::TodoBoard;
