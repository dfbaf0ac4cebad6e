//! Web front end: the board listing page and the form endpoints that
//! create, move and edit records.

mod server;
pub mod templates;

pub use server::{AppState, ServerHandle, build_router, start_server};
