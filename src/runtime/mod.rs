//! HTTP surface and server wiring.

pub mod api;
pub mod server;

pub use api::{router, ApiError, ErrorResponse, Health, UserBody};
pub use server::{serve, serve_listener};
