//! Builders that assemble the accessor from configuration.

pub mod service_builder;

pub use service_builder::{build_service, build_store};
