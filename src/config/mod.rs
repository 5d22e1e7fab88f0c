//! Configuration models for the lock policy, store backend, and HTTP surface.

pub mod service;

pub use service::{HttpConfig, LockConfig, ServiceConfig, StoreBackendConfig};
