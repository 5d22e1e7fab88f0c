//! # User RwLock Service
//!
//! A single-entity CRUD service built around the reader-writer lock pattern:
//! any number of readers may fetch user records at once, while a writer gets
//! exclusive access for the duration of its update.
//!
//! ## Pieces
//!
//! - **Lock-guarded accessor** ([`core::UserService`]): owns the record store
//!   inside one `parking_lot` reader-writer lock. `read` takes the lock in
//!   shared mode, `write` in exclusive mode, and the guard is released on every
//!   exit path before a result or error is returned.
//! - **Store adapters** ([`infra::store`]): an in-memory map and a SQLite table
//!   (`users(id, username, email, state)`), both behind the [`core::UserStore`]
//!   trait.
//! - **Lock discipline** ([`rwlock`]): writer-respecting shared acquisition
//!   that stays reentrant per thread, optional bounded waits, and cooperative
//!   interruption via [`core::Interrupt`].
//! - **HTTP surface** ([`runtime`]): `GET /user/{id}` and `PUT /user/{id}` on
//!   axum, with accessor calls moved onto tokio's blocking pool.
//!
//! ## Concurrent readers
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use user_rwlock_service::core::{User, UserService};
//! use user_rwlock_service::infra::store::InMemoryUserStore;
//!
//! let store = InMemoryUserStore::with_users([User::new(1, "a", "a@x.com", 1)]);
//! let service = Arc::new(UserService::new(store));
//!
//! let readers: Vec<_> = (0..5)
//!     .map(|_| {
//!         let service = Arc::clone(&service);
//!         thread::spawn(move || service.read(1).unwrap())
//!     })
//!     .collect();
//!
//! for reader in readers {
//!     assert_eq!(reader.join().unwrap().username, "a");
//! }
//! ```
//!
//! ## Wiring from configuration
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use user_rwlock_service::builders::build_service;
//! use user_rwlock_service::config::ServiceConfig;
//!
//! let cfg = ServiceConfig::from_env()?;
//! let service = Arc::new(build_service(&cfg)?);
//! user_rwlock_service::runtime::serve(&cfg.http, service).await?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Record model, store seam, and the lock-guarded accessor.
pub mod core;
/// Configuration models for the lock policy, store backend, and HTTP surface.
pub mod config;
/// Builders to construct the accessor from configuration.
pub mod builders;
/// Infrastructure adapters for record storage.
pub mod infra;
/// Reader-writer lock acquisition policy.
pub mod rwlock;
/// HTTP surface and server wiring.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::core::{AccessError, Interrupt, StoreError, User, UserId, UserService, UserStore};
pub use crate::rwlock::WaitPolicy;
