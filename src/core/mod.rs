//! Record model, store seam, and the lock-guarded accessor.

pub mod error;
pub mod interrupt;
pub mod record;
pub mod service;
pub mod store;

pub use error::{AccessError, AppResult, StoreError};
pub use interrupt::Interrupt;
pub use record::{User, UserId, UserState};
pub use service::UserService;
pub use store::{DynUserStore, UserStore};
