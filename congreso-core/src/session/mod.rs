//! Session persistence for the conference client
//!
//! This module holds what survives between application starts:
//! - Trait-based durable storage (in-memory, file-backed, or your own)
//! - The two-key session record (bearer token + user record)
//! - Local expiry decoding for stored tokens
//!
//! # Example
//!
//! ```no_run
//! use congreso_core::session::{PersistentStore, SessionStore};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), congreso_core::session::StorageError> {
//! let backend = PersistentStore::open("./data", "congreso")?;
//! let sessions = SessionStore::new(Arc::new(backend));
//!
//! if let Some(stored) = sessions.load()? {
//!     println!("last user: {}", stored.user.full_name());
//! }
//! # Ok(())
//! # }
//! ```

mod manager;
mod memory;
mod persistent_store;
mod store;
pub mod token;
mod user;

pub use manager::{PersistedSession, SessionStore, DEFAULT_TOKEN_KEY, DEFAULT_USER_KEY};
pub use memory::MemoryStore;
pub use persistent_store::PersistentStore;
pub use store::{KeyValueStore, StorageError};
pub use user::{ParticipantKind, User};
