//! Storage for the migration history document.
//!
//! A caller builds a [`store::Config`], asks it for a [`store::Storage`], reads the
//! current history before planning and writes the updated history afterwards. The
//! blob is never interpreted here.

pub mod store;

pub use store::{Config, Result, Storage, StorageError};
