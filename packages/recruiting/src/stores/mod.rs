//! Document store implementations.
//!
//! - [`MemoryDocumentStore`]: in-process, with failure injection for
//!   exercising the retry and degradation paths in tests.
//! - `SqliteDocumentStore` (behind the `sqlite` feature): file-based
//!   durable backend.

mod memory;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemoryDocumentStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDocumentStore;
