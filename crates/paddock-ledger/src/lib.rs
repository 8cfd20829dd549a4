//! Paddock Ledger Library
//!
//! The gallery ledger is the authoritative record of which assets exist for an
//! entity: count, order, and metadata. This crate defines the collaborator
//! traits the orchestrator works against (`GalleryLedger`, `EntityStore`) and
//! ships an in-memory reference backend. A durable backend lives behind the
//! same traits and must serialize its own mutations (transactionally, for a
//! database-backed implementation).

pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use memory::{MemoryEntityStore, MemoryLedger};
pub use traits::{EntityStore, GalleryLedger};
