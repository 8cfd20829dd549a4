//! Paddock Services Library
//!
//! This crate provides the ingestion orchestrator (`MediaService`) and display
//! image resolution on top of the ledger, entity store, and asset store
//! collaborators.

pub mod display;
pub mod service;

pub use service::MediaService;
