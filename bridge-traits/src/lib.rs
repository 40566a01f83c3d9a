//! # Collaborator Bridge Traits
//!
//! Boundary contracts between the reconciliation core and its external
//! collaborators.
//!
//! ## Overview
//!
//! The core never performs network I/O. Two collaborators do the outward-facing
//! work and are reached only through the traits in this crate:
//!
//! - [`MediaSource`](metadata::MediaSource) - enumerates remote items and
//!   surfaces portal-declared checksums
//! - [`TransferAgent`](transfer::TransferAgent) - downloads bytes and moves
//!   already-materialized files
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Implementations should convert transport-specific errors to `BridgeError`
//! and include context (locator, destination path) in messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds; the core invokes them from
//! concurrent workers.

pub mod error;
pub mod metadata;
pub mod transfer;

pub use error::BridgeError;

// Re-export commonly used types
pub use metadata::{MediaSource, RemoteItemRecord};
pub use transfer::TransferAgent;
