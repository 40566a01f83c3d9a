//! # Reconciliation Module
//!
//! Decides where each remote media item belongs locally and whether it needs
//! to be transferred at all.
//!
//! ## Overview
//!
//! This module manages the run-side of mirroring a learning portal:
//! - Turning remote-supplied text into filesystem-safe names
//! - Resolving each item's canonical parent directory (and creating it)
//! - Building the run-scoped media descriptors the downloader consumes
//! - Consulting the checksum index to classify items as new, duplicate, or
//!   relocated content
//!
//! ## Components
//!
//! - **Naming Sanitizer** (`sanitize`): pure text-to-path-segment mapping
//! - **Path Resolution Policy** (`placement`): ordered placement rules plus
//!   idempotent directory creation
//! - **Media Descriptor** (`descriptor`): per-item identity, classification,
//!   and resolved location
//! - **Reconciliation Driver** (`driver`): the per-item state machine and
//!   batch orchestration

pub mod config;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod placement;
pub mod sanitize;

pub use config::ReconcileConfig;
pub use descriptor::{Group, MediaCategory, MediaDescriptor};
pub use driver::{FetchDisposition, Reconciler, Reconciliation, ReconcileStats};
pub use error::{ReconcileError, Result};
pub use placement::{ensure_dir, placement_dir};
pub use sanitize::sanitize;
