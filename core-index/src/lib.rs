//! # Checksum Index Module
//!
//! Owns the persistent checksum index and provides repository-pattern access
//! to it.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite database schema and migrations for the index
//! - The [`MediaIndex`] repository trait and its SQLite implementation
//! - Content checksum helpers producing the index key
//!
//! The index is the system's dedup memory: a remote item whose content
//! checksum is already recorded for its group is a file we already have,
//! regardless of what the portal currently calls it.

pub mod checksum;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;

pub use checksum::{checksum_bytes, checksum_file};
pub use db::{create_pool, create_test_pool, DatabaseConfig};
pub use error::{IndexError, Result};
pub use models::{ChecksumRecord, GroupId};
pub use repository::{MediaIndex, SqliteMediaIndex};
