//! Conveyor - live synchronization of a legacy relational store into a
//! redesigned target schema.
//!
//! Both stores stay online during the migration. Each business entity
//! ("domain") gets a [`sync::SyncService`] adapter that knows how to read the
//! legacy source and apply idempotent, key-remapping writes to the target.
//! A durable `sync_status` row per domain records the checkpoint, lifecycle
//! state, and counters; the [`sync::SyncScheduler`] polls those rows and runs
//! due domains on a fixed tick.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use conveyor::{connect, connect_and_migrate, domains, sync::SyncScheduler};
//!
//! let legacy = Arc::new(connect("sqlite:///var/lib/legacy-mirror.db").await?);
//! let target = Arc::new(connect_and_migrate("postgres:///commerce_next").await?);
//!
//! let registry = Arc::new(domains::registry(legacy, Arc::clone(&target), 1000)?);
//! SyncScheduler::new(target, registry).run().await;
//! ```

pub mod db;
pub mod domains;
pub mod entity;
pub mod migration;
pub mod status;
pub mod sync;

pub use db::{connect, connect_and_migrate};
pub use entity::prelude::*;
pub use status::StatusError;
pub use sync::{SyncError, SyncRegistry, SyncResult, SyncScheduler, SyncService};
