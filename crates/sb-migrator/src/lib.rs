//! Migrators that rewrite detected concerns to the managed service.
//!
//! Each migrator consumes one detection plus options and produces a
//! [`MigrationResult`](sb_core::MigrationResult) describing the changes
//! made, or why none were made. Failures never propagate: one bad file
//! never aborts the batch.
//!
//! # State machine
//!
//! Every migration follows
//! `Idle → (dry-run: Reported) | (live: RemoteRegister → LocalRewrite → Done)`.
//! Remote registration failures are soft ("may already exist") and do not
//! prevent the local rewrite; local rewrite failures (disk I/O) are hard.
//! The one destructive migrator (full form replacement) performs `Backup`
//! before `LocalRewrite`; all others are strictly additive at the
//! expression or single-import granularity.
//!
//! # Idempotency
//!
//! Every additive migrator checks for its own previously-inserted marker
//! (an import name or a JSX element name) before inserting again, so
//! re-running migration on an already-migrated file is a safe no-op that
//! still reports "already migrated" in its changes list.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod backup;
mod engine;
pub mod migrators;

pub use backup::write_backup;
pub use engine::MigrationEngine;
pub use migrators::MigrateOptions;
