//! Scan statistics with atomic counters.
//!
//! This module provides [`ScanStats`] for tracking scan progress and
//! [`StatsSnapshot`] for point-in-time statistics views.
//!
//! # Thread Safety
//!
//! All counters use [`AtomicU64`] with relaxed ordering. Statistics are
//! informational and don't require strict ordering guarantees.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters for scan statistics.
///
/// Create with [`new()`](Self::new), increment during scanning, and take
/// snapshots with [`snapshot()`](Self::snapshot) for display or reporting.
///
/// # Examples
///
/// ```
/// use sb_scanner::ScanStats;
///
/// let stats = ScanStats::new();
/// stats.increment_files();
/// stats.increment_parsed();
///
/// let snap = stats.snapshot();
/// assert_eq!(snap.files_total, 1);
/// assert_eq!(snap.files_parsed, 1);
/// ```
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Total number of files visited.
    files_total: AtomicU64,
    /// Number of files that parsed into a syntax tree.
    files_parsed: AtomicU64,
    /// Number of files where parsing failed (text detectors still ran).
    parse_failures: AtomicU64,
    /// Number of files that could not be read at all.
    read_failures: AtomicU64,
    /// Total number of detections across all categories.
    detections: AtomicU64,
}

impl ScanStats {
    /// Creates a new [`ScanStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the visited-files counter.
    #[inline]
    pub fn increment_files(&self) {
        self.files_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the parsed-files counter.
    #[inline]
    pub fn increment_parsed(&self) {
        self.files_parsed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the parse-failure counter.
    #[inline]
    pub fn increment_parse_failures(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the read-failure counter.
    #[inline]
    pub fn increment_read_failures(&self) {
        self.read_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds to the detections counter.
    #[inline]
    pub fn add_detections(&self, count: u64) {
        self.detections.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all statistics.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            files_total: self.files_total.load(Ordering::Relaxed),
            files_parsed: self.files_parsed.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            detections: self.detections.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters to zero for a fresh scan.
    pub fn reset(&self) {
        self.files_total.store(0, Ordering::Relaxed);
        self.files_parsed.store(0, Ordering::Relaxed);
        self.parse_failures.store(0, Ordering::Relaxed);
        self.read_failures.store(0, Ordering::Relaxed);
        self.detections.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of scan statistics.
///
/// Safe to store, serialize, and send between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Total number of files visited.
    pub files_total: u64,
    /// Number of files that parsed into a syntax tree.
    pub files_parsed: u64,
    /// Number of files where parsing failed.
    pub parse_failures: u64,
    /// Number of files that could not be read.
    pub read_failures: u64,
    /// Total number of detections across all categories.
    pub detections: u64,
}

impl StatsSnapshot {
    /// Returns the share of visited files that parsed cleanly, in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // display only
    pub fn parse_rate_percent(&self) -> f64 {
        if self.files_total == 0 {
            return 100.0;
        }
        (self.files_parsed as f64 / self.files_total as f64) * 100.0
    }
}
