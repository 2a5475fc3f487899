//! Statement Statistics
//!
//! Counts statements executed by a store. Counting can be switched off and
//! the counter reset without touching data already returned to callers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Per-store statement counter
#[derive(Debug)]
pub struct StatementStatistics {
    enabled: AtomicBool,
    statements: AtomicU64,
    errors: AtomicU64,
}

impl Default for StatementStatistics {
    fn default() -> Self {
        Self::new(true)
    }
}

impl StatementStatistics {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            statements: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    /// Record one executed statement
    pub fn record_statement(&self) {
        if self.is_enabled() {
            self.statements.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a statement that failed at the store boundary
    pub fn record_error(&self) {
        if self.is_enabled() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of statements executed since the last `clear`
    pub fn count(&self) -> u64 {
        self.statements.load(Ordering::Relaxed)
    }

    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Reset the counters to zero
    pub fn clear(&self) {
        self.statements.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Calculate the error rate as a percentage
    pub fn error_rate(&self) -> f64 {
        let count = self.count();
        if count > 0 {
            (self.error_count() as f64 / count as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            statements: self.count(),
            errors: self.error_count(),
            enabled: self.is_enabled(),
        }
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    pub statements: u64,
    pub errors: u64,
    pub enabled: bool,
}
