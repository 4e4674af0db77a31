//! Dispatch state and status reporting

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Transport classification of the most recent completed send
///
/// Failed sends never change the outcome, so `Accepted` may be stale
/// after a failure and `None` means nothing has completed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Outcome {
    None = 0,
    Accepted = 1,
    Rejected = 2,
    Pending = 3,
}

impl Outcome {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Outcome::Accepted,
            2 => Outcome::Rejected,
            3 => Outcome::Pending,
            _ => Outcome::None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::None => "NONE",
            Outcome::Accepted => "ACCEPTED",
            Outcome::Rejected => "REJECTED",
            Outcome::Pending => "PENDING",
        };
        f.write_str(name)
    }
}

/// Mutable state of one dispatcher
///
/// Written only by the dispatcher; readers never block and may observe a
/// value that is one send behind.
#[derive(Debug)]
pub struct DispatchState {
    in_progress: AtomicBool,
    last_outcome: AtomicU8,
}

impl DispatchState {
    pub fn new() -> Self {
        Self {
            in_progress: AtomicBool::new(false),
            last_outcome: AtomicU8::new(Outcome::None as u8),
        }
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    pub fn last_outcome(&self) -> Outcome {
        Outcome::from_u8(self.last_outcome.load(Ordering::Acquire))
    }

    /// Claim the drain loop. Returns `false` if another drain holds it.
    pub(crate) fn try_begin(&self) -> bool {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn finish(&self) {
        self.in_progress.store(false, Ordering::Release);
    }

    pub(crate) fn record(&self, outcome: Outcome) {
        self.last_outcome.store(outcome as u8, Ordering::Release);
    }
}

impl Default for DispatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue depth and whether a drain is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub length: usize,
    #[serde(rename = "workingOn")]
    pub in_progress: bool,
}

/// Outcome of the last completed send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastStatus {
    pub status: Outcome,
}
