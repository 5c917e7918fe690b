//! Station model
//!
//! A station is one capacity-bounded service point. It owns:
//! - a FIFO queue of items waiting for service
//! - an in-process set of items being served, bounded by capacity
//! - its breakdown state (failed flag and repair deadline)
//! - running counters used for utilization and wait statistics
//!
//! # State machine
//!
//! ```text
//!            start (in-process < capacity)
//!   Open ─────────────────────────────────▶ AtCapacity
//!    ▲  ◀──────────── finish ─────────────────┘
//!    │
//!    │ repair deadline reached
//!    │
//!  Failed ◀──── failure trial succeeds on a start attempt (from Open)
//! ```
//!
//! Only the failed flag and repair deadline are stored; `Open` and
//! `AtCapacity` are derived from the in-process count.
//!
//! # Breakdowns
//!
//! The failure trial happens before the head item leaves the queue. When
//! the station breaks down the item simply stays at the head of the queue
//! and is the first to start once the repair is over. Items already in
//! service when the station breaks down finish normally.

use crate::models::work_item::WorkItem;
use crate::orchestrator::config::StationConfig;
use crate::rng::RngManager;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Derived operating state of a station at a given tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationStatus {
    /// Can start another item
    Open,
    /// Every server is busy; the queue may still grow
    AtCapacity,
    /// Down for repair
    Failed,
}

/// Result of asking a station to start its next item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartOutcome {
    /// Nothing is waiting
    Idle,

    /// Work is waiting but the station is down or full
    Unavailable,

    /// Work is waiting but there is nowhere downstream to put it. Only the
    /// production line reports this, when buffer backpressure holds the
    /// first station.
    Blocked,

    /// The head item entered service
    Started {
        item_id: u64,
        /// Seconds the item spent in this station's queue
        wait: u64,
        /// Sampled service duration in seconds
        duration: f64,
    },

    /// The start attempt broke the station; the head item stays queued
    BrokeDown { item_id: u64, repair_until: f64 },
}

/// An item in service together with its scheduled completion instant
#[derive(Debug, Clone, PartialEq)]
struct InService {
    item: WorkItem,
    completes_at: f64,
}

/// Runtime state of one station for one replica
///
/// # Example
/// ```
/// use assembly_line_core::{RngManager, Station, StationConfig, StartOutcome, WorkItem};
///
/// let config = StationConfig::new("Press", 1, 10.0, 0.0, 12.0).unwrap();
/// let mut station = Station::new(config);
/// let mut rng = RngManager::new(1);
///
/// station.enqueue(WorkItem::new(1, 0), 0);
/// assert!(matches!(station.start_next(0, &mut rng), StartOutcome::Started { wait: 0, .. }));
///
/// assert!(station.finish(9).is_empty());
/// assert_eq!(station.finish(10).len(), 1);
/// assert_eq!(station.total_processed(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Station {
    config: StationConfig,

    /// Items waiting for service, oldest first
    queue: VecDeque<WorkItem>,

    /// Items in service, never more than `capacity`
    in_process: Vec<InService>,

    is_failed: bool,

    /// Virtual time at which the current repair ends
    failure_end_time: f64,

    /// Items that completed service here
    total_processed: u64,

    /// Sum of queue waits of every item that started service (seconds)
    total_wait_time: u64,

    /// Sum of sampled service durations of every started item (seconds)
    busy_time: f64,

    /// Breakdowns so far
    failures: u32,

    /// Repair time scheduled by those breakdowns (seconds)
    downtime: f64,
}

impl Station {
    pub fn new(config: StationConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
            in_process: Vec::new(),
            is_failed: false,
            failure_end_time: 0.0,
            total_processed: 0,
            total_wait_time: 0,
            busy_time: 0.0,
            failures: 0,
            downtime: 0.0,
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Append `item` to the tail of the queue, stamping its enqueue time
    ///
    /// The queue itself is unbounded.
    pub fn enqueue(&mut self, mut item: WorkItem, now: u64) {
        item.mark_enqueued(self.config.name(), now);
        self.queue.push_back(item);
    }

    /// True if the station may start another item at `now`
    pub fn is_available(&self, now: u64) -> bool {
        if self.is_failed && (now as f64) < self.failure_end_time {
            return false;
        }
        self.in_process.len() < self.config.capacity() as usize
    }

    /// Clear the failed flag once the repair deadline has passed
    ///
    /// Returns true on the tick the station comes back up.
    pub fn complete_repair(&mut self, now: u64) -> bool {
        if self.is_failed && now as f64 >= self.failure_end_time {
            self.is_failed = false;
            return true;
        }
        false
    }

    /// Try to move the head of the queue into service
    ///
    /// Draw order on an attempt: service duration, then failure trial. No
    /// randomness is consumed when the station is idle or unavailable.
    pub fn start_next(&mut self, now: u64, rng: &mut RngManager) -> StartOutcome {
        let item_id = match self.queue.front() {
            Some(item) => item.id(),
            None => return StartOutcome::Idle,
        };
        if !self.is_available(now) {
            return StartOutcome::Unavailable;
        }

        let duration = rng.service_time(
            self.config.service_time_mean(),
            self.config.service_time_std_dev(),
        );

        if rng.failure_trial(self.config.failure_rate()) {
            let repair = self.config.repair_duration();
            self.is_failed = true;
            self.failure_end_time = now as f64 + repair;
            self.failures += 1;
            self.downtime += repair;
            return StartOutcome::BrokeDown {
                item_id,
                repair_until: self.failure_end_time,
            };
        }

        let item = match self.queue.pop_front() {
            Some(item) => item,
            None => return StartOutcome::Idle,
        };

        let enqueued = item.enqueued_at(self.config.name()).unwrap_or(now);
        debug_assert!(enqueued <= now, "item {} enqueued in the future", item_id);
        let wait = now.saturating_sub(enqueued);
        self.total_wait_time += wait;

        self.in_process.push(InService {
            item,
            completes_at: now as f64 + duration,
        });
        self.busy_time += duration;

        StartOutcome::Started {
            item_id,
            wait,
            duration,
        }
    }

    /// Release every item whose service is complete at `now`
    ///
    /// Released items are stamped with their finish time at this station
    /// and returned in the order they entered service.
    pub fn finish(&mut self, now: u64) -> Vec<WorkItem> {
        let (done, pending): (Vec<InService>, Vec<InService>) =
            std::mem::take(&mut self.in_process)
                .into_iter()
                .partition(|slot| slot.completes_at <= now as f64);
        self.in_process = pending;

        let mut released = Vec::with_capacity(done.len());
        for slot in done {
            let mut item = slot.item;
            item.mark_finished(self.config.name(), now);
            self.total_processed += 1;
            released.push(item);
        }
        released
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Busy time as a percentage of `capacity × total_elapsed`
    ///
    /// Returns 0 when `total_elapsed` is not positive.
    pub fn utilization(&self, total_elapsed: f64) -> f64 {
        let max_capacity_time = self.config.capacity() as f64 * total_elapsed;
        if max_capacity_time > 0.0 {
            self.busy_time / max_capacity_time * 100.0
        } else {
            0.0
        }
    }

    /// Mean queue wait per processed item, in seconds (0 if none processed)
    pub fn average_wait(&self) -> f64 {
        if self.total_processed > 0 {
            self.total_wait_time as f64 / self.total_processed as f64
        } else {
            0.0
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    /// Derived state at `now`
    pub fn status(&self, now: u64) -> StationStatus {
        if self.is_failed && (now as f64) < self.failure_end_time {
            StationStatus::Failed
        } else if self.in_process.len() >= self.config.capacity() as usize {
            StationStatus::AtCapacity
        } else {
            StationStatus::Open
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn in_process_len(&self) -> usize {
        self.in_process.len()
    }

    /// Items held by this station, queued or in service
    pub fn held(&self) -> usize {
        self.queue.len() + self.in_process.len()
    }

    /// Queued items, head first
    pub fn queued_items(&self) -> impl Iterator<Item = &WorkItem> {
        self.queue.iter()
    }

    /// Items in service with their scheduled completion instants
    pub fn items_in_service(&self) -> impl Iterator<Item = (&WorkItem, f64)> {
        self.in_process.iter().map(|slot| (&slot.item, slot.completes_at))
    }

    pub fn is_failed(&self) -> bool {
        self.is_failed
    }

    pub fn failure_end_time(&self) -> f64 {
        self.failure_end_time
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    pub fn total_wait_time(&self) -> u64 {
        self.total_wait_time
    }

    pub fn busy_time(&self) -> f64 {
        self.busy_time
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn downtime(&self) -> f64 {
        self.downtime
    }
}
