//! Work item model
//!
//! A work item is one unit of product flowing through the line. It records
//! when it arrived, when it was queued at and released from each station,
//! and how it left the system.
//!
//! Items are plain owned values. Every container in the line (station
//! queue, in-process set, buffer, terminal list) holds items by value and
//! hands them on by moving them, so an item can never be in two places.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a work item is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    /// Still inside the line (queued, in service or buffered)
    InProcess,

    /// Passed final inspection
    Completed { at: u64 },

    /// Failed final inspection
    Defective { at: u64 },

    /// Evicted from a full buffer under the drop-oldest policy
    Scrapped { at: u64 },
}

impl ItemStatus {
    /// True for every status except `InProcess`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ItemStatus::InProcess)
    }
}

/// One unit of product
///
/// # Example
/// ```
/// use assembly_line_core::{ItemStatus, WorkItem};
///
/// let mut item = WorkItem::new(1, 45);
/// item.mark_enqueued("Motherboard", 45);
/// item.mark_finished("Motherboard", 65);
/// item.complete(120);
///
/// assert_eq!(item.status(), ItemStatus::Completed { at: 120 });
/// assert_eq!(item.cycle_time(), Some(75));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique within one production line, assigned in arrival order
    id: u64,

    /// Tick at which the item was admitted
    arrival_time: u64,

    /// Station name → tick the item joined that station's queue
    enqueued_at: HashMap<String, u64>,

    /// Station name → tick the item left that station's service
    finished_at: HashMap<String, u64>,

    status: ItemStatus,
}

impl WorkItem {
    pub fn new(id: u64, arrival_time: u64) -> Self {
        Self {
            id,
            arrival_time,
            enqueued_at: HashMap::new(),
            finished_at: HashMap::new(),
            status: ItemStatus::InProcess,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn arrival_time(&self) -> u64 {
        self.arrival_time
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn is_defective(&self) -> bool {
        matches!(self.status, ItemStatus::Defective { .. })
    }

    /// Tick at which the item joined `station`'s queue
    pub fn enqueued_at(&self, station: &str) -> Option<u64> {
        self.enqueued_at.get(station).copied()
    }

    /// Tick at which the item finished service at `station`
    pub fn finished_at(&self, station: &str) -> Option<u64> {
        self.finished_at.get(station).copied()
    }

    pub fn mark_enqueued(&mut self, station: &str, now: u64) {
        self.enqueued_at.insert(station.to_string(), now);
    }

    pub fn mark_finished(&mut self, station: &str, now: u64) {
        self.finished_at.insert(station.to_string(), now);
    }

    /// Completion tick, only for items that passed inspection
    pub fn completion_time(&self) -> Option<u64> {
        match self.status {
            ItemStatus::Completed { at } => Some(at),
            _ => None,
        }
    }

    /// Arrival-to-completion time in seconds, only for completed items
    pub fn cycle_time(&self) -> Option<u64> {
        self.completion_time()
            .map(|at| at.saturating_sub(self.arrival_time))
    }

    pub fn complete(&mut self, now: u64) {
        self.transition(ItemStatus::Completed { at: now });
    }

    pub fn reject(&mut self, now: u64) {
        self.transition(ItemStatus::Defective { at: now });
    }

    pub fn scrap(&mut self, now: u64) {
        self.transition(ItemStatus::Scrapped { at: now });
    }

    fn transition(&mut self, next: ItemStatus) {
        debug_assert!(
            !self.status.is_terminal(),
            "item {} already left the line as {:?}",
            self.id,
            self.status
        );
        self.status = next;
    }
}
