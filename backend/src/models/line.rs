//! Production line
//!
//! The line is the single owner of every work item in a replica. Items sit
//! in exactly one of:
//! - a station queue or in-process set
//! - the inter-stage buffer between the first and second stations
//! - one of the terminal lists (completed, defective, scrapped)
//!
//! # Critical Invariants
//!
//! 1. **Conservation**: `wip() + terminal_count() == items_created()`
//! 2. **Capacity**: no station ever serves more than its capacity
//! 3. **Bounded buffer**: `buffer_len() <= buffer_capacity()` after every
//!    routing step
//!
//! # Routing
//!
//! ```text
//! arrival → S1 → [buffer] → S2 → S3 → … → Sn ─┬─▶ completed
//!                                              └─▶ defective (Bernoulli)
//! ```

use crate::models::station::{StartOutcome, Station};
use crate::models::work_item::WorkItem;
use crate::orchestrator::config::{BufferPolicy, SimulationConfig, StationConfig};
use crate::rng::RngManager;
use std::collections::VecDeque;

/// Where a finished item went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Into the inter-stage buffer
    Buffered,

    /// Into the buffer, pushing its oldest entry out to scrap
    BufferedWithEviction { evicted_id: u64 },

    /// Into the queue of station `to_station`
    Forwarded { to_station: usize },

    /// Passed inspection after `cycle_time` seconds in the line
    Completed { cycle_time: u64 },

    /// Failed inspection
    Defective,
}

/// One replica's production line
///
/// # Example
/// ```
/// use assembly_line_core::{BufferPolicy, ProductionLine, StationConfig};
///
/// let stations = vec![
///     StationConfig::new("Cut", 1, 5.0, 0.0, 10.0).unwrap(),
///     StationConfig::new("Weld", 1, 5.0, 0.0, 10.0).unwrap(),
/// ];
/// let mut line = ProductionLine::new(&stations, 4, BufferPolicy::Backpressure);
///
/// line.admit(0);
/// line.admit(0);
/// assert_eq!(line.wip(), 2);
/// assert_eq!(line.items_created(), 2);
/// assert!(line.is_reconciled());
/// ```
#[derive(Debug, Clone)]
pub struct ProductionLine {
    /// Stations in processing order
    stations: Vec<Station>,

    /// FIFO between the first and second stations
    buffer: VecDeque<WorkItem>,

    buffer_capacity: usize,

    buffer_policy: BufferPolicy,

    completed: Vec<WorkItem>,

    defective: Vec<WorkItem>,

    /// Items evicted from a full buffer (drop-oldest policy only)
    scrapped: Vec<WorkItem>,

    /// WIP readings in sampling order
    wip_samples: Vec<usize>,

    items_created: u64,
}

impl ProductionLine {
    /// Build a fresh line from station descriptions
    ///
    /// # Panics
    /// Panics if `stations` is empty. Configuration validation rejects an
    /// empty line before any replica is built.
    pub fn new(
        stations: &[StationConfig],
        buffer_capacity: usize,
        buffer_policy: BufferPolicy,
    ) -> Self {
        assert!(!stations.is_empty(), "production line needs at least one station");
        Self {
            stations: stations.iter().cloned().map(Station::new).collect(),
            buffer: VecDeque::with_capacity(buffer_capacity.min(1024)),
            buffer_capacity,
            buffer_policy,
            completed: Vec::new(),
            defective: Vec::new(),
            scrapped: Vec::new(),
            wip_samples: Vec::new(),
            items_created: 0,
        }
    }

    /// Build a fresh line for one replica of `config`
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(&config.stations, config.buffer_capacity, config.buffer_policy)
    }

    // ========================================================================
    // Flow
    // ========================================================================

    /// Create a new item and queue it at the first station
    ///
    /// Returns the new item's id. Ids start at 1 and increase by one.
    pub fn admit(&mut self, now: u64) -> u64 {
        self.items_created += 1;
        let item = WorkItem::new(self.items_created, now);
        self.stations[0].enqueue(item, now);
        self.items_created
    }

    /// Release the items station `index` has finished at `now`
    pub fn finish(&mut self, index: usize, now: u64) -> Vec<WorkItem> {
        self.stations[index].finish(now)
    }

    /// Send an item that just finished station `index` to its next container
    ///
    /// Items leaving the last station go through the defect trial and land
    /// in a terminal list. The last-station rule wins for a one-station line.
    pub fn route(
        &mut self,
        index: usize,
        mut item: WorkItem,
        now: u64,
        rng: &mut RngManager,
        defect_rate: f64,
    ) -> Routed {
        let last = self.stations.len() - 1;

        if index == last {
            if rng.defect_trial(defect_rate) {
                item.reject(now);
                self.defective.push(item);
                Routed::Defective
            } else {
                item.complete(now);
                let cycle_time = item.cycle_time().unwrap_or(0);
                self.completed.push(item);
                Routed::Completed { cycle_time }
            }
        } else if index == 0 {
            self.push_buffer(item, now)
        } else {
            self.stations[index + 1].enqueue(item, now);
            Routed::Forwarded {
                to_station: index + 1,
            }
        }
    }

    fn push_buffer(&mut self, item: WorkItem, now: u64) -> Routed {
        self.buffer.push_back(item);

        match self.buffer_policy {
            BufferPolicy::Backpressure => {
                debug_assert!(
                    self.buffer.len() <= self.buffer_capacity,
                    "backpressure let the buffer overflow"
                );
                Routed::Buffered
            }
            BufferPolicy::DropOldest => {
                if self.buffer.len() <= self.buffer_capacity {
                    return Routed::Buffered;
                }
                match self.buffer.pop_front() {
                    Some(mut evicted) => {
                        let evicted_id = evicted.id();
                        evicted.scrap(now);
                        self.scrapped.push(evicted);
                        Routed::BufferedWithEviction { evicted_id }
                    }
                    None => Routed::Buffered,
                }
            }
        }
    }

    /// Move the head of the buffer into the second station's queue
    ///
    /// At most one item per call. Returns the moved item's id.
    pub fn release_from_buffer(&mut self, now: u64) -> Option<u64> {
        if self.stations.len() < 2 {
            return None;
        }
        let item = self.buffer.pop_front()?;
        let id = item.id();
        self.stations[1].enqueue(item, now);
        Some(id)
    }

    /// Clear station `index`'s failed flag if its repair is over
    pub fn complete_repair(&mut self, index: usize, now: u64) -> bool {
        self.stations[index].complete_repair(now)
    }

    /// Ask station `index` to start its next item
    ///
    /// Under backpressure the first station only starts when a buffer slot
    /// is free for every item it would then have in service.
    pub fn start(&mut self, index: usize, now: u64, rng: &mut RngManager) -> StartOutcome {
        if index == 0 && !self.first_station_has_room() && self.stations[0].queue_len() > 0 {
            return StartOutcome::Blocked;
        }
        self.stations[index].start_next(now, rng)
    }

    fn first_station_has_room(&self) -> bool {
        if self.stations.len() < 2 || self.buffer_policy != BufferPolicy::Backpressure {
            return true;
        }
        self.buffer.len() + self.stations[0].in_process_len() < self.buffer_capacity
    }

    /// Record the current WIP as a sample and return it
    pub fn sample_wip(&mut self) -> usize {
        let wip = self.wip();
        self.wip_samples.push(wip);
        wip
    }

    // ========================================================================
    // Accounting
    // ========================================================================

    /// Items admitted but not yet in a terminal list
    pub fn wip(&self) -> usize {
        self.buffer.len() + self.stations.iter().map(Station::held).sum::<usize>()
    }

    /// Items in the three terminal lists
    pub fn terminal_count(&self) -> usize {
        self.completed.len() + self.defective.len() + self.scrapped.len()
    }

    /// Items ever admitted
    pub fn items_created(&self) -> u64 {
        self.items_created
    }

    /// True if every admitted item is accounted for exactly once
    pub fn is_reconciled(&self) -> bool {
        (self.wip() + self.terminal_count()) as u64 == self.items_created
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    pub fn num_stations(&self) -> usize {
        self.stations.len()
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    pub fn buffer_policy(&self) -> BufferPolicy {
        self.buffer_policy
    }

    /// Buffered items, oldest first
    pub fn buffered_items(&self) -> impl Iterator<Item = &WorkItem> {
        self.buffer.iter()
    }

    pub fn completed(&self) -> &[WorkItem] {
        &self.completed
    }

    pub fn defective(&self) -> &[WorkItem] {
        &self.defective
    }

    pub fn scrapped(&self) -> &[WorkItem] {
        &self.scrapped
    }

    pub fn wip_samples(&self) -> &[usize] {
        &self.wip_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str, mean: f64) -> StationConfig {
        StationConfig::new(name, 1, mean, 0.0, 10.0).unwrap()
    }

    fn two_stage(capacity: usize, policy: BufferPolicy) -> ProductionLine {
        ProductionLine::new(&[station("A", 1.0), station("B", 100.0)], capacity, policy)
    }

    #[test]
    fn test_admit_assigns_sequential_ids() {
        let mut line = two_stage(2, BufferPolicy::Backpressure);
        assert_eq!(line.admit(0), 1);
        assert_eq!(line.admit(3), 2);
        assert_eq!(line.stations()[0].queue_len(), 2);
    }

    #[test]
    fn test_single_station_routes_to_terminal() {
        let mut line = ProductionLine::new(&[station("Only", 1.0)], 0, BufferPolicy::Backpressure);
        let mut rng = RngManager::new(1);
        line.admit(0);
        line.start(0, 0, &mut rng);

        let finished = line.finish(0, 1);
        assert_eq!(finished.len(), 1);
        for item in finished {
            let routed = line.route(0, item, 1, &mut rng, 0.0);
            assert_eq!(routed, Routed::Completed { cycle_time: 1 });
        }
        assert_eq!(line.completed().len(), 1);
        assert_eq!(line.wip(), 0);
        assert!(line.is_reconciled());
    }

    #[test]
    fn test_first_station_routes_into_buffer() {
        let mut line = two_stage(2, BufferPolicy::Backpressure);
        let mut rng = RngManager::new(1);
        line.admit(0);
        line.start(0, 0, &mut rng);

        for item in line.finish(0, 1) {
            assert_eq!(line.route(0, item, 1, &mut rng, 0.0), Routed::Buffered);
        }
        assert_eq!(line.buffer_len(), 1);
        assert_eq!(line.stations()[1].queue_len(), 0);

        assert_eq!(line.release_from_buffer(1), Some(1));
        assert_eq!(line.buffer_len(), 0);
        assert_eq!(line.stations()[1].queue_len(), 1);
    }

    #[test]
    fn test_backpressure_blocks_first_station() {
        let mut line = two_stage(1, BufferPolicy::Backpressure);
        let mut rng = RngManager::new(1);
        line.admit(0);
        line.admit(0);

        assert!(matches!(line.start(0, 0, &mut rng), StartOutcome::Started { .. }));
        // The finished item now occupies the only buffer slot
        for item in line.finish(0, 1) {
            line.route(0, item, 1, &mut rng, 0.0);
        }
        assert_eq!(line.start(0, 1, &mut rng), StartOutcome::Blocked);

        line.release_from_buffer(2);
        assert!(matches!(line.start(0, 2, &mut rng), StartOutcome::Started { .. }));
    }

    #[test]
    fn test_zero_capacity_backpressure_never_starts() {
        let mut line = two_stage(0, BufferPolicy::Backpressure);
        let mut rng = RngManager::new(1);
        line.admit(0);
        assert_eq!(line.start(0, 0, &mut rng), StartOutcome::Blocked);
    }

    #[test]
    fn test_drop_oldest_scraps_evicted_item() {
        let mut line = two_stage(1, BufferPolicy::DropOldest);
        let mut rng = RngManager::new(1);
        line.admit(0);
        line.admit(0);

        line.start(0, 0, &mut rng);
        for item in line.finish(0, 1) {
            assert_eq!(line.route(0, item, 1, &mut rng, 0.0), Routed::Buffered);
        }
        line.start(0, 1, &mut rng);
        for item in line.finish(0, 2) {
            assert_eq!(
                line.route(0, item, 2, &mut rng, 0.0),
                Routed::BufferedWithEviction { evicted_id: 1 }
            );
        }

        assert_eq!(line.buffer_len(), 1);
        assert_eq!(line.scrapped().len(), 1);
        assert_eq!(line.scrapped()[0].id(), 1);
        assert!(line.is_reconciled());
    }

    #[test]
    fn test_certain_defect_goes_to_defective_list() {
        let mut line = ProductionLine::new(&[station("Only", 1.0)], 0, BufferPolicy::Backpressure);
        let mut rng = RngManager::new(1);
        line.admit(0);
        line.start(0, 0, &mut rng);
        for item in line.finish(0, 1) {
            assert_eq!(line.route(0, item, 1, &mut rng, 1.0), Routed::Defective);
        }
        assert_eq!(line.defective().len(), 1);
        assert!(line.completed().is_empty());
    }

    #[test]
    fn test_sample_wip_records_history() {
        let mut line = two_stage(2, BufferPolicy::Backpressure);
        assert_eq!(line.sample_wip(), 0);
        line.admit(0);
        assert_eq!(line.sample_wip(), 1);
        assert_eq!(line.wip_samples(), &[0, 1]);
    }
}
