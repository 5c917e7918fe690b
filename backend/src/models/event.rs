//! Event journal for one replica.
//!
//! Every significant state change of the line is recorded as an [`Event`].
//! The journal lets a replica be audited after the fact: FIFO order at a
//! station, the wait each item saw, when a station went down, which items
//! were scrapped.
//!
//! # Event Types
//!
//! - **Arrival**: a new item entered the first station's queue
//! - **Service**: an item started or finished service at a station
//! - **Failure**: a station broke down or came back from repair
//! - **Buffer**: an item entered, left or was evicted from the buffer
//! - **Exit**: an item completed or failed inspection
//! - **Sampling**: a WIP reading was taken
//! - **Truncated**: the safety cutoff stopped a replica that was still draining
//!
//! # Example
//!
//! ```rust
//! use assembly_line_core::models::Event;
//!
//! let event = Event::ServiceStart {
//!     tick: 90,
//!     station: "RAM".to_string(),
//!     item_id: 2,
//!     wait: 15,
//!     duration: 14.2,
//! };
//!
//! assert_eq!(event.tick(), 90);
//! assert_eq!(event.item_id(), Some(2));
//! ```

use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
///
/// Events are logged in the order they occur within a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// New item admitted at the first station
    Arrival { tick: u64, item_id: u64 },

    /// Item left a queue and entered service
    ServiceStart {
        tick: u64,
        station: String,
        item_id: u64,
        wait: u64,
        duration: f64,
    },

    /// Item finished service at a station
    StageComplete {
        tick: u64,
        station: String,
        item_id: u64,
    },

    /// A start attempt broke the station; `item_id` stays queued
    StationFailure {
        tick: u64,
        station: String,
        item_id: u64,
        repair_until: f64,
    },

    /// Repair finished and the station accepts work again
    StationRepaired { tick: u64, station: String },

    /// Item entered the inter-stage buffer
    BufferEnqueue {
        tick: u64,
        item_id: u64,
        buffer_len: usize,
    },

    /// Item moved from the buffer to the second station
    BufferRelease { tick: u64, item_id: u64 },

    /// Item pushed out of a full buffer and scrapped
    BufferEviction { tick: u64, item_id: u64 },

    /// Item passed final inspection
    Completed {
        tick: u64,
        item_id: u64,
        cycle_time: u64,
    },

    /// Item failed final inspection
    Defective { tick: u64, item_id: u64 },

    /// WIP reading
    WipSample { tick: u64, wip: usize },

    /// Safety cutoff reached with items still in the line
    Truncated { tick: u64, wip: usize },
}

impl Event {
    /// Tick at which the event occurred
    pub fn tick(&self) -> u64 {
        match self {
            Event::Arrival { tick, .. } => *tick,
            Event::ServiceStart { tick, .. } => *tick,
            Event::StageComplete { tick, .. } => *tick,
            Event::StationFailure { tick, .. } => *tick,
            Event::StationRepaired { tick, .. } => *tick,
            Event::BufferEnqueue { tick, .. } => *tick,
            Event::BufferRelease { tick, .. } => *tick,
            Event::BufferEviction { tick, .. } => *tick,
            Event::Completed { tick, .. } => *tick,
            Event::Defective { tick, .. } => *tick,
            Event::WipSample { tick, .. } => *tick,
            Event::Truncated { tick, .. } => *tick,
        }
    }

    /// Short name of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Arrival { .. } => "Arrival",
            Event::ServiceStart { .. } => "ServiceStart",
            Event::StageComplete { .. } => "StageComplete",
            Event::StationFailure { .. } => "StationFailure",
            Event::StationRepaired { .. } => "StationRepaired",
            Event::BufferEnqueue { .. } => "BufferEnqueue",
            Event::BufferRelease { .. } => "BufferRelease",
            Event::BufferEviction { .. } => "BufferEviction",
            Event::Completed { .. } => "Completed",
            Event::Defective { .. } => "Defective",
            Event::WipSample { .. } => "WipSample",
            Event::Truncated { .. } => "Truncated",
        }
    }

    /// Item the event concerns, if any
    pub fn item_id(&self) -> Option<u64> {
        match self {
            Event::Arrival { item_id, .. }
            | Event::ServiceStart { item_id, .. }
            | Event::StageComplete { item_id, .. }
            | Event::StationFailure { item_id, .. }
            | Event::BufferEnqueue { item_id, .. }
            | Event::BufferRelease { item_id, .. }
            | Event::BufferEviction { item_id, .. }
            | Event::Completed { item_id, .. }
            | Event::Defective { item_id, .. } => Some(*item_id),
            _ => None,
        }
    }

    /// Station the event concerns, if any
    pub fn station(&self) -> Option<&str> {
        match self {
            Event::ServiceStart { station, .. }
            | Event::StageComplete { station, .. }
            | Event::StationFailure { station, .. }
            | Event::StationRepaired { station, .. } => Some(station),
            _ => None,
        }
    }
}

/// Event log for storing and querying simulation events.
///
/// This is a simple wrapper around `Vec<Event>` with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events recorded at `tick`
    pub fn events_at_tick(&self, tick: u64) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Events of one type, e.g. `"ServiceStart"`
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// The full trail of one item
    pub fn events_for_item(&self, item_id: u64) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.item_id() == Some(item_id))
            .collect()
    }

    /// Everything that happened at one station
    pub fn events_for_station(&self, station: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.station() == Some(station))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(tick: u64, station: &str, item_id: u64) -> Event {
        Event::ServiceStart {
            tick,
            station: station.to_string(),
            item_id,
            wait: 0,
            duration: 10.0,
        }
    }

    #[test]
    fn test_event_type() {
        assert_eq!(start(1, "RAM", 1).event_type(), "ServiceStart");
        assert_eq!(Event::WipSample { tick: 60, wip: 3 }.event_type(), "WipSample");
    }

    #[test]
    fn test_event_without_item() {
        let event = Event::StationRepaired {
            tick: 5,
            station: "Disco".to_string(),
        };
        assert_eq!(event.item_id(), None);
        assert_eq!(event.station(), Some("Disco"));
    }

    #[test]
    fn test_event_log_queries() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.log(Event::Arrival { tick: 1, item_id: 1 });
        log.log(start(1, "Motherboard", 1));
        log.log(Event::Arrival { tick: 2, item_id: 2 });
        log.log(start(3, "RAM", 1));

        assert_eq!(log.len(), 4);
        assert_eq!(log.events_at_tick(1).len(), 2);
        assert_eq!(log.events_of_type("Arrival").len(), 2);
        assert_eq!(log.events_for_item(1).len(), 3);
        assert_eq!(log.events_for_station("RAM").len(), 1);

        log.clear();
        assert!(log.is_empty());
    }
}
