//! Event log.
//!
//! Ordered history of transition records. The log is seeded with a start
//! record before play; only the tail can be removed, and never the seed.

use crate::error::EngineError;
use crate::event::Event;
use crate::world::LocationId;

use log::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// An empty log. Play normally starts from `EventLog::seeded`.
    pub fn new() -> EventLog {
        EventLog::default()
    }

    /// A log holding only the start record.
    pub fn seeded(start: Event) -> EventLog {
        EventLog { events: vec![start] }
    }

    pub fn append(&mut self, event: Event) {
        debug!("log: appending '{}' at {}", event.description, event.location);
        self.events.push(event);
    }

    /// The seed record.
    ///
    /// # Errors
    /// - `EmptyLog` if nothing was ever appended
    pub fn first(&self) -> Result<&Event, EngineError> {
        self.events.first().ok_or(EngineError::EmptyLog)
    }

    /// The most recent record.
    ///
    /// # Errors
    /// - `EmptyLog` if nothing was ever appended
    pub fn last(&self) -> Result<&Event, EngineError> {
        self.events.last().ok_or(EngineError::EmptyLog)
    }

    /// Drop the tail record and return it.
    ///
    /// # Errors
    /// - `EmptyLog` on a log that never received an event
    /// - `Underflow` if only the seed record remains
    pub fn remove_last(&mut self) -> Result<Event, EngineError> {
        match self.events.len() {
            0 => Err(EngineError::EmptyLog),
            1 => Err(EngineError::Underflow),
            _ => self.events.pop().ok_or(EngineError::EmptyLog),
        }
    }

    /// Every record, oldest first.
    pub fn to_sequence(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True if a record other than the seed is present.
    pub fn can_undo(&self) -> bool {
        self.events.len() > 1
    }

    /// Location id of every record, in order.
    pub fn id_log(&self) -> Vec<LocationId> {
        self.events.iter().map(|event| event.location).collect()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Effect;

    fn moved(to: LocationId, from: LocationId) -> Event {
        Event {
            location: to,
            description: format!("at {to}"),
            command: Some("go".into()),
            item: None,
            effect: Effect::Move {
                from,
                first_visit_points: None,
            },
        }
    }

    #[test]
    fn empty_log_peeks_fail() {
        let mut log = EventLog::new();
        assert_eq!(log.first(), Err(EngineError::EmptyLog));
        assert_eq!(log.last(), Err(EngineError::EmptyLog));
        assert_eq!(log.remove_last(), Err(EngineError::EmptyLog));
    }

    #[test]
    fn append_updates_last_but_not_first() {
        let mut log = EventLog::seeded(Event::start(1, "start"));
        log.append(moved(2, 1));
        assert_eq!(log.first().unwrap().location, 1);
        assert_eq!(log.last().unwrap().location, 2);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn seed_cannot_be_removed() {
        let mut log = EventLog::seeded(Event::start(1, "start"));
        log.append(moved(2, 1));
        assert_eq!(log.remove_last().unwrap().location, 2);
        assert_eq!(log.remove_last(), Err(EngineError::Underflow));
        assert_eq!(log.len(), 1);
        assert!(!log.can_undo());
    }

    #[test]
    fn sequence_is_restartable() {
        let mut log = EventLog::seeded(Event::start(1, "start"));
        log.append(moved(2, 1));
        log.append(moved(4, 2));
        let first_pass: Vec<_> = log.iter().map(|e| e.location).collect();
        let second_pass: Vec<_> = log.to_sequence().iter().map(|e| e.location).collect();
        assert_eq!(first_pass, second_pass);
        assert_eq!(log.id_log(), vec![1, 2, 4]);
    }
}
