//! The event catalog: an append-only, in-memory list of events.
//!
//! Events are stored in creation order and never removed. New events only
//! enter through [`EventCatalog::create_event`] (see [`crate::authoring`]),
//! which assigns `count + 1` as the id.

use chrono::NaiveDate;
use rand::Rng;
use repp_types::{Event, EventId, NewEvent, Participant};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::error::CatalogError;

/// Title of the workshop event seeded ahead of the generated demo events.
pub const WORKSHOP_NAME: &str = "Blockchain Basics Workshop";

/// Upper bound (inclusive) of generated demo stake requirements.
const DEMO_MAX_STAKE: u32 = 100;

/// All events known to this process.
#[derive(Debug, Clone)]
pub struct EventCatalog {
    pub(crate) events: Vec<Event>,
    pub(crate) default_stake_points: u32,
}

impl EventCatalog {
    /// Create an empty catalog.
    pub const fn new(default_stake_points: u32) -> Self {
        Self {
            events: Vec::new(),
            default_stake_points,
        }
    }

    /// Build the catalog described by `config`, seeding demo events dated
    /// `today` when enabled.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if a seeded event fails validation.
    pub fn from_config(
        config: &CatalogConfig,
        today: NaiveDate,
        rng: &mut impl Rng,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(config.default_stake_points);
        if config.seed_demo_events {
            catalog.seed_demo(config.demo_event_count, today, rng)?;
        }
        Ok(catalog)
    }

    /// Append the workshop event and `count` generated events.
    ///
    /// The workshop carries two sample participants and no location.
    /// Generated events are numbered by their position in the batch, so
    /// "Event 1" follows the workshop with id 2. Each stakes a random 1 to
    /// 100 points.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if an event cannot be appended.
    pub fn seed_demo(
        &mut self,
        count: usize,
        today: NaiveDate,
        rng: &mut impl Rng,
    ) -> Result<(), CatalogError> {
        let workshop_date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap_or(today);
        let workshop = self.create_event(NewEvent {
            name: WORKSHOP_NAME.to_owned(),
            date: workshop_date,
            location: String::new(),
            stake_points: Some(self.default_stake_points),
            description: WORKSHOP_NAME.to_owned(),
        })?;
        self.record_participant(workshop.id, Participant::new("John Doe", 670))?;
        self.record_participant(workshop.id, Participant::new("Jane Smith", 350))?;

        for k in 1..=count {
            self.create_event(NewEvent {
                name: format!("Event {k}"),
                date: today,
                location: format!("Location {k}"),
                stake_points: Some(rng.random_range(1..=DEMO_MAX_STAKE)),
                description: format!("Event {k}"),
            })?;
        }
        debug!(events = self.len(), "demo catalog seeded");
        Ok(())
    }

    /// All events in creation order.
    pub fn list(&self) -> &[Event] {
        &self.events
    }

    /// Look up an event by id.
    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Look up an event by id, failing with [`CatalogError::UnknownEvent`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownEvent`] if no such event exists.
    pub fn require(&self, id: EventId) -> Result<&Event, CatalogError> {
        self.get(id).ok_or(CatalogError::UnknownEvent(id))
    }

    pub(crate) fn require_mut(&mut self, id: EventId) -> Result<&mut Event, CatalogError> {
        self.events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(CatalogError::UnknownEvent(id))
    }

    /// Number of events.
    pub const fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the catalog has no events.
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Stake applied to new events that do not specify one.
    pub const fn default_stake_points(&self) -> u32 {
        self.default_stake_points
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new(CatalogConfig::default().default_stake_points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn empty_catalog() {
        let catalog = EventCatalog::new(5);
        assert!(catalog.is_empty());
        assert!(catalog.get(EventId(1)).is_none());
        assert_eq!(
            catalog.require(EventId(1)).unwrap_err(),
            CatalogError::UnknownEvent(EventId(1))
        );
    }

    #[test]
    fn demo_seed_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let catalog =
            EventCatalog::from_config(&CatalogConfig::default(), today(), &mut rng).unwrap();

        assert_eq!(catalog.len(), 9);
        let workshop = catalog.get(EventId(1)).unwrap();
        assert_eq!(workshop.name, WORKSHOP_NAME);
        assert_eq!(workshop.stake_points, 5);
        assert!(workshop.location.is_empty());
        assert_eq!(workshop.participants.len(), 2);
        assert_eq!(workshop.participants[0].name, "John Doe");
        assert_eq!(workshop.participants[1].score, 350);

        let second = catalog.get(EventId(2)).unwrap();
        assert_eq!(second.name, "Event 1");
        assert_eq!(second.location, "Location 1");
        assert_eq!(second.date, today());
        let last = catalog.get(EventId(9)).unwrap();
        assert_eq!(last.name, "Event 8");
        assert_eq!(last.description, "Event 8");
        for event in &catalog.list()[1..] {
            assert!((1..=100).contains(&event.stake_points));
            assert!(event.participants.is_empty());
        }
    }

    #[test]
    fn seeding_can_be_disabled() {
        let config = CatalogConfig {
            seed_demo_events: false,
            ..CatalogConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        let catalog = EventCatalog::from_config(&config, today(), &mut rng).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn list_preserves_creation_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let catalog =
            EventCatalog::from_config(&CatalogConfig::default(), today(), &mut rng).unwrap();
        let ids: Vec<u64> = catalog.list().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<_>>());
    }
}
