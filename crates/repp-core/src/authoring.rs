//! Event authoring: organizers create events and review participants.
//!
//! Review decisions are local only. A participant starts `Pending` and moves
//! once to `Approved` or `Declined`; repeating the same decision is a no-op,
//! reversing it is rejected. Nothing here reaches the chain.
//!
//! Ids come from the local event count, so two processes authoring
//! concurrently will hand out colliding ids.

use repp_types::{Event, EventId, NewEvent, Participant, ReviewDecision, ReviewStatus};
use tracing::info;

use crate::catalog::EventCatalog;
use crate::error::CatalogError;

impl EventCatalog {
    /// Validate `input`, assign the next id, append, and return the event.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidEvent`] if the name or description is
    /// blank, or [`CatalogError::IdOverflow`] if no id is left.
    pub fn create_event(&mut self, input: NewEvent) -> Result<Event, CatalogError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidEvent("name is required".to_owned()));
        }
        let description = input.description.trim();
        if description.is_empty() {
            return Err(CatalogError::InvalidEvent(
                "description is required".to_owned(),
            ));
        }

        let id = u64::try_from(self.events.len())
            .ok()
            .and_then(|count| count.checked_add(1))
            .map(EventId)
            .ok_or(CatalogError::IdOverflow)?;

        let event = Event {
            id,
            name: name.to_owned(),
            date: input.date,
            location: input.location.trim().to_owned(),
            stake_points: input.stake_points.unwrap_or(self.default_stake_points),
            description: description.to_owned(),
            participants: Vec::new(),
        };
        self.events.push(event.clone());
        info!(event_id = %id, name = event.name, stake_points = event.stake_points, "event created");
        Ok(event)
    }

    /// Participants of an event in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownEvent`] if no such event exists.
    pub fn list_participants(&self, id: EventId) -> Result<&[Participant], CatalogError> {
        self.require(id).map(|event| event.participants.as_slice())
    }

    /// Append a participant to an event and return its position.
    ///
    /// This is the entry point for the external registration effect.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownEvent`] if no such event exists.
    pub fn record_participant(
        &mut self,
        id: EventId,
        participant: Participant,
    ) -> Result<usize, CatalogError> {
        let event = self.require_mut(id)?;
        let index = event.participants.len();
        event.participants.push(participant);
        Ok(index)
    }

    /// Apply a review decision to the participant at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownEvent`] or
    /// [`CatalogError::UnknownParticipant`] if the target does not exist, and
    /// [`CatalogError::AlreadyReviewed`] if a different decision was recorded.
    pub fn review_participant(
        &mut self,
        id: EventId,
        index: usize,
        decision: ReviewDecision,
    ) -> Result<&Participant, CatalogError> {
        let event = self.require_mut(id)?;
        let participant = event
            .participants
            .get_mut(index)
            .ok_or(CatalogError::UnknownParticipant { event_id: id, index })?;

        let target = decision.outcome();
        match participant.review {
            ReviewStatus::Pending => {
                participant.review = target;
                info!(event_id = %id, index, status = ?target, "participant reviewed");
            }
            current if current == target => {}
            current => {
                return Err(CatalogError::AlreadyReviewed {
                    event_id: id,
                    index,
                    status: current,
                });
            }
        }
        Ok(&*participant)
    }

    /// Approve the participant at `index`.
    ///
    /// # Errors
    ///
    /// See [`EventCatalog::review_participant`].
    pub fn approve_participant(
        &mut self,
        id: EventId,
        index: usize,
    ) -> Result<&Participant, CatalogError> {
        self.review_participant(id, index, ReviewDecision::Approve)
    }

    /// Decline the participant at `index`.
    ///
    /// # Errors
    ///
    /// See [`EventCatalog::review_participant`].
    pub fn decline_participant(
        &mut self,
        id: EventId,
        index: usize,
    ) -> Result<&Participant, CatalogError> {
        self.review_participant(id, index, ReviewDecision::Decline)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn new_event(name: &str) -> NewEvent {
        NewEvent {
            name: name.to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            location: String::new(),
            stake_points: None,
            description: String::from("A new event description"),
        }
    }

    fn catalog_with_participants() -> (EventCatalog, EventId) {
        let mut catalog = EventCatalog::new(5);
        let event = catalog.create_event(new_event("Workshop")).unwrap();
        catalog
            .record_participant(event.id, Participant::new("John Doe", 670))
            .unwrap();
        catalog
            .record_participant(event.id, Participant::new("Jane Smith", 350))
            .unwrap();
        (catalog, event.id)
    }

    #[test]
    fn creating_n_events_yields_increasing_unique_ids() {
        let mut catalog = EventCatalog::new(5);
        let mut ids = Vec::new();
        for n in 0..25 {
            let event = catalog.create_event(new_event(&format!("E{n}"))).unwrap();
            ids.push(event.id);
        }
        assert_eq!(catalog.len(), 25);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids.first(), Some(&EventId(1)));
        assert_eq!(ids.last(), Some(&EventId(25)));
    }

    #[test]
    fn create_applies_default_stake_and_trims() {
        let mut catalog = EventCatalog::new(5);
        let mut input = new_event("  New Event  ");
        input.location = String::from(" Berlin ");
        let event = catalog.create_event(input).unwrap();

        assert_eq!(event.name, "New Event");
        assert_eq!(event.location, "Berlin");
        assert_eq!(event.stake_points, 5);
        assert!(event.participants.is_empty());
        assert_eq!(catalog.get(event.id), Some(&event));
    }

    #[test]
    fn explicit_stake_wins() {
        let mut catalog = EventCatalog::new(5);
        let mut input = new_event("Staked");
        input.stake_points = Some(40);
        assert_eq!(catalog.create_event(input).unwrap().stake_points, 40);
    }

    #[test]
    fn blank_fields_are_rejected_without_appending() {
        let mut catalog = EventCatalog::new(5);
        assert!(matches!(
            catalog.create_event(new_event("   ")),
            Err(CatalogError::InvalidEvent(_))
        ));

        let mut input = new_event("Named");
        input.description = String::from("\n");
        assert!(matches!(
            catalog.create_event(input),
            Err(CatalogError::InvalidEvent(_))
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn participants_keep_registration_order() {
        let (catalog, id) = catalog_with_participants();
        let names: Vec<&str> = catalog
            .list_participants(id)
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["John Doe", "Jane Smith"]);
    }

    #[test]
    fn participants_of_unknown_event() {
        let catalog = EventCatalog::new(5);
        assert_eq!(
            catalog.list_participants(EventId(3)).unwrap_err(),
            CatalogError::UnknownEvent(EventId(3))
        );
    }

    #[test]
    fn approve_then_repeat_is_idempotent() {
        let (mut catalog, id) = catalog_with_participants();
        let reviewed = catalog.approve_participant(id, 0).unwrap();
        assert_eq!(reviewed.review, ReviewStatus::Approved);
        let again = catalog.approve_participant(id, 0).unwrap();
        assert_eq!(again.review, ReviewStatus::Approved);
        assert_eq!(
            catalog.list_participants(id).unwrap()[1].review,
            ReviewStatus::Pending
        );
    }

    #[test]
    fn reversing_a_decision_is_rejected() {
        let (mut catalog, id) = catalog_with_participants();
        catalog.decline_participant(id, 1).unwrap();
        assert_eq!(
            catalog.approve_participant(id, 1).unwrap_err(),
            CatalogError::AlreadyReviewed {
                event_id: id,
                index: 1,
                status: ReviewStatus::Declined
            }
        );
    }

    #[test]
    fn reviewing_missing_participant() {
        let (mut catalog, id) = catalog_with_participants();
        assert_eq!(
            catalog.approve_participant(id, 2).unwrap_err(),
            CatalogError::UnknownParticipant { event_id: id, index: 2 }
        );
    }
}
