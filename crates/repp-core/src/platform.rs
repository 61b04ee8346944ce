//! The application facade shared by every front end.
//!
//! [`Platform`] owns the wallet session, the registration flow, and the
//! event catalog. Catalog access goes through a tokio `RwLock`; the lock is
//! never held while the wallet provider is awaited.

use std::sync::Arc;

use repp_chain::{AbiError, ChainConfig, WalletProvider};
use repp_types::{
    Address, Event, EventId, NewEvent, Participant, RegistrationStatus, ReviewDecision,
    WalletSession,
};
use tokio::sync::RwLock;

use crate::catalog::EventCatalog;
use crate::error::{PlatformError, ReppError};
use crate::registration::{RegistrationFlow, RegistrationOutcome};
use crate::session::SessionManager;

/// Wallet session, registration flow, and event catalog behind one handle.
#[derive(Debug)]
pub struct Platform<W> {
    chain: ChainConfig,
    sessions: SessionManager<W>,
    registrations: RegistrationFlow<W>,
    catalog: RwLock<EventCatalog>,
}

impl<W: WalletProvider> Platform<W> {
    /// Assemble the platform around a wallet provider.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError`] if the registry interface cannot be loaded.
    pub fn new(
        wallet: Arc<W>,
        registry: Address,
        chain: ChainConfig,
        catalog: EventCatalog,
    ) -> Result<Self, AbiError> {
        Ok(Self {
            chain,
            sessions: SessionManager::new(Arc::clone(&wallet)),
            registrations: RegistrationFlow::new(wallet, registry)?,
            catalog: RwLock::new(catalog),
        })
    }

    /// The network this platform submits to.
    pub const fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// The registry contract receiving registrations.
    pub const fn registry(&self) -> Address {
        self.registrations.registry()
    }

    /// Snapshot of all events in creation order.
    pub async fn events(&self) -> Vec<Event> {
        self.catalog.read().await.list().to_vec()
    }

    /// Number of events in the catalog.
    pub async fn event_count(&self) -> usize {
        self.catalog.read().await.len()
    }

    /// A single event.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownEvent`](crate::CatalogError::UnknownEvent)
    /// if no such event exists.
    pub async fn event(&self, id: EventId) -> Result<Event, PlatformError> {
        Ok(self.catalog.read().await.require(id)?.clone())
    }

    /// Create an event.
    ///
    /// # Errors
    ///
    /// Returns a catalog error if `input` fails validation.
    pub async fn create_event(&self, input: NewEvent) -> Result<Event, PlatformError> {
        Ok(self.catalog.write().await.create_event(input)?)
    }

    /// Participants of an event.
    ///
    /// # Errors
    ///
    /// Returns a catalog error if no such event exists.
    pub async fn participants(&self, id: EventId) -> Result<Vec<Participant>, PlatformError> {
        Ok(self.catalog.read().await.list_participants(id)?.to_vec())
    }

    /// Append a participant and return its position.
    ///
    /// # Errors
    ///
    /// Returns a catalog error if no such event exists.
    pub async fn record_participant(
        &self,
        id: EventId,
        participant: Participant,
    ) -> Result<usize, PlatformError> {
        Ok(self
            .catalog
            .write()
            .await
            .record_participant(id, participant)?)
    }

    /// Apply a review decision to a participant.
    ///
    /// # Errors
    ///
    /// Returns a catalog error if the participant does not exist or already
    /// carries the opposite decision.
    pub async fn review(
        &self,
        id: EventId,
        index: usize,
        decision: ReviewDecision,
    ) -> Result<Participant, PlatformError> {
        Ok(self
            .catalog
            .write()
            .await
            .review_participant(id, index, decision)?
            .clone())
    }

    /// Connect the user's wallet.
    ///
    /// # Errors
    ///
    /// Returns [`ReppError::Connection`] if the provider fails.
    pub async fn connect(&self) -> Result<WalletSession, PlatformError> {
        Ok(self.sessions.connect().await?)
    }

    /// The current wallet session, if any.
    pub async fn session(&self) -> Option<WalletSession> {
        self.sessions.current().await
    }

    /// Register the connected account for an event.
    ///
    /// # Errors
    ///
    /// Returns [`ReppError::NoSession`] if no wallet is connected, a catalog
    /// error if the event does not exist, or [`ReppError::Submission`] if the
    /// provider rejects the call.
    pub async fn register(&self, id: EventId) -> Result<RegistrationOutcome, PlatformError> {
        let session = self.sessions.current().await.ok_or(ReppError::NoSession)?;
        let event = self.event(id).await?;
        Ok(self.registrations.register(&event, &session).await?)
    }

    /// Registration status of the connected account for an event.
    ///
    /// Without a session every event reads as unregistered.
    ///
    /// # Errors
    ///
    /// Returns a catalog error if the event does not exist.
    pub async fn registration_status(
        &self,
        id: EventId,
    ) -> Result<RegistrationStatus, PlatformError> {
        self.catalog.read().await.require(id)?;
        Ok(match self.sessions.current().await {
            Some(session) => self.registrations.status(id, session.address),
            None => RegistrationStatus::Unregistered,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use repp_types::ReviewStatus;

    use super::*;
    use crate::config::CatalogConfig;
    use crate::error::CatalogError;
    use crate::testing::FakeWallet;

    const REGISTRY: Address = Address::from_bytes([0x11; 20]);

    fn platform() -> (Arc<FakeWallet>, Platform<FakeWallet>) {
        let wallet = Arc::new(FakeWallet::new());
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let catalog = EventCatalog::from_config(&CatalogConfig::default(), today, &mut rng).unwrap();
        let platform =
            Platform::new(Arc::clone(&wallet), REGISTRY, ChainConfig::default(), catalog).unwrap();
        (wallet, platform)
    }

    #[tokio::test]
    async fn register_without_session_is_rejected() {
        let (wallet, platform) = platform();
        let result = platform.register(EventId(2)).await;
        assert_eq!(result, Err(PlatformError::Repp(ReppError::NoSession)));
        assert!(wallet.batches().is_empty());
    }

    #[tokio::test]
    async fn connect_then_register_flow() {
        let (wallet, platform) = platform();
        platform.connect().await.unwrap();

        assert_eq!(
            platform.registration_status(EventId(2)).await.unwrap(),
            RegistrationStatus::Unregistered
        );
        let outcome = platform.register(EventId(2)).await.unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Submitted(_)));
        assert_eq!(
            platform.registration_status(EventId(2)).await.unwrap(),
            RegistrationStatus::Registered
        );
        assert_eq!(
            platform.register(EventId(2)).await.unwrap(),
            RegistrationOutcome::AlreadyRegistered
        );
        assert_eq!(wallet.batches().len(), 1);
    }

    #[tokio::test]
    async fn failed_connect_leaves_registrations_untouched() {
        let (wallet, platform) = platform();
        platform.connect().await.unwrap();
        platform.register(EventId(2)).await.unwrap();

        wallet.fail_connect.store(true, Ordering::SeqCst);
        assert!(matches!(
            platform.connect().await,
            Err(PlatformError::Repp(ReppError::Connection(_)))
        ));

        assert_eq!(
            platform.registration_status(EventId(2)).await.unwrap(),
            RegistrationStatus::Registered
        );
        assert_eq!(
            platform.register(EventId(2)).await.unwrap(),
            RegistrationOutcome::AlreadyRegistered
        );
        assert_eq!(wallet.batches().len(), 1);
    }

    #[tokio::test]
    async fn register_unknown_event_sends_nothing() {
        let (wallet, platform) = platform();
        platform.connect().await.unwrap();
        let result = platform.register(EventId(99)).await;
        assert_eq!(
            result,
            Err(PlatformError::Catalog(CatalogError::UnknownEvent(EventId(99))))
        );
        assert!(wallet.batches().is_empty());
    }

    #[tokio::test]
    async fn authoring_through_the_facade() {
        let (_, platform) = platform();
        let before = platform.event_count().await;
        let created = platform
            .create_event(NewEvent {
                name: String::from("New Event"),
                date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                location: String::new(),
                stake_points: None,
                description: String::from("A new event description"),
            })
            .await
            .unwrap();
        assert_eq!(created.id.into_inner(), u64::try_from(before).unwrap() + 1);
        assert_eq!(platform.events().await.last(), Some(&created));

        let index = platform
            .record_participant(created.id, Participant::new("Ada", 12))
            .await
            .unwrap();
        let reviewed = platform
            .review(created.id, index, ReviewDecision::Decline)
            .await
            .unwrap();
        assert_eq!(reviewed.review, ReviewStatus::Declined);
        assert_eq!(
            platform.participants(created.id).await.unwrap()[0].review,
            ReviewStatus::Declined
        );
    }
}
