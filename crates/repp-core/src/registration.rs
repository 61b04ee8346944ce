//! Event registration through the wallet provider.
//!
//! Registering submits exactly one call, `registerForEvent(eventId)` on the
//! registry contract with zero value, as a single-call batch. Status is kept
//! per `(event, account)` pair and only moves from unregistered to
//! registered after the provider accepts the batch. A pair with a
//! submission outstanding is not submitted again.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use repp_chain::{
    AbiError, ContractInterface, REGISTER_FOR_EVENT, Token, TransactionRequest, WalletProvider,
};
use repp_types::{Address, Event, EventId, RegistrationStatus, TxHash, WalletSession};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ReppError;

type RegistrationKey = (EventId, Address);

/// Result of a registration request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "tx_hash", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// The provider accepted the batch and returned this identifier.
    Submitted(TxHash),
    /// The pair was already registered; nothing was sent.
    AlreadyRegistered,
    /// A submission for the pair is still outstanding; nothing was sent.
    InFlight,
}

#[derive(Debug, Default)]
struct RegistrationBook {
    registered: BTreeSet<RegistrationKey>,
    in_flight: BTreeSet<RegistrationKey>,
}

/// Removes the in-flight marker once a submission settles, including when
/// the caller's future is dropped mid-await.
struct InFlightGuard<'a> {
    book: &'a Mutex<RegistrationBook>,
    key: RegistrationKey,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock(self.book).in_flight.remove(&self.key);
    }
}

fn lock(book: &Mutex<RegistrationBook>) -> MutexGuard<'_, RegistrationBook> {
    book.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Submits registrations and tracks which accounts registered for which
/// events.
#[derive(Debug)]
pub struct RegistrationFlow<W> {
    wallet: Arc<W>,
    registry: Address,
    interface: ContractInterface,
    book: Mutex<RegistrationBook>,
}

impl<W: WalletProvider> RegistrationFlow<W> {
    /// Create a flow targeting the registry contract at `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError`] if the embedded registry interface is malformed.
    pub fn new(wallet: Arc<W>, registry: Address) -> Result<Self, AbiError> {
        Ok(Self {
            wallet,
            registry,
            interface: ContractInterface::registry()?,
            book: Mutex::new(RegistrationBook::default()),
        })
    }

    /// The registry contract receiving registrations.
    pub const fn registry(&self) -> Address {
        self.registry
    }

    /// Register the session's account for `event`.
    ///
    /// Without a connected session nothing is sent. A failed submission
    /// leaves the status unchanged so the caller can retry.
    ///
    /// # Errors
    ///
    /// Returns [`ReppError::NoSession`] if `session` is not connected and
    /// [`ReppError::Submission`] if the call cannot be encoded or the
    /// provider rejects it.
    pub async fn register(
        &self,
        event: &Event,
        session: &WalletSession,
    ) -> Result<RegistrationOutcome, ReppError> {
        if !session.connected {
            return Err(ReppError::NoSession);
        }
        let key = (event.id, session.address);

        {
            let mut book = lock(&self.book);
            if book.registered.contains(&key) {
                debug!(event_id = %event.id, address = %session.address, "already registered");
                return Ok(RegistrationOutcome::AlreadyRegistered);
            }
            if !book.in_flight.insert(key) {
                debug!(event_id = %event.id, address = %session.address, "registration in flight");
                return Ok(RegistrationOutcome::InFlight);
            }
        }
        let _guard = InFlightGuard {
            book: &self.book,
            key,
        };

        let tx = TransactionRequest::contract_call(
            self.registry,
            &self.interface,
            REGISTER_FOR_EVENT,
            &[Token::Uint(u128::from(event.id.into_inner()))],
        )
        .map_err(|e| ReppError::Submission(e.to_string()))?;

        match self.wallet.send_transaction(std::slice::from_ref(&tx)).await {
            Ok(hash) => {
                lock(&self.book).registered.insert(key);
                info!(
                    event_id = %event.id,
                    address = %session.address,
                    tx_hash = %hash,
                    "registered for event"
                );
                Ok(RegistrationOutcome::Submitted(hash))
            }
            Err(e) => {
                warn!(
                    event_id = %event.id,
                    address = %session.address,
                    error = %e,
                    "registration submission failed"
                );
                Err(ReppError::Submission(e.to_string()))
            }
        }
    }

    /// Registration status of `address` for `event_id`.
    pub fn status(&self, event_id: EventId, address: Address) -> RegistrationStatus {
        if lock(&self.book).registered.contains(&(event_id, address)) {
            RegistrationStatus::Registered
        } else {
            RegistrationStatus::Unregistered
        }
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
    use std::time::Duration;

    use chrono::NaiveDate;
    use repp_chain::function_selector;

    use super::*;
    use crate::testing::FakeWallet;

    const REGISTRY: Address = Address::from_bytes([0x11; 20]);

    fn event(id: u64) -> Event {
        Event {
            id: EventId(id),
            name: format!("Event {id}"),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            location: format!("Location {id}"),
            stake_points: 10,
            description: format!("Event {id}"),
            participants: Vec::new(),
        }
    }

    fn session() -> WalletSession {
        WalletSession::connected(FakeWallet::ADDRESS)
    }

    fn flow(wallet: &Arc<FakeWallet>) -> RegistrationFlow<FakeWallet> {
        RegistrationFlow::new(Arc::clone(wallet), REGISTRY).unwrap()
    }

    #[tokio::test]
    async fn registering_sends_one_register_call() {
        let wallet = Arc::new(FakeWallet::new());
        let flow = flow(&wallet);

        let outcome = flow.register(&event(2), &session()).await.unwrap();
        assert_eq!(
            outcome,
            RegistrationOutcome::Submitted(TxHash(FakeWallet::TX_HASH.to_owned()))
        );

        let batches = wallet.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 1);
        let call = &batches[0][0];
        assert_eq!(call.to, REGISTRY);
        assert_eq!(call.value, 0);
        assert_eq!(call.data.len(), 4 + 32);
        assert_eq!(
            call.data[..4],
            function_selector("registerForEvent(uint256)")
        );
        assert_eq!(call.data[35], 2);
        assert!(call.data[4..35].iter().all(|b| *b == 0));

        assert_eq!(
            flow.status(EventId(2), FakeWallet::ADDRESS),
            RegistrationStatus::Registered
        );
    }

    #[tokio::test]
    async fn second_registration_is_a_no_op() {
        let wallet = Arc::new(FakeWallet::new());
        let flow = flow(&wallet);

        flow.register(&event(2), &session()).await.unwrap();
        let again = flow.register(&event(2), &session()).await.unwrap();
        assert_eq!(again, RegistrationOutcome::AlreadyRegistered);
        assert_eq!(wallet.batches().len(), 1);
    }

    #[tokio::test]
    async fn disconnected_session_sends_nothing() {
        let wallet = Arc::new(FakeWallet::new());
        let flow = flow(&wallet);
        let session = WalletSession {
            address: FakeWallet::ADDRESS,
            connected: false,
        };

        let result = flow.register(&event(2), &session).await;
        assert_eq!(result, Err(ReppError::NoSession));
        assert!(wallet.batches().is_empty());
        assert_eq!(wallet.connect_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_submission_keeps_status_and_allows_retry() {
        let wallet = Arc::new(FakeWallet::new());
        wallet.fail_send.store(true, Ordering::SeqCst);
        let flow = flow(&wallet);

        let result = flow.register(&event(3), &session()).await;
        assert!(matches!(result, Err(ReppError::Submission(_))));
        assert_eq!(
            flow.status(EventId(3), FakeWallet::ADDRESS),
            RegistrationStatus::Unregistered
        );

        wallet.fail_send.store(false, Ordering::SeqCst);
        let retry = flow.register(&event(3), &session()).await.unwrap();
        assert!(matches!(retry, RegistrationOutcome::Submitted(_)));
        assert_eq!(wallet.batches().len(), 2);
    }

    #[tokio::test]
    async fn status_is_per_event_and_account() {
        let wallet = Arc::new(FakeWallet::new());
        let flow = flow(&wallet);
        flow.register(&event(1), &session()).await.unwrap();

        let other = Address::from_bytes([0x22; 20]);
        assert_eq!(flow.status(EventId(1), other), RegistrationStatus::Unregistered);
        assert_eq!(
            flow.status(EventId(4), FakeWallet::ADDRESS),
            RegistrationStatus::Unregistered
        );
    }

    #[tokio::test]
    async fn concurrent_registration_is_reported_in_flight() {
        let wallet = Arc::new(FakeWallet::with_delay(Duration::from_millis(50)));
        let flow = Arc::new(flow(&wallet));

        let first = {
            let flow = Arc::clone(&flow);
            tokio::spawn(async move { flow.register(&event(5), &session()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = flow.register(&event(5), &session()).await.unwrap();
        assert_eq!(second, RegistrationOutcome::InFlight);

        assert!(matches!(
            first.await.unwrap(),
            Ok(RegistrationOutcome::Submitted(_))
        ));
        assert_eq!(wallet.batches().len(), 1);
    }
}
