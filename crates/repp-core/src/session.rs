//! Wallet session management.
//!
//! [`SessionManager`] owns the one wallet session of this process. A
//! successful connect stores the account; a failed one leaves whatever was
//! there untouched. While a connect is outstanding, further connects are
//! refused without reaching the provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use repp_chain::WalletProvider;
use repp_types::WalletSession;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::ReppError;

/// Tracks the connection status and address of the user's wallet.
#[derive(Debug)]
pub struct SessionManager<W> {
    wallet: Arc<W>,
    session: RwLock<Option<WalletSession>>,
    connecting: AtomicBool,
}

/// Clears the in-progress flag when the connect future completes or is
/// dropped.
struct ConnectingGuard<'a>(&'a AtomicBool);

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<W: WalletProvider> SessionManager<W> {
    /// Create a manager with no session.
    pub fn new(wallet: Arc<W>) -> Self {
        Self {
            wallet,
            session: RwLock::new(None),
            connecting: AtomicBool::new(false),
        }
    }

    /// Connect the user's wallet through the provider.
    ///
    /// Each call reaches the provider again; there is no automatic retry.
    ///
    /// # Errors
    ///
    /// Returns [`ReppError::Connection`] if the provider fails or rejects
    /// the request, or if another connect is still in progress.
    pub async fn connect(&self) -> Result<WalletSession, ReppError> {
        if self
            .connecting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(provider = self.wallet.name(), "wallet connect already in progress");
            return Err(ReppError::Connection(
                "a connection attempt is already in progress".to_owned(),
            ));
        }
        let _guard = ConnectingGuard(&self.connecting);

        match self.wallet.connect().await {
            Ok(account) => {
                let session = WalletSession::connected(account.address);
                *self.session.write().await = Some(session);
                info!(
                    address = %account.address,
                    provider = self.wallet.name(),
                    "wallet session connected"
                );
                Ok(session)
            }
            Err(e) => {
                warn!(provider = self.wallet.name(), error = %e, "failed to connect wallet");
                Err(ReppError::Connection(e.to_string()))
            }
        }
    }

    /// The current session, if a connect has succeeded.
    pub async fn current(&self) -> Option<WalletSession> {
        *self.session.read().await
    }

    /// Whether a connect is currently outstanding.
    pub fn is_connecting(&self) -> bool {
        self.connecting.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;
    use crate::testing::FakeWallet;

    #[tokio::test]
    async fn starts_disconnected() {
        let manager = SessionManager::new(Arc::new(FakeWallet::new()));
        assert_eq!(manager.current().await, None);
        assert!(!manager.is_connecting());
    }

    #[tokio::test]
    async fn successful_connect_stores_session() {
        let wallet = Arc::new(FakeWallet::new());
        let manager = SessionManager::new(Arc::clone(&wallet));

        let session = manager.connect().await.unwrap();
        assert!(session.connected);
        assert_eq!(session.address, FakeWallet::ADDRESS);
        assert_eq!(manager.current().await, Some(session));
        assert_eq!(wallet.connect_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_connect_stays_disconnected() {
        let wallet = Arc::new(FakeWallet::new());
        wallet.fail_connect.store(true, Ordering::SeqCst);
        let manager = SessionManager::new(Arc::clone(&wallet));

        let result = manager.connect().await;
        assert!(matches!(result, Err(ReppError::Connection(_))));
        assert_eq!(manager.current().await, None);
        assert!(!manager.is_connecting());
    }

    #[tokio::test]
    async fn failed_reconnect_keeps_previous_session() {
        let wallet = Arc::new(FakeWallet::new());
        let manager = SessionManager::new(Arc::clone(&wallet));
        let first = manager.connect().await.unwrap();

        wallet.fail_connect.store(true, Ordering::SeqCst);
        assert!(manager.connect().await.is_err());
        assert_eq!(manager.current().await, Some(first));
    }

    #[tokio::test]
    async fn sequential_connects_each_reach_provider() {
        let wallet = Arc::new(FakeWallet::new());
        let manager = SessionManager::new(Arc::clone(&wallet));
        manager.connect().await.unwrap();
        manager.connect().await.unwrap();
        assert_eq!(wallet.connect_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_connect_is_refused() {
        let wallet = Arc::new(FakeWallet::with_delay(Duration::from_millis(50)));
        let manager = Arc::new(SessionManager::new(Arc::clone(&wallet)));

        let first = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.connect().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(manager.is_connecting());

        let second = manager.connect().await;
        assert!(matches!(second, Err(ReppError::Connection(_))));

        assert!(first.await.unwrap().is_ok());
        assert_eq!(wallet.connect_calls.load(Ordering::SeqCst), 1);
    }
}
