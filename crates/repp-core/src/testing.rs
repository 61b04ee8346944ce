//! In-memory wallet provider for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use repp_chain::{ChainError, TransactionRequest, WalletAccount, WalletProvider};
use repp_types::{Address, TxHash};

/// Records every call and answers from fixed data.
#[derive(Debug, Default)]
pub struct FakeWallet {
    pub connect_calls: AtomicUsize,
    pub fail_connect: AtomicBool,
    pub fail_send: AtomicBool,
    pub sent: Mutex<Vec<Vec<TransactionRequest>>>,
    delay: Option<Duration>,
}

impl FakeWallet {
    pub const ADDRESS: Address = Address::from_bytes([0xa6; 20]);
    pub const TX_HASH: &'static str = "0xbundle01";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<TransactionRequest>> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl WalletProvider for FakeWallet {
    async fn connect(&self) -> Result<WalletAccount, ChainError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc {
                code: 4001,
                message: String::from("User rejected the request."),
            });
        }
        Ok(WalletAccount {
            address: Self::ADDRESS,
        })
    }

    async fn send_transaction(&self, calls: &[TransactionRequest]) -> Result<TxHash, ChainError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(calls.to_vec());
        self.pause().await;
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(ChainError::Provider(String::from("insufficient funds")));
        }
        Ok(TxHash(Self::TX_HASH.to_owned()))
    }

    fn name(&self) -> &str {
        "fake"
    }
}
