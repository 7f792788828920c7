use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{event, Level};

use crate::keypair::Keypair;

/// Account storage consumed by the dispatcher. Only unlocked accounts can sign.
#[async_trait]
pub trait Keybase: Send + Sync {
    async fn is_unlocked(&self, address_hex: &str) -> bool;

    async fn sign_with_unlocked_account(
        &self,
        address_hex: &str,
        payload: &[u8],
    ) -> crate::Result<Vec<u8>>;
}

/// A keybase holding keys in memory. Imported keys start locked.
#[derive(Default)]
pub struct InMemoryKeybase {
    accounts: RwLock<HashMap<String, Keypair>>,
    unlocked: RwLock<HashSet<String>>,
}

impl InMemoryKeybase {
    pub fn new() -> Self {
        InMemoryKeybase::default()
    }

    /// Stores the keypair and returns its address.
    pub async fn import(&self, keypair: Keypair) -> crate::Result<String> {
        let address = keypair.address()?;
        self.accounts.write().await.insert(address.clone(), keypair);
        Ok(address)
    }

    pub async fn unlock(&self, address_hex: &str) -> crate::Result<()> {
        if !self.accounts.read().await.contains_key(address_hex) {
            return Err(format!("account {} not found in keybase", address_hex).into());
        }
        self.unlocked.write().await.insert(address_hex.to_string());
        event!(Level::DEBUG, "unlocked account {}", address_hex);
        Ok(())
    }

    pub async fn lock(&self, address_hex: &str) {
        self.unlocked.write().await.remove(address_hex);
    }
}

#[async_trait]
impl Keybase for InMemoryKeybase {
    async fn is_unlocked(&self, address_hex: &str) -> bool {
        self.unlocked.read().await.contains(address_hex)
    }

    async fn sign_with_unlocked_account(
        &self,
        address_hex: &str,
        payload: &[u8],
    ) -> crate::Result<Vec<u8>> {
        if !self.is_unlocked(address_hex).await {
            return Err(format!("account {} is locked", address_hex).into());
        }
        let accounts = self.accounts.read().await;
        match accounts.get(address_hex) {
            Some(keypair) => Ok(keypair.sign(payload)?),
            None => Err(format!("account {} not found in keybase", address_hex).into()),
        }
    }
}
