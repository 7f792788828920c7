use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{event, Level};

use crate::aat::AuthToken;
use crate::configuration::Configuration;
use crate::node::Node;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionHeader {
    pub app_public_key: String,
    pub chain: String,
    #[serde(rename = "session_height")]
    pub session_block_height: u64,
}

/// A block-height-scoped binding of an application and chain to a fixed set of
/// service nodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub header: SessionHeader,
    #[serde(default)]
    pub key: String,
    pub nodes: Vec<Node>,
}

impl Session {
    pub fn new(header: SessionHeader, key: &str, nodes: Vec<Node>) -> Session {
        Session {
            header,
            key: key.to_string(),
            nodes,
        }
    }

    pub fn session_block_height(&self) -> u64 {
        self.header.session_block_height
    }

    pub fn chain(&self) -> &str {
        &self.header.chain
    }

    pub fn contains_node(&self, node: &Node) -> bool {
        self.nodes.iter().any(|n| n.public_key == node.public_key)
    }
}

///
/// Session acquisition and caching. The relay engine only reads sessions,
/// asks for a new one when the network reports it stale, and hands back
/// nodes that answered successfully as dispatcher candidates.
///
#[async_trait]
pub trait SessionManager: Send + Sync {
    async fn get_current_session(
        &self,
        aat: &AuthToken,
        chain: &str,
        configuration: &Configuration,
    ) -> crate::Result<Session>;

    async fn request_new_session(
        &self,
        aat: &AuthToken,
        chain: &str,
        configuration: &Configuration,
    ) -> crate::Result<Session>;

    /// Replaces the cached session with one embedded in a network error.
    async fn update_current_session(
        &self,
        session_hint: &Session,
        aat: &AuthToken,
        chain: &str,
        configuration: &Configuration,
    ) -> crate::Result<Session>;

    async fn destroy_session(&self, aat: &AuthToken, chain: &str);

    async fn add_new_dispatcher(&self, node: &Node);
}

type SessionKey = (String, String);

fn session_key(aat: &AuthToken, chain: &str) -> SessionKey {
    (aat.client_public_key.clone(), chain.to_string())
}

/// A session manager serving sessions published to it ahead of time, e.g.
/// loaded from a file. `request_new_session` re-reads the published session.
#[derive(Default)]
pub struct StaticSessionManager {
    published: RwLock<HashMap<SessionKey, Session>>,
    current: RwLock<HashMap<SessionKey, Session>>,
    dispatchers: RwLock<VecDeque<Node>>,
    max_dispatchers: usize,
}

impl StaticSessionManager {
    pub fn new() -> Self {
        StaticSessionManager::default()
    }

    /// Keeps at most `max_dispatchers` candidates, dropping the oldest first.
    /// 0 means no cap.
    pub fn with_max_dispatchers(mut self, max_dispatchers: usize) -> Self {
        self.max_dispatchers = max_dispatchers;
        self
    }

    pub async fn publish(&self, aat: &AuthToken, session: Session) {
        let key = session_key(aat, session.chain());
        self.published.write().await.insert(key, session);
    }

    pub async fn dispatchers(&self) -> Vec<Node> {
        self.dispatchers.read().await.iter().cloned().collect()
    }
}

#[async_trait]
impl SessionManager for StaticSessionManager {
    async fn get_current_session(
        &self,
        aat: &AuthToken,
        chain: &str,
        configuration: &Configuration,
    ) -> crate::Result<Session> {
        if let Some(session) = self.current.read().await.get(&session_key(aat, chain)) {
            return Ok(session.clone());
        }
        self.request_new_session(aat, chain, configuration).await
    }

    async fn request_new_session(
        &self,
        aat: &AuthToken,
        chain: &str,
        configuration: &Configuration,
    ) -> crate::Result<Session> {
        let key = session_key(aat, chain);
        let session = match self.published.read().await.get(&key) {
            Some(session) => session.clone(),
            None => return Err(format!("no session published for chain {}", chain).into()),
        };
        let mut current = self.current.write().await;
        if configuration.max_sessions > 0
            && !current.contains_key(&key)
            && current.len() >= configuration.max_sessions
        {
            return Err(format!(
                "session limit of {} reached",
                configuration.max_sessions
            )
            .into());
        }
        current.insert(key, session.clone());
        Ok(session)
    }

    async fn update_current_session(
        &self,
        session_hint: &Session,
        aat: &AuthToken,
        chain: &str,
        _configuration: &Configuration,
    ) -> crate::Result<Session> {
        if session_hint.chain() != chain {
            return Err(format!(
                "session hint is for chain {}, expected {}",
                session_hint.chain(),
                chain
            )
            .into());
        }
        self.current
            .write()
            .await
            .insert(session_key(aat, chain), session_hint.clone());
        Ok(session_hint.clone())
    }

    async fn destroy_session(&self, aat: &AuthToken, chain: &str) {
        self.current.write().await.remove(&session_key(aat, chain));
    }

    async fn add_new_dispatcher(&self, node: &Node) {
        let mut dispatchers = self.dispatchers.write().await;
        if dispatchers.iter().any(|d| d.public_key == node.public_key) {
            return;
        }
        if self.max_dispatchers > 0 && dispatchers.len() >= self.max_dispatchers {
            if let Some(dropped) = dispatchers.pop_front() {
                event!(Level::DEBUG, "dropping dispatcher candidate {}", dropped.service_url);
            }
        }
        event!(Level::DEBUG, "adding dispatcher candidate {}", node.service_url);
        dispatchers.push_back(node.clone());
    }
}
