use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::aat::AuthToken;
use crate::configuration::Configuration;
use crate::keybase::Keybase;
use crate::networking::routes::Route;
use crate::networking::rpc_error::RpcError;
use crate::networking::transport::{RelayTransport, TransportOptions};
use crate::node::Node;
use crate::relay::{RelayRequest, RelayResponse};
use crate::session::{Session, SessionManager};

///
/// Session manager for one chain. Starts out with `initial` as the current
/// session. `request_new_session` hands out queued sessions or failures in
/// order and, once they run out, repeats the last session it knew about.
///
pub struct MockSessionManager {
    chain: String,
    current: RwLock<Option<Session>>,
    last_known: RwLock<Session>,
    queued: RwLock<VecDeque<Result<Session, String>>>,
    new_session_requests: RwLock<usize>,
    hint_updates: RwLock<usize>,
    destroyed: RwLock<usize>,
    dispatchers: RwLock<Vec<Node>>,
}

impl MockSessionManager {
    pub fn new(initial: Session) -> Self {
        MockSessionManager {
            chain: initial.chain().to_string(),
            current: RwLock::new(Some(initial.clone())),
            last_known: RwLock::new(initial),
            queued: RwLock::new(VecDeque::new()),
            new_session_requests: RwLock::new(0),
            hint_updates: RwLock::new(0),
            destroyed: RwLock::new(0),
            dispatchers: RwLock::new(vec![]),
        }
    }

    pub async fn queue_new_session(&self, session: Session) {
        self.queued.write().await.push_back(Ok(session));
    }

    /// The next `request_new_session` fails with `message`.
    pub async fn queue_refresh_failure(&self, message: &str) {
        self.queued.write().await.push_back(Err(message.to_string()));
    }

    pub async fn new_session_requests(&self) -> usize {
        *self.new_session_requests.read().await
    }

    pub async fn hint_updates(&self) -> usize {
        *self.hint_updates.read().await
    }

    pub async fn destroyed(&self) -> usize {
        *self.destroyed.read().await
    }

    pub async fn dispatchers(&self) -> Vec<Node> {
        self.dispatchers.read().await.clone()
    }

    fn check_chain(&self, chain: &str) -> crate::Result<()> {
        if chain != self.chain {
            return Err(format!("no session for chain {}", chain).into());
        }
        Ok(())
    }

    async fn make_current(&self, session: Session) -> Session {
        *self.last_known.write().await = session.clone();
        *self.current.write().await = Some(session.clone());
        session
    }
}

#[async_trait]
impl SessionManager for MockSessionManager {
    async fn get_current_session(
        &self,
        aat: &AuthToken,
        chain: &str,
        configuration: &Configuration,
    ) -> crate::Result<Session> {
        self.check_chain(chain)?;
        let current = self.current.read().await.clone();
        match current {
            Some(session) => Ok(session),
            None => self.request_new_session(aat, chain, configuration).await,
        }
    }

    async fn request_new_session(
        &self,
        _aat: &AuthToken,
        chain: &str,
        _configuration: &Configuration,
    ) -> crate::Result<Session> {
        self.check_chain(chain)?;
        *self.new_session_requests.write().await += 1;
        let queued = self.queued.write().await.pop_front();
        let session = match queued {
            Some(Ok(session)) => session,
            Some(Err(message)) => return Err(message.into()),
            None => self.last_known.read().await.clone(),
        };
        Ok(self.make_current(session).await)
    }

    async fn update_current_session(
        &self,
        session_hint: &Session,
        _aat: &AuthToken,
        chain: &str,
        _configuration: &Configuration,
    ) -> crate::Result<Session> {
        self.check_chain(chain)?;
        *self.hint_updates.write().await += 1;
        Ok(self.make_current(session_hint.clone()).await)
    }

    async fn destroy_session(&self, _aat: &AuthToken, _chain: &str) {
        *self.destroyed.write().await += 1;
        *self.current.write().await = None;
    }

    async fn add_new_dispatcher(&self, node: &Node) {
        self.dispatchers.write().await.push(node.clone());
    }
}

/// Keybase that reports every account unlocked but cannot sign.
pub struct RefusingKeybase;

#[async_trait]
impl Keybase for RefusingKeybase {
    async fn is_unlocked(&self, _address_hex: &str) -> bool {
        true
    }

    async fn sign_with_unlocked_account(
        &self,
        _address_hex: &str,
        _payload: &[u8],
    ) -> crate::Result<Vec<u8>> {
        Err("signing device unavailable".into())
    }
}

/// What the mock transport answers to the next relay.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Payload(String),
    Failure(RpcError),
}

impl ScriptedReply {
    pub fn ok(payload: &str) -> Self {
        ScriptedReply::Payload(payload.to_string())
    }

    pub fn error(code: Option<u32>, message: &str) -> Self {
        ScriptedReply::Failure(RpcError::new(code, message))
    }

    pub fn stale_with_hint(code: u32, session: Session) -> Self {
        let mut error = RpcError::new(Some(code), "session out of sync");
        error.session = Some(session);
        ScriptedReply::Failure(error)
    }
}

/// Transport spy. Records every call and answers from scripted queues;
/// an empty queue answers with an uncoded error.
#[derive(Default)]
pub struct MockTransport {
    replies: RwLock<VecDeque<ScriptedReply>>,
    requests: RwLock<Vec<(Node, RelayRequest)>>,
    challenge_replies: RwLock<VecDeque<Result<serde_json::Value, RpcError>>>,
    challenges: RwLock<Vec<(Node, serde_json::Value)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport::default()
    }

    pub async fn push(&self, reply: ScriptedReply) {
        self.replies.write().await.push_back(reply);
    }

    pub async fn push_challenge(&self, reply: Result<serde_json::Value, RpcError>) {
        self.challenge_replies.write().await.push_back(reply);
    }

    pub async fn requests(&self) -> Vec<(Node, RelayRequest)> {
        self.requests.read().await.clone()
    }

    /// Number of relays received.
    pub async fn call_count(&self) -> usize {
        self.requests.read().await.len()
    }

    pub async fn challenges(&self) -> Vec<(Node, serde_json::Value)> {
        self.challenges.read().await.clone()
    }
}

#[async_trait]
impl RelayTransport for MockTransport {
    async fn relay(
        &self,
        node: &Node,
        request: &RelayRequest,
        _options: &TransportOptions,
    ) -> Result<RelayResponse, RpcError> {
        self.requests
            .write()
            .await
            .push((node.clone(), request.clone()));
        let reply = self.replies.write().await.pop_front();
        match reply {
            Some(ScriptedReply::Payload(payload)) => {
                RelayResponse::new("0a0b", &payload, request.proof.clone())
                    .map_err(|err| RpcError::new(None, &err.to_string()))
            }
            Some(ScriptedReply::Failure(error)) => Err(error),
            None => Err(RpcError::new(None, "no scripted reply")),
        }
    }

    async fn send(
        &self,
        node: &Node,
        route: Route,
        payload: &serde_json::Value,
        _options: &TransportOptions,
    ) -> Result<serde_json::Value, RpcError> {
        if route != Route::Challenge {
            return Err(RpcError::new(None, "unexpected route"));
        }
        self.challenges
            .write()
            .await
            .push((node.clone(), payload.clone()));
        let reply = self.challenge_replies.write().await.pop_front();
        reply.unwrap_or_else(|| Err(RpcError::new(None, "no scripted challenge reply")))
    }
}
